/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use chrono::{DateTime, NaiveDateTime, Utc};

// Parses the "0"/"1" flags used for boolean attributes
pub fn from_flag(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("1") | Some("true"))
}

// Parses seconds since the epoch, e.g. dateupload
pub fn from_unix_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    let secs = value?.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp(secs, 0)
}

// Parses datetaken which has no timezone, e.g. "2008-01-01 12:00:00"
pub fn from_date_taken(value: Option<&str>) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value?.trim(), "%Y-%m-%d %H:%M:%S").ok()
}

// Parses strings that may be "" and sets to None
pub fn from_empty_str_to_none(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(String::from)
}

// Space separated tag list
pub fn from_tag_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|s| s.split_whitespace().map(String::from).collect())
        .unwrap_or_default()
}
