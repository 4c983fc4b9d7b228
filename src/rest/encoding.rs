/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use std::borrow::Cow;

/// Percent encodes a single value.
///
/// Only the RFC 3986 unreserved set (`A-Z a-z 0-9 - . _ ~`) is left as is, so a
/// space becomes `%20` and `+`/`&` are escaped rather than being read back as
/// separators.
pub fn encode_value(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Builds the `key=value&` query string used on GET requests.
///
/// Pairs keep the order they are given in and every pair is followed by `&`.
pub fn query_string<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut query = String::new();
    for (key, value) in pairs {
        query.push_str(key);
        query.push('=');
        query.push_str(&encode_value(value));
        query.push('&');
    }
    query
}

/// Builds an `application/x-www-form-urlencoded` body
pub fn form_body<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", encode_value(key), encode_value(value)))
        .collect::<Vec<_>>()
        .join("&")
}
