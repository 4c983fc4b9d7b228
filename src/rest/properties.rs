/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use strum_macros::{Display, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr, Display)]
pub enum SortOrder {
    #[strum(serialize = "date-posted-asc")]
    DatePostedAscending,
    #[strum(serialize = "date-posted-desc")]
    DatePostedDescending,
    #[strum(serialize = "date-taken-asc")]
    DateTakenAscending,
    #[strum(serialize = "date-taken-desc")]
    DateTakenDescending,
    #[strum(serialize = "interestingness-asc")]
    InterestingnessAscending,
    #[strum(serialize = "interestingness-desc")]
    InterestingnessDescending,
    #[strum(serialize = "relevance")]
    Relevance,
}

/// Extra photo fields that can be requested with list methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PhotoExtras {
    Description,
    License,
    #[strum(serialize = "date_upload")]
    DateUpload,
    #[strum(serialize = "date_taken")]
    DateTaken,
    #[strum(serialize = "owner_name")]
    OwnerName,
    Tags,
    #[strum(serialize = "machine_tags")]
    MachineTags,
    Views,
    Media,
    #[strum(serialize = "url_sq")]
    UrlSquare,
    #[strum(serialize = "url_m")]
    UrlMedium,
    #[strum(serialize = "url_o")]
    UrlOriginal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum MediaType {
    #[default]
    Unknown,
    Photo,
    Video,
}
