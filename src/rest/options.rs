/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::params::{IntoParameters, Parameters};
use crate::rest::properties::{PhotoExtras, SortOrder};

/// Page selection for list methods
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagingOptions {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl IntoParameters for PagingOptions {
    fn add_to(&self, params: &mut Parameters) {
        if let Some(page) = self.page {
            params.insert("page", page.to_string());
        }
        if let Some(per_page) = self.per_page {
            params.insert("per_page", per_page.to_string());
        }
    }
}

/// Options for `flickr.photos.search`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoSearchOptions {
    pub user_id: Option<String>,
    pub tags: Vec<String>,
    pub text: Option<String>,
    pub sort: Option<SortOrder>,
    pub extras: Vec<PhotoExtras>,
    pub paging: PagingOptions,
}

impl PhotoSearchOptions {
    pub fn user_id(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn extra(mut self, extra: PhotoExtras) -> Self {
        if !self.extras.contains(&extra) {
            self.extras.push(extra);
        }
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.paging.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.paging.per_page = Some(per_page);
        self
    }
}

impl IntoParameters for PhotoSearchOptions {
    fn add_to(&self, params: &mut Parameters) {
        if let Some(user_id) = &self.user_id {
            params.insert("user_id", user_id.as_str());
        }
        if !self.tags.is_empty() {
            params.insert("tags", self.tags.join(","));
        }
        if let Some(text) = &self.text {
            params.insert("text", text.as_str());
        }
        if let Some(sort) = self.sort {
            params.insert("sort", sort.to_string());
        }
        if !self.extras.is_empty() {
            let extras: Vec<&'static str> = self.extras.iter().map(|e| (*e).into()).collect();
            params.insert("extras", extras.join(","));
        }
        self.paging.add_to(params);
    }
}
