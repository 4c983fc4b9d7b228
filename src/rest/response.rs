/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::FlickrError;
use crate::rest::parsable::{Parsable, XmlCursor, XmlElement};

/// Result of methods that return nothing beyond success
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoResponse;

impl Parsable for NoResponse {
    fn parse(element: &XmlElement, cursor: &mut XmlCursor<'_>) -> Result<Self, FlickrError> {
        cursor.skip(element)?;
        Ok(NoResponse)
    }

    fn parse_empty() -> Result<Self, FlickrError> {
        Ok(NoResponse)
    }
}

/// Untyped result for methods without a dedicated type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnknownResponse {
    /// Name of the first element in the response, if there was one
    pub name: Option<String>,
    pub attributes: Vec<(String, String)>,
    /// Raw markup inside that element
    pub inner_xml: String,
}

impl UnknownResponse {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl Parsable for UnknownResponse {
    fn parse(element: &XmlElement, cursor: &mut XmlCursor<'_>) -> Result<Self, FlickrError> {
        Ok(Self {
            name: Some(element.name().to_string()),
            attributes: element.attributes().to_vec(),
            inner_xml: cursor.read_inner_xml(element)?,
        })
    }

    fn parse_empty() -> Result<Self, FlickrError> {
        Ok(Self::default())
    }
}
