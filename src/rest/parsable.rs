/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::{ApiError, FlickrError, ParseError, translate};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use std::str::FromStr;

/// Root element of every response
pub const ENVELOPE_ELEMENT: &str = "rsp";

const STATUS_ATTR: &str = "stat";
const ERROR_ELEMENT: &str = "err";

/// A response type that reads itself from XML.
///
/// Implementations only ever see the content of a successful response; the
/// status check is done by [`load`].
pub trait Parsable: Sized {
    /// Reads `element`, the first child of the response. Must consume the
    /// element up to and including its end tag.
    fn parse(element: &XmlElement, cursor: &mut XmlCursor<'_>) -> Result<Self, FlickrError>;

    /// Called when a successful response has no content
    fn parse_empty() -> Result<Self, FlickrError> {
        Err(ParseError::ResponseMissing.into())
    }
}

/// Parses a raw response body into `T`.
///
/// A failure response is turned into the matching [`ApiError`] and `T` is
/// never asked to parse it.
pub fn load<T: Parsable>(bytes: &[u8]) -> Result<T, FlickrError> {
    let mut cursor = XmlCursor::new(bytes);
    let envelope = cursor.next_child()?.ok_or(ParseError::MissingEnvelope)?;
    if envelope.name() != ENVELOPE_ELEMENT {
        return Err(ParseError::MissingEnvelope.into());
    }

    match envelope.attr(STATUS_ATTR) {
        Some("ok") => {}
        Some("fail") => return Err(read_failure(&envelope, &mut cursor)?.into()),
        other => return Err(ParseError::UnknownStatus(other.map(String::from)).into()),
    }

    if envelope.is_empty() {
        return T::parse_empty();
    }
    match cursor.next_child()? {
        Some(element) => T::parse(&element, &mut cursor),
        None => T::parse_empty(),
    }
}

// <rsp stat="fail"><err code="1" msg="..."/></rsp>
fn read_failure(envelope: &XmlElement, cursor: &mut XmlCursor<'_>) -> Result<ApiError, FlickrError> {
    if envelope.is_empty() {
        return Err(ParseError::MissingErrorElement.into());
    }
    while let Some(element) = cursor.next_child()? {
        if element.name() != ERROR_ELEMENT {
            cursor.skip(&element)?;
            continue;
        }
        let code = element
            .attr("code")
            .ok_or(ParseError::MissingErrorElement)?;
        let code = code
            .trim()
            .parse::<u32>()
            .map_err(|_| ParseError::InvalidErrorCode(code.to_string()))?;
        let message = element.attr("msg").unwrap_or_default();
        return Ok(translate(code, message));
    }
    Err(ParseError::MissingErrorElement.into())
}

/// An element's name and attributes, read from its start tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    is_empty: bool,
}

impl XmlElement {
    fn from_start(start: &BytesStart<'_>, is_empty: bool) -> Result<Self, FlickrError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            is_empty,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True for a self closing element, which has no content to read
    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn required_attr(&self, name: &str) -> Result<&str, FlickrError> {
        self.attr(name)
            .ok_or_else(|| ParseError::MissingAttribute(name.to_string()).into())
    }

    /// Parses an attribute, treating a missing or empty value as `None`
    pub fn parse_attr<T: FromStr>(&self, name: &str) -> Result<Option<T>, FlickrError> {
        match self.attr(name).map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value.parse::<T>().map(Some).map_err(|_| {
                ParseError::InvalidAttribute {
                    name: name.to_string(),
                    value: value.to_string(),
                }
                .into()
            }),
        }
    }

    pub fn expect_name(&self, expected: &str) -> Result<(), FlickrError> {
        if self.name == expected {
            Ok(())
        } else {
            Err(ParseError::UnexpectedElement {
                expected: expected.to_string(),
                found: self.name.clone(),
            }
            .into())
        }
    }
}

/// Forward only reader over a response body
pub struct XmlCursor<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> XmlCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        let mut reader = Reader::from_reader(bytes);
        reader.config_mut().trim_text(true);
        Self { reader }
    }

    /// Moves to the next child of the element currently being read.
    ///
    /// Returns `None` once the end tag of that element has been consumed.
    pub fn next_child(&mut self) -> Result<Option<XmlElement>, FlickrError> {
        loop {
            match self.reader.read_event()? {
                Event::Start(e) => return Ok(Some(XmlElement::from_start(&e, false)?)),
                Event::Empty(e) => return Ok(Some(XmlElement::from_start(&e, true)?)),
                Event::End(_) | Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }

    /// Reads the text content of `element` and consumes its end tag.
    /// Nested elements are skipped.
    pub fn read_text(&mut self, element: &XmlElement) -> Result<String, FlickrError> {
        let mut text = String::new();
        if element.is_empty() {
            return Ok(text);
        }
        loop {
            match self.reader.read_event()? {
                Event::Text(t) => text.push_str(&t.unescape()?),
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
                Event::Start(e) => {
                    let end = e.to_end().into_owned();
                    self.reader.read_to_end(end.name())?;
                }
                Event::End(_) | Event::Eof => break,
                _ => {}
            }
        }
        Ok(text)
    }

    /// Returns the raw markup inside `element` and consumes its end tag
    pub fn read_inner_xml(&mut self, element: &XmlElement) -> Result<String, FlickrError> {
        if element.is_empty() {
            return Ok(String::new());
        }
        let inner = self.reader.read_text(QName(element.name().as_bytes()))?;
        Ok(inner.into_owned())
    }

    /// Skips the content of `element` through its end tag
    pub fn skip(&mut self, element: &XmlElement) -> Result<(), FlickrError> {
        if !element.is_empty() {
            self.reader.read_to_end(QName(element.name().as_bytes()))?;
        }
        Ok(())
    }
}
