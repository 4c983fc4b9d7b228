/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::FlickrError;
use crate::rest::options::PhotoSearchOptions;
use crate::rest::params::{IntoParameters, Parameters};
use crate::rest::parsable::{Parsable, XmlCursor, XmlElement};
use crate::rest::parsers::{
    from_date_taken, from_empty_str_to_none, from_flag, from_tag_list, from_unix_timestamp,
};
use crate::rest::properties::MediaType;
use crate::rest::request::RequestAuth;
use crate::rest::Client;
use async_stream::try_stream;
use chrono::{DateTime, NaiveDateTime, Utc};
use futures::Stream;
use std::str::FromStr;

/// Holds information returned for a photo by the list and info methods.
///
/// See [Flickr API Docs](https://www.flickr.com/services/api/flickr.photos.getInfo.html)
/// for more details on the individual fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Photo {
    pub id: String,
    pub owner: Option<String>,
    pub owner_name: Option<String>,
    pub secret: Option<String>,
    pub server: Option<String>,
    pub farm: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub is_friend: bool,
    pub is_family: bool,
    pub date_uploaded: Option<DateTime<Utc>>,
    pub date_taken: Option<NaiveDateTime>,
    pub tags: Vec<String>,
    pub views: Option<u64>,
    pub media: MediaType,
    pub url_square: Option<String>,
    pub url_medium: Option<String>,
    pub url_original: Option<String>,
}

impl Photo {
    /// Returns information for the specified photo id
    pub async fn from_id(client: &Client, id: &str) -> Result<Self, FlickrError> {
        let params = Parameters::for_method("flickr.photos.getInfo").with("photo_id", id);
        client.get_response(&params, RequestAuth::ApiKey).await
    }

    /// Streams every photo matching `options`, requesting page after page.
    /// Starts at `options.paging.page` when set.
    pub fn search_stream(
        client: Client,
        options: PhotoSearchOptions,
    ) -> impl Stream<Item = Result<Photo, FlickrError>> {
        try_stream! {
            let mut page = options.paging.page.unwrap_or(1);
            loop {
                let collection = PhotoCollection::search(&client, &options.clone().page(page)).await?;
                let is_done = collection.photos.is_empty() || collection.page >= collection.pages;

                for photo in collection.photos {
                    yield photo;
                }

                if is_done {
                    break;
                }
                page += 1;
            }
        }
    }
}

impl Parsable for Photo {
    fn parse(element: &XmlElement, cursor: &mut XmlCursor<'_>) -> Result<Self, FlickrError> {
        element.expect_name("photo")?;
        let attr = |name: &str| element.attr(name);

        let mut photo = Photo {
            id: element.required_attr("id")?.to_string(),
            owner: from_empty_str_to_none(attr("owner")),
            owner_name: from_empty_str_to_none(attr("ownername")),
            secret: from_empty_str_to_none(attr("secret")),
            server: from_empty_str_to_none(attr("server")),
            farm: from_empty_str_to_none(attr("farm")),
            title: attr("title").unwrap_or_default().to_string(),
            description: None,
            is_public: from_flag(attr("ispublic")),
            is_friend: from_flag(attr("isfriend")),
            is_family: from_flag(attr("isfamily")),
            date_uploaded: from_unix_timestamp(attr("dateupload")),
            date_taken: from_date_taken(attr("datetaken")),
            tags: from_tag_list(attr("tags")),
            views: element.parse_attr("views")?,
            media: attr("media")
                .and_then(|m| MediaType::from_str(m).ok())
                .unwrap_or_default(),
            url_square: from_empty_str_to_none(attr("url_sq")),
            url_medium: from_empty_str_to_none(attr("url_m")),
            url_original: from_empty_str_to_none(attr("url_o")),
        };

        if element.is_empty() {
            return Ok(photo);
        }
        while let Some(child) = cursor.next_child()? {
            match child.name() {
                "title" => photo.title = cursor.read_text(&child)?,
                "description" => {
                    let text = cursor.read_text(&child)?;
                    photo.description = from_empty_str_to_none(Some(text.as_str()));
                }
                "owner" => {
                    photo.owner = from_empty_str_to_none(child.attr("nsid"));
                    photo.owner_name = from_empty_str_to_none(child.attr("username"));
                    cursor.skip(&child)?;
                }
                "visibility" => {
                    photo.is_public = from_flag(child.attr("ispublic"));
                    photo.is_friend = from_flag(child.attr("isfriend"));
                    photo.is_family = from_flag(child.attr("isfamily"));
                    cursor.skip(&child)?;
                }
                "dates" => {
                    photo.date_uploaded = from_unix_timestamp(child.attr("posted"));
                    photo.date_taken = from_date_taken(child.attr("taken"));
                    cursor.skip(&child)?;
                }
                "tags" if !child.is_empty() => {
                    while let Some(tag) = cursor.next_child()? {
                        let text = cursor.read_text(&tag)?;
                        if tag.name() == "tag" && !text.is_empty() {
                            photo.tags.push(text);
                        }
                    }
                }
                _ => cursor.skip(&child)?,
            }
        }
        Ok(photo)
    }
}

/// One page of photos
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoCollection {
    pub page: u32,
    pub pages: u32,
    pub per_page: u32,
    pub total: u64,
    pub photos: Vec<Photo>,
}

impl PhotoCollection {
    /// Searches photos, see `flickr.photos.search`
    pub async fn search(
        client: &Client,
        options: &PhotoSearchOptions,
    ) -> Result<Self, FlickrError> {
        let mut params = Parameters::for_method("flickr.photos.search");
        options.add_to(&mut params);
        client.get_response(&params, RequestAuth::ApiKey).await
    }
}

impl Parsable for PhotoCollection {
    fn parse(element: &XmlElement, cursor: &mut XmlCursor<'_>) -> Result<Self, FlickrError> {
        element.expect_name("photos")?;
        let mut collection = PhotoCollection {
            page: element.parse_attr("page")?.unwrap_or(1),
            pages: element.parse_attr("pages")?.unwrap_or(1),
            per_page: element.parse_attr("perpage")?.unwrap_or_default(),
            total: element.parse_attr("total")?.unwrap_or_default(),
            photos: Vec::new(),
        };

        if element.is_empty() {
            return Ok(collection);
        }
        while let Some(child) = cursor.next_child()? {
            if child.name() == "photo" {
                collection.photos.push(Photo::parse(&child, cursor)?);
            } else {
                cursor.skip(&child)?;
            }
        }
        Ok(collection)
    }
}
