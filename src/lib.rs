/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! # Flickr
//!
//! This Flickr library was created for working with the Flickr REST interface.
//!
//! For further details on the Rest API refer to the [Flickr API Docs](https://www.flickr.com/services/api/)
//!
//! ## Features
//!
//! - Request signing
//!     - Classic `api_sig` signing with the shared secret
//!     - OAuth1 HMAC-SHA1 signing when an access token is available
//! - Response cache shared by clients, bounded by size and age, optionally kept on disk
//! - XML responses parsed into typed results, failures mapped to [`rest::ApiError`]
//! - Photo search and photo info
//! - Lower level interface for calling any method
//!
//! *Getting the OAuth Access Token/Secret is left up to the consumer of this library*
//!
//! *If you want to use this library for more that is currently implemented,
//! [`rest::Client::get_response`] takes any [`rest::Parameters`] and any type
//! implementing [`rest::Parsable`]; [`rest::Client::call_method`] returns the
//! response untyped.*
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! flickr = "0.1.0"
//! ```
//!
//! ## Usage
//!
//! **You will need to acquire an API key/secret from Flickr prior to using the API**
//!
//! ```rust,no_run
//! use flickr::rest::{Client, Creds, Photo, PhotoExtras, PhotoSearchOptions, SortOrder};
//! use futures::{pin_mut, StreamExt};
//!
//! async fn tagged_photos(api_key: &str, tag: &str) -> anyhow::Result<()> {
//!     let client = Client::new(Creds::from_tokens(api_key, None, None, None));
//!
//!     let options = PhotoSearchOptions::default()
//!         .tag(tag)
//!         .sort(SortOrder::DatePostedDescending)
//!         .extra(PhotoExtras::UrlMedium)
//!         .per_page(100);
//!
//!     let photos = Photo::search_stream(client.clone(), options);
//!     pin_mut!(photos);
//!     while let Some(photo) = photos.next().await {
//!         let photo = photo?;
//!         println!("{}: {:?}", photo.title, photo.url_medium);
//!     }
//!     Ok(())
//! }
//! ```
//!
pub mod rest;
