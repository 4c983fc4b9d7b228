/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::FlickrError;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use std::time::Duration;
use strum_macros::{Display, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum HttpMethod {
    #[strum(serialize = "GET")]
    Get,
    #[strum(serialize = "POST")]
    Post,
}

/// Raw response handed back by a [`Transport`]
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Parsed `Retry-After` header, when the service sent one
    pub retry_after: Option<Duration>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            retry_after: None,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the network call for a prepared request.
///
/// Timeouts and cancellation are applied by the caller around `send`.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<Bytes>,
    ) -> Result<HttpResponse, FlickrError>;
}

/// Default transport backed by reqwest
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    https_client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an already configured reqwest client (proxies, TLS settings etc.)
    pub fn with_client(https_client: reqwest::Client) -> Self {
        Self { https_client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<Bytes>,
    ) -> Result<HttpResponse, FlickrError> {
        let req = match method {
            HttpMethod::Get => self.https_client.get(url),
            HttpMethod::Post => self
                .https_client
                .post(url)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body.unwrap_or_default()),
        };
        let resp = req.send().await?;

        let status = resp.status().as_u16();
        let retry_after = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        let body = resp.bytes().await?;
        Ok(HttpResponse {
            status,
            retry_after,
            body,
        })
    }
}
