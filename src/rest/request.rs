/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::creds::Creds;
use crate::rest::encoding::{form_body, query_string};
use crate::rest::errors::{ConfigError, FlickrError};
use crate::rest::params::Parameters;
use crate::rest::signing::{
    API_SIG_PARAM, OAUTH_SIGNATURE_PARAM, OAUTH_VOLATILE_PARAMS, OAuthParams, sign_classic,
    sign_oauth,
};
use crate::rest::transport::HttpMethod;
use bytes::Bytes;
use log::debug;

// Root Flickr REST endpoint
pub const API_ORIGIN: &str = "https://api.flickr.com/services/rest/";

pub const API_KEY_PARAM: &str = "api_key";

/// Credentials a call needs before it may be sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum RequestAuth {
    /// Only the API key
    #[default]
    ApiKey,
    /// API key and shared secret
    Signed,
    /// Signed plus an OAuth access token
    Authenticated,
}

/// A request ready to be handed to the transport
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Bytes>,
    /// Identifies the request in the response cache. Stable across rebuilds of
    /// the same logical request.
    pub cache_key: String,
}

/// Turns parameters into signed request URLs
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    base_url: &'a str,
    creds: &'a Creds,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(base_url: &'a str, creds: &'a Creds) -> Self {
        Self { base_url, creds }
    }

    /// Builds `base?key=value&...&` with the API key and, when asked for, the
    /// classic signature added.
    ///
    /// Values are percent encoded and pairs stay in insertion order, so the
    /// same parameters always give the same string.
    pub fn build_uri(
        &self,
        params: &Parameters,
        include_signature: bool,
    ) -> Result<String, FlickrError> {
        let params = self.classic_params(params, include_signature)?;
        Ok(format!("{}?{}", self.base_url, query_string(params.iter())))
    }

    /// Prepares a request, signing it the strongest way the credentials allow.
    ///
    /// An access token selects OAuth signing, a shared secret alone selects
    /// classic signing and a bare API key leaves the request unsigned.
    pub fn prepare(
        &self,
        params: &Parameters,
        method: HttpMethod,
    ) -> Result<PreparedRequest, FlickrError> {
        if !self.creds.has_api_key() {
            return Err(ConfigError::ApiKeyRequired.into());
        }

        let (signed, cache_key) = match self.creds.access_token() {
            Some(token) => {
                let signed = self.oauth_params(params, method, token)?;
                let mut stable = signed.clone();
                for volatile in OAUTH_VOLATILE_PARAMS {
                    stable.remove(volatile);
                }
                let cache_key = format!("{}?{}", self.base_url, query_string(stable.iter()));
                (signed, cache_key)
            }
            None => {
                let signed = self.classic_params(params, self.creds.api_secret().is_some())?;
                let cache_key = format!("{}?{}", self.base_url, query_string(signed.iter()));
                (signed, cache_key)
            }
        };

        let prepared = match method {
            HttpMethod::Get => PreparedRequest {
                method,
                url: format!("{}?{}", self.base_url, query_string(signed.iter())),
                body: None,
                cache_key,
            },
            HttpMethod::Post => PreparedRequest {
                method,
                url: self.base_url.to_string(),
                body: Some(Bytes::from(form_body(signed.iter()))),
                cache_key,
            },
        };
        debug!("Prepared {} {}", prepared.method, prepared.url);
        Ok(prepared)
    }

    fn classic_params(
        &self,
        params: &Parameters,
        include_signature: bool,
    ) -> Result<Parameters, FlickrError> {
        let mut params = params.clone();
        params.remove(API_SIG_PARAM);
        params.insert(API_KEY_PARAM, self.creds.api_key());
        if include_signature {
            let secret = self
                .creds
                .api_secret()
                .ok_or(ConfigError::SignatureRequired)?;
            let signature = sign_classic(secret, &params)?;
            params.insert(API_SIG_PARAM, signature);
        }
        Ok(params)
    }

    fn oauth_params(
        &self,
        params: &Parameters,
        method: HttpMethod,
        token: &str,
    ) -> Result<Parameters, FlickrError> {
        let consumer_secret = self
            .creds
            .api_secret()
            .ok_or(ConfigError::SignatureRequired)?;

        let mut params = params.clone();
        params.remove(API_KEY_PARAM);
        params.remove(OAUTH_SIGNATURE_PARAM);
        OAuthParams::generate(self.creds.api_key(), token).add_to(&mut params);

        let signature = sign_oauth(
            method,
            self.base_url,
            &params,
            consumer_secret,
            self.creds.token_secret(),
        )?;
        params.insert(OAUTH_SIGNATURE_PARAM, signature);
        Ok(params)
    }
}
