/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::{ConfigError, FlickrError};

pub const API_KEY_ENV: &str = "FLICKR_API_KEY";
pub const API_SECRET_ENV: &str = "FLICKR_API_SECRET";
pub const OAUTH_TOKEN_ENV: &str = "FLICKR_OAUTH_TOKEN";
pub const OAUTH_TOKEN_SECRET_ENV: &str = "FLICKR_OAUTH_TOKEN_SECRET";

/// API key, shared secret and OAuth access token used by a [`crate::rest::Client`].
///
/// Empty values are treated as absent.
#[derive(Default, Clone)]
pub struct Creds {
    api_key: String,
    api_secret: Option<String>,
    access_token: Option<String>,
    token_secret: Option<String>,
}

impl Creds {
    /// Creates credentials from the provided tokens
    pub fn from_tokens(
        api_key: &str,
        api_secret: Option<&str>,
        access_token: Option<&str>,
        token_secret: Option<&str>,
    ) -> Self {
        let non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(String::from);
        Self {
            api_key: api_key.into(),
            api_secret: non_empty(api_secret),
            access_token: non_empty(access_token),
            token_secret: non_empty(token_secret),
        }
    }

    /// Reads credentials from the `FLICKR_*` environment variables.
    /// Only the API key is mandatory.
    pub fn from_env() -> Result<Self, FlickrError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| ConfigError::ApiKeyRequired)?;
        let var = |name: &str| std::env::var(name).ok();
        Ok(Self::from_tokens(
            &api_key,
            var(API_SECRET_ENV).as_deref(),
            var(OAUTH_TOKEN_ENV).as_deref(),
            var(OAUTH_TOKEN_SECRET_ENV).as_deref(),
        ))
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> Option<&str> {
        self.api_secret.as_deref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn token_secret(&self) -> Option<&str> {
        self.token_secret.as_deref()
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Has what is needed to sign requests
    pub fn is_signed(&self) -> bool {
        self.has_api_key() && self.api_secret.is_some()
    }

    /// Has what is needed to make OAuth authenticated requests
    pub fn is_authenticated(&self) -> bool {
        self.is_signed() && self.access_token.is_some()
    }
}

impl std::fmt::Debug for Creds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Creds")
            .field("api_key", &"xxx")
            .field("api_secret", &"xxx")
            .field("access_token", &"xxx")
            .field("token_secret", &"xxx")
            .finish()
    }
}
