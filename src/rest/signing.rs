/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::encoding::encode_value;
use crate::rest::errors::{ConfigError, FlickrError};
use crate::rest::params::Parameters;
use crate::rest::transport::HttpMethod;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;

/// Parameter carrying a classic signature
pub const API_SIG_PARAM: &str = "api_sig";

/// Parameter carrying an OAuth signature
pub const OAUTH_SIGNATURE_PARAM: &str = "oauth_signature";

/// OAuth parameters that change on every request and never take part in a cache key
pub const OAUTH_VOLATILE_PARAMS: [&str; 3] =
    ["oauth_nonce", "oauth_timestamp", OAUTH_SIGNATURE_PARAM];

type HmacSha1 = Hmac<Sha1>;

/// Secrets and request details needed to sign a request
#[derive(Clone)]
pub enum SigningContext {
    /// Shared secret signing (`api_sig`)
    Classic { shared_secret: String },

    /// OAuth 1.0a HMAC-SHA1 signing (`oauth_signature`)
    OAuth {
        method: HttpMethod,
        base_url: String,
        consumer_secret: String,
        token_secret: Option<String>,
    },
}

impl std::fmt::Debug for SigningContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SigningContext::Classic { .. } => f
                .debug_struct("Classic")
                .field("shared_secret", &"xxx")
                .finish(),
            SigningContext::OAuth {
                method, base_url, ..
            } => f
                .debug_struct("OAuth")
                .field("method", method)
                .field("base_url", base_url)
                .field("consumer_secret", &"xxx")
                .field("token_secret", &"xxx")
                .finish(),
        }
    }
}

/// Signs the parameters with the given context
pub fn sign(params: &Parameters, context: &SigningContext) -> Result<String, FlickrError> {
    match context {
        SigningContext::Classic { shared_secret } => sign_classic(shared_secret, params),
        SigningContext::OAuth {
            method,
            base_url,
            consumer_secret,
            token_secret,
        } => sign_oauth(
            *method,
            base_url,
            params,
            consumer_secret,
            token_secret.as_deref(),
        ),
    }
}

/// Classic signature: MD5 over the secret followed by every key and value in
/// key order, as lowercase hex.
pub fn sign_classic(shared_secret: &str, params: &Parameters) -> Result<String, FlickrError> {
    if shared_secret.is_empty() {
        return Err(ConfigError::SignatureRequired.into());
    }
    let mut data = String::from(shared_secret);
    for (key, value) in params.sorted() {
        data.push_str(key);
        data.push_str(value);
    }
    Ok(format!("{:x}", md5::compute(data.as_bytes())))
}

/// Canonical OAuth base string: `METHOD&url&params`, each part percent encoded
pub fn oauth_base_string(method: HttpMethod, base_url: &str, params: &Parameters) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .filter(|(k, _)| *k != OAUTH_SIGNATURE_PARAM)
        .map(|(k, v)| (encode_value(k).into_owned(), encode_value(v).into_owned()))
        .collect();
    encoded.sort();

    let param_str = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let method: &'static str = method.into();
    format!(
        "{}&{}&{}",
        method,
        encode_value(base_url),
        encode_value(&param_str)
    )
}

/// OAuth signature: HMAC-SHA1 of the base string keyed with
/// `consumer_secret&token_secret`, base64 encoded.
pub fn sign_oauth(
    method: HttpMethod,
    base_url: &str,
    params: &Parameters,
    consumer_secret: &str,
    token_secret: Option<&str>,
) -> Result<String, FlickrError> {
    if consumer_secret.is_empty() {
        return Err(ConfigError::SignatureRequired.into());
    }
    let key = format!(
        "{}&{}",
        encode_value(consumer_secret),
        encode_value(token_secret.unwrap_or_default())
    );
    let base = oauth_base_string(method, base_url, params);

    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| ConfigError::InvalidSigningKey(e.to_string()))?;
    mac.update(base.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// The `oauth_*` protocol parameters added to an authenticated request
#[derive(Debug, Clone)]
pub struct OAuthParams {
    pub consumer_key: String,
    pub token: String,
    pub nonce: String,
    pub timestamp: i64,
}

impl OAuthParams {
    /// Creates parameters with a fresh nonce and the current time
    pub fn generate(consumer_key: &str, token: &str) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            token: token.into(),
            nonce: format!("{:016x}{:016x}", rand::random::<u64>(), rand::random::<u64>()),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn add_to(&self, params: &mut Parameters) {
        params.insert("oauth_consumer_key", self.consumer_key.as_str());
        params.insert("oauth_nonce", self.nonce.as_str());
        params.insert("oauth_signature_method", "HMAC-SHA1");
        params.insert("oauth_timestamp", self.timestamp.to_string());
        params.insert("oauth_token", self.token.as_str());
        params.insert("oauth_version", "1.0");
    }
}
