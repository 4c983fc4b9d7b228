/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::time::Duration;
use thiserror::Error;

/// Error conditions that can be returned
#[derive(Error, Debug)]
pub enum FlickrError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Request was cancelled")]
    Cancelled,

    #[error("Response parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("API Response was error: {0}")]
    Api(#[from] ApiError),

    #[error("URL Parse error")]
    UrlParsing(#[from] url::ParseError),
}

impl FlickrError {
    /// True when the client was misconfigured and nothing was sent over the wire
    pub fn is_config(&self) -> bool {
        matches!(self, FlickrError::Config(_))
    }

    /// True for network level failures, which the caller may choose to retry
    pub fn is_transport(&self) -> bool {
        matches!(self, FlickrError::Transport(_))
    }

    /// Returns the service error code when the service rejected the call
    pub fn api_code(&self) -> Option<u32> {
        match self {
            FlickrError::Api(err) => Some(err.code()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FlickrError {
    fn from(err: reqwest::Error) -> Self {
        FlickrError::Transport(TransportError::Request(err))
    }
}

impl From<quick_xml::Error> for FlickrError {
    fn from(err: quick_xml::Error) -> Self {
        FlickrError::Parse(ParseError::Xml(err))
    }
}

impl From<quick_xml::events::attributes::AttrError> for FlickrError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        FlickrError::Parse(ParseError::Attribute(err))
    }
}

/// Client side misconfiguration. Detected before any request is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("An API key is required for every call")]
    ApiKeyRequired,

    #[error("A shared secret is required to sign this call")]
    SignatureRequired,

    #[error("An OAuth access token is required for this call")]
    AuthenticationRequired,

    #[error("Signing key could not be used: {0}")]
    InvalidSigningKey(String),
}

/// Failures while talking to the service.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request network error")]
    Request(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP status {0} returned by the service")]
    Status(u16),

    #[error("{0}")]
    Other(String),
}

/// The payload was not what the client expected.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed XML")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed XML attribute")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Response envelope not found")]
    MissingEnvelope,

    #[error("Unknown response status: {0:?}")]
    UnknownStatus(Option<String>),

    #[error("Failure response is missing its error element")]
    MissingErrorElement,

    #[error("Error code is not a number: {0}")]
    InvalidErrorCode(String),

    #[error("Expected response missing")]
    ResponseMissing,

    #[error("Unexpected element <{found}>, expected <{expected}>")]
    UnexpectedElement { expected: String, found: String },

    #[error("Attribute {0} is missing")]
    MissingAttribute(String),

    #[error("Attribute {name} has invalid value {value:?}")]
    InvalidAttribute { name: String, value: String },
}

/// Error codes per the Flickr API documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u32)]
pub enum ApiErrorCodes {
    NotFound = 1,
    SslRequired = 95,
    InvalidSignature = 96,
    MissingSignature = 97,
    LoginFailed = 98,
    InsufficientPermissions = 99,
    InvalidApiKey = 100,
    ServiceUnavailable = 105,
    FormatNotFound = 111,
    MethodNotFound = 112,
    BadUrl = 116,
    TooManyRequests = 429,
}

/// Errors reported by the service in a failure response
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("SSL is required: {0}")]
    SslRequired(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Signature required: {0}")]
    MissingSignature(String),

    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("User not logged in or insufficient permissions: {0}")]
    InsufficientPermissions(String),

    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Format not found: {0}")]
    FormatNotFound(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Bad URL found: {0}")]
    BadUrl(String),

    #[error("Too many requests: {message}. Retry after {retry_after:?}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("API Response was error: {code}, msg: {message}")]
    Generic { code: u32, message: String },
}

impl ApiError {
    /// The numeric code sent by the service
    pub fn code(&self) -> u32 {
        use ApiErrorCodes as C;
        let code = match self {
            ApiError::NotFound(_) => C::NotFound,
            ApiError::SslRequired(_) => C::SslRequired,
            ApiError::InvalidSignature(_) => C::InvalidSignature,
            ApiError::MissingSignature(_) => C::MissingSignature,
            ApiError::LoginFailed(_) => C::LoginFailed,
            ApiError::InsufficientPermissions(_) => C::InsufficientPermissions,
            ApiError::InvalidApiKey(_) => C::InvalidApiKey,
            ApiError::ServiceUnavailable(_) => C::ServiceUnavailable,
            ApiError::FormatNotFound(_) => C::FormatNotFound,
            ApiError::MethodNotFound(_) => C::MethodNotFound,
            ApiError::BadUrl(_) => C::BadUrl,
            ApiError::RateLimited { .. } => C::TooManyRequests,
            ApiError::Generic { code, .. } => return *code,
        };
        code.into()
    }

    /// The message sent by the service, unmodified
    pub fn message(&self) -> &str {
        match self {
            ApiError::NotFound(m)
            | ApiError::SslRequired(m)
            | ApiError::InvalidSignature(m)
            | ApiError::MissingSignature(m)
            | ApiError::LoginFailed(m)
            | ApiError::InsufficientPermissions(m)
            | ApiError::InvalidApiKey(m)
            | ApiError::ServiceUnavailable(m)
            | ApiError::FormatNotFound(m)
            | ApiError::MethodNotFound(m)
            | ApiError::BadUrl(m) => m,
            ApiError::RateLimited { message, .. } => message,
            ApiError::Generic { message, .. } => message,
        }
    }
}

/// Maps a failure code and message from the service into an [`ApiError`].
///
/// Codes without a dedicated kind become [`ApiError::Generic`] carrying the
/// code and message as received.
pub fn translate(code: u32, message: impl Into<String>) -> ApiError {
    use ApiErrorCodes as C;
    let message = message.into();
    let Ok(known) = ApiErrorCodes::try_from(code) else {
        return ApiError::Generic { code, message };
    };
    match known {
        C::NotFound => ApiError::NotFound(message),
        C::SslRequired => ApiError::SslRequired(message),
        C::InvalidSignature => ApiError::InvalidSignature(message),
        C::MissingSignature => ApiError::MissingSignature(message),
        C::LoginFailed => ApiError::LoginFailed(message),
        C::InsufficientPermissions => ApiError::InsufficientPermissions(message),
        C::InvalidApiKey => ApiError::InvalidApiKey(message),
        C::ServiceUnavailable => ApiError::ServiceUnavailable(message),
        C::FormatNotFound => ApiError::FormatNotFound(message),
        C::MethodNotFound => ApiError::MethodNotFound(message),
        C::BadUrl => ApiError::BadUrl(message),
        C::TooManyRequests => ApiError::RateLimited {
            message,
            retry_after: None,
        },
    }
}
