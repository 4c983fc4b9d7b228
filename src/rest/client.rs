/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::cache::ResponseCache;
use crate::rest::creds::Creds;
use crate::rest::errors::{ApiError, ConfigError, FlickrError, TransportError};
use crate::rest::params::Parameters;
use crate::rest::parsable::{Parsable, load};
use crate::rest::request::{API_ORIGIN, PreparedRequest, RequestAuth, RequestBuilder};
use crate::rest::response::UnknownResponse;
use crate::rest::transport::{HttpMethod, ReqwestTransport, Transport};
use bytes::Bytes;
use log::{debug, trace};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(100);

const TOO_MANY_REQUESTS: u16 = 429;

/// Example
/// ```rust,no_run
/// use flickr::rest::{Client, Creds, Parameters, RequestAuth, UnknownResponse};
///
/// # async fn run() -> Result<(), flickr::rest::FlickrError> {
/// let client = Client::new(Creds::from_tokens("api-key", Some("secret"), None, None));
/// let params = Parameters::for_method("flickr.test.echo").with("name", "value");
/// let echo: UnknownResponse = client.get_response(&params, RequestAuth::Signed).await?;
/// println!("{:?}", echo);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    creds: Creds,
    base_url: String,
    timeout: Duration,
    transport: Arc<dyn Transport>,
    cache: Option<Arc<ResponseCache>>,
    diagnostics: Mutex<Diagnostics>,
}

#[derive(Debug, Default)]
struct Diagnostics {
    last_request: Option<String>,
    last_response: Option<String>,
}

impl Client {
    /// Creates a client using the process wide cache and a reqwest transport
    pub fn new(creds: Creds) -> Self {
        Self::from_parts(
            creds,
            API_ORIGIN.to_string(),
            DEFAULT_TIMEOUT,
            Arc::new(ReqwestTransport::new()),
            Some(ResponseCache::shared()),
        )
    }

    pub fn builder(creds: Creds) -> ClientBuilder {
        ClientBuilder::new(creds)
    }

    fn from_parts(
        creds: Creds,
        base_url: String,
        timeout: Duration,
        transport: Arc<dyn Transport>,
        cache: Option<Arc<ResponseCache>>,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                creds,
                base_url,
                timeout,
                transport,
                cache,
                diagnostics: Mutex::new(Diagnostics::default()),
            }),
        }
    }

    pub fn creds(&self) -> &Creds {
        &self.inner.creds
    }

    /// The cache used by this client, `None` when caching was turned off for it
    pub fn cache(&self) -> Option<&Arc<ResponseCache>> {
        self.inner.cache.as_ref()
    }

    /// URL of the last request this client built
    pub fn last_request(&self) -> Option<String> {
        self.inner.diagnostics.lock().last_request.clone()
    }

    /// Body of the last response this client received, from the network or the cache
    pub fn last_response(&self) -> Option<String> {
        self.inner.diagnostics.lock().last_response.clone()
    }

    pub fn check_api_key(&self) -> Result<(), FlickrError> {
        if self.inner.creds.has_api_key() {
            Ok(())
        } else {
            Err(ConfigError::ApiKeyRequired.into())
        }
    }

    pub fn check_signed(&self) -> Result<(), FlickrError> {
        self.check_api_key()?;
        if self.inner.creds.is_signed() {
            Ok(())
        } else {
            Err(ConfigError::SignatureRequired.into())
        }
    }

    pub fn check_authenticated(&self) -> Result<(), FlickrError> {
        self.check_signed()?;
        if self.inner.creds.is_authenticated() {
            Ok(())
        } else {
            Err(ConfigError::AuthenticationRequired.into())
        }
    }

    pub fn check_auth(&self, auth: RequestAuth) -> Result<(), FlickrError> {
        match auth {
            RequestAuth::ApiKey => self.check_api_key(),
            RequestAuth::Signed => self.check_signed(),
            RequestAuth::Authenticated => self.check_authenticated(),
        }
    }

    /// Builds the classic request URL for `params`
    pub fn build_uri(
        &self,
        params: &Parameters,
        include_signature: bool,
    ) -> Result<String, FlickrError> {
        RequestBuilder::new(&self.inner.base_url, &self.inner.creds)
            .build_uri(params, include_signature)
    }

    /// Performs a GET request, answering from the cache when possible
    pub async fn get_response<T: Parsable>(
        &self,
        params: &Parameters,
        auth: RequestAuth,
    ) -> Result<T, FlickrError> {
        self.execute(params, auth, HttpMethod::Get, None).await
    }

    /// [`Client::get_response`] that gives up when `cancel` fires
    pub async fn get_response_with_cancel<T: Parsable>(
        &self,
        params: &Parameters,
        auth: RequestAuth,
        cancel: &CancellationToken,
    ) -> Result<T, FlickrError> {
        self.execute(params, auth, HttpMethod::Get, Some(cancel))
            .await
    }

    /// Performs a POST request. Never cached.
    pub async fn post_response<T: Parsable>(
        &self,
        params: &Parameters,
        auth: RequestAuth,
    ) -> Result<T, FlickrError> {
        self.execute(params, auth, HttpMethod::Post, None).await
    }

    pub async fn post_response_with_cancel<T: Parsable>(
        &self,
        params: &Parameters,
        auth: RequestAuth,
        cancel: &CancellationToken,
    ) -> Result<T, FlickrError> {
        self.execute(params, auth, HttpMethod::Post, Some(cancel))
            .await
    }

    /// Calls any API method, returning the response untyped
    pub async fn call_method(
        &self,
        method: &str,
        params: &Parameters,
    ) -> Result<UnknownResponse, FlickrError> {
        let mut params = params.clone();
        params.insert(crate::rest::params::METHOD_PARAM, method);
        self.get_response(&params, RequestAuth::ApiKey).await
    }

    async fn execute<T: Parsable>(
        &self,
        params: &Parameters,
        auth: RequestAuth,
        method: HttpMethod,
        cancel: Option<&CancellationToken>,
    ) -> Result<T, FlickrError> {
        self.check_auth(auth)?;
        let prepared =
            RequestBuilder::new(&self.inner.base_url, &self.inner.creds).prepare(params, method)?;
        self.inner.diagnostics.lock().last_request = Some(prepared.url.clone());

        let cache = match method {
            HttpMethod::Get => self.active_cache(),
            HttpMethod::Post => None,
        };
        if let Some(cache) = cache {
            if let Some(body) = cache.get(&prepared.cache_key) {
                self.record_response(&body);
                return load(&body);
            }
            debug!("Cache miss: {}", prepared.cache_key);
        }

        let body = self.fetch(&prepared, cancel).await?;
        self.record_response(&body);
        let result = load::<T>(&body)?;
        if let Some(cache) = cache {
            cache.put(&prepared.cache_key, body);
        }
        Ok(result)
    }

    fn active_cache(&self) -> Option<&Arc<ResponseCache>> {
        self.inner.cache.as_ref().filter(|c| c.is_enabled())
    }

    fn record_response(&self, body: &Bytes) {
        let body = String::from_utf8_lossy(body).into_owned();
        trace!("Response body: {}", body);
        self.inner.diagnostics.lock().last_response = Some(body);
    }

    async fn fetch(
        &self,
        prepared: &PreparedRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<Bytes, FlickrError> {
        let timeout = self.inner.timeout;
        let send = tokio::time::timeout(
            timeout,
            self.inner
                .transport
                .send(prepared.method, &prepared.url, prepared.body.clone()),
        );

        let result = match cancel {
            Some(token) => {
                if token.is_cancelled() {
                    return Err(FlickrError::Cancelled);
                }
                tokio::select! {
                    _ = token.cancelled() => return Err(FlickrError::Cancelled),
                    result = send => result,
                }
            }
            None => send.await,
        };
        let resp = result.map_err(|_| TransportError::Timeout(timeout))??;

        if resp.status == TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited {
                message: "Too many requests".to_string(),
                retry_after: resp.retry_after,
            }
            .into());
        }
        if !resp.is_success() {
            return Err(TransportError::Status(resp.status).into());
        }
        Ok(resp.body)
    }
}

/// Configures a [`Client`]
#[derive(Debug)]
pub struct ClientBuilder {
    creds: Creds,
    base_url: String,
    timeout: Duration,
    transport: Option<Arc<dyn Transport>>,
    cache: Option<Arc<ResponseCache>>,
    cache_disabled: bool,
}

impl ClientBuilder {
    pub fn new(creds: Creds) -> Self {
        Self {
            creds,
            base_url: API_ORIGIN.to_string(),
            timeout: DEFAULT_TIMEOUT,
            transport: None,
            cache: None,
            cache_disabled: false,
        }
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Upper bound on each network call
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Uses `cache` instead of the process wide one
    pub fn cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Every call goes to the network and nothing is stored
    pub fn disable_cache(mut self) -> Self {
        self.cache_disabled = true;
        self
    }

    pub fn build(self) -> Result<Client, FlickrError> {
        url::Url::parse(&self.base_url)?;
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new()));
        let cache = if self.cache_disabled {
            None
        } else {
            Some(self.cache.unwrap_or_else(ResponseCache::shared))
        };
        Ok(Client::from_parts(
            self.creds,
            self.base_url,
            self.timeout,
            transport,
            cache,
        ))
    }
}
