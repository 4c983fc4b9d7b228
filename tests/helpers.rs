/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use flickr::rest::{
    CacheSettings, Client, Clock, Creds, FlickrError, HttpMethod, HttpResponse, ResponseCache,
    Transport,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[allow(dead_code)]
pub(crate) const PHOTOS_PAGE_1: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<rsp stat="ok">
<photos page="1" pages="2" perpage="2" total="3">
	<photo id="2636" owner="47058503995@N01" secret="a123456" server="2" farm="1" title="test_04" ispublic="1" isfriend="0" isfamily="0" />
	<photo id="2635" owner="47058503995@N01" secret="b123456" server="2" farm="1" title="test_03" ispublic="0" isfriend="1" isfamily="1" tags="cat dog" />
</photos>
</rsp>"#;

#[allow(dead_code)]
pub(crate) const PHOTOS_PAGE_2: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<rsp stat="ok">
<photos page="2" pages="2" perpage="2" total="3">
	<photo id="2633" owner="47058503995@N01" secret="c123456" server="2" farm="1" title="test_01" ispublic="1" isfriend="0" isfamily="0" />
</photos>
</rsp>"#;

#[allow(dead_code)]
pub(crate) fn failure_body(code: &str, msg: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8" ?>
<rsp stat="fail">
	<err code="{}" msg="{}" />
</rsp>"#,
        code, msg
    )
}

#[allow(dead_code)]
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Transport handing out canned responses in order, repeating the last one
#[derive(Debug)]
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(HttpMethod, String, Option<Bytes>)>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub(crate) fn new(responses: Vec<HttpResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn always(body: &str) -> Arc<Self> {
        Self::new(vec![HttpResponse::ok(body.to_string())])
    }

    pub(crate) fn pages(bodies: &[&str]) -> Arc<Self> {
        Self::new(
            bodies
                .iter()
                .map(|b| HttpResponse::ok(b.to_string()))
                .collect(),
        )
    }

    pub(crate) fn delayed(body: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(vec![HttpResponse::ok(body.to_string())].into()),
            delay: Some(delay),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<(HttpMethod, String, Option<Bytes>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<Bytes>,
    ) -> Result<HttpResponse, FlickrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((method, url.to_string(), body));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let mut responses = self.responses.lock().unwrap();
        let resp = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        };
        Ok(resp.unwrap_or_else(|| HttpResponse::ok("")))
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub(crate) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

#[allow(dead_code)]
impl ManualClock {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()),
        })
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(by).unwrap();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[allow(dead_code)]
pub(crate) fn signed_creds() -> Creds {
    Creds::from_tokens("abc123", Some("secret"), None, None)
}

#[allow(dead_code)]
pub(crate) fn isolated_cache() -> Arc<ResponseCache> {
    Arc::new(ResponseCache::new(CacheSettings::default()))
}

#[allow(dead_code)]
pub(crate) fn mock_client(creds: Creds, transport: Arc<MockTransport>) -> (Client, Arc<ResponseCache>) {
    let cache = isolated_cache();
    let client = Client::builder(creds)
        .transport(transport)
        .cache(cache.clone())
        .build()
        .unwrap();
    (client, cache)
}
