use super::util::with_retry;
use crate::core::quote::FailureReason;
use crate::core::source::DocumentSource;
use async_trait::async_trait;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA, USER_AGENT,
};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
const RETRY_DELAY_MS: u64 = 500;

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9,fa;q=0.8"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers
}

fn classify(err: &reqwest::Error) -> FailureReason {
    if err.is_timeout() {
        FailureReason::Timeout
    } else if let Some(status) = err.status() {
        FailureReason::HttpStatus(status.as_u16())
    } else {
        FailureReason::Transport(err.to_string())
    }
}

/// Fetches HTML pages the way a desktop browser would ask for them.
pub struct HttpFetcher {
    client: reqwest::Client,
    retries: usize,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, retries: usize) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(browser_headers())
            .timeout(timeout)
            .build()?;
        Ok(Self { client, retries })
    }

    async fn fetch_once(&self, url: &str) -> Result<String, FailureReason> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FailureReason::HttpStatus(status.as_u16()));
        }

        response.text().await.map_err(|e| classify(&e))
    }
}

#[async_trait]
impl DocumentSource for HttpFetcher {
    #[instrument(name = "HttpFetch", skip(self), fields(url = %url))]
    async fn fetch(&self, url: &str) -> Result<String, FailureReason> {
        debug!("Fetching document");
        match with_retry(|| self.fetch_once(url), self.retries, RETRY_DELAY_MS).await {
            Ok(body) => {
                debug!(length = body.len(), "Fetched document");
                Ok(body)
            }
            Err(reason) => {
                warn!(%reason, "Fetch failed");
                Err(reason)
            }
        }
    }
}
