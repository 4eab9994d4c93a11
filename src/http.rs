//! Shared outbound request policy.
//!
//! Both the page scrape and PDF downloads carry the same header bundle:
//! browser User-Agent, Accept/Accept-Language, `Connection: keep-alive`, and a
//! `Referer` of `https://<target host>`. `Accept-Encoding` is negotiated by
//! reqwest itself (gzip, br, zstd, deflate) so bodies are always decoded
//! before they reach disk.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue, REFERER, USER_AGENT,
};
use url::Url;

use crate::user_agent;

/// `Accept` header value sent with every request.
pub const DEFAULT_ACCEPT: &str = "application/pdf,application/xhtml+xml,application/xml;q=0.9,\
image/avif,image/webp,image/apng,*/*;q=0.8";

/// `Accept-Language` header value sent with every request.
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Connect timeout applied to every client.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Per-request options: header bundle and total request timeout.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    headers: HeaderMap,
    timeout: Duration,
}

impl RequestOptions {
    /// Builds the browser-like header bundle for requests about `target`.
    ///
    /// The `Referer` is derived from the target's host; it is omitted when
    /// the target has no host.
    #[must_use]
    pub fn browser_like(target: &Url, timeout: Duration) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(user_agent::browser_user_agent()),
        );
        headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE),
        );
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        if let Some(referer) = referer_for(target)
            && let Ok(value) = HeaderValue::from_str(&referer)
        {
            headers.insert(REFERER, value);
        }

        Self { headers, timeout }
    }

    /// Header bundle attached to each request.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Total per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Returns `https://<host>` for the given URL, or `None` when it has no host.
#[must_use]
pub fn referer_for(target: &Url) -> Option<String> {
    target.host_str().map(|host| format!("https://{host}"))
}

/// Builds a reqwest client applying `options`.
///
/// Redirects are followed (reqwest default policy, up to 10 hops).
///
/// # Errors
///
/// Returns the reqwest builder error if the TLS backend or resolver cannot
/// be initialized.
pub fn build_http_client(options: &RequestOptions) -> Result<Client, reqwest::Error> {
    Client::builder()
        .default_headers(options.headers().clone())
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(options.timeout())
        .gzip(true)
        .brotli(true)
        .zstd(true)
        .deflate(true)
        .build()
}
