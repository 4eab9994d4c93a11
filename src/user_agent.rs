//! User-Agent strings for outbound requests.
//!
//! The watched site serves bot-detection 403s to non-browser agents, so every
//! request presents as a current desktop Chrome build.

/// Desktop Chrome User-Agent sent on page and PDF requests.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Returns the browser User-Agent used for all requests.
#[must_use]
pub(crate) fn browser_user_agent() -> &'static str {
    BROWSER_USER_AGENT
}
