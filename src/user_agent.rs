//! Default User-Agent for archive API traffic.

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/homebrew-catalog";

/// Default User-Agent for search and metadata requests.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("homebrew-catalog/{version} (+{PROJECT_UA_URL})")
}
