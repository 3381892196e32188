//! User-Agent string for media download requests.

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/mediacache";

/// Default User-Agent for payload requests (identifies the tool).
#[must_use]
pub(crate) fn default_download_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("mediacache/{version} (offline-media-cache; +{PROJECT_UA_URL})")
}
