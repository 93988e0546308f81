//! Shared User-Agent strings for download traffic.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/file-downloader";

/// Browser User-Agent sent by the bulk strategy.
///
/// The dataset API rejects the tool's own User-Agent, so bulk requests
/// present themselves as a desktop browser.
pub const BULK_BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Default User-Agent for download requests (identifies the tool).
#[must_use]
pub(crate) fn default_download_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("file-downloader/{version} (+{PROJECT_UA_URL})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ua_contains_version_and_project_url() {
        let ua = default_download_user_agent();
        assert!(ua.contains(PROJECT_UA_URL), "UA must contain project URL");
        assert_eq!(
            Some(env!("CARGO_PKG_VERSION")),
            ua.strip_prefix("file-downloader/")
                .and_then(|s| s.split(' ').next()),
            "UA must contain crate version"
        );
    }

    #[test]
    fn test_bulk_ua_is_browser_like() {
        assert!(BULK_BROWSER_USER_AGENT.starts_with("Mozilla/5.0"));
        assert!(BULK_BROWSER_USER_AGENT.contains("Chrome/91.0.4472.124"));
    }
}
