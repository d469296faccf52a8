use crate::error::{Result, SearchError};

pub const DEFAULT_BASE_URL: &str = "https://thepiratebay.org/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Proxy routing applied to every request the fetcher makes.
///
/// Each entry is a proxy URL such as `socks5h://127.0.0.1:9050` or
/// `http://proxy.local:3128`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Proxy for both schemes. Takes precedence over `http`/`https`.
    pub all: Option<String>,
    pub http: Option<String>,
    pub https: Option<String>,
}

impl ProxyConfig {
    /// Route every request through one proxy.
    pub fn all(url: impl Into<String>) -> Self {
        Self {
            all: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_none() && self.http.is_none() && self.https.is_none()
    }
}

/// Connection settings shared by every search a [`Searcher`] runs.
///
/// Page count, sort token and category are per-call arguments of the
/// search methods.
///
/// [`Searcher`]: crate::search::Searcher
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub base_url: String,
    pub proxy: Option<ProxyConfig>,
    /// Enforced by the HTTP transport, not by the search loop.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Pages in flight at once. 1 fetches strictly one page after another.
    pub concurrency: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            proxy: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            concurrency: 1,
        }
    }
}

impl SearchConfig {
    /// Check the settings before any request is made.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(SearchError::InvalidConfig(format!(
                "base url must be http(s): {:?}",
                self.base_url
            )));
        }
        if self.concurrency == 0 {
            return Err(SearchError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Base URL with exactly one trailing slash.
pub fn normalize_base_url(base_url: &str) -> String {
    format!("{}/", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_http_base() {
        let config = SearchConfig {
            base_url: "ftp://example.org".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SearchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let config = SearchConfig {
            concurrency: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("https://tpb.example"), "https://tpb.example/");
        assert_eq!(normalize_base_url("https://tpb.example//"), "https://tpb.example/");
        assert_eq!(normalize_base_url("https://tpb.example/"), "https://tpb.example/");
    }

    #[test]
    fn test_proxy_all() {
        let proxy = ProxyConfig::all("socks5h://127.0.0.1:9050");
        assert_eq!(proxy.all.as_deref(), Some("socks5h://127.0.0.1:9050"));
        assert!(!proxy.is_empty());
        assert!(ProxyConfig::default().is_empty());
    }
}
