//! URL building and page retrieval.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use reqwest::{Client, Proxy};
use tracing::{debug, info};

use crate::config::{normalize_base_url, ProxyConfig, SearchConfig};
use crate::error::{Result, SearchError};
use crate::extract::extract_html;
use crate::models::{SearchQuery, TorrentRecord, View};

/// Status and body of one HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP transport the fetcher delegates to.
///
/// Implementations own routing and timeouts. A transport-level failure
/// should be returned as [`SearchError::FetchFailed`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// Default transport backed by a `reqwest` client.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str());

        if let Some(proxy) = config.proxy.as_ref().filter(|p| !p.is_empty()) {
            for proxy in build_proxies(proxy)? {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| SearchError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

fn build_proxies(config: &ProxyConfig) -> Result<Vec<Proxy>> {
    let invalid = |url: &str, e: reqwest::Error| {
        SearchError::InvalidConfig(format!("Invalid proxy {:?}: {}", url, e))
    };

    if let Some(url) = &config.all {
        return Ok(vec![Proxy::all(url.as_str()).map_err(|e| invalid(url, e))?]);
    }

    let mut proxies = Vec::new();
    if let Some(url) = &config.http {
        proxies.push(Proxy::http(url.as_str()).map_err(|e| invalid(url, e))?);
    }
    if let Some(url) = &config.https {
        proxies.push(Proxy::https(url.as_str()).map_err(|e| invalid(url, e))?);
    }
    Ok(proxies)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::fetch_failed(url, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::fetch_failed(url, e))?;

        Ok(HttpResponse { status, body })
    }
}

/// Build the listing URL for `query`.
///
/// `sort_code` is the legacy numeric sort; it is only placed in search and
/// top URLs and left empty when absent.
pub fn build_url(base_url: &str, query: &SearchQuery, sort_code: Option<u8>) -> String {
    let base = normalize_base_url(base_url);
    let code = sort_code.map(|c| c.to_string()).unwrap_or_default();
    let category = query
        .category
        .map(|c| c.to_string())
        .unwrap_or_else(|| "all".to_string());

    match query.view {
        View::Search => format!(
            "{}search/{}/{}/{}",
            base,
            urlencoding::encode(query.term.as_deref().unwrap_or_default()),
            query.page,
            code
        ),
        View::Top => format!("{}top/{}/{}", base, category, code),
        View::Top48h => format!("{}top/48h{}", base, category),
        View::Recent => format!("{}recent/{}", base, query.page),
    }
}

/// A fetched listing page.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub body: String,
    /// Local time the body arrived; anchors relative upload times.
    pub fetched_at: NaiveDateTime,
}

impl Page {
    pub fn records(&self) -> Result<Vec<TorrentRecord>> {
        extract_html(&self.body, self.fetched_at)
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub struct PageFetcher {
    base_url: String,
    transport: Arc<dyn Transport>,
    clock: fn() -> NaiveDateTime,
}

impl PageFetcher {
    /// Fetcher using a `reqwest` transport configured from `config`.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config)?;
        info!(base_url = %config.base_url, proxied = config.proxy.is_some(), "Page fetcher ready");
        Ok(Self::with_transport(&config.base_url, Arc::new(transport)))
    }

    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            transport,
            clock: local_now,
        }
    }

    /// Replace the clock used to stamp fetched pages.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn build_url(&self, query: &SearchQuery, sort_code: Option<u8>) -> String {
        build_url(&self.base_url, query, sort_code)
    }

    /// GET one page. Any transport error or non-2xx status is `FetchFailed`.
    pub async fn fetch(&self, url: &str) -> Result<Page> {
        debug!(url = url, "Fetching page");

        let response = self.transport.get(url).await?;
        if !response.is_success() {
            return Err(SearchError::fetch_failed(
                url,
                format!("HTTP status {}", response.status),
            ));
        }

        Ok(Page {
            url: url.to_string(),
            body: response.body,
            fetched_at: (self.clock)(),
        })
    }
}
