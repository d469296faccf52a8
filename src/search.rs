//! Multi-page search orchestration.

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::config::SearchConfig;
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::models::{SearchOutcome, SearchQuery, SearchStatus, View};
use crate::sort::{sort_records, translate, SortSpec};

pub struct Searcher {
    fetcher: PageFetcher,
    concurrency: usize,
}

impl Searcher {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let fetcher = PageFetcher::new(config)?;
        Ok(Self {
            fetcher,
            concurrency: config.concurrency.max(1),
        })
    }

    pub fn from_fetcher(fetcher: PageFetcher) -> Self {
        Self {
            fetcher,
            concurrency: 1,
        }
    }

    /// Keep up to `concurrency` page requests in flight. Output order and
    /// early-stop behavior do not change.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Search `term` over pages `0..max_pages`.
    ///
    /// An unknown sort token fails before anything is fetched. Every other
    /// failure ends the run early and is reported in the outcome's status
    /// alongside the records gathered so far.
    pub async fn search(
        &self,
        term: &str,
        max_pages: u32,
        sort: Option<&str>,
    ) -> Result<SearchOutcome> {
        let spec = sort.map(translate).transpose()?;
        let queries = (0..max_pages).map(|page| SearchQuery::search(term, page));
        info!(term = term, max_pages = max_pages, "Searching");
        Ok(self.run(queries.collect(), spec).await)
    }

    /// Most popular torrents, optionally within one category.
    pub async fn top(&self, category: Option<u32>, sort: Option<&str>) -> Result<SearchOutcome> {
        let spec = sort.map(translate).transpose()?;
        Ok(self.run(vec![SearchQuery::top(category)], spec).await)
    }

    /// Most popular torrents of the last 48 hours.
    pub async fn top48h(&self, category: Option<u32>, sort: Option<&str>) -> Result<SearchOutcome> {
        let spec = sort.map(translate).transpose()?;
        Ok(self.run(vec![SearchQuery::top48h(category)], spec).await)
    }

    /// Latest uploads, one listing page.
    pub async fn recent(&self, page: u32, sort: Option<&str>) -> Result<SearchOutcome> {
        let spec = sort.map(translate).transpose()?;
        Ok(self.run(vec![SearchQuery::recent(page)], spec).await)
    }

    async fn run(&self, queries: Vec<SearchQuery>, spec: Option<SortSpec>) -> SearchOutcome {
        let fetcher = &self.fetcher;
        let mut pages = stream::iter(queries)
            .map(|query| {
                // URL shapes: search/<term>/<page>/<code> and top/<category>/<code>
                // carry the code; top/48h<category> and recent/<page> have no slot for it.
                let code = match query.view {
                    View::Search | View::Top => spec.map(|s| s.legacy_code()),
                    View::Top48h | View::Recent => None,
                };
                let url = fetcher.build_url(&query, code);
                async move { (query.page, fetcher.fetch(&url).await) }
            })
            .buffered(self.concurrency);

        let mut records = Vec::new();
        let mut pages_fetched = 0;
        let mut status = SearchStatus::Complete;

        while let Some((page, fetched)) = pages.next().await {
            match fetched.and_then(|fetched| fetched.records()) {
                Ok(found) => {
                    info!(page = page, found = found.len(), "Page extracted");
                    pages_fetched += 1;
                    records.extend(found);
                }
                Err(e) if e.is_parse_error() => {
                    warn!(page = page, error = %e, "Page rejected, stopping");
                    status = SearchStatus::PageRejected {
                        page,
                        reason: e.to_string(),
                    };
                    break;
                }
                Err(e) => {
                    warn!(page = page, error = %e, "Fetch failed, stopping");
                    status = SearchStatus::FetchFailed {
                        page,
                        reason: e.to_string(),
                    };
                    break;
                }
            }
        }

        if let Some(spec) = spec {
            sort_records(&mut records, spec);
        }

        info!(records = records.len(), pages = pages_fetched, "Search finished");
        SearchOutcome {
            records,
            status,
            pages_fetched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_config_built_searcher_takes_sort_per_call() {
        let searcher = Searcher::new(&SearchConfig::default()).unwrap();

        let result = searcher.search("ubuntu", 3, Some("best_first")).await;
        assert!(matches!(
            result,
            Err(crate::error::SearchError::UnknownSortToken(t)) if t == "best_first"
        ));

        let result = searcher.recent(0, Some("newest")).await;
        assert!(matches!(
            result,
            Err(crate::error::SearchError::UnknownSortToken(_))
        ));
    }
}
