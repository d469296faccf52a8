//! Search client for Pirate Bay style torrent listings.
//!
//! Fetches listing pages, extracts torrent rows, normalizes their sizes,
//! upload times and counts, and optionally sorts the result.

pub mod config;
pub mod date;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod models;
pub mod search;
pub mod size;
pub mod sort;

pub use config::{ProxyConfig, SearchConfig};
pub use error::SearchError;
pub use fetcher::{HttpResponse, Page, PageFetcher, Transport};
pub use models::{SearchOutcome, SearchQuery, SearchStatus, TorrentRecord, View};
pub use search::Searcher;
pub use sort::{SortDirection, SortField, SortSpec};
