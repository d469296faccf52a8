use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of a listing page, with every field normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentRecord {
    pub title: String,
    pub magnet_link: String,
    pub uploaded_at: NaiveDateTime,
    pub size_bytes: u64,
    pub uploader: String,
    pub seeds: u32,
    pub leeches: u32,
    pub category: String,
    pub subcategory: String,
}

/// Upstream listing mode; decides the URL shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Search,
    Top,
    #[serde(rename = "top48h")]
    Top48h,
    Recent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: Option<String>,
    pub page: u32,
    pub view: View,
    pub category: Option<u32>,
}

impl SearchQuery {
    pub fn search(term: impl Into<String>, page: u32) -> Self {
        Self {
            term: Some(term.into()),
            page,
            view: View::Search,
            category: None,
        }
    }

    pub fn top(category: Option<u32>) -> Self {
        Self {
            term: None,
            page: 0,
            view: View::Top,
            category,
        }
    }

    pub fn top48h(category: Option<u32>) -> Self {
        Self {
            term: None,
            page: 0,
            view: View::Top48h,
            category,
        }
    }

    pub fn recent(page: u32) -> Self {
        Self {
            term: None,
            page,
            view: View::Recent,
            category: None,
        }
    }
}

/// How a search run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SearchStatus {
    /// Every requested page was fetched and extracted.
    Complete,
    /// A page could not be fetched; later pages were not attempted.
    FetchFailed { page: u32, reason: String },
    /// A page was fetched but its content could not be extracted.
    PageRejected { page: u32, reason: String },
}

impl SearchStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, SearchStatus::Complete)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub records: Vec<TorrentRecord>,
    pub status: SearchStatus,
    pub pages_fetched: u32,
}
