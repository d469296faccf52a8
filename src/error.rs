//! Error types for the search pipeline.

use thiserror::Error;

/// Lengths of the parallel lists pulled out of one results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCounts {
    pub titles: usize,
    pub magnets: usize,
    pub descriptions: usize,
    pub seed_leech_cells: usize,
    pub categories: usize,
}

impl std::fmt::Display for FieldCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "titles={} magnets={} descriptions={} seed/leech cells={} categories={}",
            self.titles, self.magnets, self.descriptions, self.seed_leech_cells, self.categories
        )
    }
}

/// Errors that can occur while fetching, parsing or sorting search results.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Size text is not "<number> <binary unit>".
    #[error("Malformed size: {0:?}")]
    MalformedSize(String),

    /// Date text matched no grammar, or its fields do not form a valid time.
    #[error("Malformed date: {0:?}")]
    MalformedDate(String),

    /// Sort token is not one of the known field/direction pairs.
    #[error("Unknown sort token: {0:?}")]
    UnknownSortToken(String),

    /// Transport error or non-success status.
    #[error("Fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// The parallel field lists of a results table differ in length.
    #[error("Extraction mismatch: {0}")]
    ExtractionMismatch(FieldCounts),

    /// Description cell does not split into time, size and uploader.
    #[error("Malformed description: {0:?}")]
    MalformedDescription(String),

    /// Seed or leech cell is not an integer.
    #[error("Malformed seed/leech count: {0:?}")]
    MalformedCount(String),

    /// Category cell has no category token.
    #[error("Malformed category: {0:?}")]
    MalformedCategory(String),

    /// Configuration could not be turned into a working fetcher.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SearchError {
    /// Creates a new fetch failed error.
    pub fn fetch_failed(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::FetchFailed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error came from page content rather than the network.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedSize(_)
                | Self::MalformedDate(_)
                | Self::ExtractionMismatch(_)
                | Self::MalformedDescription(_)
                | Self::MalformedCount(_)
                | Self::MalformedCategory(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
