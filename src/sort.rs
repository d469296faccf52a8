//! Sort tokens such as `"seeds_desc"`.
//!
//! A token names a record field and a direction. It maps to a [`SortSpec`]
//! for sorting in memory and to a legacy numeric code that the upstream site
//! accepts in search and top URLs.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::error::SearchError;
use crate::models::TorrentRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Title,
    Time,
    Size,
    Seeds,
    Leeches,
    Uploader,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Token, field, direction and legacy code for every supported sort.
const SORT_TABLE: [(&str, SortField, SortDirection, u8); 14] = [
    ("title_asc", SortField::Title, SortDirection::Asc, 1),
    ("title_desc", SortField::Title, SortDirection::Desc, 2),
    ("time_desc", SortField::Time, SortDirection::Desc, 3),
    ("time_asc", SortField::Time, SortDirection::Asc, 4),
    ("size_desc", SortField::Size, SortDirection::Desc, 5),
    ("size_asc", SortField::Size, SortDirection::Asc, 6),
    ("seeds_desc", SortField::Seeds, SortDirection::Desc, 7),
    ("seeds_asc", SortField::Seeds, SortDirection::Asc, 8),
    ("leeches_desc", SortField::Leeches, SortDirection::Desc, 9),
    ("leeches_asc", SortField::Leeches, SortDirection::Asc, 10),
    ("uploader_asc", SortField::Uploader, SortDirection::Asc, 11),
    ("uploader_desc", SortField::Uploader, SortDirection::Desc, 12),
    ("category_asc", SortField::Category, SortDirection::Asc, 13),
    ("category_desc", SortField::Category, SortDirection::Desc, 14),
];

/// Every recognized sort token, in legacy code order.
pub fn sort_tokens() -> impl Iterator<Item = &'static str> {
    SORT_TABLE.iter().map(|(token, ..)| *token)
}

/// Parse a sort token into a field and direction.
pub fn translate(token: &str) -> Result<SortSpec, SearchError> {
    SORT_TABLE
        .iter()
        .find(|(t, ..)| *t == token)
        .map(|&(_, field, direction, _)| SortSpec { field, direction })
        .ok_or_else(|| SearchError::UnknownSortToken(token.to_string()))
}

/// Numeric code the upstream query string uses for `token`, if known.
pub fn legacy_code(token: &str) -> Option<u8> {
    SORT_TABLE
        .iter()
        .find(|(t, ..)| *t == token)
        .map(|&(.., code)| code)
}

impl SortSpec {
    pub fn legacy_code(&self) -> u8 {
        SORT_TABLE
            .iter()
            .find(|&&(_, f, d, _)| f == self.field && d == self.direction)
            .map(|&(.., code)| code)
            .unwrap_or_default()
    }

    /// Compare two records under this spec.
    pub fn compare(&self, a: &TorrentRecord, b: &TorrentRecord) -> Ordering {
        let ord = self.field.key(a).cmp(&self.field.key(b));
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

impl FromStr for SortSpec {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        translate(s)
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = SORT_TABLE
            .iter()
            .find(|&&(_, field, direction, _)| field == self.field && direction == self.direction)
            .map(|(t, ..)| *t)
            .unwrap_or("?");
        f.write_str(token)
    }
}

/// Typed sort key. A given field always yields the same variant.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey<'a> {
    Text(&'a str),
    Count(u64),
    Time(NaiveDateTime),
}

impl SortField {
    fn key(self, record: &TorrentRecord) -> SortKey<'_> {
        match self {
            SortField::Title => SortKey::Text(&record.title),
            SortField::Time => SortKey::Time(record.uploaded_at),
            SortField::Size => SortKey::Count(record.size_bytes),
            SortField::Seeds => SortKey::Count(u64::from(record.seeds)),
            SortField::Leeches => SortKey::Count(u64::from(record.leeches)),
            SortField::Uploader => SortKey::Text(&record.uploader),
            SortField::Category => SortKey::Text(&record.category),
        }
    }
}

/// Stable in-place sort. Records with equal keys keep their relative order.
pub fn sort_records(records: &mut [TorrentRecord], spec: SortSpec) {
    records.sort_by(|a, b| spec.compare(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(title: &str, seeds: u32, size_bytes: u64, day: u32) -> TorrentRecord {
        TorrentRecord {
            title: title.to_string(),
            magnet_link: format!("magnet:?xt=urn:btih:{}", title),
            uploaded_at: NaiveDate::from_ymd_opt(2024, 5, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            size_bytes,
            uploader: format!("up-{}", title),
            seeds,
            leeches: 0,
            category: "Video".to_string(),
            subcategory: "Movies".to_string(),
        }
    }

    fn titles(records: &[TorrentRecord]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_translate_seeds_desc() {
        let spec = translate("seeds_desc").unwrap();
        assert_eq!(
            spec,
            SortSpec {
                field: SortField::Seeds,
                direction: SortDirection::Desc
            }
        );
        assert_eq!(legacy_code("seeds_desc"), Some(7));
        assert_eq!(spec.legacy_code(), 7);
    }

    #[test]
    fn test_every_token_round_trips() {
        let codes: Vec<u8> = sort_tokens().map(|t| legacy_code(t).unwrap()).collect();
        assert_eq!(codes, (1..=14).collect::<Vec<u8>>());
        for token in sort_tokens() {
            let spec: SortSpec = token.parse().unwrap();
            assert_eq!(spec.to_string(), token);
        }
    }

    #[test]
    fn test_unknown_token() {
        assert_eq!(legacy_code("popularity"), None);
        assert!(matches!(
            translate("popularity"),
            Err(SearchError::UnknownSortToken(t)) if t == "popularity"
        ));
        assert!(translate("SEEDS_DESC").is_err());
    }

    #[test]
    fn test_sort_numeric_not_lexicographic() {
        let mut records = vec![
            record("a", 9, 0, 1),
            record("b", 100, 0, 1),
            record("c", 20, 0, 1),
        ];
        sort_records(&mut records, translate("seeds_desc").unwrap());
        assert_eq!(titles(&records), vec!["b", "c", "a"]);

        sort_records(&mut records, translate("seeds_asc").unwrap());
        assert_eq!(titles(&records), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_sort_by_time_and_size() {
        let mut records = vec![
            record("mid", 0, 2048, 15),
            record("old", 0, 4096, 1),
            record("new", 0, 1024, 30),
        ];
        sort_records(&mut records, translate("time_desc").unwrap());
        assert_eq!(titles(&records), vec!["new", "mid", "old"]);

        sort_records(&mut records, translate("size_asc").unwrap());
        assert_eq!(titles(&records), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_desc_is_stable() {
        let mut records = vec![
            record("first", 5, 0, 1),
            record("second", 5, 0, 1),
            record("top", 50, 0, 1),
            record("third", 5, 0, 1),
        ];
        sort_records(&mut records, translate("seeds_desc").unwrap());
        assert_eq!(titles(&records), vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut records = vec![
            record("b", 1, 0, 1),
            record("a", 1, 0, 1),
            record("c", 3, 0, 1),
        ];
        let spec = translate("title_desc").unwrap();
        sort_records(&mut records, spec);
        let once = records.clone();
        sort_records(&mut records, spec);
        assert_eq!(records, once);
        assert_eq!(titles(&records), vec!["c", "b", "a"]);
    }
}
