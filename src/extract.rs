//! Results-table extraction.
//!
//! A listing page carries its rows in `table#searchResult`. Rather than
//! walking rows, the extractor pulls five parallel lists out of the table
//! (titles, magnet links, description triples, seed/leech cells and category
//! labels) and zips them. The lists must line up exactly; a page where they
//! do not is rejected with [`SearchError::ExtractionMismatch`].
//!
//! Normalization is atomic per page: one malformed size, date or count
//! rejects the whole page.

use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::date::normalize_date;
use crate::error::{FieldCounts, Result, SearchError};
use crate::models::TorrentRecord;
use crate::size::normalize_size;

lazy_static! {
    static ref TABLE: Selector = Selector::parse("table#searchResult").unwrap();
    static ref TITLE: Selector = Selector::parse(".detLink").unwrap();
    static ref MAGNET: Selector = Selector::parse("a[href^='magnet:']").unwrap();
    static ref DESCRIPTION: Selector = Selector::parse("font.detDesc").unwrap();
    static ref SEED_LEECH: Selector = Selector::parse("td[align='right']").unwrap();
    static ref CATEGORY: Selector = Selector::parse("center").unwrap();
}

const UPLOADED_PREFIX: &str = "Uploaded ";
const SIZE_PREFIX: &str = " Size ";
const UPLOADER_PREFIX: &str = " ULed by ";

/// Description cell split into its three raw fields, prefixes stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Description {
    uploaded: String,
    size: String,
    uploader: String,
}

impl Description {
    fn parse(text: &str) -> Result<Self> {
        let text = text.replace('\u{a0}', " ");
        let mut parts = text.splitn(3, ',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(uploaded), Some(size), Some(uploader)) => Ok(Self {
                uploaded: uploaded.replace(UPLOADED_PREFIX, "").trim().to_string(),
                size: size.replace(SIZE_PREFIX, "").trim().to_string(),
                uploader: uploader.replace(UPLOADER_PREFIX, "").trim().to_string(),
            }),
            _ => Err(SearchError::MalformedDescription(text.clone())),
        }
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_titles(table: ElementRef<'_>) -> Vec<String> {
    table.select(&TITLE).map(element_text).collect()
}

fn parse_magnet_links(table: ElementRef<'_>) -> Vec<String> {
    table
        .select(&MAGNET)
        .filter_map(|a| a.value().attr("href"))
        .map(String::from)
        .collect()
}

fn parse_descriptions(table: ElementRef<'_>) -> Result<Vec<Description>> {
    table
        .select(&DESCRIPTION)
        .map(|font| Description::parse(&font.text().collect::<String>()))
        .collect()
}

/// Right-aligned cells alternate seeds, leeches, seeds, leeches...
fn parse_seed_leech(table: ElementRef<'_>) -> Result<Vec<u32>> {
    table
        .select(&SEED_LEECH)
        .map(|td| {
            let text = element_text(td);
            text.parse::<u32>()
                .map_err(|_| SearchError::MalformedCount(text))
        })
        .collect()
}

/// `"(Video Movies)"` style labels into `(category, subcategory)`.
fn parse_categories(table: ElementRef<'_>) -> Result<Vec<(String, String)>> {
    table
        .select(&CATEGORY)
        .map(|center| -> Result<(String, String)> {
            let raw = center.text().collect::<Vec<_>>().join(" ");
            let cleaned = raw.replace(['(', ')'], " ");
            let mut words = cleaned.split_whitespace();
            let category = words
                .next()
                .ok_or_else(|| SearchError::MalformedCategory(raw.trim().to_string()))?;
            Ok((category.to_string(), words.collect::<Vec<_>>().join(" ")))
        })
        .collect()
}

/// Extract every record of a parsed listing page.
///
/// `now` anchors relative upload times and should be the fetch time of the
/// page. A document without a results table is an empty page, not an error.
pub fn extract(document: &Html, now: NaiveDateTime) -> Result<Vec<TorrentRecord>> {
    let table = match document.select(&TABLE).next() {
        Some(table) => table,
        None => {
            debug!("No results table in document");
            return Ok(Vec::new());
        }
    };

    let titles = parse_titles(table);
    let magnets = parse_magnet_links(table);
    let descriptions = parse_descriptions(table)?;
    let seed_leech = parse_seed_leech(table)?;
    let categories = parse_categories(table)?;

    let counts = FieldCounts {
        titles: titles.len(),
        magnets: magnets.len(),
        descriptions: descriptions.len(),
        seed_leech_cells: seed_leech.len(),
        categories: categories.len(),
    };
    let rows = titles.len();
    if seed_leech.len() % 2 != 0
        || magnets.len() != rows
        || descriptions.len() != rows
        || seed_leech.len() / 2 != rows
        || categories.len() != rows
    {
        return Err(SearchError::ExtractionMismatch(counts));
    }

    let records = titles
        .into_iter()
        .zip(magnets)
        .zip(descriptions)
        .zip(seed_leech.chunks_exact(2))
        .zip(categories)
        .map(
            |((((title, magnet_link), desc), pair), (category, subcategory))| -> Result<TorrentRecord> {
                Ok(TorrentRecord {
                    title,
                    magnet_link,
                    uploaded_at: normalize_date(&desc.uploaded, now)?,
                    size_bytes: normalize_size(&desc.size)?,
                    uploader: desc.uploader,
                    seeds: pair[0],
                    leeches: pair[1],
                    category,
                    subcategory,
                })
            },
        )
        .collect::<Result<Vec<_>>>()?;

    debug!(records = records.len(), "Extracted results table");
    Ok(records)
}

/// Parse raw HTML and extract its records.
pub fn extract_html(html: &str, now: NaiveDateTime) -> Result<Vec<TorrentRecord>> {
    let document = Html::parse_document(html);
    extract(&document, now)
}
