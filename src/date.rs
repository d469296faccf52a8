//! Upload-time normalization.
//!
//! Listing pages render the upload time differently depending on how recent
//! the torrent is: "5 mins ago", "Today 10:30", "Y-day 10:30", "06-01 10:30"
//! for the current year and "06-01 2019" for anything older. Each rendering
//! is a [`DateGrammar`] variant with its own parser. Grammars are tried in a
//! fixed order and the first one whose pattern matches decides the result.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Result, SearchError};

lazy_static! {
    static ref MINUTES_AGO: Regex = Regex::new(r"^([0-9]+) mins? ago$").unwrap();
    static ref MONTH_DAY_TIME: Regex =
        Regex::new(r"^([0-9]*)-([0-9]*)\s([0-9]+):([0-9]+)$").unwrap();
    static ref TODAY: Regex = Regex::new(r"^Today\s([0-9]+):([0-9]+)$").unwrap();
    static ref YESTERDAY: Regex = Regex::new(r"^Y-day\s([0-9]+):([0-9]+)$").unwrap();
}

const MONTH_DAY_YEAR: &str = "%m-%d %Y";

/// The date renderings a listing page can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateGrammar {
    /// `"<N> min(s) ago"`
    MinutesAgo,
    /// `"<M>-<D> <H>:<Min>"` in the current year
    MonthDayTime,
    /// `"Today <H>:<Min>"`
    Today,
    /// `"Y-day <H>:<Min>"`
    Yesterday,
    /// `"<M>-<D> <Y>"`, midnight
    MonthDayYear,
}

impl DateGrammar {
    /// Dispatch order. `MonthDayYear` is the fallback and always last.
    pub const ORDER: [DateGrammar; 5] = [
        DateGrammar::MinutesAgo,
        DateGrammar::MonthDayTime,
        DateGrammar::Today,
        DateGrammar::Yesterday,
        DateGrammar::MonthDayYear,
    ];

    fn pattern(self) -> Option<&'static Regex> {
        match self {
            DateGrammar::MinutesAgo => Some(&*MINUTES_AGO),
            DateGrammar::MonthDayTime => Some(&*MONTH_DAY_TIME),
            DateGrammar::Today => Some(&*TODAY),
            DateGrammar::Yesterday => Some(&*YESTERDAY),
            DateGrammar::MonthDayYear => None,
        }
    }

    /// First grammar whose pattern matches `text`.
    pub fn detect(text: &str) -> DateGrammar {
        Self::ORDER
            .into_iter()
            .find(|g| g.pattern().map_or(true, |re| re.is_match(text)))
            .unwrap_or(DateGrammar::MonthDayYear)
    }

    /// Parse `text` with this grammar, resolving relative parts against `now`.
    pub fn parse(self, text: &str, now: NaiveDateTime) -> Result<NaiveDateTime> {
        let malformed = || SearchError::MalformedDate(text.to_string());

        let captures = match self.pattern() {
            Some(re) => Some(re.captures(text).ok_or_else(malformed)?),
            None => None,
        };
        let field = |i: usize| -> Result<u32> {
            captures
                .as_ref()
                .and_then(|c| c.get(i))
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(malformed)
        };

        match self {
            DateGrammar::MinutesAgo => {
                let minutes = Duration::try_minutes(i64::from(field(1)?)).ok_or_else(malformed)?;
                let at = now.checked_sub_signed(minutes).ok_or_else(malformed)?;
                at.with_second(0)
                    .and_then(|t| t.with_nanosecond(0))
                    .ok_or_else(malformed)
            }
            DateGrammar::MonthDayTime => {
                let date = NaiveDate::from_ymd_opt(now.year(), field(1)?, field(2)?)
                    .ok_or_else(malformed)?;
                Ok(date.and_time(clock_time(field(3)?, field(4)?).ok_or_else(malformed)?))
            }
            DateGrammar::Today => {
                let time = clock_time(field(1)?, field(2)?).ok_or_else(malformed)?;
                Ok(now.date().and_time(time))
            }
            DateGrammar::Yesterday => {
                let time = clock_time(field(1)?, field(2)?).ok_or_else(malformed)?;
                let date = now.date().pred_opt().ok_or_else(malformed)?;
                Ok(date.and_time(time))
            }
            DateGrammar::MonthDayYear => NaiveDate::parse_from_str(text, MONTH_DAY_YEAR)
                .map(|d| d.and_time(NaiveTime::MIN))
                .map_err(|_| malformed()),
        }
    }
}

fn clock_time(hour: u32, minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Normalize an upload-time string into a timestamp relative to `now`.
pub fn normalize_date(text: &str, now: NaiveDateTime) -> Result<NaiveDateTime> {
    let text = text.trim();
    DateGrammar::detect(text).parse(text, now)
}
