//! Human-readable torrent sizes ("1.5 GiB") to byte counts.

use crate::error::{Result, SearchError};

/// Binary units in exponent order: `B` is 1024^0, `EiB` is 1024^6.
pub const UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Parse a size like `"1.5 GiB"` into bytes.
pub fn normalize_size(text: &str) -> Result<u64> {
    let malformed = || SearchError::MalformedSize(text.to_string());

    let mut parts = text.split_whitespace();
    let (magnitude, unit) = match (parts.next(), parts.next(), parts.next()) {
        (Some(magnitude), Some(unit), None) => (magnitude, unit),
        _ => return Err(malformed()),
    };

    let magnitude: f64 = magnitude.parse().map_err(|_| malformed())?;
    if !magnitude.is_finite() || magnitude < 0.0 {
        return Err(malformed());
    }

    let exponent = UNITS.iter().position(|u| *u == unit).ok_or_else(malformed)?;
    let bytes = (magnitude * 1024f64.powi(exponent as i32)).round();

    // u64::MAX is not exactly representable; anything at or above 2^64 overflows
    if bytes >= u64::MAX as f64 {
        return Err(malformed());
    }

    Ok(bytes as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_units() {
        assert_eq!(normalize_size("512 B").unwrap(), 512);
        assert_eq!(normalize_size("1 KiB").unwrap(), 1024);
        assert_eq!(normalize_size("1 GiB").unwrap(), 1_073_741_824);
        assert_eq!(normalize_size("2 TiB").unwrap(), 2 * 1024u64.pow(4));
    }

    #[test]
    fn test_fractional_magnitude() {
        assert_eq!(normalize_size("1.5 GiB").unwrap(), 1_610_612_736);
        assert_eq!(normalize_size("700.01 MiB").unwrap(), 734_013_686);
    }

    #[test]
    fn test_extra_whitespace() {
        assert_eq!(normalize_size("  3   MiB ").unwrap(), 3 * 1024 * 1024);
    }

    #[test]
    fn test_unknown_unit() {
        assert!(matches!(
            normalize_size("1 GB"),
            Err(SearchError::MalformedSize(_))
        ));
    }

    #[test]
    fn test_bad_magnitude() {
        assert!(matches!(
            normalize_size("lots MiB"),
            Err(SearchError::MalformedSize(_))
        ));
        assert!(matches!(
            normalize_size("-1 MiB"),
            Err(SearchError::MalformedSize(_))
        ));
        assert!(matches!(
            normalize_size("NaN MiB"),
            Err(SearchError::MalformedSize(_))
        ));
    }

    #[test]
    fn test_wrong_token_count() {
        assert!(normalize_size("").is_err());
        assert!(normalize_size("12").is_err());
        assert!(normalize_size("1 GiB extra").is_err());
    }

    #[test]
    fn test_overflow() {
        assert!(normalize_size("16 EiB").is_err());
        assert!(normalize_size("15 EiB").is_ok());
    }
}
