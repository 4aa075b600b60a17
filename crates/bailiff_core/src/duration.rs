//! Suffixed ban durations.
//!
//! Moderators type durations as an integer followed by a unit letter:
//! `d` (day), `w` (week) or `y` (year), case-insensitive. Parsing is purely
//! syntactic: `0d` and `-3w` parse fine and it is up to the caller to reject
//! non-positive lengths.

use bailiff_error::{DurationError, DurationErrorKind};
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Unit of a ban duration.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum DurationUnit {
    /// 86 400 seconds, suffix `d`
    Day,
    /// 604 800 seconds, suffix `w`
    Week,
    /// 31 536 000 seconds (365 days), suffix `y`
    Year,
}

impl DurationUnit {
    /// Look up a unit by its suffix character, ignoring case.
    pub fn from_suffix(suffix: char) -> Option<Self> {
        Self::iter().find(|unit| unit.suffix() == suffix.to_ascii_lowercase())
    }

    /// Suffix character used when typing this unit.
    pub fn suffix(self) -> char {
        match self {
            DurationUnit::Day => 'd',
            DurationUnit::Week => 'w',
            DurationUnit::Year => 'y',
        }
    }

    /// Number of seconds in one unit.
    pub fn seconds(self) -> i64 {
        match self {
            DurationUnit::Day => 86_400,
            DurationUnit::Week => 604_800,
            DurationUnit::Year => 31_536_000,
        }
    }

    /// Comma separated list of accepted suffixes, for help text.
    pub fn suffixes() -> String {
        Self::iter()
            .map(|unit| unit.suffix().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A parsed ban duration: a signed magnitude and its unit.
///
/// # Example
///
/// ```
/// use bailiff_core::{BanDuration, DurationUnit};
///
/// let duration: BanDuration = "3d".parse().unwrap();
/// assert_eq!(duration.unit(), DurationUnit::Day);
/// assert_eq!(duration.seconds(), 3 * 86_400);
/// assert_eq!(duration.describe(), "3 days");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BanDuration {
    magnitude: i64,
    unit: DurationUnit,
}

impl BanDuration {
    /// Parse `<integer><d|w|y>`.
    ///
    /// # Errors
    ///
    /// - `InvalidSuffix` if the input is empty or its last character is not a unit
    /// - `InvalidMagnitude` if the prefix is not an integer or the total seconds overflow
    pub fn parse(input: &str) -> Result<Self, DurationError> {
        let trimmed = input.trim();

        let Some(suffix) = trimmed.chars().last() else {
            return Err(DurationError::new(DurationErrorKind::InvalidSuffix(
                input.to_string(),
            )));
        };

        let unit = DurationUnit::from_suffix(suffix).ok_or_else(|| {
            DurationError::new(DurationErrorKind::InvalidSuffix(input.to_string()))
        })?;

        let magnitude_text = trimmed[..trimmed.len() - suffix.len_utf8()].trim();
        let magnitude: i64 = magnitude_text.parse().map_err(|_| {
            DurationError::new(DurationErrorKind::InvalidMagnitude(input.to_string()))
        })?;

        if magnitude.checked_mul(unit.seconds()).is_none() {
            return Err(DurationError::new(DurationErrorKind::InvalidMagnitude(
                input.to_string(),
            )));
        }

        Ok(Self { magnitude, unit })
    }

    /// The integer typed before the suffix.
    pub fn magnitude(&self) -> i64 {
        self.magnitude
    }

    /// The unit.
    pub fn unit(&self) -> DurationUnit {
        self.unit
    }

    /// Total length in seconds. May be zero or negative.
    pub fn seconds(&self) -> i64 {
        // Overflow is ruled out in `parse`.
        self.magnitude * self.unit.seconds()
    }

    /// Human-readable form, pluralized unless the magnitude is exactly 1.
    pub fn describe(&self) -> String {
        let plural = if self.magnitude == 1 { "" } else { "s" };
        format!("{} {}{}", self.magnitude, self.unit, plural)
    }
}

impl std::fmt::Display for BanDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

impl FromStr for BanDuration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse a suffixed duration straight to seconds.
///
/// # Example
///
/// ```
/// use bailiff_core::parse_duration;
///
/// assert_eq!(parse_duration("2w").unwrap(), 1_209_600);
/// assert!(parse_duration("10m").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<i64, DurationError> {
    BanDuration::parse(input).map(|duration| duration.seconds())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_each_unit() {
        assert_eq!(parse_duration("3d").unwrap(), 3 * 86_400);
        assert_eq!(parse_duration("2w").unwrap(), 2 * 604_800);
        assert_eq!(parse_duration("1y").unwrap(), 31_536_000);
    }

    #[test]
    fn test_suffix_is_case_insensitive() {
        assert_eq!(parse_duration("3D").unwrap(), parse_duration("3d").unwrap());
        assert_eq!(parse_duration("1Y").unwrap(), 31_536_000);
    }

    #[test]
    fn test_non_positive_magnitudes_parse() {
        assert_eq!(parse_duration("0d").unwrap(), 0);
        assert_eq!(parse_duration("-2w").unwrap(), -1_209_600);
        assert_eq!(parse_duration("+4d").unwrap(), 4 * 86_400);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(parse_duration("  5d ").unwrap(), 5 * 86_400);
    }

    #[test]
    fn test_invalid_suffix() {
        for input in ["10m", "10h", "10s", "10", "", "   "] {
            let err = parse_duration(input).unwrap_err();
            assert!(
                matches!(err.kind(), DurationErrorKind::InvalidSuffix(_)),
                "{input:?} should be an invalid suffix, got {err}"
            );
        }
    }

    #[test]
    fn test_invalid_magnitude() {
        for input in ["d", "abcd", "1.5w", "three y"] {
            let err = parse_duration(input).unwrap_err();
            assert!(
                matches!(err.kind(), DurationErrorKind::InvalidMagnitude(_)),
                "{input:?} should be an invalid magnitude, got {err}"
            );
        }
    }

    #[test]
    fn test_overflow_is_invalid_magnitude() {
        let err = parse_duration("999999999999999y").unwrap_err();
        assert!(matches!(err.kind(), DurationErrorKind::InvalidMagnitude(_)));
    }

    #[test]
    fn test_describe_pluralizes() {
        assert_eq!(BanDuration::parse("1d").unwrap().describe(), "1 day");
        assert_eq!(BanDuration::parse("3d").unwrap().describe(), "3 days");
        assert_eq!(BanDuration::parse("1w").unwrap().describe(), "1 week");
        assert_eq!(BanDuration::parse("0w").unwrap().describe(), "0 weeks");
        assert_eq!(BanDuration::parse("2Y").unwrap().describe(), "2 years");
        assert_eq!(BanDuration::parse("-1d").unwrap().describe(), "-1 days");
    }

    #[test]
    fn test_unit_names_parse() {
        assert_eq!("week".parse::<DurationUnit>().unwrap(), DurationUnit::Week);
        assert!("fortnight".parse::<DurationUnit>().is_err());
    }

    #[test]
    fn test_suffix_listing() {
        assert_eq!(DurationUnit::suffixes(), "d, w, y");
    }
}
