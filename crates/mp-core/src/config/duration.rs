//! Human duration strings: `6h`, `5m`, `30s`, or a bare number of minutes.

use crate::errors::{MpError, MpResult};

/// Parse a duration string into seconds.
///
/// The unit suffix is one of `h`, `m`, `s`; without a suffix the value is in
/// minutes. Zero and negative durations are rejected.
pub fn parse_duration(label: &str, value: &str) -> MpResult<f64> {
    let trimmed = value.trim();
    let invalid = |reason: &str| MpError::InvalidDuration {
        label: label.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let (number, multiplier) = match trimmed.chars().last() {
        Some('h') => (&trimmed[..trimmed.len() - 1], 3600.0),
        Some('m') => (&trimmed[..trimmed.len() - 1], 60.0),
        Some('s') => (&trimmed[..trimmed.len() - 1], 1.0),
        Some(_) => (trimmed, 60.0),
        None => return Err(invalid("cannot be empty.")),
    };

    let seconds = number
        .trim()
        .parse::<f64>()
        .map_err(|_| {
            invalid("should be a numeric value in minutes, or a numeric value followed by the unit 'h', 'm', or 's'.")
        })?
        * multiplier;

    if !seconds.is_finite() {
        return Err(invalid("should be a finite value."));
    }
    if seconds <= 0.0 {
        return Err(invalid("cannot be zero or negative."));
    }
    Ok(seconds)
}

/// Number of collections a long run performs: one per full interval,
/// and at least one.
pub fn collection_count(long_run_duration: f64, collection_interval: f64) -> usize {
    if collection_interval <= 0.0 || long_run_duration < collection_interval {
        return 1;
    }
    (long_run_duration / collection_interval).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        assert_eq!(parse_duration("d", "6h").unwrap(), 21_600.0);
        assert_eq!(parse_duration("d", "5m").unwrap(), 300.0);
        assert_eq!(parse_duration("d", "30s").unwrap(), 30.0);
        assert_eq!(parse_duration("d", "1.5h").unwrap(), 5_400.0);
    }

    #[test]
    fn test_bare_number_is_minutes() {
        assert_eq!(parse_duration("d", "2").unwrap(), 120.0);
        assert_eq!(parse_duration("d", " 10 ").unwrap(), 600.0);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(parse_duration("d", "0m").is_err());
        assert!(parse_duration("d", "-1h").is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_duration("d", "").is_err());
        assert!(parse_duration("d", "abc").is_err());
        assert!(parse_duration("d", "5x").is_err());
        assert!(parse_duration("d", "h").is_err());
    }

    #[test]
    fn test_collection_count() {
        assert_eq!(collection_count(3600.0, 300.0), 12);
        assert_eq!(collection_count(3700.0, 300.0), 12);
        assert_eq!(collection_count(100.0, 300.0), 1);
        assert_eq!(collection_count(300.0, 300.0), 1);
    }
}
