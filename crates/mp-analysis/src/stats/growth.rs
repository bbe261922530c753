//! Compound growth rate of a cumulative series.

/// Average percent growth per period between `initial` and `final_value`
/// over `duration` periods, compounded.
///
/// A series that doubles over two hours reports the hourly rate that,
/// compounded, doubles it: ~41.42 %, not 50 %. When either endpoint is zero
/// both are shifted up by one, so "no growth" stays 0 % and the ratio stays
/// finite. A non-positive or non-finite duration reports 0 %.
pub fn growth_rate(initial: f64, final_value: f64, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 {
        return 0.0;
    }

    let (initial, final_value) = if initial > 0.0 && final_value > 0.0 {
        (initial, final_value)
    } else {
        (initial + 1.0, final_value + 1.0)
    };

    ((final_value / initial).powf(1.0 / duration) - 1.0) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_endpoints_have_no_growth() {
        assert_eq!(growth_rate(7.0, 7.0, 3.0), 0.0);
        assert_eq!(growth_rate(0.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_tenfold_in_one_hour() {
        assert!((growth_rate(1.0, 10.0, 1.0) - 900.0).abs() < 1e-9);
    }

    #[test]
    fn test_compounding() {
        let rate = growth_rate(1.0, 4.0, 2.0);
        assert!((rate - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_endpoints_are_shifted() {
        assert!((growth_rate(0.0, 5.0, 1.0) - 500.0).abs() < 1e-9);
        let shrink = growth_rate(5.0, 0.0, 1.0);
        assert!(shrink.is_finite());
        assert!(shrink < 0.0);
    }

    #[test]
    fn test_degenerate_duration() {
        assert_eq!(growth_rate(1.0, 10.0, 0.0), 0.0);
        assert_eq!(growth_rate(1.0, 10.0, -1.0), 0.0);
        assert_eq!(growth_rate(1.0, 10.0, f64::NAN), 0.0);
    }
}
