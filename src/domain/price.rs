//! Close-price series representation.
//!
//! The price series is the spine every other series aligns to: timestamps are
//! unique and strictly increasing, closes are positive. Intraday intervals are
//! supported, so points carry a full date-time rather than a date.

use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub close: f64,
}

/// Check that timestamps are strictly increasing.
pub fn is_chronological(points: &[PricePoint]) -> bool {
    points.windows(2).all(|w| w[0].timestamp < w[1].timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn chronological_ordering() {
        let points = vec![
            PricePoint { timestamp: ts(1, 9), close: 100.0 },
            PricePoint { timestamp: ts(1, 10), close: 101.0 },
            PricePoint { timestamp: ts(2, 9), close: 102.0 },
        ];
        assert!(is_chronological(&points));
    }

    #[test]
    fn duplicate_timestamp_is_not_chronological() {
        let points = vec![
            PricePoint { timestamp: ts(1, 9), close: 100.0 },
            PricePoint { timestamp: ts(1, 9), close: 101.0 },
        ];
        assert!(!is_chronological(&points));
    }

    #[test]
    fn out_of_order_is_not_chronological() {
        let points = vec![
            PricePoint { timestamp: ts(2, 9), close: 100.0 },
            PricePoint { timestamp: ts(1, 9), close: 101.0 },
        ];
        assert!(!is_chronological(&points));
    }

    #[test]
    fn empty_and_single_are_chronological() {
        assert!(is_chronological(&[]));
        assert!(is_chronological(&[PricePoint { timestamp: ts(1, 9), close: 100.0 }]));
    }
}
