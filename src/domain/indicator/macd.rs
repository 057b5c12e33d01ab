//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(sign) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, sign=9
//! Warmup: slow - 1 + sign - 1 points.

use crate::domain::indicator::{
    calculate_ema, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::price::PricePoint;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGN: usize = 9;

pub fn calculate_macd(
    prices: &[PricePoint],
    fast: usize,
    slow: usize,
    sign: usize,
) -> IndicatorSeries {
    if prices.is_empty() || fast == 0 || slow == 0 || sign == 0 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Macd {
                fast,
                slow,
                signal: sign,
            },
            values: Vec::new(),
        };
    }

    let ema_fast = ema_raw_values(prices, fast);
    let ema_slow = ema_raw_values(prices, slow);

    let mut macd_line: Vec<f64> = Vec::with_capacity(prices.len());
    for i in 0..prices.len() {
        macd_line.push(ema_fast[i] - ema_slow[i]);
    }

    // Signal line: EMA of the MACD line, seeded with the SMA of the first
    // `sign` values after the MACD line itself becomes valid.
    let k = 2.0 / (sign as f64 + 1.0);
    let mut signal_line: Vec<f64> = vec![0.0; prices.len()];
    let macd_warmup = slow - 1;

    if macd_warmup + sign <= prices.len() {
        let seed: f64 = macd_line[macd_warmup..macd_warmup + sign].iter().sum::<f64>()
            / sign as f64;
        let mut signal_ema = seed;
        signal_line[macd_warmup + sign - 1] = signal_ema;

        for i in (macd_warmup + sign)..prices.len() {
            signal_ema = macd_line[i] * k + signal_ema * (1.0 - k);
            signal_line[i] = signal_ema;
        }
    }

    let warmup = slow - 1 + sign - 1;

    let mut values = Vec::with_capacity(prices.len());
    for (i, point) in prices.iter().enumerate() {
        let line = macd_line[i];
        let signal = signal_line[i];
        values.push(IndicatorPoint {
            timestamp: point.timestamp,
            valid: i >= warmup,
            value: IndicatorValue::Macd {
                line,
                signal,
                histogram: line - signal,
            },
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Macd {
            fast,
            slow,
            signal: sign,
        },
        values,
    }
}

/// Extract raw f64 values from the EMA module, using 0.0 for warmup points.
fn ema_raw_values(prices: &[PricePoint], window: usize) -> Vec<f64> {
    let series = calculate_ema(prices, window);
    series
        .values
        .iter()
        .map(|p| match p.value {
            IndicatorValue::Simple(v) => v,
            _ => 0.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn make_points(closes: &[f64]) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                timestamp: start + Duration::days(i as i64),
                close,
            })
            .collect()
    }

    fn ramp(count: usize) -> Vec<PricePoint> {
        make_points(&(0..count).map(|i| 100.0 + i as f64).collect::<Vec<_>>())
    }

    #[test]
    fn macd_warmup_default() {
        let points = ramp(40);
        let series = calculate_macd(&points, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGN);

        let warmup = DEFAULT_SLOW - 1 + DEFAULT_SIGN - 1;
        for i in 0..warmup {
            assert!(!series.values[i].valid, "Index {} should not be valid", i);
        }
        assert!(series.values[warmup].valid, "Index {} should be valid", warmup);
    }

    #[test]
    fn macd_histogram_equals_line_minus_signal() {
        let points = ramp(40);
        let series = calculate_macd(&points, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGN);

        for point in series.values.iter().filter(|p| p.valid) {
            if let IndicatorValue::Macd {
                line,
                signal,
                histogram,
            } = point.value
            {
                assert!((histogram - (line - signal)).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn macd_line_is_ema_fast_minus_ema_slow() {
        let points = make_points(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]);
        let series = calculate_macd(&points, 3, 5, 2);

        let ema_fast = ema_raw_values(&points, 3);
        let ema_slow = ema_raw_values(&points, 5);

        for (i, point) in series.values.iter().enumerate() {
            if let IndicatorValue::Macd { line, .. } = point.value {
                let expected = ema_fast[i] - ema_slow[i];
                assert!(
                    (line - expected).abs() < f64::EPSILON,
                    "MACD line mismatch at index {}",
                    i
                );
            }
        }
    }

    #[test]
    fn macd_empty_prices() {
        let series = calculate_macd(&[], DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGN);
        assert!(series.values.is_empty());
    }

    #[test]
    fn macd_zero_window() {
        let points = make_points(&[100.0, 101.0, 102.0]);

        assert!(calculate_macd(&points, 0, 26, 9).values.is_empty());
        assert!(calculate_macd(&points, 12, 0, 9).values.is_empty());
        assert!(calculate_macd(&points, 12, 26, 0).values.is_empty());
    }

    #[test]
    fn macd_custom_parameters() {
        let points = ramp(20);
        let series = calculate_macd(&points, 5, 10, 3);

        let warmup = 10 - 1 + 3 - 1;
        assert!(!series.values[warmup - 1].valid);
        assert!(series.values[warmup].valid);
    }

    #[test]
    fn macd_shorter_than_warmup() {
        let points = ramp(5);
        let series = calculate_macd(&points, 12, 26, 9);

        assert_eq!(series.values.len(), 5);
        assert!(series.values.iter().all(|p| !p.valid));
    }
}
