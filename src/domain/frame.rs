//! Indicator frame: the aligned, warm-up-filtered view of a price series.
//!
//! A row exists only for timestamps where EMA, MACD, MACD signal and RSI are
//! all computable; every field is always present. Because each indicator's
//! warm-up is a leading prefix, the surviving rows are a contiguous suffix of
//! the original price series.

use chrono::NaiveDateTime;

use crate::domain::error::CrosstraderError;
use crate::domain::indicator::{
    calculate_ema, calculate_macd, calculate_rsi, IndicatorValue,
};
use crate::domain::price::{is_chronological, PricePoint};

/// Window parameters for the three indicators the strategy uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorParams {
    pub ema_window: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_sign: usize,
    pub rsi_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            ema_window: 9,
            macd_fast: 12,
            macd_slow: 26,
            macd_sign: 9,
            rsi_window: 14,
        }
    }
}

impl IndicatorParams {
    pub fn validate(&self) -> Result<(), CrosstraderError> {
        for (name, value) in [
            ("ema_window", self.ema_window),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_sign", self.macd_sign),
            ("rsi_window", self.rsi_window),
        ] {
            if value == 0 {
                return Err(CrosstraderError::InvalidParameter {
                    name: name.to_string(),
                    reason: "window must be positive".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Number of leading price rows that cannot carry a full indicator set.
    pub fn warmup(&self) -> usize {
        let ema = self.ema_window - 1;
        let macd = self.macd_slow - 1 + self.macd_sign - 1;
        let rsi = self.rsi_window;
        ema.max(macd).max(rsi)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameRow {
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub ema: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub rsi: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub rows: Vec<FrameRow>,
}

impl IndicatorFrame {
    /// Compute all indicators over `prices` and drop rows still in warm-up.
    ///
    /// At least two aligned rows must survive, since a crossover needs a
    /// previous row to compare against.
    pub fn build(
        symbol: &str,
        prices: &[PricePoint],
        params: &IndicatorParams,
    ) -> Result<IndicatorFrame, CrosstraderError> {
        params.validate()?;

        if prices.is_empty() {
            return Err(CrosstraderError::NoData {
                symbol: symbol.to_string(),
            });
        }

        if !is_chronological(prices) {
            return Err(CrosstraderError::InvalidParameter {
                name: "prices".to_string(),
                reason: "timestamps must be strictly increasing".to_string(),
            });
        }

        let minimum = params.warmup() + 2;
        if prices.len() < minimum {
            return Err(CrosstraderError::InsufficientData {
                symbol: symbol.to_string(),
                rows: prices.len(),
                minimum,
            });
        }

        let ema = calculate_ema(prices, params.ema_window);
        let macd = calculate_macd(
            prices,
            params.macd_fast,
            params.macd_slow,
            params.macd_sign,
        );
        let rsi = calculate_rsi(prices, params.rsi_window);

        let mut rows = Vec::with_capacity(prices.len() - params.warmup());
        for (i, point) in prices.iter().enumerate() {
            if !(ema.values[i].valid && macd.values[i].valid && rsi.values[i].valid) {
                continue;
            }

            let ema_value = match ema.values[i].value {
                IndicatorValue::Simple(v) => v,
                _ => continue,
            };
            let rsi_value = match rsi.values[i].value {
                IndicatorValue::Simple(v) => v,
                _ => continue,
            };
            let (line, signal, histogram) = match macd.values[i].value {
                IndicatorValue::Macd {
                    line,
                    signal,
                    histogram,
                } => (line, signal, histogram),
                _ => continue,
            };

            rows.push(FrameRow {
                timestamp: point.timestamp,
                close: point.close,
                ema: ema_value,
                macd: line,
                macd_signal: signal,
                macd_hist: histogram,
                rsi: rsi_value,
            });
        }

        if rows.len() < 2 {
            return Err(CrosstraderError::InsufficientData {
                symbol: symbol.to_string(),
                rows: rows.len(),
                minimum: 2,
            });
        }

        Ok(IndicatorFrame { rows })
    }
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
                timestamp: start + Duration::hours(i as i64),
                close,
            })
            .collect()
    }

    fn small_params() -> IndicatorParams {
        IndicatorParams {
            ema_window: 3,
            macd_fast: 3,
            macd_slow: 5,
            macd_sign: 2,
            rsi_window: 3,
        }
    }

    fn wavy(count: usize) -> Vec<PricePoint> {
        make_points(
            &(0..count)
                .map(|i| 100.0 + ((i as f64 % 7.0) - 3.0) * 2.0)
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn default_params_match_strategy_defaults() {
        let p = IndicatorParams::default();
        assert_eq!(p.ema_window, 9);
        assert_eq!(p.macd_fast, 12);
        assert_eq!(p.macd_slow, 26);
        assert_eq!(p.macd_sign, 9);
        assert_eq!(p.rsi_window, 14);
    }

    #[test]
    fn warmup_is_largest_of_the_three() {
        let p = IndicatorParams::default();
        // EMA: 8, MACD: 25 + 8 = 33, RSI: 14
        assert_eq!(p.warmup(), 33);

        let p = IndicatorParams {
            ema_window: 50,
            ..IndicatorParams::default()
        };
        assert_eq!(p.warmup(), 49);
    }

    #[test]
    fn zero_window_rejected() {
        let params = IndicatorParams {
            rsi_window: 0,
            ..small_params()
        };
        let result = IndicatorFrame::build("TEST", &wavy(30), &params);
        assert!(matches!(
            result,
            Err(CrosstraderError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn empty_prices_is_no_data() {
        let result = IndicatorFrame::build("TEST", &[], &small_params());
        assert!(matches!(result, Err(CrosstraderError::NoData { .. })));
    }

    #[test]
    fn short_series_is_insufficient_data() {
        let result = IndicatorFrame::build("TEST", &wavy(4), &small_params());
        match result {
            Err(CrosstraderError::InsufficientData { rows, minimum, .. }) => {
                assert_eq!(rows, 4);
                assert!(minimum > 4);
            }
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn out_of_order_prices_rejected() {
        let mut prices = wavy(30);
        prices.swap(10, 11);
        let result = IndicatorFrame::build("TEST", &prices, &small_params());
        assert!(matches!(
            result,
            Err(CrosstraderError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn frame_is_suffix_of_price_series() {
        let prices = wavy(30);
        let params = small_params();
        let frame = IndicatorFrame::build("TEST", &prices, &params).unwrap();

        let dropped = prices.len() - frame.rows.len();
        assert_eq!(dropped, params.warmup());
        for (row, point) in frame.rows.iter().zip(&prices[dropped..]) {
            assert_eq!(row.timestamp, point.timestamp);
            assert!((row.close - point.close).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn frame_rows_are_fully_populated() {
        let frame = IndicatorFrame::build("TEST", &wavy(30), &small_params()).unwrap();
        for row in &frame.rows {
            assert!(row.rsi.is_finite() && (0.0..=100.0).contains(&row.rsi));
            assert!(row.ema.is_finite());
            assert!((row.macd_hist - (row.macd - row.macd_signal)).abs() < 1e-9);
        }
    }

    #[test]
    fn frame_timestamps_strictly_increasing() {
        let frame = IndicatorFrame::build("TEST", &wavy(40), &small_params()).unwrap();
        for w in frame.rows.windows(2) {
            assert!(w[0].timestamp < w[1].timestamp);
        }
    }
}
