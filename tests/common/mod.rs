#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use crosstrader::domain::backtest::BacktestConfig;
use crosstrader::domain::error::CrosstraderError;
use crosstrader::domain::frame::IndicatorParams;
pub use crosstrader::domain::price::PricePoint;
use crosstrader::domain::signal::SignalThresholds;
use crosstrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_closes(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_closes(
        &self,
        symbol: &str,
        _interval: &str,
        _period: Option<&str>,
    ) -> Result<Vec<PricePoint>, CrosstraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(CrosstraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, CrosstraderError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
        _interval: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, CrosstraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(CrosstraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).and_then(|points| {
            match (points.first(), points.last()) {
                (Some(f), Some(l)) => Some((f.timestamp, l.timestamp, points.len())),
                _ => None,
            }
        }))
    }
}

pub fn start_ts() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn make_points(closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            timestamp: start_ts() + Duration::hours(i as i64),
            close,
        })
        .collect()
}

/// Oscillating series that produces repeated crossovers.
pub fn sine_series(count: usize) -> Vec<PricePoint> {
    make_points(
        &(0..count)
            .map(|i| 100.0 + 10.0 * (i as f64 * std::f64::consts::PI / 8.0).sin())
            .collect::<Vec<_>>(),
    )
}

/// Strictly rising series: no crossovers after warm-up.
pub fn rising_series(count: usize) -> Vec<PricePoint> {
    make_points(&(0..count).map(|i| 100.0 + i as f64).collect::<Vec<_>>())
}

pub fn small_params() -> IndicatorParams {
    IndicatorParams {
        ema_window: 3,
        macd_fast: 3,
        macd_slow: 5,
        macd_sign: 2,
        rsi_window: 3,
    }
}

pub fn small_config() -> BacktestConfig {
    BacktestConfig {
        initial_capital: 10_000.0,
        indicators: small_params(),
        thresholds: SignalThresholds::default(),
    }
}
