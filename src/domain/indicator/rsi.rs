//! RSI (Relative Strength Index) indicator.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n points are invalid (need n price changes for the initial average).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price::PricePoint;

pub fn calculate_rsi(prices: &[PricePoint], window: usize) -> IndicatorSeries {
    if window == 0 || prices.len() < 2 {
        let values: Vec<IndicatorPoint> = prices
            .iter()
            .map(|p| IndicatorPoint {
                timestamp: p.timestamp,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            })
            .collect();

        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(window),
            values,
        };
    }

    let mut gains: Vec<f64> = Vec::with_capacity(prices.len() - 1);
    let mut losses: Vec<f64> = Vec::with_capacity(prices.len() - 1);
    for i in 1..prices.len() {
        let change = prices[i].close - prices[i - 1].close;
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let mut values = Vec::with_capacity(prices.len());
    values.push(IndicatorPoint {
        timestamp: prices[0].timestamp,
        valid: false,
        value: IndicatorValue::Simple(0.0),
    });

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for (i, point) in prices.iter().enumerate().skip(1) {
        let change_idx = i - 1;

        if change_idx < window - 1 {
            values.push(IndicatorPoint {
                timestamp: point.timestamp,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            });
            continue;
        }

        if change_idx == window - 1 {
            avg_gain = gains[..window].iter().sum::<f64>() / window as f64;
            avg_loss = losses[..window].iter().sum::<f64>() / window as f64;
        } else {
            avg_gain = (avg_gain * (window - 1) as f64 + gains[change_idx]) / window as f64;
            avg_loss = (avg_loss * (window - 1) as f64 + losses[change_idx]) / window as f64;
        }

        let rsi = if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
        };
        values.push(IndicatorPoint {
            timestamp: point.timestamp,
            valid: true,
            value: IndicatorValue::Simple(rsi),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(window),
        values,
    }
}
