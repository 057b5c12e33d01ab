//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with first SMA, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) points are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price::PricePoint;

pub fn calculate_ema(prices: &[PricePoint], window: usize) -> IndicatorSeries {
    if window == 0 || prices.is_empty() {
        return IndicatorSeries {
            indicator_type: IndicatorType::Ema(window),
            values: Vec::new(),
        };
    }

    let mut values = Vec::with_capacity(prices.len());
    let k = 2.0 / (window as f64 + 1.0);
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (i, point) in prices.iter().enumerate() {
        if i < window - 1 {
            sum += point.close;
            values.push(IndicatorPoint {
                timestamp: point.timestamp,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            });
        } else if i == window - 1 {
            sum += point.close;
            ema = sum / window as f64;
            values.push(IndicatorPoint {
                timestamp: point.timestamp,
                valid: true,
                value: IndicatorValue::Simple(ema),
            });
        } else {
            ema = point.close * k + ema * (1.0 - k);
            values.push(IndicatorPoint {
                timestamp: point.timestamp,
                valid: true,
                value: IndicatorValue::Simple(ema),
            });
        }
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(window),
        values,
    }
}
