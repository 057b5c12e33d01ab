//! Signal generation: MACD crossover with RSI confirmation.
//!
//! Buy at row t iff the MACD line crosses above the signal line
//! (MACD[t] > Signal[t] and MACD[t-1] <= Signal[t-1]) and RSI[t] is below the
//! overbought threshold. Sell is the mirror image against the oversold
//! threshold. The first row has no t-1 and never fires. An exact tie between
//! MACD and signal is not a trigger for the current row but satisfies the
//! previous-row condition for the next one.

use chrono::NaiveDateTime;
use std::fmt;

use crate::domain::error::CrosstraderError;
use crate::domain::frame::IndicatorFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Buy,
    Sell,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Buy => write!(f, "BUY"),
            SignalKind::Sell => write!(f, "SELL"),
        }
    }
}

/// Per-row signal booleans, aligned one-to-one with the frame rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalFlags {
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub is_buy: bool,
    pub is_sell: bool,
}

/// A fired signal, for tabular display.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    pub timestamp: NaiveDateTime,
    pub kind: SignalKind,
    pub price: f64,
}

/// RSI confirmation bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalThresholds {
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        SignalThresholds {
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
        }
    }
}

impl SignalThresholds {
    /// Thresholds that never suppress a crossover (the MACD-only variant).
    pub fn disabled() -> Self {
        SignalThresholds {
            rsi_overbought: f64::INFINITY,
            rsi_oversold: f64::NEG_INFINITY,
        }
    }
}

/// Derive buy/sell flags for every frame row. Pure; no lookahead.
pub fn generate_signals(
    symbol: &str,
    frame: &IndicatorFrame,
    thresholds: &SignalThresholds,
) -> Result<Vec<SignalFlags>, CrosstraderError> {
    if frame.rows.len() < 2 {
        return Err(CrosstraderError::InsufficientData {
            symbol: symbol.to_string(),
            rows: frame.rows.len(),
            minimum: 2,
        });
    }

    let mut flags = Vec::with_capacity(frame.rows.len());
    for (i, row) in frame.rows.iter().enumerate() {
        let (is_buy, is_sell) = if i == 0 {
            (false, false)
        } else {
            let prev = &frame.rows[i - 1];
            let crossed_above = row.macd > row.macd_signal && prev.macd <= prev.macd_signal;
            let crossed_below = row.macd < row.macd_signal && prev.macd >= prev.macd_signal;
            (
                crossed_above && row.rsi < thresholds.rsi_overbought,
                crossed_below && row.rsi > thresholds.rsi_oversold,
            )
        };

        flags.push(SignalFlags {
            timestamp: row.timestamp,
            close: row.close,
            is_buy,
            is_sell,
        });
    }

    Ok(flags)
}

/// Collapse the flag series into the fired events, in timestamp order.
pub fn signal_events(flags: &[SignalFlags]) -> Vec<SignalEvent> {
    let mut events = Vec::new();
    for flag in flags {
        if flag.is_buy {
            events.push(SignalEvent {
                timestamp: flag.timestamp,
                kind: SignalKind::Buy,
                price: flag.close,
            });
        }
        if flag.is_sell {
            events.push(SignalEvent {
                timestamp: flag.timestamp,
                kind: SignalKind::Sell,
                price: flag.close,
            });
        }
    }
    events
}
