//! Single-position trade simulation.
//!
//! A two-state machine over the signal series: Flat (no holdings) or Long
//! (fully invested). A Buy flag while Flat invests all capital at that row's
//! close; a Sell flag while Long liquidates. Repeated Buys while Long and
//! Sells while Flat are no-ops. A run that ends Long is force-closed at the
//! final row so every Buy has a matching Sell.
//!
//! Output is a pure function of (signal series, initial capital): no
//! randomness, no shared state between runs.

use chrono::NaiveDateTime;
use std::fmt;

use crate::domain::error::CrosstraderError;
use crate::domain::signal::SignalFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKind {
    Buy,
    Sell,
}

impl fmt::Display for TradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeKind::Buy => write!(f, "BUY"),
            TradeKind::Sell => write!(f, "SELL"),
        }
    }
}

/// One realized trade.
///
/// `capital` is the pre-trade capital snapshot on a Buy and the realized
/// proceeds on a Sell. Win/loss classification downstream compares these two
/// numbers per round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub kind: TradeKind,
    pub price: f64,
    pub timestamp: NaiveDateTime,
    pub capital: f64,
}

/// Mutable per-run state. One instance per backtest, discarded afterwards.
#[derive(Debug)]
struct SimulationState {
    capital: f64,
    position: f64,
    open: bool,
}

impl SimulationState {
    fn new(initial_capital: f64) -> Self {
        SimulationState {
            capital: initial_capital,
            position: 0.0,
            open: false,
        }
    }

    /// Flat -> Long. Capital stays as the pre-trade snapshot for the record.
    fn enter(&mut self, price: f64, timestamp: NaiveDateTime, trades: &mut Vec<Trade>) {
        self.position = self.capital / price;
        self.open = true;
        trades.push(Trade {
            kind: TradeKind::Buy,
            price,
            timestamp,
            capital: self.capital,
        });
    }

    /// Long -> Flat. Capital becomes the liquidation proceeds.
    fn exit(&mut self, price: f64, timestamp: NaiveDateTime, trades: &mut Vec<Trade>) {
        self.capital = self.position * price;
        self.position = 0.0;
        self.open = false;
        trades.push(Trade {
            kind: TradeKind::Sell,
            price,
            timestamp,
            capital: self.capital,
        });
    }
}

/// Run the state machine over the signal series in chronological order.
pub fn simulate(
    flags: &[SignalFlags],
    initial_capital: f64,
) -> Result<Vec<Trade>, CrosstraderError> {
    if !(initial_capital > 0.0) || !initial_capital.is_finite() {
        return Err(CrosstraderError::InvalidParameter {
            name: "initial_capital".to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }

    let mut state = SimulationState::new(initial_capital);
    let mut trades = Vec::new();

    for flag in flags {
        if !state.open && flag.is_buy {
            state.enter(flag.close, flag.timestamp, &mut trades);
        } else if state.open && flag.is_sell {
            state.exit(flag.close, flag.timestamp, &mut trades);
        }
    }

    // Force-close so the run always ends Flat.
    if state.open {
        if let Some(last) = flags.last() {
            state.exit(last.close, last.timestamp, &mut trades);
        }
    }

    Ok(trades)
}
