//! Performance metrics over the trade log.
//!
//! Buy-and-hold comparisons run over the same warm-up-filtered price range as
//! the backtest itself, so the baseline and the strategy see identical data.

use chrono::NaiveDateTime;

use crate::domain::error::CrosstraderError;
use crate::domain::frame::FrameRow;
use crate::domain::simulator::{Trade, TradeKind};

/// Summary statistics for one run.
///
/// A round trip is a win iff the Sell's recorded capital exceeds the Buy's
/// recorded pre-trade snapshot; this comparison basis is kept as observed in
/// the system this replaces rather than recomputed from per-trade P&L.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub final_capital: f64,
    pub total_return_pct: f64,
    pub buy_and_hold_pct: f64,
    pub num_round_trips: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurvePoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl Metrics {
    pub fn compute(
        trades: &[Trade],
        rows: &[FrameRow],
        initial_capital: f64,
    ) -> Result<Metrics, CrosstraderError> {
        if !(initial_capital > 0.0) {
            return Err(CrosstraderError::InvalidParameter {
                name: "initial_capital".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        let (first, last) = match (rows.first(), rows.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => {
                return Err(CrosstraderError::InvalidParameter {
                    name: "prices".to_string(),
                    reason: "empty price range".to_string(),
                });
            }
        };
        if first.close == 0.0 {
            return Err(CrosstraderError::InvalidParameter {
                name: "prices".to_string(),
                reason: "first price is zero".to_string(),
            });
        }

        let final_capital = trades
            .iter()
            .rev()
            .find(|t| t.kind == TradeKind::Sell)
            .map(|t| t.capital)
            .unwrap_or(initial_capital);

        let total_return_pct = (final_capital - initial_capital) / initial_capital * 100.0;
        let buy_and_hold_pct = (last.close - first.close) / first.close * 100.0;

        let buys: Vec<&Trade> = trades.iter().filter(|t| t.kind == TradeKind::Buy).collect();
        let sells: Vec<&Trade> = trades.iter().filter(|t| t.kind == TradeKind::Sell).collect();
        let num_round_trips = buys.len();

        let winning_trades = buys
            .iter()
            .zip(&sells)
            .filter(|(buy, sell)| sell.capital > buy.capital)
            .count();
        let losing_trades = num_round_trips - winning_trades;

        let win_rate_pct = if num_round_trips > 0 {
            winning_trades as f64 / num_round_trips as f64 * 100.0
        } else {
            0.0
        };

        Ok(Metrics {
            final_capital,
            total_return_pct,
            buy_and_hold_pct,
            num_round_trips,
            winning_trades,
            losing_trades,
            win_rate_pct,
        })
    }
}

/// Capital over time: the starting point plus one point per Sell (including
/// the forced close).
pub fn capital_curve(
    trades: &[Trade],
    first_timestamp: NaiveDateTime,
    initial_capital: f64,
) -> Vec<CurvePoint> {
    let mut curve = vec![CurvePoint {
        timestamp: first_timestamp,
        value: initial_capital,
    }];
    for trade in trades.iter().filter(|t| t.kind == TradeKind::Sell) {
        curve.push(CurvePoint {
            timestamp: trade.timestamp,
            value: trade.capital,
        });
    }
    curve
}

/// Buy-and-hold baseline: initial capital scaled by price relative to the
/// first close, one point per timestamp in range.
pub fn buy_and_hold_curve(
    rows: &[FrameRow],
    initial_capital: f64,
) -> Result<Vec<CurvePoint>, CrosstraderError> {
    let first = match rows.first() {
        Some(f) => f,
        None => return Ok(Vec::new()),
    };
    if first.close == 0.0 {
        return Err(CrosstraderError::InvalidParameter {
            name: "prices".to_string(),
            reason: "first price is zero".to_string(),
        });
    }

    Ok(rows
        .iter()
        .map(|row| CurvePoint {
            timestamp: row.timestamp,
            value: row.close / first.close * initial_capital,
        })
        .collect())
}
