//! Backtest orchestration: indicators, signals, simulation, metrics.

use crate::domain::error::CrosstraderError;
use crate::domain::frame::{IndicatorFrame, IndicatorParams};
use crate::domain::metrics::{buy_and_hold_curve, capital_curve, CurvePoint, Metrics};
use crate::domain::price::PricePoint;
use crate::domain::signal::{
    generate_signals, signal_events, SignalEvent, SignalFlags, SignalThresholds,
};
use crate::domain::simulator::{simulate, Trade};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub indicators: IndicatorParams,
    pub thresholds: SignalThresholds,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 10_000.0,
            indicators: IndicatorParams::default(),
            thresholds: SignalThresholds::default(),
        }
    }
}

/// Everything a single backtest run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub frame: IndicatorFrame,
    pub flags: Vec<SignalFlags>,
    pub events: Vec<SignalEvent>,
    pub trades: Vec<Trade>,
    pub metrics: Metrics,
    pub capital_curve: Vec<CurvePoint>,
    pub buy_and_hold_curve: Vec<CurvePoint>,
}

/// Signals without the trading stage, for inspection-only runs.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRun {
    pub frame: IndicatorFrame,
    pub flags: Vec<SignalFlags>,
    pub events: Vec<SignalEvent>,
}

/// Full pipeline over a chronological close series.
///
/// Parameter validation happens before any computation, so a bad capital
/// value fails without touching the price data.
pub fn run_backtest(
    symbol: &str,
    prices: &[PricePoint],
    config: &BacktestConfig,
) -> Result<BacktestResult, CrosstraderError> {
    if !(config.initial_capital > 0.0) || !config.initial_capital.is_finite() {
        return Err(CrosstraderError::InvalidParameter {
            name: "initial_capital".to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }

    let frame = IndicatorFrame::build(symbol, prices, &config.indicators)?;
    let flags = generate_signals(symbol, &frame, &config.thresholds)?;
    let events = signal_events(&flags);
    let trades = simulate(&flags, config.initial_capital)?;
    let metrics = Metrics::compute(&trades, &frame.rows, config.initial_capital)?;

    let first_timestamp = frame.rows[0].timestamp;
    let capital_curve = capital_curve(&trades, first_timestamp, config.initial_capital);
    let buy_and_hold_curve = buy_and_hold_curve(&frame.rows, config.initial_capital)?;

    Ok(BacktestResult {
        frame,
        flags,
        events,
        trades,
        metrics,
        capital_curve,
        buy_and_hold_curve,
    })
}

/// Indicator and signal stages only.
pub fn run_signals(
    symbol: &str,
    prices: &[PricePoint],
    indicators: &IndicatorParams,
    thresholds: &SignalThresholds,
) -> Result<SignalRun, CrosstraderError> {
    let frame = IndicatorFrame::build(symbol, prices, indicators)?;
    let flags = generate_signals(symbol, &frame, thresholds)?;
    let events = signal_events(&flags);

    Ok(SignalRun {
        frame,
        flags,
        events,
    })
}
