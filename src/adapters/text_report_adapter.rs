//! Plain-text report adapter.
//!
//! Renders the metrics block, the trade log and the trailing signal table as
//! aligned text and writes them to a file.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::CrosstraderError;
use crate::ports::report_port::ReportPort;
use std::fmt::Write as _;
use std::fs;

const SIGNAL_TAIL: usize = 10;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, result: &BacktestResult, symbol: &str) -> String {
        let mut out = String::new();
        let m = &result.metrics;

        let _ = writeln!(out, "Backtest report: {}", symbol);
        let _ = writeln!(out, "{}", "=".repeat(40));
        let _ = writeln!(out);
        let _ = writeln!(out, "Final capital:     {:>14.2}", m.final_capital);
        let _ = writeln!(out, "Total return:      {:>13.2}%", m.total_return_pct);
        let _ = writeln!(out, "Buy and hold:      {:>13.2}%", m.buy_and_hold_pct);
        let _ = writeln!(out, "Round trips:       {:>14}", m.num_round_trips);
        let _ = writeln!(out, "Winning trades:    {:>14}", m.winning_trades);
        let _ = writeln!(out, "Losing trades:     {:>14}", m.losing_trades);
        let _ = writeln!(out, "Win rate:          {:>13.2}%", m.win_rate_pct);
        let _ = writeln!(out);

        let _ = writeln!(out, "Trades");
        let _ = writeln!(out, "{}", "-".repeat(40));
        if result.trades.is_empty() {
            let _ = writeln!(out, "(none)");
        } else {
            for trade in &result.trades {
                let _ = writeln!(
                    out,
                    "{}  {:<4}  {:>12.4}  {:>14.2}",
                    trade.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    trade.kind.to_string(),
                    trade.price,
                    trade.capital
                );
            }
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "Last signals");
        let _ = writeln!(out, "{}", "-".repeat(40));
        let start = result.events.len().saturating_sub(SIGNAL_TAIL);
        if result.events.is_empty() {
            let _ = writeln!(out, "(none)");
        } else {
            for event in &result.events[start..] {
                let _ = writeln!(
                    out,
                    "{}  {:<4}  {:>12.4}",
                    event.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    event.kind.to_string(),
                    event.price
                );
            }
        }

        out
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        symbol: &str,
        output_path: &str,
    ) -> Result<(), CrosstraderError> {
        fs::write(output_path, self.render(result, symbol))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::{run_backtest, BacktestConfig};
    use crate::domain::frame::IndicatorParams;
    use crate::domain::price::PricePoint;
    use crate::domain::signal::SignalThresholds;
    use chrono::{Duration, NaiveDate};
    use std::f64::consts::PI;
    use tempfile::TempDir;

    fn sample_result() -> BacktestResult {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let prices: Vec<PricePoint> = (0..64)
            .map(|i| PricePoint {
                timestamp: start + Duration::hours(i as i64),
                close: 100.0 + 10.0 * (i as f64 * PI / 8.0).sin(),
            })
            .collect();
        let config = BacktestConfig {
            initial_capital: 10_000.0,
            indicators: IndicatorParams {
                ema_window: 3,
                macd_fast: 3,
                macd_slow: 5,
                macd_sign: 2,
                rsi_window: 3,
            },
            thresholds: SignalThresholds::default(),
        };
        run_backtest("PETR4", &prices, &config).unwrap()
    }

    #[test]
    fn render_includes_metrics_and_trades() {
        let result = sample_result();
        let text = TextReportAdapter::new().render(&result, "PETR4");

        assert!(text.contains("Backtest report: PETR4"));
        assert!(text.contains("Final capital:"));
        assert!(text.contains("Win rate:"));
        assert!(text.contains("BUY"));
        assert!(text.contains("SELL"));
    }

    #[test]
    fn render_limits_signal_tail() {
        let result = sample_result();
        let text = TextReportAdapter::new().render(&result, "PETR4");

        let signal_section = text.split("Last signals").nth(1).unwrap();
        let rows = signal_section
            .lines()
            .filter(|l| l.contains("BUY") || l.contains("SELL"))
            .count();
        assert!(rows <= SIGNAL_TAIL);
    }

    #[test]
    fn write_creates_report_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");
        let result = sample_result();

        TextReportAdapter::new()
            .write(&result, "PETR4", path.to_str().unwrap())
            .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("Backtest report: PETR4"));
    }
}
