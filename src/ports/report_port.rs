//! Report generation port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::CrosstraderError;

/// Port for writing backtest reports.
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        symbol: &str,
        output_path: &str,
    ) -> Result<(), CrosstraderError>;
}
