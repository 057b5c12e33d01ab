//! Price data access port trait.

use crate::domain::error::CrosstraderError;
use crate::domain::price::PricePoint;
use chrono::NaiveDateTime;

pub trait DataPort {
    /// Chronological close series for one symbol at one bar interval,
    /// optionally trimmed to a trailing period such as "6mo".
    fn fetch_closes(
        &self,
        symbol: &str,
        interval: &str,
        period: Option<&str>,
    ) -> Result<Vec<PricePoint>, CrosstraderError>;

    fn list_symbols(&self) -> Result<Vec<String>, CrosstraderError>;

    fn get_data_range(
        &self,
        symbol: &str,
        interval: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, CrosstraderError>;
}
