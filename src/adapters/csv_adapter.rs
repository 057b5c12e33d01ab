//! CSV file data adapter.
//!
//! Reads per-instrument files named `{symbol}_{interval}.csv`. Exported data
//! varies a lot in header shape, so the close column is located by canonical
//! name after lowercasing: `close`, then a flattened multi-level label like
//! `close_eurusd=x`, then `adj close`.

use crate::domain::error::CrosstraderError;
use crate::domain::price::PricePoint;
use crate::ports::data_port::DataPort;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, interval: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", symbol, interval))
    }

    fn read_file(&self, symbol: &str, interval: &str) -> Result<Vec<PricePoint>, CrosstraderError> {
        let path = self.csv_path(symbol, interval);
        let content = fs::read_to_string(&path).map_err(|e| CrosstraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| CrosstraderError::Data {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

        let timestamp_idx = lowered
            .iter()
            .position(|h| h == "datetime" || h == "date" || h == "timestamp")
            .unwrap_or(0);
        let close_idx = find_close_column(&lowered).ok_or_else(|| CrosstraderError::Data {
            reason: format!("no close column in {}", path.display()),
        })?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| CrosstraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let ts_str = record
                .get(timestamp_idx)
                .ok_or_else(|| CrosstraderError::Data {
                    reason: "missing timestamp column".into(),
                })?;
            let timestamp = parse_timestamp(ts_str).ok_or_else(|| CrosstraderError::Data {
                reason: format!("invalid timestamp '{}'", ts_str),
            })?;

            let close: f64 = record
                .get(close_idx)
                .ok_or_else(|| CrosstraderError::Data {
                    reason: "missing close column".into(),
                })?
                .parse()
                .map_err(|e| CrosstraderError::Data {
                    reason: format!("invalid close value: {}", e),
                })?;

            points.push(PricePoint { timestamp, close });
        }

        // Stable sort keeps the first occurrence of a duplicate timestamp.
        points.sort_by_key(|p| p.timestamp);
        points.dedup_by_key(|p| p.timestamp);

        Ok(points)
    }
}

/// Close-column lookup over lowercased headers.
fn find_close_column(headers: &[String]) -> Option<usize> {
    if let Some(i) = headers.iter().position(|h| h == "close") {
        return Some(i);
    }
    if let Some(i) = headers
        .iter()
        .position(|h| h.starts_with("close_") || h.starts_with("close "))
    {
        return Some(i);
    }
    headers.iter().position(|h| h == "adj close")
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(ts);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Trailing span for a fetch period, relative to the newest row.
fn period_duration(period: &str) -> Option<Duration> {
    match period {
        "1d" => Some(Duration::days(1)),
        "5d" => Some(Duration::days(5)),
        "1mo" => Some(Duration::days(30)),
        "3mo" => Some(Duration::days(90)),
        "6mo" => Some(Duration::days(180)),
        "1y" => Some(Duration::days(365)),
        _ => None,
    }
}

impl DataPort for CsvAdapter {
    fn fetch_closes(
        &self,
        symbol: &str,
        interval: &str,
        period: Option<&str>,
    ) -> Result<Vec<PricePoint>, CrosstraderError> {
        let mut points = self.read_file(symbol, interval)?;

        if let (Some(period), Some(last)) = (period, points.last()) {
            let span = period_duration(period).ok_or_else(|| CrosstraderError::InvalidParameter {
                name: "period".to_string(),
                reason: format!("unknown period '{}'", period),
            })?;
            let cutoff = last.timestamp - span;
            points.retain(|p| p.timestamp >= cutoff);
        }

        Ok(points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, CrosstraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| CrosstraderError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CrosstraderError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            // {symbol}_{interval}.csv
            if let Some(stem) = name_str.strip_suffix(".csv") {
                if let Some((symbol, _interval)) = stem.rsplit_once('_') {
                    symbols.push(symbol.to_string());
                }
            }
        }

        symbols.sort();
        symbols.dedup();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
        interval: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, CrosstraderError> {
        if !self.csv_path(symbol, interval).exists() {
            return Ok(None);
        }
        let points = self.read_file(symbol, interval)?;
        Ok(match (points.first(), points.last()) {
            (Some(first), Some(last)) => {
                Some((first.timestamp, last.timestamp, points.len()))
            }
            _ => None,
        })
    }
}
