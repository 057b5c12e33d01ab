//! Configuration validation.
//!
//! Every field is checked up front so a bad config fails before any data is
//! read.

use crate::domain::error::CrosstraderError;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    validate_data_section(config)?;
    validate_indicator_windows(config)?;
    validate_thresholds(config)?;
    validate_initial_capital(config)?;
    Ok(())
}

fn validate_data_section(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    match config.get_string("data", "csv_dir") {
        Some(s) if !s.trim().is_empty() => {}
        _ => {
            return Err(CrosstraderError::ConfigMissing {
                section: "data".to_string(),
                key: "csv_dir".to_string(),
            });
        }
    }

    match config.get_string("data", "symbol") {
        Some(s) if !s.trim().is_empty() => {}
        _ => {
            return Err(CrosstraderError::ConfigMissing {
                section: "data".to_string(),
                key: "symbol".to_string(),
            });
        }
    }

    if let Some(period) = config.get_string("data", "period") {
        if !VALID_PERIODS.contains(&period.trim()) {
            return Err(CrosstraderError::ConfigInvalid {
                section: "data".to_string(),
                key: "period".to_string(),
                reason: format!("unknown period '{}', expected one of {:?}", period.trim(), VALID_PERIODS),
            });
        }
    }

    Ok(())
}

pub const VALID_PERIODS: [&str; 6] = ["1d", "5d", "1mo", "3mo", "6mo", "1y"];

fn validate_indicator_windows(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    for key in ["ema_window", "macd_fast", "macd_slow", "macd_sign", "rsi_window"] {
        let value = config.get_int("indicators", key, 1);
        if value < 1 {
            return Err(CrosstraderError::ConfigInvalid {
                section: "indicators".to_string(),
                key: key.to_string(),
                reason: format!("{} must be at least 1", key),
            });
        }
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    let overbought = config.get_double("signals", "rsi_overbought", 70.0);
    if !(0.0..=100.0).contains(&overbought) {
        return Err(CrosstraderError::ConfigInvalid {
            section: "signals".to_string(),
            key: "rsi_overbought".to_string(),
            reason: "rsi_overbought must be between 0 and 100".to_string(),
        });
    }

    let oversold = config.get_double("signals", "rsi_oversold", 30.0);
    if !(0.0..=100.0).contains(&oversold) {
        return Err(CrosstraderError::ConfigInvalid {
            section: "signals".to_string(),
            key: "rsi_oversold".to_string(),
            reason: "rsi_oversold must be between 0 and 100".to_string(),
        });
    }

    if oversold >= overbought {
        return Err(CrosstraderError::ConfigInvalid {
            section: "signals".to_string(),
            key: "rsi_oversold".to_string(),
            reason: "rsi_oversold must be below rsi_overbought".to_string(),
        });
    }
    Ok(())
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), CrosstraderError> {
    let value = config.get_double("backtest", "initial_capital", 10_000.0);
    if value <= 0.0 || !value.is_finite() {
        return Err(CrosstraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_capital".to_string(),
            reason: "initial_capital must be positive".to_string(),
        });
    }
    Ok(())
}
