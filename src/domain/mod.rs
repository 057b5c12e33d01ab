//! Core domain types and logic.

pub mod price;
pub mod indicator;
pub mod frame;
pub mod signal;
pub mod simulator;
pub mod metrics;
pub mod backtest;
pub mod config_validation;
pub mod error;
