//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::backtest::{run_backtest, run_signals, BacktestConfig};
use crate::domain::config_validation::validate_config;
use crate::domain::error::CrosstraderError;
use crate::domain::frame::IndicatorParams;
use crate::domain::signal::SignalThresholds;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "crosstrader", about = "MACD crossover signal generator and backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full signal and trading pipeline
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate signals without trading
    Signals {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for symbol(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            output,
        } => run_backtest_cmd(&config, symbol.as_deref(), output.as_ref()),
        Command::Signals { config, symbol } => run_signals_cmd(&config, symbol.as_deref()),
        Command::Validate { config } => run_validate_cmd(&config),
        Command::Info { config, symbol } => run_info_cmd(&config, symbol.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Data-section settings with CLI overrides applied.
#[derive(Debug)]
pub struct DataSettings {
    pub csv_dir: PathBuf,
    pub symbol: String,
    pub interval: String,
    pub period: Option<String>,
}

pub fn build_data_settings(
    adapter: &dyn ConfigPort,
    symbol_override: Option<&str>,
) -> Result<DataSettings, CrosstraderError> {
    let csv_dir = adapter
        .get_string("data", "csv_dir")
        .ok_or_else(|| CrosstraderError::ConfigMissing {
            section: "data".into(),
            key: "csv_dir".into(),
        })?;

    let symbol = match symbol_override {
        Some(s) => s.to_uppercase(),
        None => adapter
            .get_string("data", "symbol")
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CrosstraderError::ConfigMissing {
                section: "data".into(),
                key: "symbol".into(),
            })?,
    };

    Ok(DataSettings {
        csv_dir: PathBuf::from(csv_dir),
        symbol,
        interval: adapter
            .get_string("data", "interval")
            .unwrap_or_else(|| "1h".to_string()),
        period: adapter.get_string("data", "period"),
    })
}

pub fn build_indicator_params(adapter: &dyn ConfigPort) -> IndicatorParams {
    let defaults = IndicatorParams::default();
    IndicatorParams {
        ema_window: adapter.get_int("indicators", "ema_window", defaults.ema_window as i64)
            as usize,
        macd_fast: adapter.get_int("indicators", "macd_fast", defaults.macd_fast as i64) as usize,
        macd_slow: adapter.get_int("indicators", "macd_slow", defaults.macd_slow as i64) as usize,
        macd_sign: adapter.get_int("indicators", "macd_sign", defaults.macd_sign as i64) as usize,
        rsi_window: adapter.get_int("indicators", "rsi_window", defaults.rsi_window as i64)
            as usize,
    }
}

pub fn build_thresholds(adapter: &dyn ConfigPort) -> SignalThresholds {
    if !adapter.get_bool("signals", "use_rsi", true) {
        return SignalThresholds::disabled();
    }
    let defaults = SignalThresholds::default();
    SignalThresholds {
        rsi_overbought: adapter.get_double("signals", "rsi_overbought", defaults.rsi_overbought),
        rsi_oversold: adapter.get_double("signals", "rsi_oversold", defaults.rsi_oversold),
    }
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> BacktestConfig {
    BacktestConfig {
        initial_capital: adapter.get_double("backtest", "initial_capital", 10_000.0),
        indicators: build_indicator_params(adapter),
        thresholds: build_thresholds(adapter),
    }
}

fn run_backtest_cmd(
    config_path: &PathBuf,
    symbol_override: Option<&str>,
    output_override: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let settings = match build_data_settings(&adapter, symbol_override) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let bt_config = build_backtest_config(&adapter);

    // Stage 2: Fetch price data
    let data_port = CsvAdapter::new(settings.csv_dir.clone());
    eprintln!(
        "Fetching {} ({} bars{})",
        settings.symbol,
        settings.interval,
        settings
            .period
            .as_deref()
            .map(|p| format!(", period {}", p))
            .unwrap_or_default()
    );
    let prices = match data_port.fetch_closes(
        &settings.symbol,
        &settings.interval,
        settings.period.as_deref(),
    ) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("  {} rows loaded", prices.len());

    // Stage 3: Indicators, signals, simulation, metrics
    let result = match run_backtest(&settings.symbol, &prices, &bt_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: Console summary
    let m = &result.metrics;
    eprintln!("\n=== Results: {} ===", settings.symbol);
    eprintln!("Final Capital:    {:.2}", m.final_capital);
    eprintln!("Total Return:     {:.2}%", m.total_return_pct);
    eprintln!("Buy and Hold:     {:.2}%", m.buy_and_hold_pct);
    eprintln!("Round Trips:      {}", m.num_round_trips);
    eprintln!("Win Rate:         {:.1}%", m.win_rate_pct);
    if result.events.is_empty() {
        eprintln!("\nNo signals fired over the selected range.");
    }

    // Stage 5: Report
    let output = match output_override {
        Some(p) => p.display().to_string(),
        None => adapter
            .get_string("report", "output_path")
            .unwrap_or_else(|| "report.txt".to_string()),
    };

    match TextReportAdapter::new().write(&result, &settings.symbol, &output) {
        Ok(()) => {
            eprintln!("\nReport written to: {}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            ExitCode::from(1)
        }
    }
}

fn run_signals_cmd(config_path: &PathBuf, symbol_override: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let settings = match build_data_settings(&adapter, symbol_override) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let indicators = build_indicator_params(&adapter);
    let thresholds = build_thresholds(&adapter);

    let data_port = CsvAdapter::new(settings.csv_dir.clone());
    let prices = match data_port.fetch_closes(
        &settings.symbol,
        &settings.interval,
        settings.period.as_deref(),
    ) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let run = match run_signals(&settings.symbol, &prices, &indicators, &thresholds) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if run.events.is_empty() {
        eprintln!("No signals for {} over {} rows", settings.symbol, prices.len());
        return ExitCode::SUCCESS;
    }

    for event in &run.events {
        println!(
            "{}  {:<4}  {:.4}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S"),
            event.kind.to_string(),
            event.price
        );
    }
    eprintln!("{} signals", run.events.len());
    ExitCode::SUCCESS
}

fn run_validate_cmd(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("Configuration is valid");
    ExitCode::SUCCESS
}

fn run_info_cmd(config_path: &PathBuf, symbol_override: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let csv_dir = match adapter.get_string("data", "csv_dir") {
        Some(d) => PathBuf::from(d),
        None => {
            eprintln!("error: missing config key [data] csv_dir");
            return ExitCode::from(2);
        }
    };
    let interval = adapter
        .get_string("data", "interval")
        .unwrap_or_else(|| "1h".to_string());

    let data_port = CsvAdapter::new(csv_dir);

    let symbols: Vec<String> = match symbol_override {
        Some(s) => vec![s.to_uppercase()],
        None => match adapter.get_string("data", "symbol") {
            Some(s) => vec![s.trim().to_uppercase()],
            None => match data_port.list_symbols() {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            },
        },
    };

    for symbol in &symbols {
        match data_port.get_data_range(symbol, &interval) {
            Ok(Some((first, last, count))) => {
                println!("{}: {} bars, {} to {}", symbol, count, first, last);
            }
            Ok(None) => {
                eprintln!("{}: no data found", symbol);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", symbol, e);
            }
        }
    }
    ExitCode::SUCCESS
}
