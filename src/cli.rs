//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::stub_prediction_adapter::NullPredictionAdapter;
use crate::domain::engine::{run_backtest, BacktestResult};
use crate::domain::error::RsicrossError;
use crate::domain::strategy::{ExecutionConfig, FillModel, StrategyConfig};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "rsicross", about = "RSI + SMA crossover strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the configured symbol list with a single code
        #[arg(long)]
        code: Option<String>,
        /// Directory for report CSVs (overrides [report] output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Resolve and print the strategy without fetching data
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the available data range for configured symbol(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
    },
    /// List symbols present in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            code,
            output,
            dry_run,
        } => run_backtest_command(&config, code.as_deref(), output.as_ref(), dry_run),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, code } => run_info(&config, code.as_deref()),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = RsicrossError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_strategy_config(
    adapter: &dyn ConfigPort,
) -> Result<StrategyConfig, RsicrossError> {
    let defaults = StrategyConfig::default();

    let fill_model = match adapter.get_string("strategy", "fill_model") {
        Some(value) => value
            .parse::<FillModel>()
            .map_err(|reason| RsicrossError::ConfigInvalid {
                section: "strategy".into(),
                key: "fill_model".into(),
                reason,
            })?,
        None => defaults.fill_model,
    };

    let config = StrategyConfig {
        rsi_period: adapter.get_int("strategy", "rsi_period", defaults.rsi_period as i64) as usize,
        sma_short_period: adapter.get_int(
            "strategy",
            "sma_short_period",
            defaults.sma_short_period as i64,
        ) as usize,
        sma_long_period: adapter.get_int(
            "strategy",
            "sma_long_period",
            defaults.sma_long_period as i64,
        ) as usize,
        oversold: adapter.get_double("strategy", "oversold", defaults.oversold),
        overbought: adapter.get_double("strategy", "overbought", defaults.overbought),
        use_ml_filter: adapter.get_bool("strategy", "use_ml_filter", defaults.use_ml_filter),
        fill_model,
    };

    config.validate()?;
    Ok(config)
}

pub fn build_execution_config(
    adapter: &dyn ConfigPort,
) -> Result<ExecutionConfig, RsicrossError> {
    let defaults = ExecutionConfig::default();
    let config = ExecutionConfig {
        quantity: adapter.get_double("execution", "quantity", defaults.quantity),
        fee_per_trade: adapter.get_double("execution", "fee_per_trade", defaults.fee_per_trade),
    };
    config.validate()?;
    Ok(config)
}

fn parse_date(
    adapter: &dyn ConfigPort,
    key: &str,
    default: NaiveDate,
) -> Result<NaiveDate, RsicrossError> {
    match adapter.get_string("data", key) {
        Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|e| {
            RsicrossError::ConfigInvalid {
                section: "data".into(),
                key: key.into(),
                reason: e.to_string(),
            }
        }),
        None => Ok(default),
    }
}

fn resolve_codes(adapter: &FileConfigAdapter, code_override: Option<&str>) -> Vec<String> {
    match code_override {
        Some(code) => vec![code.to_string()],
        None => adapter.get_list("data", "codes"),
    }
}

fn data_adapter(adapter: &FileConfigAdapter) -> Result<CsvAdapter, RsicrossError> {
    let csv_dir =
        adapter
            .get_string("data", "csv_dir")
            .ok_or_else(|| RsicrossError::ConfigMissing {
                section: "data".into(),
                key: "csv_dir".into(),
            })?;
    Ok(CsvAdapter::new(PathBuf::from(csv_dir)))
}

fn describe_strategy(strategy: &StrategyConfig) -> String {
    format!(
        "RSI({}) bands {}/{}, SMA({}/{}) crossover, fill {}, ml filter {}",
        strategy.rsi_period,
        strategy.oversold,
        strategy.overbought,
        strategy.sma_short_period,
        strategy.sma_long_period,
        strategy.fill_model,
        if strategy.use_ml_filter { "on" } else { "off" },
    )
}

fn print_summary(code: &str, result: &BacktestResult) {
    let m = &result.metrics;
    println!(
        "{}: {} trades ({} won, {} lost), win rate {:.1}%, pnl {:.2}, max drawdown {:.2}{}",
        code,
        m.total_trades,
        m.trades_won,
        m.trades_lost,
        m.win_rate * 100.0,
        m.total_pnl,
        m.max_drawdown,
        if m.forced_exits > 0 {
            format!(", {} forced exit(s)", m.forced_exits)
        } else {
            String::new()
        },
    );
}

fn run_backtest_command(
    config_path: &PathBuf,
    code_override: Option<&str>,
    output_override: Option<&PathBuf>,
    dry_run: bool,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let strategy = match build_strategy_config(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let exec = match build_execution_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let codes = resolve_codes(&adapter, code_override);
    if codes.is_empty() {
        eprintln!("error: no codes configured");
        return ExitCode::from(2);
    }

    eprintln!("Strategy: {}", describe_strategy(&strategy));

    if dry_run {
        println!("{}", describe_strategy(&strategy));
        println!("codes: {}", codes.join(", "));
        return ExitCode::SUCCESS;
    }

    let data_port = match data_adapter(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let (start_date, end_date) = match parse_date(&adapter, "start_date", NaiveDate::MIN)
        .and_then(|start| parse_date(&adapter, "end_date", NaiveDate::MAX).map(|end| (start, end)))
    {
        Ok(range) => range,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let output_dir = output_override
        .map(|p| p.to_path_buf())
        .or_else(|| adapter.get_string("report", "output_dir").map(PathBuf::from));
    let report_port = output_dir.as_ref().map(|dir| {
        eprintln!("Reports will be written to {}", dir.display());
        CsvReportAdapter::new(dir.clone())
    });

    // No trained model ships with the CLI; the filter degrades to
    // pass-through via the null classifier.
    let null_predictor = NullPredictionAdapter;

    let mut last_failure: Option<ExitCode> = None;
    let mut succeeded = 0usize;

    for code in &codes {
        eprintln!("Running backtest for {code}...");
        let series = match data_port.fetch_series(code, start_date, end_date) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {code}: {e}");
                last_failure = Some((&e).into());
                continue;
            }
        };

        let result = match run_backtest(&series, &strategy, &exec, Some(&null_predictor)) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {code}: {e}");
                last_failure = Some((&e).into());
                continue;
            }
        };

        print_summary(code, &result);

        if let Some(report) = &report_port {
            if let Err(e) = report.write(code, &result) {
                eprintln!("error: {code}: {e}");
                last_failure = Some((&e).into());
                continue;
            }
        }

        succeeded += 1;
    }

    if succeeded == 0 {
        last_failure.unwrap_or(ExitCode::FAILURE)
    } else {
        ExitCode::SUCCESS
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let strategy = match build_strategy_config(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Err(e) = build_execution_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    println!("ok: {}", describe_strategy(&strategy));
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf, code_override: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let data_port = match data_adapter(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let codes = resolve_codes(&adapter, code_override);
    if codes.is_empty() {
        eprintln!("error: no codes configured");
        return ExitCode::from(2);
    }

    for code in &codes {
        match data_port.get_data_range(code) {
            Ok(Some((start, end, bars))) => {
                println!("{code}: {start} to {end} ({bars} bars)");
            }
            Ok(None) => println!("{code}: no data"),
            Err(e) => {
                eprintln!("error: {code}: {e}");
                return (&e).into();
            }
        }
    }

    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let data_port = match data_adapter(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match data_port.list_symbols() {
        Ok(symbols) => {
            for symbol in symbols {
                println!("{symbol}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
