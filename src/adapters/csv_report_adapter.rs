//! CSV report adapter.
//!
//! Writes one backtest result as three row-oriented files in an output
//! directory (`<CODE>_trades.csv`, `<CODE>_summary.csv` and
//! `<CODE>_signals.csv`), the shapes the external spreadsheet/alerting
//! layer ingests.

use crate::domain::engine::BacktestResult;
use crate::domain::error::RsicrossError;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::PathBuf;

pub struct CsvReportAdapter {
    output_dir: PathBuf,
}

impl CsvReportAdapter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    fn writer(&self, file_name: &str) -> Result<csv::Writer<fs::File>, RsicrossError> {
        let path = self.output_dir.join(file_name);
        csv::Writer::from_path(&path).map_err(|e| RsicrossError::Data {
            reason: format!("failed to create {}: {}", path.display(), e),
        })
    }

    fn write_trades(&self, code: &str, result: &BacktestResult) -> Result<(), RsicrossError> {
        let mut wtr = self.writer(&format!("{}_trades.csv", code))?;
        wtr.write_record([
            "symbol",
            "entry_date",
            "exit_date",
            "entry_price",
            "exit_price",
            "quantity",
            "fees",
            "pnl",
            "forced_exit",
        ])
        .map_err(csv_error)?;

        for trade in &result.ledger.trades {
            wtr.write_record([
                code.to_string(),
                trade.entry_date.to_string(),
                trade.exit_date.to_string(),
                format!("{:.4}", trade.entry_price),
                format!("{:.4}", trade.exit_price),
                format!("{}", trade.quantity),
                format!("{:.4}", trade.fees),
                format!("{:.4}", trade.pnl),
                trade.forced_exit.to_string(),
            ])
            .map_err(csv_error)?;
        }

        wtr.flush().map_err(RsicrossError::from)
    }

    fn write_summary(&self, code: &str, result: &BacktestResult) -> Result<(), RsicrossError> {
        let metrics = &result.metrics;
        let mut wtr = self.writer(&format!("{}_summary.csv", code))?;
        wtr.write_record([
            "symbol",
            "total_trades",
            "trades_won",
            "trades_lost",
            "win_rate",
            "total_pnl",
            "max_drawdown",
            "avg_win",
            "avg_loss",
            "forced_exits",
        ])
        .map_err(csv_error)?;

        wtr.write_record([
            code.to_string(),
            metrics.total_trades.to_string(),
            metrics.trades_won.to_string(),
            metrics.trades_lost.to_string(),
            format!("{:.4}", metrics.win_rate),
            format!("{:.4}", metrics.total_pnl),
            format!("{:.4}", metrics.max_drawdown),
            format!("{:.4}", metrics.avg_win),
            format!("{:.4}", metrics.avg_loss),
            metrics.forced_exits.to_string(),
        ])
        .map_err(csv_error)?;

        wtr.flush().map_err(RsicrossError::from)
    }

    fn write_signals(&self, code: &str, result: &BacktestResult) -> Result<(), RsicrossError> {
        let mut wtr = self.writer(&format!("{}_signals.csv", code))?;
        wtr.write_record([
            "date",
            "symbol",
            "signal",
            "close",
            "rsi",
            "sma_short",
            "sma_long",
            "prediction",
        ])
        .map_err(csv_error)?;

        for event in &result.signals {
            let prediction = event
                .prediction
                .map(|d| d.to_string())
                .unwrap_or_default();
            wtr.write_record([
                event.date.to_string(),
                code.to_string(),
                event.signal.to_string(),
                format!("{:.4}", event.close),
                format!("{:.2}", event.rsi),
                format!("{:.4}", event.sma_short),
                format!("{:.4}", event.sma_long),
                prediction,
            ])
            .map_err(csv_error)?;
        }

        wtr.flush().map_err(RsicrossError::from)
    }
}

fn csv_error(e: csv::Error) -> RsicrossError {
    RsicrossError::Data {
        reason: format!("CSV write error: {}", e),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, code: &str, result: &BacktestResult) -> Result<(), RsicrossError> {
        self.write_trades(code, result)?;
        self.write_summary(code, result)?;
        self.write_signals(code, result)
    }
}
