//! Report output port trait.

use crate::domain::engine::BacktestResult;
use crate::domain::error::RsicrossError;

/// Port for writing backtest results in a row-oriented form the surrounding
/// logging/alerting layer can consume.
pub trait ReportPort {
    fn write(&self, code: &str, result: &BacktestResult) -> Result<(), RsicrossError>;
}
