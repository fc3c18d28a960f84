//! Strategy and execution configuration.

use std::fmt;
use std::str::FromStr;

use super::error::RsicrossError;

/// When a signal is turned into a fill.
///
/// `CurrentClose` executes at the signal bar's close. `NextOpen` fills at the
/// following bar's open; a signal on the final bar is dropped since no next
/// open exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillModel {
    NextOpen,
    CurrentClose,
}

impl fmt::Display for FillModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillModel::NextOpen => write!(f, "next-open"),
            FillModel::CurrentClose => write!(f, "current-close"),
        }
    }
}

impl FromStr for FillModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next-open" => Ok(FillModel::NextOpen),
            "current-close" => Ok(FillModel::CurrentClose),
            other => Err(format!(
                "unknown fill model '{other}' (expected next-open or current-close)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub rsi_period: usize,
    pub sma_short_period: usize,
    pub sma_long_period: usize,
    pub oversold: f64,
    pub overbought: f64,
    pub use_ml_filter: bool,
    pub fill_model: FillModel,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            rsi_period: 14,
            sma_short_period: 20,
            sma_long_period: 50,
            oversold: 30.0,
            overbought: 70.0,
            use_ml_filter: false,
            fill_model: FillModel::CurrentClose,
        }
    }
}

impl StrategyConfig {
    /// First bar index at which both the current and previous bar have all
    /// required indicator values: RSI is valid from `rsi_period`, the long
    /// SMA from `sma_long_period - 1`, and crossover detection needs the
    /// previous bar too.
    pub fn first_eligible_index(&self) -> usize {
        self.rsi_period.max(self.sma_long_period - 1) + 1
    }

    /// Minimum series length for at least one eligible bar.
    pub fn min_bars(&self) -> usize {
        self.first_eligible_index() + 1
    }

    pub fn validate(&self) -> Result<(), RsicrossError> {
        let invalid = |key: &str, reason: String| RsicrossError::ConfigInvalid {
            section: "strategy".into(),
            key: key.into(),
            reason,
        };

        if self.rsi_period == 0 {
            return Err(invalid("rsi_period", "must be positive".into()));
        }
        if self.sma_short_period == 0 {
            return Err(invalid("sma_short_period", "must be positive".into()));
        }
        if self.sma_short_period >= self.sma_long_period {
            return Err(invalid(
                "sma_short_period",
                format!(
                    "short period {} must be less than long period {}",
                    self.sma_short_period, self.sma_long_period
                ),
            ));
        }
        if !(0.0..=100.0).contains(&self.oversold) || !(0.0..=100.0).contains(&self.overbought) {
            return Err(invalid(
                "oversold",
                "RSI thresholds must lie within [0, 100]".into(),
            ));
        }
        if self.oversold >= self.overbought {
            return Err(invalid(
                "oversold",
                format!(
                    "oversold {} must be below overbought {}",
                    self.oversold, self.overbought
                ),
            ));
        }
        Ok(())
    }
}

/// Fill-side execution parameters. Unit-quantity sizing; a flat fee is paid
/// per side, so a round trip pays it twice.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionConfig {
    pub quantity: f64,
    pub fee_per_trade: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            quantity: 1.0,
            fee_per_trade: 0.0,
        }
    }
}

impl ExecutionConfig {
    pub fn validate(&self) -> Result<(), RsicrossError> {
        let invalid = |key: &str, reason: &str| RsicrossError::ConfigInvalid {
            section: "execution".into(),
            key: key.into(),
            reason: reason.into(),
        };

        if self.quantity <= 0.0 || !self.quantity.is_finite() {
            return Err(invalid("quantity", "must be a positive number"));
        }
        if self.fee_per_trade < 0.0 || !self.fee_per_trade.is_finite() {
            return Err(invalid("fee_per_trade", "must be non-negative"));
        }
        Ok(())
    }
}
