//! Signal composition: moving-average crossover gated by RSI bands, with an
//! optional direction-classifier veto.
//!
//! # Semantics
//!
//! - BUY candidate: short SMA crosses above long SMA between the previous and
//!   current bar (`short[i-1] <= long[i-1] && short[i] > long[i]`) AND RSI is
//!   below the oversold threshold or rising out of it.
//! - SELL candidate: the symmetric downward crossover AND RSI above the
//!   overbought threshold or falling out of it.
//! - A supplied prediction acts as a filter, never an originator: `Down`
//!   vetoes a BUY, `Up` vetoes a SELL, `Unknown` passes through.
//! - If both candidates fire at once (impossible with disjoint bands,
//!   handled anyway), HOLD wins.
//!
//! Composition only reads values at `index` and `index - 1`; no look-ahead.

use std::fmt;

use super::error::RsicrossError;
use super::strategy::StrategyConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

/// Output of a direction classifier. `Unknown` means "no filter" and must
/// never be treated as `Down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Unknown,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
            Direction::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Indicator values for one bar, as read from the computed series; `None`
/// marks a warm-up entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
}

pub fn compose_signal(
    index: usize,
    current: &IndicatorSnapshot,
    previous: &IndicatorSnapshot,
    prediction: Option<Direction>,
    config: &StrategyConfig,
) -> Result<Signal, RsicrossError> {
    let rsi = current.rsi.ok_or(RsicrossError::IndexOutOfRange { index })?;
    let rsi_prev = previous.rsi.ok_or(RsicrossError::IndexOutOfRange { index })?;
    let short = current
        .sma_short
        .ok_or(RsicrossError::IndexOutOfRange { index })?;
    let short_prev = previous
        .sma_short
        .ok_or(RsicrossError::IndexOutOfRange { index })?;
    let long = current
        .sma_long
        .ok_or(RsicrossError::IndexOutOfRange { index })?;
    let long_prev = previous
        .sma_long
        .ok_or(RsicrossError::IndexOutOfRange { index })?;

    let crossed_up = short_prev <= long_prev && short > long;
    let crossed_down = short_prev >= long_prev && short < long;

    let rsi_buy_ok = rsi < config.oversold || (rsi_prev < config.oversold && rsi > rsi_prev);
    let rsi_sell_ok =
        rsi > config.overbought || (rsi_prev > config.overbought && rsi < rsi_prev);

    let buy = crossed_up && rsi_buy_ok;
    let sell = crossed_down && rsi_sell_ok;

    let candidate = match (buy, sell) {
        (true, true) => Signal::Hold,
        (true, false) => Signal::Buy,
        (false, true) => Signal::Sell,
        (false, false) => Signal::Hold,
    };

    Ok(match (candidate, prediction) {
        (Signal::Buy, Some(Direction::Down)) => Signal::Hold,
        (Signal::Sell, Some(Direction::Up)) => Signal::Hold,
        (signal, _) => signal,
    })
}
