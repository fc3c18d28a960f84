//! Backtest pipeline: price series → indicators → signals → ledger → metrics.
//!
//! Each stage is a pure transformation over the ordered series; the only
//! stateful step is the simulator, which consumes bars strictly in
//! chronological order. Input and configuration errors abort before any
//! simulation; warm-up skips and classifier degradation are logged and the
//! run continues.

use chrono::NaiveDate;
use log::{debug, warn};

use super::analytics::Metrics;
use super::bar::PriceSeries;
use super::error::RsicrossError;
use super::features::FeatureSet;
use super::indicator::rsi::calculate_rsi;
use super::indicator::sma::calculate_sma;
use super::indicator::IndicatorSeries;
use super::ledger::TradeLedger;
use super::signal::{compose_signal, Direction, IndicatorSnapshot, Signal};
use super::simulator::Simulator;
use super::strategy::{ExecutionConfig, StrategyConfig};
use crate::ports::prediction_port::PredictionPort;

/// One row of the per-bar decision trace, shaped for the external
/// logging/alerting layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    pub date: NaiveDate,
    pub signal: Signal,
    pub close: f64,
    pub rsi: f64,
    pub sma_short: f64,
    pub sma_long: f64,
    pub prediction: Option<Direction>,
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub signals: Vec<SignalEvent>,
    pub ledger: TradeLedger,
    pub metrics: Metrics,
}

pub fn run_backtest(
    series: &PriceSeries,
    strategy: &StrategyConfig,
    exec: &ExecutionConfig,
    predictor: Option<&dyn PredictionPort>,
) -> Result<BacktestResult, RsicrossError> {
    strategy.validate()?;
    exec.validate()?;

    if series.is_empty() {
        return Err(RsicrossError::EmptySeries);
    }
    if series.len() < strategy.min_bars() {
        return Err(RsicrossError::InsufficientData {
            have: series.len(),
            need: strategy.min_bars(),
        });
    }

    let rsi = calculate_rsi(series, strategy.rsi_period)?;
    let sma_short = calculate_sma(series, strategy.sma_short_period)?;
    let sma_long = calculate_sma(series, strategy.sma_long_period)?;

    // Classifier features are best-effort: a series too short for them (or a
    // missing classifier) degrades to pure rule-based signaling.
    let features = if strategy.use_ml_filter {
        match predictor {
            None => {
                warn!("ml filter enabled but no classifier wired; running rule-based only");
                None
            }
            Some(_) => match FeatureSet::compute(series) {
                Ok(set) => Some(set),
                Err(e) => {
                    warn!("ml filter disabled for this run: {e}");
                    None
                }
            },
        }
    } else {
        None
    };

    let mut simulator = Simulator::new(exec, strategy.fill_model);
    let mut signals = Vec::new();

    for index in 1..series.len() {
        let current = snapshot_at(index, &rsi, &sma_short, &sma_long);
        let previous = snapshot_at(index - 1, &rsi, &sma_short, &sma_long);

        let prediction = features
            .as_ref()
            .zip(predictor)
            .map(|(set, port)| predict_at(set, port, index, &rsi));

        match compose_signal(index, &current, &previous, prediction, strategy) {
            Ok(signal) => {
                // The composer has already established these are valid.
                let bar = &series.bars()[index];
                signals.push(SignalEvent {
                    date: bar.date,
                    signal,
                    close: bar.close,
                    rsi: rsi.points[index].value,
                    sma_short: sma_short.points[index].value,
                    sma_long: sma_long.points[index].value,
                    prediction,
                });
                simulator.on_bar(index, bar, signal);
            }
            Err(RsicrossError::IndexOutOfRange { index }) => {
                debug!("bar {index} skipped: indicators inside warm-up window");
            }
            Err(other) => return Err(other),
        }
    }

    let ledger = simulator.finish(series);
    let metrics = Metrics::aggregate(&ledger);

    Ok(BacktestResult {
        signals,
        ledger,
        metrics,
    })
}

fn snapshot_at(
    index: usize,
    rsi: &IndicatorSeries,
    sma_short: &IndicatorSeries,
    sma_long: &IndicatorSeries,
) -> IndicatorSnapshot {
    IndicatorSnapshot {
        rsi: rsi.value_at(index),
        sma_short: sma_short.value_at(index),
        sma_long: sma_long.value_at(index),
    }
}

/// Consult the classifier at `index`. A window still inside its own warm-up
/// yields `Unknown`, which composes as "no filter".
fn predict_at(
    features: &FeatureSet,
    port: &dyn PredictionPort,
    index: usize,
    rsi: &IndicatorSeries,
) -> Direction {
    match features.window_at(index, rsi) {
        Some(window) => port.predict_direction(&window),
        None => Direction::Unknown,
    }
}
