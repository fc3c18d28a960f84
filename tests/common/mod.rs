#![allow(dead_code)]

use chrono::NaiveDate;
use rsicross::domain::bar::{PriceBar, PriceSeries};
use rsicross::domain::error::RsicrossError;
use rsicross::domain::features::FeatureWindow;
use rsicross::domain::signal::Direction;
use rsicross::domain::strategy::StrategyConfig;
use rsicross::ports::data_port::DataPort;
use rsicross::ports::prediction_port::PredictionPort;
use std::collections::HashMap;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(day_offset: i64, close: f64) -> PriceBar {
    PriceBar {
        date: date(2024, 1, 1) + chrono::Duration::days(day_offset),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000 + day_offset,
    }
}

pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(i as i64, close))
        .collect();
    PriceSeries::from_bars(bars).unwrap()
}

/// Small-period strategy for hand-engineered scenarios.
pub fn small_strategy() -> StrategyConfig {
    StrategyConfig {
        rsi_period: 3,
        sma_short_period: 2,
        sma_long_period: 3,
        ..StrategyConfig::default()
    }
}

/// Decline into an up-crossover at bar 7 (RSI rising out of oversold),
/// rally into a down-crossover at bar 11 (RSI falling out of overbought),
/// then drift lower. With `small_strategy` this yields exactly one round
/// trip spanning bars 7 to 11.
pub fn crossover_closes() -> Vec<f64> {
    vec![
        100.0, 98.0, 96.0, 94.0, 92.0, 90.0, 89.0, 95.0, 101.0, 103.0, 104.0, 101.0, 99.0, 98.0,
    ]
}

/// A 41-bar decline-then-rally: long enough for the default classifier
/// feature stack, with a single up-crossover at bar 37 and no exit signal,
/// so a run without the ml filter ends in a forced exit.
pub fn long_rally_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..37).map(|i| 100.0 - i as f64).collect();
    closes.extend([72.0, 80.0, 88.0, 96.0]);
    closes
}

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, RsicrossError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(RsicrossError::Data {
                reason: reason.clone(),
            });
        }
        let bars = self
            .data
            .get(code)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect();
        PriceSeries::from_bars(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, RsicrossError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, RsicrossError> {
        match self.data.get(code) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

/// Classifier stub that records how often it was consulted.
pub struct CountingPredictor {
    pub direction: Direction,
    pub calls: std::cell::Cell<usize>,
}

impl CountingPredictor {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            calls: std::cell::Cell::new(0),
        }
    }
}

impl PredictionPort for CountingPredictor {
    fn predict_direction(&self, _window: &FeatureWindow) -> Direction {
        self.calls.set(self.calls.get() + 1);
        self.direction
    }
}
