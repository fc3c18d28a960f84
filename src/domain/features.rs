//! Feature-window assembly for the direction classifier.
//!
//! The window mirrors the feature set the external model is trained on:
//! RSI, MACD line and signal, Bollinger upper/lower bands, volume SMA and
//! bar-over-bar price change. Assembly yields `None` while any constituent
//! is inside its warm-up; callers treat that as "no prediction available".

use super::bar::PriceSeries;
use super::error::RsicrossError;
use super::indicator::bollinger::{calculate_bollinger_default, BollingerSeries};
use super::indicator::macd::{calculate_macd_default, MacdSeries};
use super::indicator::sma::volume_sma;
use super::indicator::{price_change, IndicatorSeries};

pub const VOLUME_SMA_PERIOD: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureWindow {
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
    pub volume_sma: f64,
    pub price_change: f64,
}

impl FeatureWindow {
    /// Flatten to the vector shape a model consumes. Field order is part of
    /// the classifier contract.
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.rsi,
            self.macd,
            self.macd_signal,
            self.bb_upper,
            self.bb_lower,
            self.volume_sma,
            self.price_change,
        ]
    }
}

/// The classifier's feature indicator series, computed once per run.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    macd: MacdSeries,
    bollinger: BollingerSeries,
    volume_sma: IndicatorSeries,
    price_change: IndicatorSeries,
}

impl FeatureSet {
    pub fn compute(series: &PriceSeries) -> Result<Self, RsicrossError> {
        Ok(FeatureSet {
            macd: calculate_macd_default(series)?,
            bollinger: calculate_bollinger_default(series)?,
            volume_sma: volume_sma(series, VOLUME_SMA_PERIOD)?,
            price_change: price_change(series)?,
        })
    }

    /// Assemble the window at `index`, or `None` while any feature (or the
    /// supplied RSI) is still warming up.
    pub fn window_at(&self, index: usize, rsi: &IndicatorSeries) -> Option<FeatureWindow> {
        Some(FeatureWindow {
            rsi: rsi.value_at(index)?,
            macd: self.macd.line.value_at(index)?,
            macd_signal: self.macd.signal.value_at(index)?,
            bb_upper: self.bollinger.upper.value_at(index)?,
            bb_lower: self.bollinger.lower.value_at(index)?,
            volume_sma: self.volume_sma.value_at(index)?,
            price_change: self.price_change.value_at(index)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::PriceBar;
    use crate::domain::indicator::rsi::calculate_rsi;
    use chrono::NaiveDate;

    fn make_series(n: usize) -> PriceSeries {
        let bars = (0..n)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.7).sin() * 10.0;
                PriceBar {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Duration::days(i as i64),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1000 + i as i64,
                }
            })
            .collect();
        PriceSeries::from_bars(bars).unwrap()
    }

    #[test]
    fn window_none_during_warmup() {
        let series = make_series(40);
        let features = FeatureSet::compute(&series).unwrap();
        let rsi = calculate_rsi(&series, 14).unwrap();

        // MACD signal (slowest constituent) is valid from index 33.
        assert!(features.window_at(32, &rsi).is_none());
        assert!(features.window_at(33, &rsi).is_some());
    }

    #[test]
    fn window_fields_match_series() {
        let series = make_series(40);
        let features = FeatureSet::compute(&series).unwrap();
        let rsi = calculate_rsi(&series, 14).unwrap();

        let window = features.window_at(35, &rsi).unwrap();
        assert!((window.rsi - rsi.value_at(35).unwrap()).abs() < f64::EPSILON);
        assert!(
            (window.macd - features.macd.line.value_at(35).unwrap()).abs() < f64::EPSILON
        );
        assert!(window.bb_upper >= window.bb_lower);
    }

    #[test]
    fn window_vector_shape() {
        let series = make_series(40);
        let features = FeatureSet::compute(&series).unwrap();
        let rsi = calculate_rsi(&series, 14).unwrap();

        let window = features.window_at(35, &rsi).unwrap();
        let vec = window.to_vec();
        assert_eq!(vec.len(), 7);
        assert!((vec[0] - window.rsi).abs() < f64::EPSILON);
        assert!((vec[6] - window.price_change).abs() < f64::EPSILON);
    }

    #[test]
    fn compute_fails_on_short_series() {
        let series = make_series(10);
        assert!(FeatureSet::compute(&series).is_err());
    }

    #[test]
    fn window_out_of_bounds_is_none() {
        let series = make_series(40);
        let features = FeatureSet::compute(&series).unwrap();
        let rsi = calculate_rsi(&series, 14).unwrap();
        assert!(features.window_at(40, &rsi).is_none());
    }
}
