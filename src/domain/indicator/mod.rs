//! Technical indicator series types.
//!
//! - `IndicatorPoint`: a single point in an indicator time series
//! - `IndicatorKind`: indicator identity + parameters
//! - `IndicatorSeries`: a time series of scalar indicator values, aligned
//!   index-for-index with the price series it was computed from
//!
//! Warm-up entries carry `valid: false`; consumers read values through
//! [`IndicatorSeries::value_at`], which yields `None` for them.

pub mod rsi;
pub mod sma;
pub mod ema;
pub mod macd;
pub mod bollinger;

use chrono::NaiveDate;
use std::fmt;

use super::bar::PriceSeries;
use super::error::RsicrossError;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorKind {
    Rsi(usize),
    Sma(usize),
    Ema(usize),
    VolumeSma(usize),
    PriceChange,
    MacdLine { fast: usize, slow: usize },
    MacdSignal { fast: usize, slow: usize, signal: usize },
    MacdHistogram { fast: usize, slow: usize, signal: usize },
    BollingerUpper { period: usize },
    BollingerMiddle { period: usize },
    BollingerLower { period: usize },
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorKind::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorKind::Sma(period) => write!(f, "SMA({})", period),
            IndicatorKind::Ema(period) => write!(f, "EMA({})", period),
            IndicatorKind::VolumeSma(period) => write!(f, "VOLUME_SMA({})", period),
            IndicatorKind::PriceChange => write!(f, "PRICE_CHANGE"),
            IndicatorKind::MacdLine { fast, slow } => write!(f, "MACD({},{})", fast, slow),
            IndicatorKind::MacdSignal { fast, slow, signal } => {
                write!(f, "MACD_SIGNAL({},{},{})", fast, slow, signal)
            }
            IndicatorKind::MacdHistogram { fast, slow, signal } => {
                write!(f, "MACD_HIST({},{},{})", fast, slow, signal)
            }
            IndicatorKind::BollingerUpper { period } => write!(f, "BB_UPPER({})", period),
            IndicatorKind::BollingerMiddle { period } => write!(f, "BB_MIDDLE({})", period),
            IndicatorKind::BollingerLower { period } => write!(f, "BB_LOWER({})", period),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub kind: IndicatorKind,
    pub points: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Value at `index`, or `None` when out of bounds or inside warm-up.
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.points.get(index).filter(|p| p.valid).map(|p| p.value)
    }
}

pub(crate) fn invalid_point(date: NaiveDate) -> IndicatorPoint {
    IndicatorPoint {
        date,
        valid: false,
        value: 0.0,
    }
}

pub(crate) fn valid_point(date: NaiveDate, value: f64) -> IndicatorPoint {
    IndicatorPoint {
        date,
        valid: true,
        value,
    }
}

/// Guard shared by all period-based indicators: the series must be non-empty
/// and the period must fit inside it.
pub(crate) fn check_period(series: &PriceSeries, period: usize) -> Result<(), RsicrossError> {
    if series.is_empty() {
        return Err(RsicrossError::EmptySeries);
    }
    if period == 0 || period > series.len() {
        return Err(RsicrossError::InvalidPeriod {
            period,
            len: series.len(),
        });
    }
    Ok(())
}

/// Bar-over-bar fractional close change; undefined at index 0.
pub fn price_change(series: &PriceSeries) -> Result<IndicatorSeries, RsicrossError> {
    if series.is_empty() {
        return Err(RsicrossError::EmptySeries);
    }

    let bars = series.bars();
    let mut points = Vec::with_capacity(bars.len());
    points.push(invalid_point(bars[0].date));

    for i in 1..bars.len() {
        let prev = bars[i - 1].close;
        if prev > 0.0 {
            points.push(valid_point(bars[i].date, bars[i].close / prev - 1.0));
        } else {
            points.push(invalid_point(bars[i].date));
        }
    }

    Ok(IndicatorSeries {
        kind: IndicatorKind::PriceChange,
        points,
    })
}
