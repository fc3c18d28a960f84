//! Bollinger Bands.
//!
//! Middle = SMA over n periods; Upper/Lower = Middle ± mult × StdDev,
//! where StdDev is population standard deviation (divides by N).
//!
//! Default parameters: period=20, mult=2.0.
//! Warm-up: first (period-1) bars are invalid.

use crate::domain::bar::PriceSeries;
use crate::domain::error::RsicrossError;
use crate::domain::indicator::{
    check_period, invalid_point, valid_point, IndicatorKind, IndicatorSeries,
};

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULT: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub upper: IndicatorSeries,
    pub middle: IndicatorSeries,
    pub lower: IndicatorSeries,
}

pub fn calculate_bollinger(
    series: &PriceSeries,
    period: usize,
    mult: f64,
) -> Result<BollingerSeries, RsicrossError> {
    check_period(series, period)?;

    let bars = series.bars();
    let warmup = period - 1;
    let mut upper = Vec::with_capacity(bars.len());
    let mut middle = Vec::with_capacity(bars.len());
    let mut lower = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        let date = bars[i].date;
        if i < warmup {
            upper.push(invalid_point(date));
            middle.push(invalid_point(date));
            lower.push(invalid_point(date));
            continue;
        }

        let window = &bars[i + 1 - period..=i];
        let mean: f64 = window.iter().map(|b| b.close).sum::<f64>() / period as f64;
        let variance: f64 = window
            .iter()
            .map(|b| {
                let diff = b.close - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let stddev = variance.sqrt();

        upper.push(valid_point(date, mean + mult * stddev));
        middle.push(valid_point(date, mean));
        lower.push(valid_point(date, mean - mult * stddev));
    }

    Ok(BollingerSeries {
        upper: IndicatorSeries {
            kind: IndicatorKind::BollingerUpper { period },
            points: upper,
        },
        middle: IndicatorSeries {
            kind: IndicatorKind::BollingerMiddle { period },
            points: middle,
        },
        lower: IndicatorSeries {
            kind: IndicatorKind::BollingerLower { period },
            points: lower,
        },
    })
}

pub fn calculate_bollinger_default(series: &PriceSeries) -> Result<BollingerSeries, RsicrossError> {
    calculate_bollinger(series, DEFAULT_PERIOD, DEFAULT_MULT)
}
