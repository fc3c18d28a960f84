//! Simple Moving Average over closes, and its volume counterpart.
//!
//! Warm-up: first (period-1) bars are invalid.

use crate::domain::bar::{PriceBar, PriceSeries};
use crate::domain::error::RsicrossError;
use crate::domain::indicator::{
    check_period, invalid_point, valid_point, IndicatorKind, IndicatorPoint, IndicatorSeries,
};

pub fn calculate_sma(
    series: &PriceSeries,
    period: usize,
) -> Result<IndicatorSeries, RsicrossError> {
    check_period(series, period)?;
    Ok(IndicatorSeries {
        kind: IndicatorKind::Sma(period),
        points: rolling_mean(series, period, |b| b.close),
    })
}

/// SMA over volume, used as a classifier feature input.
pub fn volume_sma(series: &PriceSeries, period: usize) -> Result<IndicatorSeries, RsicrossError> {
    check_period(series, period)?;
    Ok(IndicatorSeries {
        kind: IndicatorKind::VolumeSma(period),
        points: rolling_mean(series, period, |b| b.volume as f64),
    })
}

fn rolling_mean(
    series: &PriceSeries,
    period: usize,
    field: impl Fn(&PriceBar) -> f64,
) -> Vec<IndicatorPoint> {
    let bars = series.bars();
    let mut points = Vec::with_capacity(bars.len());
    let mut sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        sum += field(bar);
        if i >= period {
            sum -= field(&bars[i - period]);
        }
        if i + 1 >= period {
            points.push(valid_point(bar.date, sum / period as f64));
        } else {
            points.push(invalid_point(bar.date));
        }
    }

    points
}
