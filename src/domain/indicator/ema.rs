//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with the first SMA, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Warm-up: first (n-1) bars are invalid.

use crate::domain::bar::PriceSeries;
use crate::domain::error::RsicrossError;
use crate::domain::indicator::{
    check_period, invalid_point, valid_point, IndicatorKind, IndicatorSeries,
};

pub fn calculate_ema(
    series: &PriceSeries,
    period: usize,
) -> Result<IndicatorSeries, RsicrossError> {
    check_period(series, period)?;

    let bars = series.bars();
    let mut points = Vec::with_capacity(bars.len());
    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i < period - 1 {
            sum += bar.close;
            points.push(invalid_point(bar.date));
        } else if i == period - 1 {
            sum += bar.close;
            ema = sum / period as f64;
            points.push(valid_point(bar.date, ema));
        } else {
            ema = bar.close * k + ema * (1.0 - k);
            points.push(valid_point(bar.date, ema));
        }
    }

    Ok(IndicatorSeries {
        kind: IndicatorKind::Ema(period),
        points,
    })
}
