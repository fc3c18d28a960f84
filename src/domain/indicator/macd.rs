//! MACD (Moving Average Convergence Divergence).
//!
//! Line = EMA(fast) - EMA(slow)
//! Signal = EMA(signal) of the line, seeded with its first SMA
//! Histogram = Line - Signal
//!
//! Default parameters: fast=12, slow=26, signal=9.
//! Line is valid from max(fast, slow)-1; signal and histogram from
//! max(fast, slow)-1 + signal-1. A series too short for the signal line
//! yields all-invalid signal points rather than an error.

use crate::domain::bar::PriceSeries;
use crate::domain::error::RsicrossError;
use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::{
    check_period, invalid_point, valid_point, IndicatorKind, IndicatorSeries,
};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

pub fn calculate_macd(
    series: &PriceSeries,
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Result<MacdSeries, RsicrossError> {
    check_period(series, fast)?;
    check_period(series, slow)?;
    if signal_period == 0 {
        return Err(RsicrossError::InvalidPeriod {
            period: signal_period,
            len: series.len(),
        });
    }

    let bars = series.bars();
    let ema_fast = calculate_ema(series, fast)?;
    let ema_slow = calculate_ema(series, slow)?;
    let line_warmup = fast.max(slow) - 1;

    let mut line_points = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        match (ema_fast.value_at(i), ema_slow.value_at(i)) {
            (Some(f), Some(s)) => line_points.push(valid_point(bar.date, f - s)),
            _ => line_points.push(invalid_point(bar.date)),
        }
    }

    // Signal line: EMA over the MACD line values, starting where the line
    // becomes valid.
    let k = 2.0 / (signal_period as f64 + 1.0);
    let mut signal_points = Vec::with_capacity(bars.len());
    let mut histogram_points = Vec::with_capacity(bars.len());
    let signal_warmup = line_warmup + signal_period - 1;
    let mut signal_ema = 0.0;
    let mut seed_sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i < line_warmup {
            signal_points.push(invalid_point(bar.date));
            histogram_points.push(invalid_point(bar.date));
            continue;
        }

        let line = line_points[i].value;
        if i < signal_warmup {
            seed_sum += line;
            signal_points.push(invalid_point(bar.date));
            histogram_points.push(invalid_point(bar.date));
        } else if i == signal_warmup {
            seed_sum += line;
            signal_ema = seed_sum / signal_period as f64;
            signal_points.push(valid_point(bar.date, signal_ema));
            histogram_points.push(valid_point(bar.date, line - signal_ema));
        } else {
            signal_ema = line * k + signal_ema * (1.0 - k);
            signal_points.push(valid_point(bar.date, signal_ema));
            histogram_points.push(valid_point(bar.date, line - signal_ema));
        }
    }

    Ok(MacdSeries {
        line: IndicatorSeries {
            kind: IndicatorKind::MacdLine { fast, slow },
            points: line_points,
        },
        signal: IndicatorSeries {
            kind: IndicatorKind::MacdSignal {
                fast,
                slow,
                signal: signal_period,
            },
            points: signal_points,
        },
        histogram: IndicatorSeries {
            kind: IndicatorKind::MacdHistogram {
                fast,
                slow,
                signal: signal_period,
            },
            points: histogram_points,
        },
    })
}

pub fn calculate_macd_default(series: &PriceSeries) -> Result<MacdSeries, RsicrossError> {
    calculate_macd(series, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
