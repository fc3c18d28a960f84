//! RSI (Relative Strength Index).
//!
//! Uses Wilder's smoothing for average gain/loss:
//! - Seed: simple mean of gains/losses over the first `period` price changes
//! - Thereafter: avg = (prev_avg * (period-1) + current) / period
//!
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss)); 100 when avg_loss == 0.
//!
//! Warm-up: the seed needs `period` price changes, so the first valid value
//! is at bar index `period`.

use crate::domain::bar::PriceSeries;
use crate::domain::error::RsicrossError;
use crate::domain::indicator::{
    check_period, invalid_point, valid_point, IndicatorKind, IndicatorSeries,
};

pub fn calculate_rsi(
    series: &PriceSeries,
    period: usize,
) -> Result<IndicatorSeries, RsicrossError> {
    check_period(series, period)?;

    let bars = series.bars();
    let mut points = Vec::with_capacity(bars.len());
    points.push(invalid_point(bars[0].date));

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..bars.len() {
        let change = bars[i].close - bars[i - 1].close;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if i < period {
            // Accumulate the seed window.
            avg_gain += gain;
            avg_loss += loss;
            points.push(invalid_point(bars[i].date));
        } else if i == period {
            avg_gain = (avg_gain + gain) / period as f64;
            avg_loss = (avg_loss + loss) / period as f64;
            points.push(valid_point(bars[i].date, rsi_value(avg_gain, avg_loss)));
        } else {
            avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
            avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
            points.push(valid_point(bars[i].date, rsi_value(avg_gain, avg_loss)));
        }
    }

    Ok(IndicatorSeries {
        kind: IndicatorKind::Rsi(period),
        points,
    })
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::PriceBar;
    use chrono::NaiveDate;

    fn make_series(closes: &[f64]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect();
        PriceSeries::from_bars(bars).unwrap()
    }

    #[test]
    fn rsi_empty_series() {
        let series = make_series(&[]);
        assert!(matches!(
            calculate_rsi(&series, 14),
            Err(RsicrossError::EmptySeries)
        ));
    }

    #[test]
    fn rsi_zero_period() {
        let series = make_series(&[100.0, 101.0]);
        assert!(matches!(
            calculate_rsi(&series, 0),
            Err(RsicrossError::InvalidPeriod { period: 0, len: 2 })
        ));
    }

    #[test]
    fn rsi_period_longer_than_series() {
        let series = make_series(&[100.0, 101.0, 102.0]);
        assert!(matches!(
            calculate_rsi(&series, 14),
            Err(RsicrossError::InvalidPeriod { period: 14, len: 3 })
        ));
    }

    #[test]
    fn rsi_warmup_window() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + (i as f64 % 5.0) * 2.0).collect();
        let series = make_series(&closes);
        let rsi = calculate_rsi(&series, 14).unwrap();

        assert_eq!(rsi.len(), 15);
        for i in 0..14 {
            assert_eq!(rsi.value_at(i), None, "index {} should be in warm-up", i);
        }
        assert!(rsi.value_at(14).is_some());
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let series = make_series(&closes);
        let rsi = calculate_rsi(&series, 14).unwrap();

        assert!((rsi.value_at(14).unwrap() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let series = make_series(&closes);
        let rsi = calculate_rsi(&series, 14).unwrap();

        assert!((rsi.value_at(14).unwrap() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_within_bounds() {
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect();
        let series = make_series(&closes);
        let rsi = calculate_rsi(&series, 14).unwrap();

        for i in 0..rsi.len() {
            if let Some(v) = rsi.value_at(i) {
                assert!((0.0..=100.0).contains(&v), "RSI {} out of range", v);
            }
        }
    }

    #[test]
    fn rsi_wilder_smoothing_step() {
        // period 2: seed at index 2 from the first two changes, then smooth.
        let series = make_series(&[100.0, 102.0, 101.0, 103.0]);
        let rsi = calculate_rsi(&series, 2).unwrap();

        // Seed: avg_gain = (2+0)/2 = 1, avg_loss = (0+1)/2 = 0.5
        let seed = 100.0 - 100.0 / (1.0 + 1.0 / 0.5);
        assert!((rsi.value_at(2).unwrap() - seed).abs() < 1e-9);

        // Next: avg_gain = (1*1 + 2)/2 = 1.5, avg_loss = (0.5*1 + 0)/2 = 0.25
        let next = 100.0 - 100.0 / (1.0 + 1.5 / 0.25);
        assert!((rsi.value_at(3).unwrap() - next).abs() < 1e-9);
    }

    #[test]
    fn rsi_kind() {
        let series = make_series(&[100.0, 101.0, 102.0]);
        let rsi = calculate_rsi(&series, 2).unwrap();
        assert_eq!(rsi.kind, IndicatorKind::Rsi(2));
    }
}
