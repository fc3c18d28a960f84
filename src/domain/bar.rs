//! Price bar and validated price series.

use chrono::NaiveDate;

use super::error::RsicrossError;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl PriceBar {
    /// OHLC sanity: non-negative prices, high >= low, high/low bracket open and close.
    fn is_well_formed(&self) -> bool {
        self.open >= 0.0
            && self.low >= 0.0
            && self.volume >= 0
            && self.high >= self.low
            && self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
    }
}

/// An ordered, validated price series. Immutable once constructed; the data
/// layer must supply bars in strict chronological order with no duplicate
/// dates, and construction rejects rather than sorting or deduping.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn from_bars(bars: Vec<PriceBar>) -> Result<Self, RsicrossError> {
        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_well_formed() {
                return Err(RsicrossError::UnorderedSeries {
                    index: i,
                    reason: format!(
                        "malformed bar on {}: O={} H={} L={} C={}",
                        bar.date, bar.open, bar.high, bar.low, bar.close
                    ),
                });
            }
            if i > 0 {
                let prev = &bars[i - 1];
                if bar.date <= prev.date {
                    return Err(RsicrossError::UnorderedSeries {
                        index: i,
                        reason: format!("{} does not follow {}", bar.date, prev.date),
                    });
                }
            }
        }
        Ok(PriceSeries { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PriceBar> {
        self.bars.get(index)
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceBar> {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn from_bars_accepts_ordered() {
        let series =
            PriceSeries::from_bars(vec![make_bar(1, 100.0), make_bar(2, 101.0)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.get(1).unwrap().close, 101.0);
    }

    #[test]
    fn from_bars_accepts_empty() {
        let series = PriceSeries::from_bars(vec![]).unwrap();
        assert!(series.is_empty());
        assert!(series.last().is_none());
    }

    #[test]
    fn from_bars_rejects_duplicate_dates() {
        let result = PriceSeries::from_bars(vec![make_bar(1, 100.0), make_bar(1, 101.0)]);
        assert!(matches!(
            result,
            Err(RsicrossError::UnorderedSeries { index: 1, .. })
        ));
    }

    #[test]
    fn from_bars_rejects_out_of_order() {
        let result = PriceSeries::from_bars(vec![make_bar(2, 100.0), make_bar(1, 101.0)]);
        assert!(matches!(
            result,
            Err(RsicrossError::UnorderedSeries { index: 1, .. })
        ));
    }

    #[test]
    fn from_bars_rejects_high_below_low() {
        let mut bar = make_bar(1, 100.0);
        bar.high = 90.0;
        let result = PriceSeries::from_bars(vec![bar]);
        assert!(matches!(
            result,
            Err(RsicrossError::UnorderedSeries { index: 0, .. })
        ));
    }

    #[test]
    fn from_bars_rejects_close_above_high() {
        let mut bar = make_bar(1, 100.0);
        bar.high = 99.0;
        bar.low = 98.0;
        let result = PriceSeries::from_bars(vec![bar]);
        assert!(result.is_err());
    }

    #[test]
    fn from_bars_rejects_negative_price() {
        let mut bar = make_bar(1, 100.0);
        bar.low = -1.0;
        assert!(PriceSeries::from_bars(vec![bar]).is_err());
    }
}
