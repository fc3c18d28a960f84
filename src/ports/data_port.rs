//! Data access port trait.

use crate::domain::bar::PriceSeries;
use crate::domain::error::RsicrossError;
use chrono::NaiveDate;

pub trait DataPort {
    /// Fetch the price series for `code` within the inclusive date range.
    /// Implementations must deliver bars in strict chronological order with
    /// no duplicate dates.
    fn fetch_series(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, RsicrossError>;

    fn list_symbols(&self) -> Result<Vec<String>, RsicrossError>;

    fn get_data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, RsicrossError>;
}
