//! CSV file data adapter.
//!
//! Reads `<CODE>.csv` files with `date,open,high,low,close,volume` columns
//! from a base directory. Rows are sorted by date before series
//! construction; duplicate dates are rejected by the series itself.

use crate::domain::bar::{PriceBar, PriceSeries};
use crate::domain::error::RsicrossError;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }

    fn read_bars(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, RsicrossError> {
        let path = self.csv_path(code);
        let mut rdr = csv::Reader::from_path(&path).map_err(|e| RsicrossError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| RsicrossError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let field = |idx: usize, name: &str| {
                record
                    .get(idx)
                    .ok_or_else(|| RsicrossError::Data {
                        reason: format!("missing {} column in {}", name, path.display()),
                    })
                    .map(str::trim)
            };

            let date = NaiveDate::parse_from_str(field(0, "date")?, "%Y-%m-%d").map_err(|e| {
                RsicrossError::Data {
                    reason: format!("invalid date in {}: {}", path.display(), e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            let number = |idx: usize, name: &str| -> Result<f64, RsicrossError> {
                field(idx, name)?.parse().map_err(|e| RsicrossError::Data {
                    reason: format!("invalid {} value in {}: {}", name, path.display(), e),
                })
            };

            let volume: i64 =
                field(5, "volume")?
                    .parse()
                    .map_err(|e| RsicrossError::Data {
                        reason: format!("invalid volume value in {}: {}", path.display(), e),
                    })?;

            bars.push(PriceBar {
                date,
                open: number(1, "open")?,
                high: number(2, "high")?,
                low: number(3, "low")?,
                close: number(4, "close")?,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_series(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, RsicrossError> {
        let bars = self.read_bars(code, start_date, end_date)?;
        PriceSeries::from_bars(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, RsicrossError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| RsicrossError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RsicrossError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(code) = name.strip_suffix(".csv") {
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, RsicrossError> {
        let bars = self.read_bars(code, NaiveDate::MIN, NaiveDate::MAX)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, code: &str, rows: &[&str]) {
        let path = dir.path().join(format!("{}.csv", code));
        let mut file = fs::File::create(path).unwrap();
        writeln!(file, "date,open,high,low,close,volume").unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fetch_series_reads_bars() {
        let dir = TempDir::new().unwrap();
        write_csv(
            &dir,
            "RELIANCE",
            &[
                "2024-01-01,100.0,105.0,99.0,104.0,5000",
                "2024-01-02,104.0,108.0,103.0,107.0,6000",
            ],
        );

        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let series = adapter
            .fetch_series("RELIANCE", date(2024, 1, 1), date(2024, 1, 31))
            .unwrap();

        assert_eq!(series.len(), 2);
        let bar = series.get(1).unwrap();
        assert_eq!(bar.date, date(2024, 1, 2));
        assert!((bar.close - 107.0).abs() < f64::EPSILON);
        assert_eq!(bar.volume, 6000);
    }

    #[test]
    fn fetch_series_filters_date_range() {
        let dir = TempDir::new().unwrap();
        write_csv(
            &dir,
            "TCS",
            &[
                "2024-01-01,100.0,101.0,99.0,100.0,1000",
                "2024-02-01,100.0,101.0,99.0,100.0,1000",
                "2024-03-01,100.0,101.0,99.0,100.0,1000",
            ],
        );

        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let series = adapter
            .fetch_series("TCS", date(2024, 2, 1), date(2024, 2, 28))
            .unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.get(0).unwrap().date, date(2024, 2, 1));
    }

    #[test]
    fn fetch_series_sorts_unordered_rows() {
        let dir = TempDir::new().unwrap();
        write_csv(
            &dir,
            "SBIN",
            &[
                "2024-01-02,104.0,108.0,103.0,107.0,6000",
                "2024-01-01,100.0,105.0,99.0,104.0,5000",
            ],
        );

        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let series = adapter
            .fetch_series("SBIN", date(2024, 1, 1), date(2024, 1, 31))
            .unwrap();

        assert_eq!(series.get(0).unwrap().date, date(2024, 1, 1));
    }

    #[test]
    fn fetch_series_rejects_duplicate_dates() {
        let dir = TempDir::new().unwrap();
        write_csv(
            &dir,
            "LICI",
            &[
                "2024-01-01,100.0,105.0,99.0,104.0,5000",
                "2024-01-01,104.0,108.0,103.0,107.0,6000",
            ],
        );

        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let result = adapter.fetch_series("LICI", date(2024, 1, 1), date(2024, 1, 31));
        assert!(matches!(
            result,
            Err(RsicrossError::UnorderedSeries { .. })
        ));
    }

    #[test]
    fn fetch_series_missing_file_is_data_error() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let result = adapter.fetch_series("NOPE", date(2024, 1, 1), date(2024, 1, 31));
        assert!(matches!(result, Err(RsicrossError::Data { .. })));
    }

    #[test]
    fn fetch_series_bad_number_is_data_error() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "BAD", &["2024-01-01,abc,105.0,99.0,104.0,5000"]);

        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let result = adapter.fetch_series("BAD", date(2024, 1, 1), date(2024, 1, 31));
        assert!(matches!(result, Err(RsicrossError::Data { .. })));
    }

    #[test]
    fn list_symbols_finds_csv_files() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "RELIANCE", &["2024-01-01,100.0,101.0,99.0,100.0,1"]);
        write_csv(&dir, "TCS", &["2024-01-01,100.0,101.0,99.0,100.0,1"]);

        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let symbols = adapter.list_symbols().unwrap();
        assert_eq!(symbols, vec!["RELIANCE".to_string(), "TCS".to_string()]);
    }

    #[test]
    fn get_data_range_reports_span() {
        let dir = TempDir::new().unwrap();
        write_csv(
            &dir,
            "HDFCBANK",
            &[
                "2024-01-01,100.0,101.0,99.0,100.0,1000",
                "2024-01-05,100.0,101.0,99.0,100.0,1000",
                "2024-01-09,100.0,101.0,99.0,100.0,1000",
            ],
        );

        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let range = adapter.get_data_range("HDFCBANK").unwrap();
        assert_eq!(range, Some((date(2024, 1, 1), date(2024, 1, 9), 3)));
    }

    #[test]
    fn get_data_range_empty_file_is_none() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "EMPTY", &[]);

        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        assert_eq!(adapter.get_data_range("EMPTY").unwrap(), None);
    }
}
