//! CSV loader for daily bars and volatility index levels.
//!
//! Files live in a flat data directory, one file per instrument
//! (`{data_dir}/{instrument}.csv`). Both Yahoo-style headers
//! (`Date,Open,High,Low,Close,Adj Close,Volume`) and lowercase headers
//! (`date,open,high,low,close,volume`) are accepted. Rows with a missing
//! price are skipped, matching how the data providers publish holidays.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use super::types::{Bar, BarSeries, DataError, ProxyPoint, VolatilityProxySeries};

const DATE_COLUMNS: &[&str] = &["date", "Date", "timestamp", "Datetime"];
const OPEN_COLUMNS: &[&str] = &["open", "Open"];
const HIGH_COLUMNS: &[&str] = &["high", "High"];
const LOW_COLUMNS: &[&str] = &["low", "Low"];
const CLOSE_COLUMNS: &[&str] = &["close", "Close"];
const VOLUME_COLUMNS: &[&str] = &["volume", "Volume"];
const PROXY_VALUE_COLUMNS: &[&str] = &["close", "Close", "value", "Value"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("Missing column, expected one of {0:?}")]
    MissingColumn(Vec<String>),

    #[error("Invalid date at row {row}: {value}")]
    InvalidDate { row: usize, value: String },

    #[error("Invalid data: {0}")]
    Data(#[from] DataError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LoaderResult<T> = Result<T, LoaderError>;

/// CSV data loader for bar and proxy files.
pub struct DataLoader {
    data_dir: PathBuf,
}

impl DataLoader {
    /// Create a loader pointing at a directory of `{instrument}.csv` files.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path of an instrument's CSV file.
    pub fn csv_path(&self, instrument: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", instrument))
    }

    /// List instruments with a CSV file in the data directory, sorted.
    pub fn available_instruments(&self) -> LoaderResult<Vec<String>> {
        if !self.data_dir.exists() {
            return Ok(vec![]);
        }

        let mut instruments = Vec::new();
        for entry in std::fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if let Some(instrument) = name.strip_suffix(".csv") {
                instruments.push(instrument.to_string());
            }
        }
        instruments.sort();
        Ok(instruments)
    }

    /// Load the bar series for an instrument from the data directory.
    pub fn load_bars(&self, instrument: &str) -> LoaderResult<BarSeries> {
        load_bars_from(&self.csv_path(instrument), instrument)
    }

    /// Load a volatility proxy series from the data directory.
    pub fn load_proxy(&self, instrument: &str) -> LoaderResult<VolatilityProxySeries> {
        load_proxy_from(&self.csv_path(instrument), instrument)
    }
}

/// Load a bar series from an explicit CSV path.
pub fn load_bars_from(path: &Path, instrument: &str) -> LoaderResult<BarSeries> {
    let df = read_csv(path)?;

    let dates = date_column(&df)?;
    let open = f64_column(&df, OPEN_COLUMNS)?;
    let high = f64_column(&df, HIGH_COLUMNS)?;
    let low = f64_column(&df, LOW_COLUMNS)?;
    let close = f64_column(&df, CLOSE_COLUMNS)?;
    let volume = match resolve_column(&df, VOLUME_COLUMNS) {
        Ok(name) => {
            let col = df.column(&name)?.cast(&DataType::Int64)?;
            let values: Vec<Option<i64>> = col.i64()?.into_iter().collect();
            values
        }
        Err(_) => vec![None; df.height()],
    };

    let mut bars = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for (row, date) in dates.into_iter().enumerate() {
        match (open[row], high[row], low[row], close[row]) {
            (Some(o), Some(h), Some(l), Some(c)) => {
                let bar = Bar::new(date, o, h, l, c)?;
                bars.push(match volume[row] {
                    Some(v) => bar.with_volume(v),
                    None => bar,
                });
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("{}: skipped {} rows with missing prices", instrument, skipped);
    }
    debug!("{}: loaded {} bars from {}", instrument, bars.len(), path.display());

    Ok(BarSeries::new(instrument, bars)?)
}

/// Load a volatility proxy series from an explicit CSV path.
pub fn load_proxy_from(path: &Path, instrument: &str) -> LoaderResult<VolatilityProxySeries> {
    let df = read_csv(path)?;

    let dates = date_column(&df)?;
    let values = f64_column(&df, PROXY_VALUE_COLUMNS)?;

    let points: Vec<ProxyPoint> = dates
        .into_iter()
        .zip(values)
        .filter_map(|(date, value)| value.map(|value| ProxyPoint { date, value }))
        .collect();

    debug!("{}: loaded {} proxy points from {}", instrument, points.len(), path.display());

    Ok(VolatilityProxySeries::new(instrument, points)?)
}

fn read_csv(path: &Path) -> LoaderResult<DataFrame> {
    if !path.exists() {
        return Err(LoaderError::FileNotFound(path.display().to_string()));
    }
    let df = LazyCsvReader::new(path).with_has_header(true).finish()?.collect()?;
    Ok(df)
}

fn resolve_column(df: &DataFrame, candidates: &[&str]) -> LoaderResult<String> {
    candidates
        .iter()
        .find(|name| df.column(name).is_ok())
        .map(|name| name.to_string())
        .ok_or_else(|| {
            LoaderError::MissingColumn(candidates.iter().map(|s| s.to_string()).collect())
        })
}

fn f64_column(df: &DataFrame, candidates: &[&str]) -> LoaderResult<Vec<Option<f64>>> {
    let name = resolve_column(df, candidates)?;
    let col = df.column(&name)?.cast(&DataType::Float64)?;
    let values: Vec<Option<f64>> = col.f64()?.into_iter().collect();
    Ok(values)
}

fn date_column(df: &DataFrame) -> LoaderResult<Vec<NaiveDate>> {
    let name = resolve_column(df, DATE_COLUMNS)?;
    let col = df.column(&name)?.cast(&DataType::String)?;

    let mut dates = Vec::with_capacity(df.height());
    for (row, value) in col.str()?.into_iter().enumerate() {
        let raw = value.unwrap_or_default();
        dates.push(parse_date(raw).ok_or_else(|| LoaderError::InvalidDate {
            row,
            value: raw.to_string(),
        })?);
    }
    Ok(dates)
}

/// Parse the leading `YYYY-MM-DD` of a date or datetime string.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(parse_date("2024-03-01"), expected);
        assert_eq!(parse_date("2024-03-01 00:00:00+05:30"), expected);
        assert_eq!(parse_date("01/03/2024"), None);
    }

    #[test]
    fn test_load_yahoo_style_bars() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "NSEI.csv",
            "Date,Open,High,Low,Close,Adj Close,Volume\n\
             2024-01-02,100,102,99,101,101,1000\n\
             2024-01-03,101,103,100,102,102,1100\n\
             2024-01-04,102,104,101,103,103,\n",
        );

        let loader = DataLoader::new(dir.path());
        let series = loader.load_bars("NSEI").unwrap();

        assert_eq!(series.instrument(), "NSEI");
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![101.0, 102.0, 103.0]);
        assert_eq!(series.bars()[0].volume(), Some(1000));
        assert_eq!(series.bars()[2].volume(), None);
    }

    #[test]
    fn test_rows_with_missing_prices_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "spx.csv",
            "date,open,high,low,close\n\
             2024-01-02,100,102,99,101\n\
             2024-01-03,,,,\n\
             2024-01-04,102,104,101,103\n",
        );

        let series = load_bars_from(&dir.path().join("spx.csv"), "spx").unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_invalid_bar_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "bad.csv",
            "date,open,high,low,close\n2024-01-02,100,98,99,101\n",
        );

        let result = load_bars_from(&dir.path().join("bad.csv"), "bad");
        assert!(matches!(
            result,
            Err(LoaderError::Data(DataError::InvalidBar { .. }))
        ));
    }

    #[test]
    fn test_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "x.csv", "date,open,high,low\n2024-01-02,1,2,0.5\n");

        let result = load_bars_from(&dir.path().join("x.csv"), "x");
        assert!(matches!(result, Err(LoaderError::MissingColumn(_))));
    }

    #[test]
    fn test_missing_file() {
        let loader = DataLoader::new("/nonexistent/condor-regime");
        assert!(matches!(
            loader.load_bars("SPX"),
            Err(LoaderError::FileNotFound(_))
        ));
        assert!(loader.available_instruments().unwrap().is_empty());
    }

    #[test]
    fn test_load_proxy_and_list_instruments() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "INDIAVIX.csv",
            "Date,Open,High,Low,Close\n\
             2024-01-02,14,15,13.5,14.2\n\
             2024-01-03,14.2,14.8,13.9,14.5\n",
        );
        write(dir.path(), "NSEI.csv", "date,open,high,low,close\n");

        let loader = DataLoader::new(dir.path());
        let proxy = loader.load_proxy("INDIAVIX").unwrap();
        assert_eq!(proxy.len(), 2);
        assert_eq!(
            proxy.value_on(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()),
            Some(14.5)
        );

        assert_eq!(
            loader.available_instruments().unwrap(),
            vec!["INDIAVIX".to_string(), "NSEI".to_string()]
        );
    }
}
