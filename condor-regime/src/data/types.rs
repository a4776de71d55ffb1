//! Core data types for the indicator engine.
//!
//! Bars and proxy points are validated on construction, so everything
//! downstream can rely on price ordering and strictly increasing dates.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Invalid bar on {date}: {reason}")]
    InvalidBar { date: NaiveDate, reason: String },

    #[error("Dates out of order: {previous} followed by {next}")]
    OutOfOrder { previous: NaiveDate, next: NaiveDate },

    #[error("Invalid volatility proxy value on {date}: {value}")]
    InvalidProxyValue { date: NaiveDate, value: f64 },
}

pub type DataResult<T> = Result<T, DataError>;

/// A single daily OHLC bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bar {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: Option<i64>,
}

impl Bar {
    /// Create a bar, rejecting non-finite prices and broken OHLC ordering.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> DataResult<Self> {
        let invalid = |reason: &str| DataError::InvalidBar {
            date,
            reason: reason.to_string(),
        };

        if ![open, high, low, close].iter().all(|p| p.is_finite()) {
            return Err(invalid("non-finite price"));
        }
        if low > high {
            return Err(invalid("low above high"));
        }
        if open < low || open > high {
            return Err(invalid("open outside low..high"));
        }
        if close < low || close > high {
            return Err(invalid("close outside low..high"));
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume: None,
        })
    }

    pub fn with_volume(mut self, volume: i64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn open(&self) -> f64 {
        self.open
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn close(&self) -> f64 {
        self.close
    }

    pub fn volume(&self) -> Option<i64> {
        self.volume
    }
}

/// Ordered daily bars for one instrument.
///
/// Every derived indicator series is index-aligned to `bars()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    instrument: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series, requiring strictly increasing dates.
    pub fn new(instrument: impl Into<String>, bars: Vec<Bar>) -> DataResult<Self> {
        ensure_increasing(bars.iter().map(Bar::date))?;
        Ok(Self {
            instrument: instrument.into(),
            bars,
        })
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(Bar::date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(Bar::close).collect()
    }
}

/// One observation of the implied-volatility proxy, in percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProxyPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Volatility index levels (e.g. VIX) keyed by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityProxySeries {
    instrument: String,
    points: Vec<ProxyPoint>,
}

impl VolatilityProxySeries {
    /// Build a proxy series. Values must be finite and non-negative.
    pub fn new(instrument: impl Into<String>, points: Vec<ProxyPoint>) -> DataResult<Self> {
        if let Some(bad) = points.iter().find(|p| !p.value.is_finite() || p.value < 0.0) {
            return Err(DataError::InvalidProxyValue {
                date: bad.date,
                value: bad.value,
            });
        }
        ensure_increasing(points.iter().map(|p| p.date))?;
        Ok(Self {
            instrument: instrument.into(),
            points,
        })
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn points(&self) -> &[ProxyPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Proxy level on an exact date, if one was published.
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.points[idx].value)
    }
}

fn ensure_increasing(dates: impl Iterator<Item = NaiveDate>) -> DataResult<()> {
    let mut previous: Option<NaiveDate> = None;
    for date in dates {
        if let Some(prev) = previous {
            if date <= prev {
                return Err(DataError::OutOfOrder {
                    previous: prev,
                    next: date,
                });
            }
        }
        previous = Some(date);
    }
    Ok(())
}
