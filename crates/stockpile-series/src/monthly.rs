//! Monthly time-series document parsing and queries.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a monthly time-series document.
#[derive(Error, Debug)]
pub enum SeriesError {
    /// Failed to read the document file.
    #[error("Failed to read series file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not valid JSON or is missing required fields.
    #[error("Invalid series document: {0}")]
    Json(#[from] serde_json::Error),

    /// A numeric field could not be parsed.
    #[error("Invalid number in field '{field}': '{value}'")]
    InvalidNumber {
        /// The offending field name.
        field: &'static str,
        /// The unparsable value.
        value: String,
    },
}

/// One monthly price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBar {
    /// Observation date (last trading day of the month).
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Highest price during the month.
    pub high: f64,
    /// Lowest price during the month.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Total volume.
    pub volume: u64,
}

/// Document metadata block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMetaData {
    /// The ticker symbol the series describes.
    pub symbol: String,
    /// Date the provider last refreshed the series.
    pub last_refreshed: NaiveDate,
    /// The provider's reporting time zone.
    pub time_zone: String,
}

/// A parsed monthly time series: metadata plus ascending monthly bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTimeSeries {
    meta: SeriesMetaData,
    bars: Vec<MonthlyBar>,
}

/// Raw provider document with numbered JSON keys.
#[derive(Deserialize)]
struct RawDocument {
    #[serde(rename = "Meta Data")]
    meta: RawMetaData,
    #[serde(rename = "Monthly Time Series", default)]
    series: BTreeMap<NaiveDate, RawBar>,
}

#[derive(Deserialize)]
struct RawMetaData {
    #[serde(rename = "2. Symbol")]
    symbol: String,
    #[serde(rename = "3. Last Refreshed")]
    last_refreshed: NaiveDate,
    #[serde(rename = "4. Time Zone")]
    time_zone: String,
}

#[derive(Deserialize)]
struct RawBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

fn parse_price(field: &'static str, value: &str) -> Result<f64, SeriesError> {
    value.parse().map_err(|_| SeriesError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

impl MonthlyTimeSeries {
    /// Parses a provider document from raw bytes.
    ///
    /// Bars come out in ascending date order regardless of the document's
    /// key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON, is missing
    /// required metadata, or contains unparsable numeric fields.
    pub fn from_slice(document: &[u8]) -> Result<Self, SeriesError> {
        let raw: RawDocument = serde_json::from_slice(document)?;

        let bars = raw
            .series
            .into_iter()
            .map(|(date, bar)| {
                Ok(MonthlyBar {
                    date,
                    open: parse_price("1. open", &bar.open)?,
                    high: parse_price("2. high", &bar.high)?,
                    low: parse_price("3. low", &bar.low)?,
                    close: parse_price("4. close", &bar.close)?,
                    volume: bar.volume.parse().map_err(|_| SeriesError::InvalidNumber {
                        field: "5. volume",
                        value: bar.volume.clone(),
                    })?,
                })
            })
            .collect::<Result<Vec<_>, SeriesError>>()?;

        Ok(Self {
            meta: SeriesMetaData {
                symbol: raw.meta.symbol,
                last_refreshed: raw.meta.last_refreshed,
                time_zone: raw.meta.time_zone,
            },
            bars,
        })
    }

    /// Loads and parses a cached provider document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self, SeriesError> {
        let content = std::fs::read(path).map_err(|e| SeriesError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_slice(&content)
    }

    /// Returns the document metadata.
    #[must_use]
    pub const fn meta(&self) -> &SeriesMetaData {
        &self.meta
    }

    /// Returns the monthly bars in ascending date order.
    #[must_use]
    pub fn bars(&self) -> &[MonthlyBar] {
        &self.bars
    }

    /// Returns the number of monthly observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns true if the series has no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Returns the bar whose date is nearest to the target date.
    ///
    /// Returns `None` only for an empty series. Ties resolve to the
    /// earlier bar.
    #[must_use]
    pub fn nearest(&self, target: NaiveDate) -> Option<&MonthlyBar> {
        self.bars
            .iter()
            .min_by_key(|bar| (bar.date - target).num_days().abs())
    }

    /// Returns the fractional return between the bars nearest to the two
    /// dates, using closing prices.
    ///
    /// Returns `None` if the series is empty or the initial close is
    /// zero.
    #[must_use]
    pub fn period_return(&self, initial: NaiveDate, terminal: NaiveDate) -> Option<f64> {
        let initial_close = self.nearest(initial)?.close;
        let terminal_close = self.nearest(terminal)?.close;

        if initial_close == 0.0 {
            return None;
        }
        Some((terminal_close - initial_close) / initial_close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Meta Data": {
            "1. Information": "Monthly Prices (open, high, low, close) and Volumes",
            "2. Symbol": "AAPL",
            "3. Last Refreshed": "2024-03-28",
            "4. Time Zone": "US/Eastern"
        },
        "Monthly Time Series": {
            "2024-03-28": {
                "1. open": "179.55",
                "2. high": "180.53",
                "3. low": "168.49",
                "4. close": "171.48",
                "5. volume": "1241234567"
            },
            "2024-01-31": {
                "1. open": "187.15",
                "2. high": "196.38",
                "3. low": "180.17",
                "4. close": "184.40",
                "5. volume": "1187034583"
            },
            "2024-02-29": {
                "1. open": "183.99",
                "2. high": "191.05",
                "3. low": "179.25",
                "4. close": "180.75",
                "5. volume": "1161711745"
            }
        }
    }"#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_sample_document() {
        let series = MonthlyTimeSeries::from_slice(SAMPLE.as_bytes()).unwrap();

        assert_eq!(series.meta().symbol, "AAPL");
        assert_eq!(series.meta().last_refreshed, date(2024, 3, 28));
        assert_eq!(series.meta().time_zone, "US/Eastern");
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_bars_are_ascending() {
        let series = MonthlyTimeSeries::from_slice(SAMPLE.as_bytes()).unwrap();
        let dates: Vec<_> = series.bars().iter().map(|b| b.date).collect();

        assert_eq!(
            dates,
            [date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 28)]
        );
        assert!((series.bars()[0].close - 184.40).abs() < 1e-10);
        assert_eq!(series.bars()[0].volume, 1_187_034_583);
    }

    #[test]
    fn test_nearest_exact_and_between() {
        let series = MonthlyTimeSeries::from_slice(SAMPLE.as_bytes()).unwrap();

        let exact = series.nearest(date(2024, 2, 29)).unwrap();
        assert_eq!(exact.date, date(2024, 2, 29));

        let near = series.nearest(date(2024, 3, 10)).unwrap();
        assert_eq!(near.date, date(2024, 2, 29));

        let far_future = series.nearest(date(2030, 1, 1)).unwrap();
        assert_eq!(far_future.date, date(2024, 3, 28));
    }

    #[test]
    fn test_period_return() {
        let series = MonthlyTimeSeries::from_slice(SAMPLE.as_bytes()).unwrap();

        let ret = series
            .period_return(date(2024, 1, 31), date(2024, 3, 28))
            .unwrap();
        let expected = (171.48 - 184.40) / 184.40;
        assert!((ret - expected).abs() < 1e-10);
    }

    #[test]
    fn test_empty_series_queries_return_none() {
        let document = r#"{
            "Meta Data": {
                "2. Symbol": "NEWCO",
                "3. Last Refreshed": "2024-03-28",
                "4. Time Zone": "US/Eastern"
            }
        }"#;
        let series = MonthlyTimeSeries::from_slice(document.as_bytes()).unwrap();

        assert!(series.is_empty());
        assert!(series.nearest(date(2024, 1, 1)).is_none());
        assert!(
            series
                .period_return(date(2024, 1, 1), date(2024, 2, 1))
                .is_none()
        );
    }

    #[test]
    fn test_invalid_price_is_error() {
        let document = SAMPLE.replace("179.55", "n/a");
        assert!(matches!(
            MonthlyTimeSeries::from_slice(document.as_bytes()),
            Err(SeriesError::InvalidNumber {
                field: "1. open",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_meta_is_error() {
        assert!(matches!(
            MonthlyTimeSeries::from_slice(br#"{"Monthly Time Series": {}}"#),
            Err(SeriesError::Json(_))
        ));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("AAPL.monthly-time-series.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let series = MonthlyTimeSeries::from_json_file(&path).unwrap();
        assert_eq!(series.meta().symbol, "AAPL");
    }
}
