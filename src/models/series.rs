use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One sampling day of search interest.
///
/// `interest` is `None` where the provider reported no data for the day;
/// missing is never collapsed to zero. `pct_change` is populated by
/// `analysis::derive_interest_pct_change` and stays `None` until then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestPoint {
    pub date: NaiveDate,
    pub interest: Option<f64>,
    pub pct_change: Option<f64>,
}

impl InterestPoint {
    pub fn new(date: NaiveDate, interest: Option<f64>) -> Self {
        Self {
            date,
            interest,
            pct_change: None,
        }
    }
}

/// Search-interest time series for one term, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchInterestSeries {
    pub term: String,
    pub points: Vec<InterestPoint>,
}

impl SearchInterestSeries {
    pub fn new(term: impl Into<String>, mut points: Vec<InterestPoint>) -> Self {
        points.sort_by(|a, b| a.date.cmp(&b.date));
        points.dedup_by(|a, b| a.date == b.date);
        Self {
            term: term.into(),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Interest values in date order, missing samples preserved as `None`.
    pub fn interest_values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.interest).collect()
    }
}

/// One trading day of OHLCV data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Daily OHLCV series for one ticker, ascending by date.
///
/// Holds one bar per trading day the provider actually returned; weekends and
/// holidays are simply absent, never synthesized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvSeries {
    pub ticker: String,
    pub bars: Vec<OhlcvBar>,
}

impl OhlcvSeries {
    pub fn new(ticker: impl Into<String>, mut bars: Vec<OhlcvBar>) -> Self {
        bars.sort_by(|a, b| a.date.cmp(&b.date));
        bars.dedup_by(|a, b| a.date == b.date);
        Self {
            ticker: ticker.into(),
            bars,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }
}
