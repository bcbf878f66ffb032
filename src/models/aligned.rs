use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AlignerError, Result};
use crate::models::series::{OhlcvSeries, SearchInterestSeries};

/// One date where both the interest series and the price series have data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub interest: Option<f64>,
    pub interest_pct_change: Option<f64>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    /// Min-max scaled volume over the table's current row set. Recomputed by
    /// `analysis::normalize_volume` whenever the row set changes; a stale
    /// value is never carried into a new table.
    pub volume_normalized: Option<f64>,
}

/// Inner join of a search-interest series and an OHLCV series on exact date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedTable {
    pub term: String,
    pub ticker: String,
    pub rows: Vec<AlignedRow>,
}

impl AlignedTable {
    /// Join the two series on exact date equality.
    ///
    /// A date present in only one series is dropped entirely; no fuzzy or
    /// nearest-date matching. Disjoint date ranges are an `AlignmentEmpty`
    /// error, so an empty table never flows silently downstream.
    pub fn align(interest: &SearchInterestSeries, prices: &OhlcvSeries) -> Result<AlignedTable> {
        let mut rows = Vec::new();
        let mut bars = prices.bars.iter().peekable();

        // Both inputs are ascending, so a single merge pass suffices.
        for point in &interest.points {
            while let Some(bar) = bars.peek() {
                if bar.date < point.date {
                    bars.next();
                } else {
                    break;
                }
            }
            if let Some(bar) = bars.peek() {
                if bar.date == point.date {
                    rows.push(AlignedRow {
                        date: point.date,
                        interest: point.interest,
                        interest_pct_change: point.pct_change,
                        open: bar.open,
                        high: bar.high,
                        low: bar.low,
                        close: bar.close,
                        volume: bar.volume,
                        volume_normalized: None,
                    });
                }
            }
        }

        if rows.is_empty() {
            return Err(AlignerError::AlignmentEmpty);
        }

        Ok(AlignedTable {
            term: interest.term.clone(),
            ticker: prices.ticker.clone(),
            rows,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }
}
