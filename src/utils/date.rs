use chrono::{Duration, NaiveDate, Utc};

use crate::error::{AlignerError, Result};

/// Parse a YYYY-MM-DD date string.
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| AlignerError::InvalidParameter(format!("invalid date: {}", date_str)))
}

/// Format a date as YYYY-MM-DD.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Window over which both series are fetched.
///
/// Either a relative window resolved against today, or an explicit inclusive
/// date range. Both forms resolve to a concrete start/end pair before any
/// network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    DaysBack(u32),
    Range { start: NaiveDate, end: NaiveDate },
}

impl Timeframe {
    /// Resolve to a concrete inclusive (start, end) pair.
    pub fn resolve(&self) -> Result<(NaiveDate, NaiveDate)> {
        self.resolve_at(Utc::now().date_naive())
    }

    /// Resolve against an explicit "today", used by tests.
    pub fn resolve_at(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        match *self {
            Timeframe::DaysBack(days) => {
                if days == 0 {
                    return Err(AlignerError::InvalidParameter(
                        "days-back must be at least 1".to_string(),
                    ));
                }
                Ok((today - Duration::days(days as i64), today))
            }
            Timeframe::Range { start, end } => {
                if start > end {
                    return Err(AlignerError::InvalidParameter(format!(
                        "start date {} is after end date {}",
                        format_date(start),
                        format_date(end)
                    )));
                }
                Ok((start, end))
            }
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timeframe::DaysBack(days) => write!(f, "last {} days", days),
            Timeframe::Range { start, end } => {
                write!(f, "{} to {}", format_date(*start), format_date(*end))
            }
        }
    }
}
