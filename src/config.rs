use std::path::PathBuf;

use crate::error::{AlignerError, Result};
use crate::utils::Timeframe;

/// Explicit configuration for one pipeline run. Built from CLI arguments;
/// there is no ambient or file-based state.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Search term queried against the interest provider.
    pub term: String,
    /// Stock symbol queried against the price provider.
    pub ticker: String,
    pub timeframe: Timeframe,
    /// Region filter, passed through to the provider unvalidated ("" = worldwide).
    pub region: String,
    /// Category filter, passed through unvalidated (0 = all categories).
    pub category: u32,
    /// Moving-average window for the trend sentiment summary.
    pub ma_window: usize,
    /// EMA window for the trend chart.
    pub ema_window: usize,
    /// Optional CSV export path for the aligned table.
    pub csv_out: Option<PathBuf>,
}

impl AnalysisConfig {
    /// Fail-fast parameter validation, before any network call.
    pub fn validate(&self) -> Result<()> {
        if self.term.trim().is_empty() {
            return Err(AlignerError::InvalidParameter(
                "search term must not be empty".to_string(),
            ));
        }
        if !is_valid_ticker(&self.ticker) {
            return Err(AlignerError::InvalidParameter(format!(
                "'{}' is not a valid ticker symbol",
                self.ticker
            )));
        }
        // Resolving also rejects inverted ranges and zero-length windows.
        self.timeframe.resolve()?;
        Ok(())
    }
}

/// Syntactic ticker check only; existence is the provider's call. Accepts
/// exchange symbols like `TSLA`, `BRK-B`, `BF.B` and indices like `^GSPC`.
pub fn is_valid_ticker(ticker: &str) -> bool {
    if ticker.is_empty() || ticker.len() > 12 {
        return false;
    }
    let mut chars = ticker.chars();
    let first = chars.next().unwrap_or(' ');
    if !(first.is_ascii_alphanumeric() || first == '^') {
        return false;
    }
    ticker
        .chars()
        .skip(1)
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}
