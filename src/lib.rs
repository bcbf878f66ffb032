//! # trendstock - Search-Interest vs Stock-Price Correlation
//!
//! Correlates public search-interest signals with daily OHLCV trading data
//! for a single term/ticker pair over a bounded window:
//! - Fetches both series from their providers
//! - Aligns them into one date-indexed table (inner join on exact date)
//! - Derives percentage-change and min-max-normalized comparison fields
//! - Computes a pairwise-complete Pearson correlation matrix
//! - Renders a terminal chart and summary tables
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trendstock::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AnalysisConfig {
//!         term: "Tesla stock".to_string(),
//!         ticker: "TSLA".to_string(),
//!         timeframe: Timeframe::DaysBack(90),
//!         region: String::new(),
//!         category: 0,
//!         ma_window: 3,
//!         ema_window: 3,
//!         csv_out: None,
//!     };
//!     let mut aligner = TrendStockAligner::new()?;
//!     let report = aligner.run(&config).await?;
//!     println!("{} aligned rows", report.table.len());
//!     Ok(())
//! }
//! ```

// Core modules
pub mod analysis;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod utils;

// Prelude for convenient imports
pub mod prelude {
    //! Most commonly used types and functions.

    pub use crate::analysis::{
        correlate, derive_interest_pct_change, normalize_volume, TrendSentiment,
    };
    pub use crate::config::AnalysisConfig;
    pub use crate::error::{AlignerError, Result};
    pub use crate::models::{
        AlignedTable, Column, CorrelationMatrix, OhlcvSeries, SearchInterestSeries,
    };
    pub use crate::pipeline::{AnalysisReport, TrendStockAligner};
    pub use crate::utils::Timeframe;
}

pub use utils::{init_logger, Timer};
