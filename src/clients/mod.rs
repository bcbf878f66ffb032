pub mod trends;
pub mod yahoo;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{InterestPoint, OhlcvBar};

pub use trends::TrendsClient;
pub use yahoo::YahooClient;

/// Search-interest data source. Implemented by `TrendsClient` and by
/// in-memory fakes in tests.
#[async_trait]
pub trait InterestProvider: Send {
    async fn interest_over_time(
        &mut self,
        term: &str,
        start: NaiveDate,
        end: NaiveDate,
        region: &str,
        category: u32,
    ) -> Result<Vec<InterestPoint>>;
}

/// Daily OHLCV data source.
#[async_trait]
pub trait PriceProvider: Send {
    async fn daily_history(
        &mut self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>>;
}
