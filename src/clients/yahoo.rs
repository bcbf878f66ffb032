use std::time::{Duration as StdDuration, SystemTime};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use reqwest::Client;
use serde_json::Value;
use tokio::time::sleep;

use crate::clients::PriceProvider;
use crate::error::{AlignerError, Result};
use crate::models::OhlcvBar;

const PROVIDER: &str = "yahoo";

/// Client for the price-history provider's chart API.
///
/// One GET per run: `period1`/`period2` bound the window, `interval=1d`
/// selects daily bars. The response carries a timestamp array plus parallel
/// open/high/low/close/volume arrays; entries with null fields (halted or
/// partially reported days) are skipped rather than zero-filled. Unknown or
/// delisted tickers come back as an empty result set, not an error payload.
pub struct YahooClient {
    client: Client,
    base_url: String,
    rate_limit_per_minute: u32,
    request_timestamps: Vec<SystemTime>,
    user_agent: String,
}

impl YahooClient {
    pub fn new(rate_limit_per_minute: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(30))
            .build()?;

        Ok(YahooClient {
            client,
            base_url: "https://query1.finance.yahoo.com/v8/finance/chart/".to_string(),
            rate_limit_per_minute,
            request_timestamps: Vec::new(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        })
    }

    async fn enforce_rate_limit(&mut self) {
        let current_time = SystemTime::now();

        self.request_timestamps.retain(|&timestamp| {
            current_time
                .duration_since(timestamp)
                .unwrap_or(StdDuration::from_secs(0))
                < StdDuration::from_secs(60)
        });

        if self.request_timestamps.len() >= self.rate_limit_per_minute as usize {
            if let Some(&oldest_request) = self.request_timestamps.first() {
                let wait_time = StdDuration::from_secs(60)
                    - current_time
                        .duration_since(oldest_request)
                        .unwrap_or(StdDuration::from_secs(0));
                if !wait_time.is_zero() {
                    sleep(wait_time + StdDuration::from_millis(100)).await;
                }
            }
        }

        self.request_timestamps.push(current_time);
    }

    /// Midnight-UTC timestamp for a date. `period2` is exclusive, so the
    /// caller passes `end + 1 day` to make the window inclusive.
    fn date_to_timestamp(date: NaiveDate) -> i64 {
        date.and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or(0)
    }

    fn parse_chart(
        response: &Value,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>> {
        let chart = &response["chart"];

        if !chart["error"].is_null() {
            let description = chart["error"]["description"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string();
            return Err(AlignerError::unavailable(PROVIDER, description));
        }

        let result = chart["result"]
            .as_array()
            .and_then(|a| a.first())
            .ok_or_else(|| AlignerError::unavailable(PROVIDER, format!("empty result for '{}'", ticker)))?;

        let timestamps = result["timestamp"].as_array().ok_or_else(|| {
            AlignerError::unavailable(PROVIDER, format!("no price history for '{}'", ticker))
        })?;

        let quote = &result["indicators"]["quote"][0];
        let opens = quote["open"]
            .as_array()
            .ok_or_else(|| AlignerError::InvalidResponse("missing opens".to_string()))?;
        let highs = quote["high"]
            .as_array()
            .ok_or_else(|| AlignerError::InvalidResponse("missing highs".to_string()))?;
        let lows = quote["low"]
            .as_array()
            .ok_or_else(|| AlignerError::InvalidResponse("missing lows".to_string()))?;
        let closes = quote["close"]
            .as_array()
            .ok_or_else(|| AlignerError::InvalidResponse("missing closes".to_string()))?;
        let volumes = quote["volume"]
            .as_array()
            .ok_or_else(|| AlignerError::InvalidResponse("missing volumes".to_string()))?;

        let length = timestamps.len();
        if [opens.len(), highs.len(), lows.len(), closes.len(), volumes.len()]
            .iter()
            .any(|&len| len != length)
        {
            return Err(AlignerError::InvalidResponse(
                "inconsistent array lengths".to_string(),
            ));
        }

        let mut bars = Vec::with_capacity(length);
        for i in 0..length {
            let timestamp = timestamps[i].as_i64().ok_or_else(|| {
                AlignerError::InvalidResponse(format!("invalid timestamp at index {}", i))
            })?;
            let date = DateTime::<Utc>::from_timestamp(timestamp, 0)
                .ok_or_else(|| {
                    AlignerError::InvalidResponse(format!("timestamp {} out of range", timestamp))
                })?
                .date_naive();

            if date < start || date > end {
                continue;
            }

            // Null fields mark a day the provider could not fully report;
            // skip the bar instead of fabricating zeros.
            let (open, high, low, close, volume) = match (
                opens[i].as_f64(),
                highs[i].as_f64(),
                lows[i].as_f64(),
                closes[i].as_f64(),
                volumes[i].as_u64(),
            ) {
                (Some(o), Some(h), Some(l), Some(c), Some(v)) => (o, h, l, c, v),
                _ => continue,
            };

            bars.push(OhlcvBar {
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by(|a, b| a.date.cmp(&b.date));
        bars.dedup_by(|a, b| a.date == b.date);
        Ok(bars)
    }
}

#[async_trait]
impl PriceProvider for YahooClient {
    async fn daily_history(
        &mut self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>> {
        self.enforce_rate_limit().await;

        let period1 = Self::date_to_timestamp(start);
        let period2 = Self::date_to_timestamp(end + Duration::days(1));

        let url = format!("{}{}", self.base_url, ticker);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("includePrePost", "false".to_string()),
            ])
            .header("Accept", "application/json, text/plain, */*")
            .header("User-Agent", self.user_agent.clone())
            .send()
            .await?;

        let status = response.status();
        if status == 429 {
            return Err(AlignerError::unavailable(PROVIDER, "rate limited"));
        }
        if status == 404 {
            return Err(AlignerError::unavailable(
                PROVIDER,
                format!("unknown ticker '{}'", ticker),
            ));
        }
        if !status.is_success() {
            return Err(AlignerError::InvalidResponse(format!(
                "unexpected status {}",
                status.as_u16()
            )));
        }

        let body: Value = response.json().await?;
        let bars = Self::parse_chart(&body, ticker, start, end)?;

        if bars.is_empty() {
            return Err(AlignerError::unavailable(
                PROVIDER,
                format!("no trading days for '{}' in window", ticker),
            ));
        }

        Ok(bars)
    }
}
