use std::time::{Duration as StdDuration, SystemTime};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde_json::Value;
use tokio::time::sleep;

use crate::clients::InterestProvider;
use crate::error::{AlignerError, Result};
use crate::models::InterestPoint;

const PROVIDER: &str = "trends";

/// Client for the search-interest provider's widget API.
///
/// The API is two-step: an explore request yields a per-session widget token,
/// a second request with that token yields the timeline. Values arrive
/// normalized to [0,100]; samples flagged as having no data map to `None`.
/// There is no authentication, only an undocumented rate limit, so requests
/// are spaced but never retried.
pub struct TrendsClient {
    client: Client,
    base_url: String,
    rate_limit_per_minute: u32,
    request_timestamps: Vec<SystemTime>,
    user_agents: Vec<String>,
    random_agent: bool,
}

impl TrendsClient {
    pub fn new(random_agent: bool, rate_limit_per_minute: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(30))
            .build()?;

        let user_agents = vec![
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0".to_string(),
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.3 Safari/605.1.15".to_string(),
        ];

        Ok(TrendsClient {
            client,
            base_url: "https://trends.google.com/trends/api/".to_string(),
            rate_limit_per_minute,
            request_timestamps: Vec::new(),
            user_agents,
            random_agent,
        })
    }

    fn get_user_agent(&self) -> String {
        if self.random_agent {
            use rand::seq::SliceRandom;
            self.user_agents
                .choose(&mut rand::thread_rng())
                .unwrap_or(&self.user_agents[0])
                .clone()
        } else {
            self.user_agents[0].clone()
        }
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

    /// Single GET against the API. Rate-limited responses surface as
    /// `DataUnavailable`; there is no retry loop.
    async fn make_request(&mut self, url: &str, query: &[(&str, String)]) -> Result<String> {
        self.enforce_rate_limit().await;

        let user_agent = self.get_user_agent();
        let response = self
            .client
            .get(url)
            .query(query)
            .header("Accept", "application/json, text/plain, */*")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("User-Agent", user_agent)
            .header("Referer", "https://trends.google.com/trends/explore")
            .send()
            .await?;

        let status = response.status();
        if status == 429 || status == 403 {
            return Err(AlignerError::unavailable(
                PROVIDER,
                format!("rate limited (status {})", status.as_u16()),
            ));
        }
        if !status.is_success() {
            return Err(AlignerError::InvalidResponse(format!(
                "unexpected status {}",
                status.as_u16()
            )));
        }

        Ok(response.text().await?)
    }

    /// Responses carry an anti-hijacking prefix (`)]}'`) before the JSON body.
    fn parse_lenient_json(body: &str) -> Result<Value> {
        let start = body
            .find('{')
            .ok_or_else(|| AlignerError::InvalidResponse("no JSON object in body".to_string()))?;
        serde_json::from_str(&body[start..])
            .map_err(|e| AlignerError::InvalidResponse(format!("malformed JSON: {}", e)))
    }

    /// Explore request: resolves the term to the TIMESERIES widget and its
    /// one-shot token.
    async fn fetch_timeseries_widget(
        &mut self,
        term: &str,
        time_range: &str,
        region: &str,
        category: u32,
    ) -> Result<(String, Value)> {
        let explore_req = serde_json::json!({
            "comparisonItem": [{
                "keyword": term,
                "geo": region,
                "time": time_range,
            }],
            "category": category,
            "property": "",
        });

        let url = format!("{}explore", self.base_url);
        let body = self
            .make_request(
                &url,
                &[
                    ("hl", "en-US".to_string()),
                    ("tz", "360".to_string()),
                    ("req", explore_req.to_string()),
                ],
            )
            .await?;

        let parsed = Self::parse_lenient_json(&body)?;
        let widgets = parsed["widgets"]
            .as_array()
            .ok_or_else(|| AlignerError::InvalidResponse("missing widgets array".to_string()))?;

        for widget in widgets {
            if widget["id"].as_str() == Some("TIMESERIES") {
                let token = widget["token"].as_str().ok_or_else(|| {
                    AlignerError::InvalidResponse("TIMESERIES widget has no token".to_string())
                })?;
                return Ok((token.to_string(), widget["request"].clone()));
            }
        }

        Err(AlignerError::unavailable(
            PROVIDER,
            format!("no timeseries widget for term '{}'", term),
        ))
    }

    fn parse_timeline(data: &Value, start: NaiveDate, end: NaiveDate) -> Result<Vec<InterestPoint>> {
        let timeline = data["default"]["timelineData"]
            .as_array()
            .ok_or_else(|| AlignerError::InvalidResponse("missing timelineData".to_string()))?;

        let mut points = Vec::with_capacity(timeline.len());
        for item in timeline {
            let timestamp = match item["time"].as_str() {
                Some(ts_str) => ts_str.parse::<i64>().map_err(|_| {
                    AlignerError::InvalidResponse(format!("unparseable timestamp '{}'", ts_str))
                })?,
                None => item["time"].as_i64().ok_or_else(|| {
                    AlignerError::InvalidResponse("timeline item has no time".to_string())
                })?,
            };
            let date = DateTime::<Utc>::from_timestamp(timestamp, 0)
                .ok_or_else(|| {
                    AlignerError::InvalidResponse(format!("timestamp {} out of range", timestamp))
                })?
                .date_naive();

            if date < start || date > end {
                continue;
            }

            // hasData is false where the provider reports no sample for the
            // day; that is a missing value, never a zero.
            let has_data = item["hasData"]
                .as_array()
                .and_then(|a| a.first())
                .and_then(|v| v.as_bool())
                .unwrap_or(true);
            let value = item["value"]
                .as_array()
                .and_then(|a| a.first())
                .and_then(|v| v.as_f64());

            let interest = if has_data { value } else { None };
            points.push(InterestPoint::new(date, interest));
        }

        Ok(points)
    }
}

#[async_trait]
impl InterestProvider for TrendsClient {
    async fn interest_over_time(
        &mut self,
        term: &str,
        start: NaiveDate,
        end: NaiveDate,
        region: &str,
        category: u32,
    ) -> Result<Vec<InterestPoint>> {
        let time_range = format!("{} {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"));
        let (token, widget_request) = self
            .fetch_timeseries_widget(term, &time_range, region, category)
            .await?;

        let url = format!("{}widgetdata/multiline", self.base_url);
        let body = self
            .make_request(
                &url,
                &[
                    ("hl", "en-US".to_string()),
                    ("tz", "360".to_string()),
                    ("req", widget_request.to_string()),
                    ("token", token),
                ],
            )
            .await?;

        let parsed = Self::parse_lenient_json(&body)?;
        let points = Self::parse_timeline(&parsed, start, end)?;

        if points.iter().all(|p| p.interest.is_none()) {
            return Err(AlignerError::unavailable(
                PROVIDER,
                format!("no interest data for term '{}'", term),
            ));
        }

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = TrendsClient::new(true, 6);
        assert!(client.is_ok());
    }

    #[test]
    fn test_parse_lenient_json_strips_prefix() {
        let body = ")]}'\n{\"widgets\": []}";
        let parsed = TrendsClient::parse_lenient_json(body).unwrap();
        assert!(parsed["widgets"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_parse_timeline_maps_missing_samples() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        // 2024-01-01 and 2024-01-02 midnight UTC.
        let data = serde_json::json!({
            "default": {
                "timelineData": [
                    {"time": "1704067200", "value": [63], "hasData": [true]},
                    {"time": "1704153600", "value": [0], "hasData": [false]},
                ]
            }
        });
        let points =
            TrendsClient::parse_timeline(&data, d("2024-01-01"), d("2024-01-31")).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].interest, Some(63.0));
        assert_eq!(points[1].interest, None);
    }

    #[test]
    fn test_parse_timeline_filters_outside_window() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let data = serde_json::json!({
            "default": {
                "timelineData": [
                    {"time": "1704067200", "value": [63], "hasData": [true]},
                ]
            }
        });
        let points =
            TrendsClient::parse_timeline(&data, d("2024-02-01"), d("2024-02-28")).unwrap();
        assert!(points.is_empty());
    }
}
