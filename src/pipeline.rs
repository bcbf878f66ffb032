use chrono::NaiveDate;
use tracing::{info, warn};

use crate::analysis::{
    correlate, derive_interest_pct_change, exponential_moving_average, moving_average,
    normalize_volume, percentage_trend, trend_sentiment, TrendSentiment,
};
use crate::clients::{InterestProvider, PriceProvider, TrendsClient, YahooClient};
use crate::config::{is_valid_ticker, AnalysisConfig};
use crate::error::{AlignerError, Result};
use crate::models::{
    AlignedTable, Column, CorrelationMatrix, OhlcvSeries, SearchInterestSeries,
};
use crate::utils::{Timeframe, Timer};

/// Default requests-per-minute budget shared by both provider clients.
const DEFAULT_RATE_LIMIT: u32 = 6;

/// Everything one `analyze` run produces, handed to the render sink.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub table: AlignedTable,
    pub matrix: CorrelationMatrix,
    pub interest: SearchInterestSeries,
    pub sentiment: Option<TrendSentiment>,
    pub pct_trend: Option<(f64, TrendSentiment)>,
}

/// Output of the interest-only `trend` run.
#[derive(Debug, Clone)]
pub struct TrendReport {
    pub interest: SearchInterestSeries,
    pub sma: Vec<Option<f64>>,
    pub ema: Vec<Option<f64>>,
    pub sentiment: Option<TrendSentiment>,
    pub pct_trend: Option<(f64, TrendSentiment)>,
}

/// Owns the end-to-end pipeline: fetch both series, align by date, derive
/// comparison fields, correlate.
///
/// The flow is strictly sequential; the two fetches are independent but
/// ordering has no observable effect on the join, so they run one after the
/// other. Each stage owns and transforms its own output.
pub struct TrendStockAligner {
    interest_provider: Box<dyn InterestProvider>,
    price_provider: Box<dyn PriceProvider>,
}

impl TrendStockAligner {
    /// Aligner backed by the real providers.
    pub fn new() -> Result<Self> {
        Ok(Self {
            interest_provider: Box::new(TrendsClient::new(true, DEFAULT_RATE_LIMIT)?),
            price_provider: Box::new(YahooClient::new(DEFAULT_RATE_LIMIT)?),
        })
    }

    /// Aligner with injected providers, used by tests.
    pub fn with_providers(
        interest_provider: Box<dyn InterestProvider>,
        price_provider: Box<dyn PriceProvider>,
    ) -> Self {
        Self {
            interest_provider,
            price_provider,
        }
    }

    /// Fetch the search-interest series for the resolved window.
    pub async fn fetch_interest(
        &mut self,
        term: &str,
        timeframe: Timeframe,
        region: &str,
        category: u32,
    ) -> Result<SearchInterestSeries> {
        if term.trim().is_empty() {
            return Err(AlignerError::InvalidParameter(
                "search term must not be empty".to_string(),
            ));
        }
        let (start, end) = timeframe.resolve()?;

        let timer = Timer::start("interest fetch");
        let points = self
            .interest_provider
            .interest_over_time(term, start, end, region, category)
            .await?;
        timer.log_elapsed();

        let series = SearchInterestSeries::new(term, points);
        info!(
            "fetched {} interest samples for '{}' ({} to {})",
            series.len(),
            term,
            start,
            end
        );
        Ok(series)
    }

    /// Fetch daily OHLCV bars for the window.
    pub async fn fetch_prices(
        &mut self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<OhlcvSeries> {
        if !is_valid_ticker(ticker) {
            return Err(AlignerError::InvalidParameter(format!(
                "'{}' is not a valid ticker symbol",
                ticker
            )));
        }
        if start > end {
            return Err(AlignerError::InvalidParameter(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }

        let timer = Timer::start("price fetch");
        let bars = self.price_provider.daily_history(ticker, start, end).await?;
        timer.log_elapsed();

        let series = OhlcvSeries::new(ticker, bars);
        info!(
            "fetched {} trading days for {} ({} to {})",
            series.len(),
            ticker,
            start,
            end
        );
        Ok(series)
    }

    /// Full analyze pipeline: fetch interest, derive pct change, fetch
    /// prices, align, normalize volume, correlate.
    pub async fn run(&mut self, config: &AnalysisConfig) -> Result<AnalysisReport> {
        config.validate()?;
        let (start, end) = config.timeframe.resolve()?;

        let interest = self
            .fetch_interest(&config.term, config.timeframe, &config.region, config.category)
            .await?;
        let interest = derive_interest_pct_change(interest);

        let prices = self.fetch_prices(&config.ticker, start, end).await?;

        let table = match AlignedTable::align(&interest, &prices) {
            Err(AlignerError::AlignmentEmpty) => {
                warn!(
                    "'{}' and {} share no common date in {}",
                    config.term, config.ticker, config.timeframe
                );
                return Err(AlignerError::AlignmentEmpty);
            }
            other => other?,
        };
        info!("aligned table has {} rows", table.len());

        let table = normalize_volume(table);
        let matrix = correlate(&table, &Column::ALL);

        let sentiment = trend_sentiment(&interest, config.ma_window);
        let pct_trend = percentage_trend(&interest);

        Ok(AnalysisReport {
            table,
            matrix,
            interest,
            sentiment,
            pct_trend,
        })
    }

    /// Interest-only pipeline: download, SMA, EMA, sentiment.
    pub async fn run_trend(&mut self, config: &AnalysisConfig) -> Result<TrendReport> {
        if config.term.trim().is_empty() {
            return Err(AlignerError::InvalidParameter(
                "search term must not be empty".to_string(),
            ));
        }

        let interest = self
            .fetch_interest(&config.term, config.timeframe, &config.region, config.category)
            .await?;

        let values = interest.interest_values();
        let sma = moving_average(&values, config.ma_window);
        let ema = exponential_moving_average(&values, config.ema_window);
        let sentiment = trend_sentiment(&interest, config.ma_window);
        let pct_trend = percentage_trend(&interest);

        Ok(TrendReport {
            interest,
            sma,
            ema,
            sentiment,
            pct_trend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InterestPoint, OhlcvBar};
    use async_trait::async_trait;

    struct FakeInterest(Vec<InterestPoint>);

    #[async_trait]
    impl InterestProvider for FakeInterest {
        async fn interest_over_time(
            &mut self,
            _term: &str,
            _start: NaiveDate,
            _end: NaiveDate,
            _region: &str,
            _category: u32,
        ) -> Result<Vec<InterestPoint>> {
            Ok(self.0.clone())
        }
    }

    struct FakePrices(Vec<OhlcvBar>);

    #[async_trait]
    impl PriceProvider for FakePrices {
        async fn daily_history(
            &mut self,
            _ticker: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<OhlcvBar>> {
            Ok(self.0.clone())
        }
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig {
            term: "tesla stock".to_string(),
            ticker: "TSLA".to_string(),
            timeframe: Timeframe::Range {
                start: d("2024-01-01"),
                end: d("2024-01-10"),
            },
            region: String::new(),
            category: 0,
            ma_window: 2,
            ema_window: 2,
            csv_out: None,
        }
    }

    fn interest_points(data: &[(&str, f64)]) -> Vec<InterestPoint> {
        data.iter()
            .map(|(date, v)| InterestPoint::new(d(date), Some(*v)))
            .collect()
    }

    fn bars(data: &[(&str, f64, u64)]) -> Vec<OhlcvBar> {
        data.iter()
            .map(|(date, close, volume)| OhlcvBar {
                date: d(date),
                open: close - 1.0,
                high: close + 1.0,
                low: close - 2.0,
                close: *close,
                volume: *volume,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_full_pipeline_with_fakes() {
        let interest = interest_points(&[
            ("2024-01-02", 40.0),
            ("2024-01-03", 60.0),
            ("2024-01-04", 80.0),
            ("2024-01-06", 90.0),
        ]);
        let prices = bars(&[
            ("2024-01-02", 240.0, 1_000),
            ("2024-01-03", 245.0, 2_000),
            ("2024-01-04", 250.0, 3_000),
            ("2024-01-05", 255.0, 4_000),
        ]);

        let mut aligner = TrendStockAligner::with_providers(
            Box::new(FakeInterest(interest)),
            Box::new(FakePrices(prices)),
        );
        let report = aligner.run(&config()).await.unwrap();

        // 2024-01-05 has prices only, 2024-01-06 has interest only.
        assert_eq!(report.table.len(), 3);
        assert_eq!(
            report.table.rows.iter().map(|r| r.date).collect::<Vec<_>>(),
            vec![d("2024-01-02"), d("2024-01-03"), d("2024-01-04")]
        );

        // Volume 1000..3000 scales to 0..100.
        let norm: Vec<_> = report
            .table
            .rows
            .iter()
            .map(|r| r.volume_normalized)
            .collect();
        assert_eq!(norm, vec![Some(0.0), Some(50.0), Some(100.0)]);

        // Interest and close both rise monotonically over the joined rows.
        let r = report.matrix.get(Column::Interest, Column::Close).unwrap();
        assert!(r > 0.99);

        assert_eq!(report.sentiment, Some(TrendSentiment::Positive));
    }

    #[tokio::test]
    async fn test_disjoint_series_is_alignment_empty() {
        let interest = interest_points(&[("2024-01-02", 40.0)]);
        let prices = bars(&[("2024-01-09", 240.0, 1_000)]);

        let mut aligner = TrendStockAligner::with_providers(
            Box::new(FakeInterest(interest)),
            Box::new(FakePrices(prices)),
        );
        let err = aligner.run(&config()).await.unwrap_err();
        assert!(matches!(err, AlignerError::AlignmentEmpty));
    }

    #[tokio::test]
    async fn test_invalid_ticker_fails_before_fetch() {
        let mut aligner = TrendStockAligner::with_providers(
            Box::new(FakeInterest(vec![])),
            Box::new(FakePrices(vec![])),
        );
        let mut cfg = config();
        cfg.ticker = "not a ticker".to_string();
        let err = aligner.run(&cfg).await.unwrap_err();
        assert!(matches!(err, AlignerError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_pipeline_is_deterministic() {
        let interest = interest_points(&[("2024-01-02", 40.0), ("2024-01-03", 60.0)]);
        let prices = bars(&[("2024-01-02", 240.0, 1_000), ("2024-01-03", 245.0, 2_000)]);

        let mut a = TrendStockAligner::with_providers(
            Box::new(FakeInterest(interest.clone())),
            Box::new(FakePrices(prices.clone())),
        );
        let mut b = TrendStockAligner::with_providers(
            Box::new(FakeInterest(interest)),
            Box::new(FakePrices(prices)),
        );
        let first = a.run(&config()).await.unwrap();
        let second = b.run(&config()).await.unwrap();
        assert_eq!(first.table, second.table);
        assert_eq!(first.matrix, second.matrix);
    }

    #[tokio::test]
    async fn test_trend_report() {
        let interest = interest_points(&[
            ("2024-01-02", 40.0),
            ("2024-01-03", 60.0),
            ("2024-01-04", 80.0),
        ]);
        let mut aligner = TrendStockAligner::with_providers(
            Box::new(FakeInterest(interest)),
            Box::new(FakePrices(vec![])),
        );
        let report = aligner.run_trend(&config()).await.unwrap();
        assert_eq!(report.sma.len(), 3);
        assert_eq!(report.sentiment, Some(TrendSentiment::Positive));
        let (change, _) = report.pct_trend.unwrap();
        assert!((change - 100.0).abs() < 1e-12);
    }
}
