use std::path::PathBuf;

use clap::{Parser, Subcommand};
use trendstock::config::AnalysisConfig;
use trendstock::error::AlignerError;
use trendstock::pipeline::TrendStockAligner;
use trendstock::render::{render_report, render_trend_report};
use trendstock::utils::{init_logger, parse_date, Timeframe};

#[derive(Parser)]
#[command(name = "trendstock")]
#[command(about = "Correlates search-interest signals with daily stock OHLCV data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch, align and correlate the interest and price series
    Analyze {
        /// Search term (e.g. "Tesla stock")
        #[arg(short, long)]
        term: String,
        /// Ticker symbol (e.g. TSLA)
        #[arg(short = 'k', long)]
        ticker: String,
        /// Relative window in days back from today
        #[arg(short, long, conflicts_with_all = ["start", "end"])]
        days_back: Option<u32>,
        /// Explicit window start (YYYY-MM-DD)
        #[arg(long, requires = "end")]
        start: Option<String>,
        /// Explicit window end (YYYY-MM-DD)
        #[arg(long, requires = "start")]
        end: Option<String>,
        /// Region filter passed through to the interest provider
        #[arg(short, long, default_value = "")]
        region: String,
        /// Category filter passed through to the interest provider
        #[arg(short, long, default_value_t = 0)]
        category: u32,
        /// Moving-average window for the trend summary
        #[arg(long, default_value_t = 3)]
        ma_window: usize,
        /// EMA window for the trend summary
        #[arg(long, default_value_t = 3)]
        ema_window: usize,
        /// Write the aligned table to this CSV file
        #[arg(long)]
        csv_out: Option<PathBuf>,
    },
    /// Interest-only trend analysis: SMA, EMA and sentiment for a term
    Trend {
        /// Search term (e.g. "Tesla stock")
        #[arg(short, long)]
        term: String,
        /// Relative window in days back from today
        #[arg(short, long, default_value_t = 20)]
        days_back: u32,
        /// Region filter passed through to the interest provider
        #[arg(short, long, default_value = "")]
        region: String,
        /// Category filter passed through to the interest provider
        #[arg(short, long, default_value_t = 0)]
        category: u32,
        /// Moving-average window
        #[arg(long, default_value_t = 3)]
        ma_window: usize,
        /// EMA window
        #[arg(long, default_value_t = 3)]
        ema_window: usize,
    },
}

fn timeframe_from_args(
    days_back: Option<u32>,
    start: Option<String>,
    end: Option<String>,
) -> anyhow::Result<Timeframe> {
    match (days_back, start, end) {
        (Some(days), None, None) => Ok(Timeframe::DaysBack(days)),
        (None, Some(start), Some(end)) => Ok(Timeframe::Range {
            start: parse_date(&start)?,
            end: parse_date(&end)?,
        }),
        (None, None, None) => Ok(Timeframe::DaysBack(90)),
        _ => Err(AlignerError::InvalidParameter(
            "specify either --days-back or --start/--end, not both".to_string(),
        )
        .into()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            term,
            ticker,
            days_back,
            start,
            end,
            region,
            category,
            ma_window,
            ema_window,
            csv_out,
        } => {
            let config = AnalysisConfig {
                term,
                ticker,
                timeframe: timeframe_from_args(days_back, start, end)?,
                region,
                category,
                ma_window,
                ema_window,
                csv_out,
            };

            let mut aligner = TrendStockAligner::new()?;
            let report = aligner.run(&config).await?;
            render_report(&report, &config)?;
        }
        Commands::Trend {
            term,
            days_back,
            region,
            category,
            ma_window,
            ema_window,
        } => {
            let config = AnalysisConfig {
                term,
                ticker: "TREND".to_string(),
                timeframe: Timeframe::DaysBack(days_back),
                region,
                category,
                ma_window,
                ema_window,
                csv_out: None,
            };

            let mut aligner = TrendStockAligner::new()?;
            let report = aligner.run_trend(&config).await?;
            render_trend_report(&report, &config);
        }
    }

    Ok(())
}
