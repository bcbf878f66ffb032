pub mod chart;
pub mod table;

pub use chart::{render_multi_series, ChartSeries};
pub use table::{format_aligned_rows, format_correlation_matrix, write_aligned_csv};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::pipeline::{AnalysisReport, TrendReport};
use crate::render::table::format_percentage_with_sign;

const CHART_HEIGHT: usize = 16;

/// Print the full analyze report: chart, aligned table, correlation matrix,
/// trend summary. Pure side effect; nothing downstream consumes the output.
pub fn render_report(report: &AnalysisReport, config: &AnalysisConfig) -> Result<()> {
    let dates: Vec<_> = report.table.rows.iter().map(|r| r.date).collect();
    let pct_change: Vec<Option<f64>> = report
        .table
        .rows
        .iter()
        .map(|r| r.interest_pct_change.map(|v| v * 100.0))
        .collect();
    let close: Vec<Option<f64>> = report.table.rows.iter().map(|r| Some(r.close)).collect();
    let volume_norm: Vec<Option<f64>> = report
        .table
        .rows
        .iter()
        .map(|r| r.volume_normalized)
        .collect();

    let title = format!("'{}' vs {} (close)", report.table.term, report.table.ticker);
    let chart = render_multi_series(
        &title,
        &dates,
        &[
            ChartSeries {
                label: "interest change %",
                glyph: '+',
                values: &pct_change,
            },
            ChartSeries {
                label: "close price",
                glyph: '*',
                values: &close,
            },
            ChartSeries {
                label: "normalized volume",
                glyph: 'o',
                values: &volume_norm,
            },
        ],
        CHART_HEIGHT,
    );
    println!("{}", chart);

    println!("{}\n", format_aligned_rows(&report.table));
    println!("Correlation matrix (Pearson, pairwise-complete):");
    println!("{}", format_correlation_matrix(&report.matrix));

    if let Some(sentiment) = report.sentiment {
        println!("Interest trend sentiment: {}", sentiment.as_str());
    }
    if let Some((change, sentiment)) = report.pct_trend {
        println!(
            "Interest change over window: {} ({})",
            format_percentage_with_sign(change),
            sentiment.as_str()
        );
    }

    if let Some(path) = &config.csv_out {
        write_aligned_csv(&report.table, path)?;
        println!("Aligned table written to {}", path.display());
    }

    Ok(())
}

/// Print the interest-only trend report: raw series, SMA, EMA, sentiment.
pub fn render_trend_report(report: &TrendReport, config: &AnalysisConfig) {
    let dates: Vec<_> = report.interest.points.iter().map(|p| p.date).collect();
    let raw = report.interest.interest_values();

    let title = format!("'{}' interest over time", report.interest.term);
    let chart = render_multi_series(
        &title,
        &dates,
        &[
            ChartSeries {
                label: "interest",
                glyph: '+',
                values: &raw,
            },
            ChartSeries {
                label: &format!("SMA({})", config.ma_window),
                glyph: '-',
                values: &report.sma,
            },
            ChartSeries {
                label: &format!("EMA({})", config.ema_window),
                glyph: '~',
                values: &report.ema,
            },
        ],
        CHART_HEIGHT,
    );
    println!("{}", chart);

    if let Some(sentiment) = report.sentiment {
        println!("Trend sentiment: {}", sentiment.as_str());
    }
    if let Some((change, sentiment)) = report.pct_trend {
        println!(
            "Percentage change over window: {} ({})",
            format_percentage_with_sign(change),
            sentiment.as_str()
        );
    }
}
