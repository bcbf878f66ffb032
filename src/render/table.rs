use std::path::Path;

use crate::error::Result;
use crate::models::{AlignedTable, CorrelationMatrix};

/// Format volume with a magnitude suffix.
pub fn format_volume(volume: f64) -> String {
    if volume >= 1_000_000.0 {
        format!("{:.1}M", volume / 1_000_000.0)
    } else if volume >= 1_000.0 {
        format!("{:.0}k", volume / 1_000.0)
    } else {
        format!("{:.0}", volume)
    }
}

/// Format a percentage with an explicit sign.
pub fn format_percentage_with_sign(value: f64) -> String {
    if value > 0.0 {
        format!("+{:.2}%", value)
    } else {
        format!("{:.2}%", value)
    }
}

fn format_optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "--".to_string(),
    }
}

/// One line per aligned day, matching the per-day OHLCV context format.
pub fn format_aligned_rows(table: &AlignedTable) -> String {
    let lines: Vec<String> = table
        .rows
        .iter()
        .map(|row| {
            let pct_str = match row.interest_pct_change {
                Some(pct) => format_percentage_with_sign(pct * 100.0),
                None => "--".to_string(),
            };
            format!(
                "{}: Date={}, Interest={}, InterestChange={}, Open={:.2}, High={:.2}, Low={:.2}, Close={:.2}, Volume={}, VolumeNorm={}",
                table.ticker,
                row.date.format("%Y-%m-%d"),
                format_optional(row.interest),
                pct_str,
                row.open,
                row.high,
                row.low,
                row.close,
                format_volume(row.volume as f64),
                format_optional(row.volume_normalized),
            )
        })
        .collect();

    format!(
        "# Aligned '{}' / {} ({} rows)\n{}",
        table.term,
        table.ticker,
        table.len(),
        lines.join("\n")
    )
}

/// Correlation matrix as a fixed-width table; undefined cells print `--`.
pub fn format_correlation_matrix(matrix: &CorrelationMatrix) -> String {
    let labels: Vec<&str> = matrix.columns.iter().map(|c| c.name()).collect();
    let label_width = labels.iter().map(|s| s.len()).max().unwrap_or(6).max(6);
    let mut out = String::new();

    out.push_str(&format!("{:>width$}", "", width = label_width + 1));
    for label in &labels {
        out.push_str(&format!(" {:>12}", label));
    }
    out.push('\n');

    for (i, label) in labels.iter().enumerate() {
        out.push_str(&format!("{:>width$} ", label, width = label_width));
        for j in 0..matrix.size() {
            let cell = match matrix.get_by_index(i, j) {
                Some(v) => format!("{:.2}", v),
                None => "--".to_string(),
            };
            out.push_str(&format!(" {:>12}", cell));
        }
        out.push('\n');
    }

    out
}

/// Export the aligned table to CSV. Missing values become empty fields.
pub fn write_aligned_csv(table: &AlignedTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "date",
        "interest",
        "interest_pct_change",
        "open",
        "high",
        "low",
        "close",
        "volume",
        "volume_normalized",
    ])?;

    for row in &table.rows {
        let opt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        writer.write_record([
            row.date.format("%Y-%m-%d").to_string(),
            opt(row.interest),
            opt(row.interest_pct_change),
            row.open.to_string(),
            row.high.to_string(),
            row.low.to_string(),
            row.close.to_string(),
            row.volume.to_string(),
            opt(row.volume_normalized),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
