use chrono::NaiveDate;

/// One plotted series: a glyph per defined sample over the shared date axis.
pub struct ChartSeries<'a> {
    pub label: &'a str,
    pub glyph: char,
    pub values: &'a [Option<f64>],
}

/// Render a multi-series line chart as text: one column per date, all series
/// scaled to a shared y range so their shapes are comparable.
///
/// Missing samples leave their column blank for that series. Returns an empty
/// chart note when nothing is defined.
pub fn render_multi_series(
    title: &str,
    dates: &[NaiveDate],
    series: &[ChartSeries],
    height: usize,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n{}\n", title, "=".repeat(title.len())));

    let defined: Vec<f64> = series
        .iter()
        .flat_map(|s| s.values.iter().flatten().copied())
        .collect();
    if dates.is_empty() || defined.is_empty() || height < 2 {
        out.push_str("(no data to plot)\n");
        return out;
    }

    let min = defined.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = defined.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = if (max - min).abs() > 1e-12 {
        max - min
    } else {
        1.0
    };

    let width = dates.len();
    let mut grid = vec![vec![' '; width]; height];

    for s in series {
        for (x, value) in s.values.iter().enumerate().take(width) {
            if let Some(v) = value {
                let normalized = (v - min) / range;
                let y = (normalized * (height - 1) as f64).round() as usize;
                let row = height - 1 - y.min(height - 1);
                grid[row][x] = s.glyph;
            }
        }
    }

    let label_width = 10;
    for (i, row) in grid.iter().enumerate() {
        let level = max - (i as f64 / (height - 1) as f64) * (max - min);
        let line: String = row.iter().collect();
        out.push_str(&format!("{:>label_width$.1} | {}\n", level, line));
    }

    out.push_str(&format!("{:>label_width$} +-{}\n", "", "-".repeat(width)));
    out.push_str(&format!(
        "{:>label_width$}   {} .. {}\n",
        "",
        dates[0].format("%Y-%m-%d"),
        dates[width - 1].format("%Y-%m-%d")
    ));

    for s in series {
        out.push_str(&format!("{:>label_width$}   {} {}\n", "", s.glyph, s.label));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_chart_has_series_glyphs_and_legend() {
        let dates = vec![d("2024-01-01"), d("2024-01-02"), d("2024-01-03")];
        let close = [Some(1.0), Some(2.0), Some(3.0)];
        let chart = render_multi_series(
            "test",
            &dates,
            &[ChartSeries {
                label: "close",
                glyph: '*',
                values: &close,
            }],
            8,
        );
        assert!(chart.contains('*'));
        assert!(chart.contains("* close"));
        assert!(chart.contains("2024-01-01 .. 2024-01-03"));
    }

    #[test]
    fn test_empty_chart_does_not_panic() {
        let chart = render_multi_series("empty", &[], &[], 8);
        assert!(chart.contains("no data"));
    }

    #[test]
    fn test_all_missing_series() {
        let dates = vec![d("2024-01-01")];
        let values = [None];
        let chart = render_multi_series(
            "gaps",
            &dates,
            &[ChartSeries {
                label: "interest",
                glyph: '+',
                values: &values,
            }],
            8,
        );
        assert!(chart.contains("no data"));
    }
}
