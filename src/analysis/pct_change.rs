use crate::models::SearchInterestSeries;

/// Populate `pct_change` on every point: fractional change vs the previous
/// row's interest value.
///
/// The first row, rows whose previous base is missing or zero, and rows whose
/// own value is missing all get an explicit `None`. Division by zero is never
/// attempted, so no NaN can leak into the series.
pub fn derive_interest_pct_change(series: SearchInterestSeries) -> SearchInterestSeries {
    let mut points = series.points;
    let mut prev: Option<f64> = None;

    for point in points.iter_mut() {
        point.pct_change = match (prev, point.interest) {
            (Some(base), Some(value)) if base != 0.0 => Some((value - base) / base),
            _ => None,
        };
        prev = point.interest;
    }

    SearchInterestSeries {
        term: series.term,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InterestPoint;
    use chrono::NaiveDate;

    fn series(values: &[Option<f64>]) -> SearchInterestSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        SearchInterestSeries::new(
            "tesla stock",
            values
                .iter()
                .enumerate()
                .map(|(i, v)| InterestPoint::new(base + chrono::Duration::days(i as i64), *v))
                .collect(),
        )
    }

    #[test]
    fn test_pct_change_with_zero_base() {
        let input = series(&[Some(100.0), Some(150.0), Some(0.0), Some(50.0)]);
        let out = derive_interest_pct_change(input);
        let changes: Vec<_> = out.points.iter().map(|p| p.pct_change).collect();
        // The row after a zero has an undefined previous-base denominator.
        assert_eq!(changes, vec![None, Some(0.5), Some(-1.0), None]);
    }

    #[test]
    fn test_pct_change_skips_missing_values() {
        let input = series(&[Some(10.0), None, Some(20.0)]);
        let out = derive_interest_pct_change(input);
        let changes: Vec<_> = out.points.iter().map(|p| p.pct_change).collect();
        // A missing previous value leaves the next row undefined too.
        assert_eq!(changes, vec![None, None, None]);
    }

    #[test]
    fn test_pct_change_empty_series() {
        let out = derive_interest_pct_change(series(&[]));
        assert!(out.is_empty());
    }
}
