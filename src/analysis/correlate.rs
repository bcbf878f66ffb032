use crate::models::{AlignedTable, Column, CorrelationMatrix};

/// Pearson coefficient over paired observations.
///
/// Returns `None` for fewer than two pairs or a zero-variance side; never
/// divides by zero.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    let n = pairs.len();
    if n < 2 {
        return None;
    }

    let n_f = n as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n_f;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n_f;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for &(x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    // Clamp rounding noise back into [-1, 1].
    Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

/// Pairwise-complete Pearson matrix over the selected columns.
///
/// Each pair uses only rows where both columns are defined, independent of
/// other pairs' missingness, so one gappy column does not drop rows for the
/// whole table.
pub fn correlate(table: &AlignedTable, columns: &[Column]) -> CorrelationMatrix {
    let mut matrix = CorrelationMatrix::new(columns.to_vec());

    for (i, &a) in columns.iter().enumerate() {
        for &b in columns.iter().skip(i) {
            let pairs: Vec<(f64, f64)> = table
                .rows
                .iter()
                .filter_map(|row| match (a.extract(row), b.extract(row)) {
                    (Some(x), Some(y)) => Some((x, y)),
                    _ => None,
                })
                .collect();
            matrix.set(a, b, pearson(&pairs));
        }
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlignedRow;
    use chrono::NaiveDate;

    fn table(rows: Vec<(Option<f64>, f64, u64)>) -> AlignedTable {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        AlignedTable {
            term: "tesla stock".to_string(),
            ticker: "TSLA".to_string(),
            rows: rows
                .into_iter()
                .enumerate()
                .map(|(i, (interest, close, volume))| AlignedRow {
                    date: base + chrono::Duration::days(i as i64),
                    interest,
                    interest_pct_change: None,
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume,
                    volume_normalized: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_identical_columns_correlate_to_one() {
        let t = table(vec![
            (Some(1.0), 1.0, 10),
            (Some(2.0), 2.0, 20),
            (Some(3.0), 3.0, 30),
        ]);
        let m = correlate(&t, &[Column::Interest, Column::Close]);
        let r = m.get(Column::Interest, Column::Close).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        assert!((m.get(Column::Close, Column::Close).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_negative_correlation() {
        let t = table(vec![
            (Some(3.0), 1.0, 10),
            (Some(2.0), 2.0, 20),
            (Some(1.0), 3.0, 30),
        ]);
        let m = correlate(&t, &[Column::Interest, Column::Close]);
        let r = m.get(Column::Interest, Column::Close).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fewer_than_two_pairs_is_undefined() {
        // Only one row has both interest and close defined.
        let t = table(vec![(Some(1.0), 1.0, 10), (None, 2.0, 20), (None, 3.0, 30)]);
        let m = correlate(&t, &[Column::Interest, Column::Close]);
        assert_eq!(m.get(Column::Interest, Column::Close), None);
        // The close/volume pair still has its three rows.
        assert!(m.get(Column::Close, Column::Volume).is_some());
    }

    #[test]
    fn test_zero_variance_is_undefined() {
        let t = table(vec![(Some(5.0), 1.0, 10), (Some(5.0), 2.0, 20)]);
        let m = correlate(&t, &[Column::Interest, Column::Close]);
        assert_eq!(m.get(Column::Interest, Column::Close), None);
        assert_eq!(m.get(Column::Interest, Column::Interest), None);
    }

    #[test]
    fn test_pairwise_complete_uses_per_pair_rows() {
        let t = table(vec![
            (Some(1.0), 10.0, 100),
            (None, 20.0, 50),
            (Some(3.0), 30.0, 25),
        ]);
        let m = correlate(&t, &[Column::Interest, Column::Close, Column::Volume]);
        // interest vs close uses rows 0 and 2 only, still a perfect line.
        assert!((m.get(Column::Interest, Column::Close).unwrap() - 1.0).abs() < 1e-12);
        // close vs volume uses all three rows.
        assert!(m.get(Column::Close, Column::Volume).unwrap() < 0.0);
    }
}
