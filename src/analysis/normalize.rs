use crate::models::AlignedTable;

/// Sentinel for a constant volume column (including single-row tables): the
/// midpoint of the [0,100] scale. A constant column carries no ordering
/// information, so the midpoint is the least misleading defined value.
pub const CONSTANT_VOLUME_SENTINEL: f64 = 50.0;

/// Populate `volume_normalized`: min-max scaling of the volume column into
/// [0,100] over the table's current row set.
///
/// The column depends on the other rows (min/max), so it is recomputed from
/// scratch here on every call; a table whose row set changed must pass
/// through this again. When `max == min` every row gets
/// `CONSTANT_VOLUME_SENTINEL` rather than a division-by-zero NaN.
pub fn normalize_volume(table: AlignedTable) -> AlignedTable {
    let mut table = table;
    if table.rows.is_empty() {
        return table;
    }

    let min = table.rows.iter().map(|r| r.volume).min().unwrap_or(0) as f64;
    let max = table.rows.iter().map(|r| r.volume).max().unwrap_or(0) as f64;
    let range = max - min;

    for row in table.rows.iter_mut() {
        row.volume_normalized = if range == 0.0 {
            Some(CONSTANT_VOLUME_SENTINEL)
        } else {
            Some((row.volume as f64 - min) / range * 100.0)
        };
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlignedRow;
    use chrono::NaiveDate;

    fn table(volumes: &[u64]) -> AlignedTable {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        AlignedTable {
            term: "tesla stock".to_string(),
            ticker: "TSLA".to_string(),
            rows: volumes
                .iter()
                .enumerate()
                .map(|(i, &v)| AlignedRow {
                    date: base + chrono::Duration::days(i as i64),
                    interest: Some(50.0),
                    interest_pct_change: None,
                    open: 1.0,
                    high: 2.0,
                    low: 0.5,
                    close: 1.5,
                    volume: v,
                    volume_normalized: None,
                })
                .collect(),
        }
    }

    fn normalized(table: &AlignedTable) -> Vec<Option<f64>> {
        table.rows.iter().map(|r| r.volume_normalized).collect()
    }

    #[test]
    fn test_min_max_scaling() {
        let out = normalize_volume(table(&[10, 20, 30]));
        assert_eq!(normalized(&out), vec![Some(0.0), Some(50.0), Some(100.0)]);
    }

    #[test]
    fn test_constant_volume_gets_sentinel() {
        let out = normalize_volume(table(&[5, 5, 5]));
        assert_eq!(
            normalized(&out),
            vec![Some(50.0), Some(50.0), Some(50.0)]
        );
    }

    #[test]
    fn test_single_row_gets_sentinel() {
        let out = normalize_volume(table(&[42]));
        assert_eq!(normalized(&out), vec![Some(50.0)]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_volume(table(&[10, 20, 30]));
        let twice = normalize_volume(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_table_unchanged() {
        let out = normalize_volume(table(&[]));
        assert!(out.rows.is_empty());
    }
}
