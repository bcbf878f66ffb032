use serde::{Deserialize, Serialize};

use crate::models::aligned::AlignedRow;

/// Numeric columns of the aligned table that participate in correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Interest,
    InterestPctChange,
    Open,
    High,
    Low,
    Close,
    Volume,
    VolumeNormalized,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Interest,
        Column::InterestPctChange,
        Column::Open,
        Column::High,
        Column::Low,
        Column::Close,
        Column::Volume,
        Column::VolumeNormalized,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Column::Interest => "interest",
            Column::InterestPctChange => "interest_pct",
            Column::Open => "open",
            Column::High => "high",
            Column::Low => "low",
            Column::Close => "close",
            Column::Volume => "volume",
            Column::VolumeNormalized => "volume_norm",
        }
    }

    /// Extract this column's value from a row. `None` means missing.
    pub fn extract(&self, row: &AlignedRow) -> Option<f64> {
        match self {
            Column::Interest => row.interest,
            Column::InterestPctChange => row.interest_pct_change,
            Column::Open => Some(row.open),
            Column::High => Some(row.high),
            Column::Low => Some(row.low),
            Column::Close => Some(row.close),
            Column::Volume => Some(row.volume as f64),
            Column::VolumeNormalized => row.volume_normalized,
        }
    }
}

/// Square, symmetric Pearson matrix over a column set.
///
/// `None` cells are undefined: fewer than two pairwise-complete rows, or a
/// zero-variance column. Stored as a flat row-major vector, indexed by
/// position in `columns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<Column>,
    cells: Vec<Option<f64>>,
}

impl CorrelationMatrix {
    pub fn new(columns: Vec<Column>) -> Self {
        let n = columns.len();
        Self {
            columns,
            cells: vec![None; n * n],
        }
    }

    fn index_of(&self, column: Column) -> Option<usize> {
        self.columns.iter().position(|&c| c == column)
    }

    pub fn set(&mut self, a: Column, b: Column, value: Option<f64>) {
        let n = self.columns.len();
        if let (Some(i), Some(j)) = (self.index_of(a), self.index_of(b)) {
            self.cells[i * n + j] = value;
            self.cells[j * n + i] = value;
        }
    }

    pub fn get(&self, a: Column, b: Column) -> Option<f64> {
        let n = self.columns.len();
        match (self.index_of(a), self.index_of(b)) {
            (Some(i), Some(j)) => self.cells[i * n + j],
            _ => None,
        }
    }

    pub fn get_by_index(&self, i: usize, j: usize) -> Option<f64> {
        self.cells[i * self.columns.len() + j]
    }

    pub fn size(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_symmetric_set() {
        let mut matrix = CorrelationMatrix::new(vec![Column::Close, Column::Volume]);
        matrix.set(Column::Close, Column::Volume, Some(0.5));
        assert_eq!(matrix.get(Column::Volume, Column::Close), Some(0.5));
        assert_eq!(matrix.get(Column::Close, Column::Volume), Some(0.5));
    }

    #[test]
    fn test_unknown_column_is_none() {
        let matrix = CorrelationMatrix::new(vec![Column::Close]);
        assert_eq!(matrix.get(Column::Close, Column::Volume), None);
    }
}
