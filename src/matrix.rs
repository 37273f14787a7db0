use std::collections::HashMap;

use itertools::Itertools;

use crate::{
    error::{PathwayError, Result},
    utils::resolve_columns,
};

/// Raw per-gene expression values (genes x samples)
pub type ExpressionMatrix = Matrix;

/// Per-gene log2 fold changes (genes x treatment samples)
pub type FoldChangeMatrix = Matrix;

/// Per-pathway aggregate scores (pathways x treatment samples)
pub type PathwayExpressionMatrix = Matrix;

/// A dense, row-major matrix of `f64` with unique row and column labels
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    row_ids: Vec<String>,
    column_ids: Vec<String>,
    data: Vec<f64>,
    row_lookup: HashMap<String, usize>,
    column_lookup: HashMap<String, usize>,
}
impl Matrix {
    /// Create a matrix from one `Vec` per row
    pub fn new(
        row_ids: Vec<String>,
        column_ids: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self> {
        if rows.len() != row_ids.len() {
            return Err(PathwayError::DimensionMismatch(format!(
                "{} row labels for {} rows",
                row_ids.len(),
                rows.len()
            )));
        }
        let n_columns = column_ids.len();
        let mut data = Vec::with_capacity(rows.len() * n_columns);
        for (row_id, row) in row_ids.iter().zip(rows) {
            if row.len() != n_columns {
                return Err(PathwayError::DimensionMismatch(format!(
                    "row '{row_id}' has {} values, expected {n_columns}",
                    row.len()
                )));
            }
            data.extend(row);
        }
        Self::from_flat(row_ids, column_ids, data)
    }

    /// Create a matrix from row-major flat data
    pub fn from_flat(
        row_ids: Vec<String>,
        column_ids: Vec<String>,
        data: Vec<f64>,
    ) -> Result<Self> {
        if data.len() != row_ids.len() * column_ids.len() {
            return Err(PathwayError::DimensionMismatch(format!(
                "{} values for a {}x{} matrix",
                data.len(),
                row_ids.len(),
                column_ids.len()
            )));
        }
        let row_lookup = build_lookup(&row_ids)?;
        let column_lookup = build_lookup(&column_ids)?;
        Ok(Self {
            row_ids,
            column_ids,
            data,
            row_lookup,
            column_lookup,
        })
    }

    pub fn row_ids(&self) -> &[String] {
        &self.row_ids
    }

    pub fn column_ids(&self) -> &[String] {
        &self.column_ids
    }

    pub fn n_rows(&self) -> usize {
        self.row_ids.len()
    }

    pub fn n_columns(&self) -> usize {
        self.column_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }

    pub fn row_index(&self, row_id: &str) -> Option<usize> {
        self.row_lookup.get(row_id).copied()
    }

    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.column_lookup.get(column_id).copied()
    }

    /// Values of the row at position `index`
    ///
    /// Panics if `index` is out of bounds.
    pub fn row_at(&self, index: usize) -> &[f64] {
        let n = self.n_columns();
        &self.data[index * n..(index + 1) * n]
    }

    pub fn row(&self, row_id: &str) -> Option<&[f64]> {
        self.row_index(row_id).map(|i| self.row_at(i))
    }

    pub fn get(&self, row_id: &str, column_id: &str) -> Option<f64> {
        let row = self.row(row_id)?;
        self.column_index(column_id).map(|j| row[j])
    }

    /// Iterate over `(row_id, values)` in row order
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.row_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), self.row_at(i)))
    }

    /// New matrix holding only the named columns, in the order given
    pub fn select_columns<S: AsRef<str>>(&self, column_ids: &[S]) -> Result<Self> {
        let indices = resolve_columns(self, column_ids)?;
        let data = (0..self.n_rows())
            .flat_map(|i| {
                let row = self.row_at(i);
                indices.iter().map(move |&j| row[j])
            })
            .collect();
        Self::from_flat(
            self.row_ids.clone(),
            column_ids.iter().map(|c| c.as_ref().to_string()).collect(),
            data,
        )
    }

    /// Apply `f` to every value, keeping the labels
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self {
            data: self.data.iter().map(|v| f(*v)).collect(),
            ..self.clone()
        }
    }
}

fn build_lookup(ids: &[String]) -> Result<HashMap<String, usize>> {
    if let Some(duplicate) = ids.iter().duplicates().next() {
        return Err(PathwayError::DuplicateLabel(duplicate.clone()));
    }
    Ok(ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), i))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn example() -> Matrix {
        Matrix::new(
            labels(&["g1", "g2"]),
            labels(&["s1", "s2", "s3"]),
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let m = example();
        assert_eq!(m.n_rows(), 2);
        assert_eq!(m.n_columns(), 3);
        assert_eq!(m.row("g2"), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(m.get("g1", "s3"), Some(3.0));
        assert_eq!(m.get("g3", "s1"), None);
        assert_eq!(m.get("g1", "s4"), None);
        assert_eq!(m.column_index("s2"), Some(1));
    }

    #[test]
    fn test_ragged_rows() {
        let err = Matrix::new(
            labels(&["g1", "g2"]),
            labels(&["s1", "s2"]),
            vec![vec![1.0, 2.0], vec![3.0]],
        )
        .unwrap_err();
        assert!(matches!(err, PathwayError::DimensionMismatch(_)));
    }

    #[test]
    fn test_row_label_count() {
        let err = Matrix::new(labels(&["g1"]), labels(&["s1"]), vec![vec![1.0], vec![2.0]])
            .unwrap_err();
        assert!(matches!(err, PathwayError::DimensionMismatch(_)));
    }

    #[test]
    fn test_duplicate_labels() {
        let err = Matrix::new(
            labels(&["g1", "g1"]),
            labels(&["s1"]),
            vec![vec![1.0], vec![2.0]],
        )
        .unwrap_err();
        assert_eq!(err, PathwayError::DuplicateLabel("g1".to_string()));

        let err = Matrix::from_flat(labels(&["g1"]), labels(&["s1", "s1"]), vec![1.0, 2.0])
            .unwrap_err();
        assert_eq!(err, PathwayError::DuplicateLabel("s1".to_string()));
    }

    #[test]
    fn test_select_columns() {
        let m = example().select_columns(&["s3", "s1"]).unwrap();
        assert_eq!(m.column_ids(), &labels(&["s3", "s1"])[..]);
        assert_eq!(m.row("g1"), Some(&[3.0, 1.0][..]));
        assert_eq!(m.row("g2"), Some(&[6.0, 4.0][..]));
    }

    #[test]
    fn test_select_missing_column() {
        let err = example().select_columns(&["s1", "s9"]).unwrap_err();
        assert_eq!(err, PathwayError::MissingColumn("s9".to_string()));
    }

    #[test]
    fn test_map() {
        let m = example().map(|v| -v);
        assert_eq!(m.row("g1"), Some(&[-1.0, -2.0, -3.0][..]));
        assert_eq!(m.row_ids(), example().row_ids());
    }

    #[test]
    fn test_no_columns() {
        let m = Matrix::new(labels(&["g1"]), vec![], vec![vec![]]).unwrap();
        assert!(m.row("g1").unwrap().is_empty());
        assert_eq!(m.rows().count(), 1);
    }
}
