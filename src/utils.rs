use itertools::Itertools;

use crate::{
    error::{PathwayError, Result},
    matrix::Matrix,
};

pub fn select_indices<T: Copy>(indices: &[usize], data: &[T]) -> Vec<T> {
    indices.iter().map(|i| data[*i]).collect()
}

/// Positions of the named columns, failing on the first one absent from `matrix`
pub fn resolve_columns<S: AsRef<str>>(matrix: &Matrix, column_ids: &[S]) -> Result<Vec<usize>> {
    column_ids
        .iter()
        .map(|id| {
            let id = id.as_ref();
            matrix
                .column_index(id)
                .ok_or_else(|| PathwayError::MissingColumn(id.to_string()))
        })
        .collect()
}

/// Drops repeated ids, keeping the first occurrence of each
pub fn unique_in_order<S: AsRef<str>>(ids: &[S]) -> Vec<&str> {
    ids.iter().map(|id| id.as_ref()).unique().collect()
}
