use tracing::debug;

use crate::{
    config::FoldChangeConfig,
    error::{PathwayError, Result},
    math::{geometric_mean, log2_ratio},
    matrix::{ExpressionMatrix, FoldChangeMatrix},
    metadata::SampleMetadata,
    utils::{resolve_columns, select_indices},
};

/// Computes per-gene log2 fold changes of treatment samples against the
/// reference group
///
/// The reference centroid of a gene is the geometric mean of its
/// pseudocounted reference values. Each treatment value, also pseudocounted,
/// is compared against that centroid. The computation is pure: identical
/// inputs always produce an identical matrix.
#[derive(Debug, Clone, Default)]
pub struct FoldChangeCalculator {
    config: FoldChangeConfig,
}
impl FoldChangeCalculator {
    pub fn new(config: FoldChangeConfig) -> Self {
        Self { config }
    }

    /// Calculator using `reference_label` and the default pseudocount
    pub fn with_reference(reference_label: &str) -> Self {
        Self::new(
            FoldChangeConfig::builder()
                .reference_label(reference_label)
                .build(),
        )
    }

    pub fn config(&self) -> &FoldChangeConfig {
        &self.config
    }

    /// Compute the fold-change matrix
    ///
    /// Rows follow the gene order of `expr`, columns follow the metadata order
    /// of the treatment samples.
    pub fn compute(
        &self,
        expr: &ExpressionMatrix,
        meta: &SampleMetadata,
    ) -> Result<FoldChangeMatrix> {
        self.config.validate()?;
        let reference_label = self.config.reference_label.as_str();
        let pseudocount = self.config.pseudocount;

        if expr.is_empty() {
            return Err(PathwayError::MissingInput(
                "expression matrix has no genes".to_string(),
            ));
        }

        let (reference, treatment) = meta.partition(reference_label);
        if reference.is_empty() {
            return Err(PathwayError::EmptyGroup(format!(
                "reference '{reference_label}'"
            )));
        }
        if treatment.is_empty() {
            return Err(PathwayError::EmptyGroup(format!(
                "treatment (not '{reference_label}')"
            )));
        }
        debug!(
            "Computing fold change for {} genes: {} reference, {} treatment samples",
            expr.n_rows(),
            reference.len(),
            treatment.len()
        );

        let reference_idx = resolve_columns(expr, &reference)?;
        let treatment_idx = resolve_columns(expr, &treatment)?;
        validate_values(expr, &reference_idx)?;
        validate_values(expr, &treatment_idx)?;

        let mut data = Vec::with_capacity(expr.n_rows() * treatment.len());
        for i in 0..expr.n_rows() {
            let row = expr.row_at(i);
            let reference_values = select_indices(&reference_idx, row)
                .into_iter()
                .map(|v| v + pseudocount)
                .collect::<Vec<_>>();
            let centroid = geometric_mean(&reference_values);
            data.extend(
                select_indices(&treatment_idx, row)
                    .into_iter()
                    .map(|v| log2_ratio(v + pseudocount, centroid)),
            );
        }

        // from_flat rejects a gene/value count mismatch as DimensionMismatch
        FoldChangeMatrix::from_flat(
            expr.row_ids().to_vec(),
            treatment.iter().map(|s| s.to_string()).collect(),
            data,
        )
    }
}

/// Rejects negative or non-finite values in the given columns
fn validate_values(expr: &ExpressionMatrix, columns: &[usize]) -> Result<()> {
    for (gene, row) in expr.rows() {
        for &j in columns {
            let value = row[j];
            if !value.is_finite() || value < 0.0 {
                return Err(PathwayError::InvalidValue(format!(
                    "expression of gene '{gene}' in sample '{}' is {value}",
                    expr.column_ids()[j]
                )));
            }
        }
    }
    Ok(())
}
