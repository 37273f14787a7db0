use std::borrow::Cow;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{
    annotation::AnnotationIndex,
    config::AggregateConfig,
    error::{PathwayError, Result},
    math::mean_absolute,
    matrix::FoldChangeMatrix,
    results::{EmptyPathway, PathwayExpression, PathwayResult},
    utils::unique_in_order,
};

/// Aggregates gene-level fold changes into pathway-level scores
///
/// The score of a pathway in a sample is the mean absolute fold change over
/// the pathway genes present in the fold-change matrix. Genes that were not
/// measured do not count towards the denominator.
pub struct PathwayAggregator<'a> {
    fold_change: &'a FoldChangeMatrix,
    index: &'a AnnotationIndex,
    /// `index` restricted to the genes of `fold_change`
    measured: Cow<'a, AnnotationIndex>,
    config: AggregateConfig,
}
impl<'a> PathwayAggregator<'a> {
    pub fn new(
        fold_change: &'a FoldChangeMatrix,
        index: &'a AnnotationIndex,
        config: AggregateConfig,
    ) -> Self {
        let measured = index.restrict_to_genes(fold_change.row_ids().iter().map(|g| g.as_str()));
        Self::with_measured(fold_change, index, Cow::Owned(measured), config)
    }

    /// Reuse an index already restricted to the genes of `fold_change`
    pub(crate) fn with_measured(
        fold_change: &'a FoldChangeMatrix,
        index: &'a AnnotationIndex,
        measured: Cow<'a, AnnotationIndex>,
        config: AggregateConfig,
    ) -> Self {
        debug!(
            "{} of {} pathways have measured genes",
            measured.n_pathways(),
            index.n_pathways()
        );
        Self {
            fold_change,
            index,
            measured,
            config,
        }
    }

    /// Score the requested pathways
    ///
    /// Without `pathway_ids` every pathway with a measured gene is scored in
    /// lexicographic order. With `pathway_ids` rows follow the given order;
    /// an id unknown to the annotation index is an error.
    ///
    /// In both cases, annotated pathways without measured genes are excluded
    /// and reported as warnings. A non-finite fold change is an error.
    pub fn aggregate<S: AsRef<str>>(&self, pathway_ids: Option<&[S]>) -> Result<PathwayExpression> {
        validate_finite(self.fold_change)?;
        let (resolved, warnings) = self.resolve_pathways(pathway_ids)?;
        debug!(
            "Aggregating {} pathways over {} samples",
            resolved.len(),
            self.fold_change.n_columns()
        );

        let results = if self.config.parallel {
            resolved
                .par_iter()
                .map(|pathway| self.process_pathway(pathway))
                .collect::<Result<Vec<_>>>()?
        } else {
            resolved
                .iter()
                .map(|pathway| self.process_pathway(pathway))
                .collect::<Result<Vec<_>>>()?
        };

        PathwayExpression::from_vec(results, self.fold_change.column_ids().to_vec(), warnings)
    }

    /// Score every pathway with a measured gene, in lexicographic order
    pub fn aggregate_all(&self) -> Result<PathwayExpression> {
        self.aggregate::<&str>(None)
    }

    /// Determine the row order and collect pathways without measured genes
    fn resolve_pathways<'s, S: AsRef<str>>(
        &'s self,
        pathway_ids: Option<&'s [S]>,
    ) -> Result<(Vec<&'s str>, Vec<EmptyPathway>)> {
        let requested = match pathway_ids {
            Some(ids) => {
                let ids = unique_in_order(ids);
                // unknown ids abort before any scoring
                for id in &ids {
                    self.index.genes_of_pathway(id)?;
                }
                ids
            }
            None => self.index.all_pathway_ids(),
        };

        let mut resolved = Vec::with_capacity(requested.len());
        let mut warnings = Vec::new();
        for id in requested {
            if self.measured.contains_pathway(id) {
                resolved.push(id);
            } else {
                warn!("Pathway '{id}' has no measured genes and is excluded");
                warnings.push(EmptyPathway::new(id.to_string()));
            }
        }
        Ok((resolved, warnings))
    }

    /// Score a single pathway across all samples
    fn process_pathway(&self, pathway_id: &str) -> Result<PathwayResult> {
        let rows = self
            .measured
            .genes_of_pathway(pathway_id)?
            .iter()
            .filter_map(|gene| self.fold_change.row(gene))
            .collect::<Vec<_>>();

        let scores = (0..self.fold_change.n_columns())
            .map(|j| {
                let values = rows.iter().map(|row| row[j]).collect::<Vec<_>>();
                mean_absolute(&values)
            })
            .collect();

        Ok(PathwayResult::new(pathway_id.to_string(), rows.len(), scores))
    }
}

/// Rejects NaN and infinite fold changes, which would leak into the scores
fn validate_finite(fold_change: &FoldChangeMatrix) -> Result<()> {
    for (gene, row) in fold_change.rows() {
        if let Some(j) = row.iter().position(|v| !v.is_finite()) {
            return Err(PathwayError::InvalidValue(format!(
                "fold change of gene '{gene}' in sample '{}' is {}",
                fold_change.column_ids()[j],
                row[j]
            )));
        }
    }
    Ok(())
}

/// Score pathways of `index` against `fold_change` with the default configuration
pub fn aggregate<S: AsRef<str>>(
    fold_change: &FoldChangeMatrix,
    index: &AnnotationIndex,
    pathway_ids: Option<&[S]>,
) -> Result<PathwayExpression> {
    PathwayAggregator::new(fold_change, index, AggregateConfig::default()).aggregate(pathway_ids)
}

/// Score every measured pathway of `index` with the default configuration
pub fn aggregate_all(
    fold_change: &FoldChangeMatrix,
    index: &AnnotationIndex,
) -> Result<PathwayExpression> {
    PathwayAggregator::new(fold_change, index, AggregateConfig::default()).aggregate_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationRecord;
    use approx::assert_relative_eq;

    fn labels(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn example_index() -> AnnotationIndex {
        AnnotationIndex::build(
            [("g1", "pA"), ("g2", "pA"), ("g3", "pB"), ("g9", "pC")]
                .iter()
                .map(|(g, p)| AnnotationRecord::new(g.to_string(), p.to_string())),
        )
        .unwrap()
    }

    fn example_fc() -> FoldChangeMatrix {
        FoldChangeMatrix::new(
            labels(&["g1", "g2", "g3"]),
            labels(&["s1"]),
            vec![vec![2.0], vec![-2.0], vec![1.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_mean_absolute_scores() {
        let fc = example_fc();
        let index = example_index();
        let result = aggregate_all(&fc, &index).unwrap();
        assert_eq!(result.pathway_ids(), &labels(&["pA", "pB"])[..]);
        assert_relative_eq!(result.score("pA", "s1").unwrap(), 2.0);
        assert_relative_eq!(result.score("pB", "s1").unwrap(), 1.0);
        assert_eq!(result.gene_count("pA"), Some(2));
    }

    #[test]
    fn test_empty_pathway_is_warned() {
        let fc = example_fc();
        let index = example_index();
        let result = aggregate_all(&fc, &index).unwrap();
        assert_eq!(result.score("pC", "s1"), None);
        assert_eq!(result.warnings, vec![EmptyPathway::new("pC".to_string())]);

        let result = aggregate(&fc, &index, Some(&["pC", "pA"][..])).unwrap();
        assert_eq!(result.pathway_ids(), &labels(&["pA"])[..]);
        assert_eq!(result.warnings, vec![EmptyPathway::new("pC".to_string())]);
    }

    #[test]
    fn test_requested_order() {
        let fc = example_fc();
        let index = example_index();
        let result = aggregate(&fc, &index, Some(&["pB", "pA"][..])).unwrap();
        assert_eq!(result.pathway_ids(), &labels(&["pB", "pA"])[..]);
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_requested_duplicates() {
        let fc = example_fc();
        let index = example_index();
        let result = aggregate(&fc, &index, Some(&["pB", "pA", "pB"][..])).unwrap();
        assert_eq!(result.pathway_ids(), &labels(&["pB", "pA"])[..]);
    }

    #[test]
    fn test_unknown_pathway() {
        let fc = example_fc();
        let index = example_index();
        let err = aggregate(&fc, &index, Some(&["pA", "pX"][..])).unwrap_err();
        assert_eq!(err, PathwayError::NotFound("pX".to_string()));
    }

    #[test]
    fn test_denominator_counts_measured_genes() {
        // pA nominally holds g1, g2 and g4 but g4 is not measured
        let index = AnnotationIndex::build(
            [("g1", "pA"), ("g2", "pA"), ("g4", "pA")]
                .iter()
                .map(|(g, p)| AnnotationRecord::new(g.to_string(), p.to_string())),
        )
        .unwrap();
        let result = aggregate_all(&example_fc(), &index).unwrap();
        assert_relative_eq!(result.score("pA", "s1").unwrap(), 2.0);
        assert_eq!(result.gene_count("pA"), Some(2));
    }

    #[test]
    fn test_sign_invariance() {
        let fc = FoldChangeMatrix::new(
            labels(&["g1", "g2", "g3"]),
            labels(&["s1", "s2"]),
            vec![vec![0.5, -1.5], vec![-2.0, 3.0], vec![1.0, 0.25]],
        )
        .unwrap();
        let index = example_index();
        let original = aggregate_all(&fc, &index).unwrap();
        let negated = aggregate_all(&fc.map(|v| -v), &index).unwrap();
        assert_eq!(original.matrix, negated.matrix);
    }

    #[test]
    fn test_deterministic() {
        let fc = FoldChangeMatrix::new(
            labels(&["g1", "g2", "g3"]),
            labels(&["s1", "s2", "s3"]),
            vec![
                vec![0.1, -0.7, 1.3],
                vec![2.9, 0.003, -4.4],
                vec![-0.2, 0.6, 1.1],
            ],
        )
        .unwrap();
        let index = example_index();
        let a = aggregate_all(&fc, &index).unwrap();
        let b = aggregate_all(&fc, &index).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let fc = example_fc();
        let index = example_index();
        let parallel = PathwayAggregator::new(&fc, &index, AggregateConfig::default())
            .aggregate_all()
            .unwrap();
        let sequential = PathwayAggregator::new(
            &fc,
            &index,
            AggregateConfig::builder().parallel(false).build(),
        )
        .aggregate_all()
        .unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_columns_match_fold_change() {
        let fc = FoldChangeMatrix::new(
            labels(&["g1", "g3"]),
            labels(&["t2", "t1"]),
            vec![vec![1.0, -3.0], vec![4.0, 0.0]],
        )
        .unwrap();
        let result = aggregate_all(&fc, &example_index()).unwrap();
        assert_eq!(result.sample_ids(), fc.column_ids());
        assert_relative_eq!(result.score("pA", "t1").unwrap(), 3.0);
        assert_relative_eq!(result.score("pB", "t1").unwrap(), 0.0);
        for (_, scores) in result.matrix.rows() {
            assert!(scores.iter().all(|s| *s >= 0.0));
        }
    }

    #[test]
    fn test_non_finite_fold_change() {
        let index = example_index();
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let fc = FoldChangeMatrix::new(
                labels(&["g1", "g2"]),
                labels(&["s1"]),
                vec![vec![bad], vec![1.0]],
            )
            .unwrap();
            let err = aggregate_all(&fc, &index).unwrap_err();
            assert!(matches!(err, PathwayError::InvalidValue(_)));
            let err = aggregate(&fc, &index, Some(&["pA"][..])).unwrap_err();
            assert!(matches!(err, PathwayError::InvalidValue(_)));
        }
    }

    #[test]
    fn test_aggregate_all_matches_default_listing() {
        let fc = example_fc();
        let index = example_index();
        let all = aggregate_all(&fc, &index).unwrap();
        let none = aggregate::<String>(&fc, &index, None).unwrap();
        assert_eq!(all, none);
    }
}
