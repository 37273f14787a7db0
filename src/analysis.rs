use std::borrow::Cow;

use crate::{
    aggregate::PathwayAggregator,
    annotation::AnnotationIndex,
    config::{AggregateConfig, FoldChangeConfig},
    error::Result,
    fold_change::FoldChangeCalculator,
    matrix::{ExpressionMatrix, FoldChangeMatrix},
    metadata::SampleMetadata,
    results::PathwayExpression,
};

/// An analysis session over one annotation index and one fold-change matrix
///
/// The fold change and the restriction of the index to the measured genes are
/// computed once. Pathway expression is recomputed on every request, since it
/// depends on which pathways are asked for.
#[derive(Debug, Clone)]
pub struct PathwayAnalysis {
    index: AnnotationIndex,
    measured: AnnotationIndex,
    fold_change: FoldChangeMatrix,
    config: AggregateConfig,
}
impl PathwayAnalysis {
    pub fn new(index: AnnotationIndex, fold_change: FoldChangeMatrix) -> Self {
        let measured = index.restrict_to_genes(fold_change.row_ids().iter().map(|g| g.as_str()));
        Self {
            index,
            measured,
            fold_change,
            config: AggregateConfig::default(),
        }
    }

    /// Compute the fold change from raw expression and open a session on it
    pub fn from_expression(
        index: AnnotationIndex,
        expr: &ExpressionMatrix,
        meta: &SampleMetadata,
        config: FoldChangeConfig,
    ) -> Result<Self> {
        let fold_change = FoldChangeCalculator::new(config).compute(expr, meta)?;
        Ok(Self::new(index, fold_change))
    }

    pub fn with_config(mut self, config: AggregateConfig) -> Self {
        self.config = config;
        self
    }

    pub fn index(&self) -> &AnnotationIndex {
        &self.index
    }

    /// The annotation index restricted to genes of the fold-change matrix
    pub fn measured_index(&self) -> &AnnotationIndex {
        &self.measured
    }

    pub fn fold_change(&self) -> &FoldChangeMatrix {
        &self.fold_change
    }

    pub fn pathway_expression<S: AsRef<str>>(
        &self,
        pathway_ids: Option<&[S]>,
    ) -> Result<PathwayExpression> {
        PathwayAggregator::with_measured(
            &self.fold_change,
            &self.index,
            Cow::Borrowed(&self.measured),
            self.config,
        )
        .aggregate(pathway_ids)
    }

    /// Pathway expression of every pathway with a measured gene
    pub fn all_pathway_expression(&self) -> Result<PathwayExpression> {
        self.pathway_expression::<&str>(None)
    }
}
