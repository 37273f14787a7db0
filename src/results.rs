use derive_new::new;

use crate::{
    error::Result,
    matrix::{Matrix, PathwayExpressionMatrix},
};

/// A pathway excluded from the result because none of its genes were measured
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct EmptyPathway {
    pub pathway_id: String,
}

/// Scores of a single pathway across the fold-change samples
#[derive(Debug, Clone, PartialEq, new)]
pub struct PathwayResult {
    pub pathway_id: String,
    /// Number of member genes present in the fold-change matrix
    pub n_genes: usize,
    pub scores: Vec<f64>,
}

/// Output of a pathway aggregation
///
/// Holds the pathway x sample score matrix together with the pathways that
/// were excluded for lack of measured genes.
#[derive(Debug, Clone, PartialEq)]
pub struct PathwayExpression {
    pub matrix: PathwayExpressionMatrix,
    pub gene_counts: Vec<usize>,
    pub warnings: Vec<EmptyPathway>,
}
impl PathwayExpression {
    /// Assemble the result keeping the order of `results`
    pub fn from_vec(
        results: Vec<PathwayResult>,
        sample_ids: Vec<String>,
        warnings: Vec<EmptyPathway>,
    ) -> Result<Self> {
        let mut pathway_ids = Vec::with_capacity(results.len());
        let mut gene_counts = Vec::with_capacity(results.len());
        let mut rows = Vec::with_capacity(results.len());
        for result in results {
            pathway_ids.push(result.pathway_id);
            gene_counts.push(result.n_genes);
            rows.push(result.scores);
        }
        let matrix = Matrix::new(pathway_ids, sample_ids, rows)?;
        Ok(Self {
            matrix,
            gene_counts,
            warnings,
        })
    }

    pub fn pathway_ids(&self) -> &[String] {
        self.matrix.row_ids()
    }

    pub fn sample_ids(&self) -> &[String] {
        self.matrix.column_ids()
    }

    pub fn score(&self, pathway_id: &str, sample_id: &str) -> Option<f64> {
        self.matrix.get(pathway_id, sample_id)
    }

    pub fn gene_count(&self, pathway_id: &str) -> Option<usize> {
        self.matrix
            .row_index(pathway_id)
            .map(|i| self.gene_counts[i])
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn pprint(&self) {
        println!("Pathway\tGenes\t{}", self.sample_ids().join("\t"));
        for (i, (pathway, scores)) in self.matrix.rows().enumerate() {
            let scores = scores.iter().map(|s| s.to_string()).collect::<Vec<_>>();
            println!("{}\t{}\t{}", pathway, self.gene_counts[i], scores.join("\t"));
        }
    }
}
