//! PathAgg: Pathway Aggregation of Gene Expression
//!
//! This library converts gene-level expression measurements into pathway-level
//! scores using a static gene-to-pathway annotation table. Treatment samples
//! are compared against a reference group by log2 fold change, and each
//! pathway is scored as the mean absolute fold change of its measured genes.
//!
//! The main components of this library are:
//! - `AnnotationIndex`: The gene-to-pathway membership relation
//! - `FoldChangeCalculator`: Log2 fold change against the reference geometric mean;
//!   `FoldChangeCalculator::with_reference(label).compute(expr, meta)` selects
//!   the reference group by its label
//! - `PathwayAggregator`: Per-pathway, per-sample aggregate scores, for
//!   requested pathways (`aggregate`) or all measured ones (`aggregate_all`)
//! - `PathwayAnalysis`: A session reusing one fold-change matrix across requests
//! - `io`: CSV loaders and writers for the input and output tables

mod aggregate;
mod analysis;
mod annotation;
mod config;
mod error;
mod fold_change;
pub mod io;
mod math;
mod matrix;
mod metadata;
mod results;
mod utils;

pub use aggregate::{aggregate, aggregate_all, PathwayAggregator};
pub use analysis::PathwayAnalysis;
pub use annotation::{AnnotationIndex, AnnotationRecord};
pub use config::{AggregateConfig, FoldChangeConfig, DEFAULT_PSEUDOCOUNT, DEFAULT_REFERENCE_LABEL};
pub use error::{PathwayError, Result};
pub use fold_change::FoldChangeCalculator;
pub use matrix::{ExpressionMatrix, FoldChangeMatrix, Matrix, PathwayExpressionMatrix};
pub use metadata::SampleMetadata;
pub use results::{EmptyPathway, PathwayExpression, PathwayResult};
