use thiserror::Error;

/// Errors raised while building inputs or computing pathway scores.
///
/// Every variant aborts the current computation. Pathways without measured
/// genes are not errors; they are reported as [`crate::EmptyPathway`] warnings.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PathwayError {
    /// A required input table was not supplied or was empty
    #[error("missing input: {0}")]
    MissingInput(String),

    /// A sample group has no members
    #[error("sample group '{0}' has no members")]
    EmptyGroup(String),

    /// A referenced column is absent from a table
    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A pathway id is absent from the annotation index
    #[error("pathway '{0}' not found")]
    NotFound(String),

    #[error("duplicate label '{0}'")]
    DuplicateLabel(String),

    /// A value is outside the domain of the computation (negative, NaN, empty id)
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, PathwayError>;
