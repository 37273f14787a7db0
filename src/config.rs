use bon::Builder;

use crate::error::{PathwayError, Result};

/// Pseudocount added to every raw value before taking ratios
pub const DEFAULT_PSEUDOCOUNT: f64 = 0.1;

/// Group label marking the reference (normal) samples
pub const DEFAULT_REFERENCE_LABEL: &str = "0";

/// Configuration for the fold-change computation
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct FoldChangeConfig {
    /// Samples carrying this group label form the reference group,
    /// every other label is treated as a treatment sample
    #[builder(into, default = DEFAULT_REFERENCE_LABEL.to_string())]
    pub reference_label: String,

    #[builder(default = DEFAULT_PSEUDOCOUNT)]
    pub pseudocount: f64,
}
impl FoldChangeConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.pseudocount.is_finite() || self.pseudocount <= 0.0 {
            return Err(PathwayError::InvalidValue(format!(
                "pseudocount must be a positive finite number, got {}",
                self.pseudocount
            )));
        }
        Ok(())
    }
}
impl Default for FoldChangeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Configuration for the pathway aggregation
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
pub struct AggregateConfig {
    /// Score pathways on the rayon thread pool
    #[builder(default = true)]
    pub parallel: bool,
}
impl Default for AggregateConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
