/// Geometric mean computed in log space
///
/// All values must be strictly positive.
pub fn geometric_mean(x: &[f64]) -> f64 {
    let sum = x.iter().map(|v| v.ln()).sum::<f64>();
    (sum / x.len() as f64).exp()
}

/// Mean of the absolute values
///
/// Up- and down-regulation contribute equally.
pub fn mean_absolute(x: &[f64]) -> f64 {
    x.iter().map(|v| v.abs()).sum::<f64>() / x.len() as f64
}

/// Base-2 log fold change of `value` against `reference`
pub fn log2_ratio(value: f64, reference: f64) -> f64 {
    (value / reference).log2()
}
