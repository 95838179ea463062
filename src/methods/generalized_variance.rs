use nalgebra::{DMatrix, RealField};

use crate::matrix::ensure_square;
use crate::{EmpiricalDistribution, Error, Float, SimulationParameters, TestKind, simulate};

/// Evaluates the generalized-variance pivot `det(W)` for a single Wishart draw.
pub fn generalized_variance_statistic<T: Float + RealField>(w: &DMatrix<T>) -> Result<T, Error> {
    ensure_square(w)?;

    Ok(w.determinant())
}

/// Simulates the null distribution of the generalized-variance statistic.
///
/// Each iteration draws `W ~ W_p(n - 1, I_p / (n - 1))` and records `det(W)`.
///
/// # Examples
///
/// ```
/// use wishart_pivots::{SimulationParameters, generalized_variance};
///
/// let params = SimulationParameters::new(50, 3, 200).with_seed(1);
/// let distribution = generalized_variance::<f64>(&params).unwrap();
///
/// assert_eq!(distribution.len(), 200);
/// assert!(distribution.iter().all(|&v| v > 0.0));
/// ```
pub fn generalized_variance<T: Float + RealField>(
    params: &SimulationParameters,
) -> Result<EmpiricalDistribution<T>, Error> {
    simulate(TestKind::GeneralizedVariance, params)
}
