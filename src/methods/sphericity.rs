use nalgebra::{DMatrix, RealField};

use crate::matrix::{ensure_square, signed_log_determinant};
use crate::{EmpiricalDistribution, Error, Float, SimulationParameters, TestKind, simulate};

/// Evaluates the sphericity pivot `det(Q)^(1/p) / tr(Q)` with `Q = W1ᵗ·W2`.
///
/// `w1` and `w2` must be square matrices of the same order `p`. The determinant is taken as
/// `det(W1)·det(W2)` in the log domain and the trace as `Σ W1_ij·W2_ij`, so `Q` is never formed
/// and neither factor overflows at large `p`. A negative `det(Q)` has no real `p`-th root and is
/// reported as [`Error::NonFiniteStatistic`].
pub fn sphericity_statistic<T: Float + RealField>(
    w1: &DMatrix<T>,
    w2: &DMatrix<T>,
) -> Result<T, Error> {
    let p = ensure_square(w1)?;
    let other = ensure_square(w2)?;

    if p != other {
        return Err(Error::DimensionMismatch {
            left: p,
            right: other,
        });
    }

    let trace = w1.dot(w2);

    if trace == T::zero() || !num_traits::Float::is_finite(trace) {
        return Err(Error::NonFiniteStatistic);
    }

    let (sign1, log_det1) = signed_log_determinant(w1.clone())?;
    let (sign2, log_det2) = signed_log_determinant(w2.clone())?;
    let sign = sign1 * sign2;

    if sign == T::zero() {
        return Ok(T::zero());
    }

    if sign < T::zero() {
        return Err(Error::NonFiniteStatistic);
    }

    let order: T = nalgebra::convert(p as f64);

    Ok(num_traits::Float::exp((log_det1 + log_det2) / order) / trace)
}

/// Simulates the null distribution of the sphericity statistic.
///
/// Each iteration draws `W1 ~ W_p(n - 1, I_p / (n - 1))` and an independent
/// `W2 ~ W_p(n - 1, I_p)`, then records [`sphericity_statistic`] of the pair.
///
/// # Examples
///
/// ```
/// use wishart_pivots::{SimulationParameters, sphericity};
///
/// let params = SimulationParameters::new(100, 4, 500).with_seed(2024);
/// let distribution = sphericity::<f64>(&params).unwrap();
/// let upper = distribution.quantile(0.95).unwrap();
///
/// assert!(upper > 0.0);
/// ```
pub fn sphericity<T: Float + RealField>(
    params: &SimulationParameters,
) -> Result<EmpiricalDistribution<T>, Error> {
    simulate(TestKind::Sphericity, params)
}
