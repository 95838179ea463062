use nalgebra::{DMatrix, RealField};

use crate::methods::determinant_ratio;
use crate::{EmpiricalDistribution, Error, Float, SimulationParameters, TestKind, simulate};

/// Evaluates the independence pivot for a Wishart draw split after `part` variates.
///
/// With `W` partitioned into `(W11, W12, W21, W22)` and `Q = W12·W22⁻¹·W21`, the statistic is
/// `det(Q) / det(W11 - Q)`.
///
/// Fails with [`Error::InvalidPartition`] unless `1 <= part < p`, and with
/// [`Error::SingularBlock`] when `W22` or `W11 - Q` cannot be inverted.
pub fn independence_statistic<T: Float + RealField>(
    w: &DMatrix<T>,
    part: usize,
) -> Result<T, Error> {
    determinant_ratio(w, part)
}

/// Simulates the null distribution of the statistic for independence of the first `part`
/// variates from the remaining `p - part`.
///
/// Each iteration draws `W ~ W_p(n - 1, I_p)` and records [`independence_statistic`].
pub fn independence<T: Float + RealField>(
    params: &SimulationParameters,
    part: usize,
) -> Result<EmpiricalDistribution<T>, Error> {
    simulate(TestKind::Independence { part }, params)
}
