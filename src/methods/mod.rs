mod generalized_variance;
mod independence;
mod regression;
mod simulation;
mod sphericity;

pub use generalized_variance::{generalized_variance, generalized_variance_statistic};
pub use independence::{independence, independence_statistic};
use nalgebra::{DMatrix, RealField};
pub use regression::{nested_draw, regression, regression_statistic};
pub use simulation::{SimulationParameters, TestKind, simulate};
pub use sphericity::{sphericity, sphericity_statistic};

use crate::matrix::{checked_inverse, ensure_square, signed_log_determinant, spd_log_determinant};
use crate::{Error, Float, partition};

/// `det(Q) / det(W11 - Q)` with `Q = W12·W22⁻¹·W21`, `w` split after `part` variates.
///
/// Both determinants are taken in the log domain, so the ratio stays exact when either one
/// alone would overflow. `W11 - Q` must be positive definite; `Q` may be rank deficient
/// (`part > p - part`), in which case its sign carries through.
pub(crate) fn determinant_ratio<T: Float + RealField>(
    w: &DMatrix<T>,
    part: usize,
) -> Result<T, Error> {
    ensure_square(w)?;

    let (w11, w12, w21, w22) = partition(w, part, part)?.into_blocks();
    let q = &w12 * checked_inverse(w22, "W22")? * &w21;
    let log_denominator = spd_log_determinant(w11 - &q, "W11 - Q")?;
    let (sign, log_numerator) = signed_log_determinant(q)?;

    if sign == T::zero() {
        return Ok(T::zero());
    }

    Ok(sign * num_traits::Float::exp(log_numerator - log_denominator))
}
