use nalgebra::{DMatrix, RealField};
use rand::Rng;
use rand::distributions::Distribution;

use crate::methods::determinant_ratio;
use crate::{
    EmpiricalDistribution, Error, Float, SimulationParameters, TestKind, Wishart, simulate,
};

/// Evaluates the regression (canonical form) pivot on the second-stage draw `Ω2`.
///
/// The formula matches [`independence_statistic`](crate::independence_statistic):
/// `det(Q) / det(W11 - Q)` with `Q = W12·W22⁻¹·W21` taken from `Ω2` split after `part`.
pub fn regression_statistic<T: Float + RealField>(
    omega2: &DMatrix<T>,
    part: usize,
) -> Result<T, Error> {
    determinant_ratio(omega2, part)
}

/// Performs the two-stage draw behind the regression statistic.
///
/// `stage_one` supplies `Ω1 ~ W_p(n - 1, I_p / (n - 1))`; the second stage draws
/// `Ω2 ~ W_p(n - 1, Ω1 / (n - 1))` from the same generator and returns it.
pub fn nested_draw<T: Float + RealField, R: Rng + ?Sized>(
    stage_one: &Wishart<T>,
    rng: &mut R,
) -> Result<DMatrix<T>, Error> {
    let dof = stage_one.dof();
    let omega1 = stage_one.sample(rng);
    let stage_two = Wishart::new(dof, &(omega1 / nalgebra::convert::<f64, T>(dof as f64)))?;

    Ok(stage_two.sample(rng))
}

/// Simulates the null distribution of the regression-coefficient statistic.
///
/// Each iteration performs [`nested_draw`] and records [`regression_statistic`] of `Ω2`
/// split after `part` variates.
///
/// # Examples
///
/// ```
/// use wishart_pivots::{SimulationParameters, regression};
///
/// let params = SimulationParameters::new(100, 4, 300).with_seed(9);
/// let distribution = regression::<f64>(&params, 2).unwrap();
///
/// assert_eq!(distribution.len(), 300);
/// assert!(distribution.iter().all(|&v| v >= 0.0));
/// ```
pub fn regression<T: Float + RealField>(
    params: &SimulationParameters,
    part: usize,
) -> Result<EmpiricalDistribution<T>, Error> {
    simulate(TestKind::Regression { part }, params)
}
