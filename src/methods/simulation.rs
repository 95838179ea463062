use nalgebra::{DMatrix, RealField};
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::methods::generalized_variance::generalized_variance_statistic;
use crate::methods::independence::independence_statistic;
use crate::methods::regression::{nested_draw, regression_statistic};
use crate::methods::sphericity::sphericity_statistic;
use crate::{EmpiricalDistribution, Error, Float, Wishart};

/// The hypothesis-test family whose null distribution is simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TestKind {
    /// `det(W)` with `W ~ W_p(n - 1, I_p / (n - 1))`.
    GeneralizedVariance,

    /// `det(Q)^(1/p) / tr(Q)` with `Q = W1ᵗ·W2`.
    Sphericity,

    /// Independence of the first `part` variates from the rest, on `W ~ W_p(n - 1, I_p)`.
    Independence { part: usize },

    /// Regression-coefficient (canonical form) test on a nested Wishart draw.
    Regression { part: usize },
}

impl TestKind {
    /// The split point, for the families that partition their draw.
    #[must_use]
    pub fn part(&self) -> Option<usize> {
        match *self {
            TestKind::Independence { part } | TestKind::Regression { part } => Some(part),
            TestKind::GeneralizedVariance | TestKind::Sphericity => None,
        }
    }
}

/// Configuration of one simulation run.
///
/// When `seed` is `None` the run is seeded from system entropy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SimulationParameters {
    /// Sample size `n` of the (synthetic) dataset; the Wishart draws use `n - 1` degrees of
    /// freedom.
    pub nsample: usize,

    /// Number of variates `p`.
    pub pvariates: usize,

    /// Number of Monte Carlo iterations.
    pub iterations: usize,

    /// Seed of the master generator.
    pub seed: Option<u64>,
}

impl SimulationParameters {
    #[must_use]
    pub fn new(nsample: usize, pvariates: usize, iterations: usize) -> Self {
        Self {
            nsample,
            pvariates,
            iterations,
            seed: None,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Degrees of freedom `n - 1` of every Wishart draw.
    #[must_use]
    pub fn dof(&self) -> usize {
        self.nsample.saturating_sub(1)
    }

    /// Checks the parameters against the requirements of `kind`.
    pub fn validate(&self, kind: TestKind) -> Result<(), Error> {
        let p = self.pvariates;

        if p == 0 {
            return Err(Error::InvalidDimension {
                given: 0,
                needed: 1,
            });
        }

        if let Some(part) = kind.part() {
            if part == 0 || part >= p {
                return Err(Error::InvalidPartition {
                    rows: p,
                    cols: p,
                    k_rows: part,
                    k_cols: part,
                });
            }
        }

        if self.nsample <= p {
            return Err(Error::InsufficientSampleSize {
                given: self.nsample,
                needed: p + 1,
            });
        }

        if self.iterations == 0 {
            return Err(Error::InvalidIterations);
        }

        Ok(())
    }
}

struct Samplers<T: Float + RealField> {
    normalised: Wishart<T>,
    standard: Wishart<T>,
}

/// Simulates the null distribution of the statistic selected by `kind`.
///
/// Every iteration owns a generator seeded from a per-iteration seed; the seeds are drawn in
/// order from one master generator. For a fixed [`seed`](SimulationParameters::seed) the output
/// is therefore identical with and without the `parallel` feature.
///
/// The run stops at the first failing iteration, reported as [`Error::IterationFailed`] with its
/// 0-based index. Under `parallel` all iterations run, and the lowest failing index is reported.
///
/// # Examples
///
/// ```
/// use wishart_pivots::{SimulationParameters, TestKind, simulate};
///
/// let params = SimulationParameters::new(40, 5, 100).with_seed(3);
/// let first = simulate::<f64>(TestKind::Independence { part: 2 }, &params).unwrap();
/// let second = simulate::<f64>(TestKind::Independence { part: 2 }, &params).unwrap();
///
/// assert_eq!(first, second);
/// ```
pub fn simulate<T: Float + RealField>(
    kind: TestKind,
    params: &SimulationParameters,
) -> Result<EmpiricalDistribution<T>, Error> {
    params.validate(kind)?;

    let p = params.pvariates;
    let dof = params.dof();
    let samplers = Samplers {
        normalised: Wishart::scaled_identity(dof, p, nalgebra::convert(1.0 / dof as f64))?,
        standard: Wishart::scaled_identity(dof, p, T::one())?,
    };

    log::debug!(
        "simulating {kind:?}: nsample = {}, pvariates = {p}, iterations = {}, seed = {:?}",
        params.nsample,
        params.iterations,
        params.seed
    );

    let values = run_all(kind, iteration_seeds(params), &samplers)?;

    log::debug!("finished {kind:?} with {} values", values.len());

    Ok(EmpiricalDistribution::from_values(values))
}

/// Runs one iteration per seed, tagging the first failure with its index.
fn run_all<T: Float + RealField>(
    kind: TestKind,
    seeds: Vec<u64>,
    samplers: &Samplers<T>,
) -> Result<Vec<T>, Error> {
    let run = |(iteration, seed): (usize, u64)| {
        run_iteration(kind, seed, samplers).map_err(|err| {
            log::warn!("iteration {iteration} of {kind:?} failed: {err}");

            Error::IterationFailed {
                iteration,
                source: Box::new(err),
            }
        })
    };

    try_collect_if_parallel!(seeds, run)
}

fn iteration_seeds(params: &SimulationParameters) -> Vec<u64> {
    let mut master = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    (0..params.iterations).map(|_| master.next_u64()).collect()
}

fn run_iteration<T: Float + RealField>(
    kind: TestKind,
    seed: u64,
    samplers: &Samplers<T>,
) -> Result<T, Error> {
    let mut rng = StdRng::seed_from_u64(seed);

    let statistic = match kind {
        TestKind::GeneralizedVariance => {
            let w: DMatrix<T> = samplers.normalised.sample(&mut rng);
            generalized_variance_statistic(&w)?
        },
        TestKind::Sphericity => {
            let w1 = samplers.normalised.sample(&mut rng);
            let w2 = samplers.standard.sample(&mut rng);
            sphericity_statistic(&w1, &w2)?
        },
        TestKind::Independence { part } => {
            let w = samplers.standard.sample(&mut rng);
            independence_statistic(&w, part)?
        },
        TestKind::Regression { part } => {
            let omega2 = nested_draw(&samplers.normalised, &mut rng)?;
            regression_statistic(&omega2, part)?
        },
    };

    if !num_traits::Float::is_finite(statistic) {
        return Err(Error::NonFiniteStatistic);
    }

    Ok(statistic)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[cfg(feature = "parallel")]
    use rayon::prelude::*;

    use super::*;

    fn samplers<T: Float + RealField>(p: usize, dof: usize, scale: T) -> Samplers<T> {
        Samplers {
            normalised: Wishart::scaled_identity(dof, p, scale).unwrap(),
            standard: Wishart::scaled_identity(dof, p, scale).unwrap(),
        }
    }

    #[test]
    fn test_validate_accepts_boundary_splits() {
        let params = SimulationParameters::new(10, 4, 5);

        assert_eq!(params.validate(TestKind::Independence { part: 1 }), Ok(()));
        assert_eq!(params.validate(TestKind::Regression { part: 3 }), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_split() {
        let params = SimulationParameters::new(10, 4, 5);

        for part in [0, 4, 7] {
            assert_eq!(
                params.validate(TestKind::Regression { part }),
                Err(Error::InvalidPartition {
                    rows: 4,
                    cols: 4,
                    k_rows: part,
                    k_cols: part,
                })
            );
        }
    }

    #[test]
    fn test_validate_rejects_small_sample() {
        let params = SimulationParameters::new(4, 4, 5);

        assert_eq!(
            params.validate(TestKind::Sphericity),
            Err(Error::InsufficientSampleSize {
                given: 4,
                needed: 5,
            })
        );
    }

    #[test]
    fn test_validate_rejects_degenerate_shapes() {
        assert_eq!(
            SimulationParameters::new(10, 0, 5).validate(TestKind::GeneralizedVariance),
            Err(Error::InvalidDimension {
                given: 0,
                needed: 1,
            })
        );
        assert_eq!(
            SimulationParameters::new(10, 3, 0).validate(TestKind::GeneralizedVariance),
            Err(Error::InvalidIterations)
        );
    }

    #[test]
    fn test_single_variate_partition_is_rejected() {
        let params = SimulationParameters::new(10, 1, 5);

        assert!(matches!(
            params.validate(TestKind::Independence { part: 1 }),
            Err(Error::InvalidPartition { .. })
        ));
    }

    #[test]
    fn test_iteration_seeds_follow_master_seed() {
        let params = SimulationParameters::new(10, 2, 16).with_seed(5);
        let seeds = iteration_seeds(&params);

        assert_eq!(seeds.len(), 16);
        assert_eq!(seeds, iteration_seeds(&params));
        assert_ne!(seeds, iteration_seeds(&params.with_seed(6)));
    }

    #[test]
    fn test_test_kind_part() {
        assert_eq!(TestKind::Independence { part: 2 }.part(), Some(2));
        assert_eq!(TestKind::Regression { part: 1 }.part(), Some(1));
        assert_eq!(TestKind::Sphericity.part(), None);
        assert_eq!(TestKind::GeneralizedVariance.part(), None);
    }

    #[test]
    fn test_dof_is_sample_size_minus_one() {
        assert_eq!(SimulationParameters::new(100, 4, 1).dof(), 99);
    }

    #[test]
    fn test_collection_reports_lowest_failing_index() {
        let calls = AtomicUsize::new(0);
        let items: Vec<u64> = (0..10).collect();
        let double_unless_flagged = |(i, v): (usize, u64)| {
            calls.fetch_add(1, Ordering::SeqCst);

            if i == 3 || i == 7 { Err(i) } else { Ok(v * 2) }
        };
        let result: Result<Vec<u64>, usize> = try_collect_if_parallel!(items, double_unless_flagged);

        assert_eq!(result, Err(3));

        #[cfg(not(feature = "parallel"))]
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        #[cfg(feature = "parallel")]
        assert_eq!(calls.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_collection_keeps_index_order() {
        let items: Vec<u64> = (0..64).collect();
        let result: Result<Vec<u64>, usize> =
            try_collect_if_parallel!(items, |(i, v): (usize, u64)| Ok(v + i as u64));

        assert_eq!(result, Ok((0..64).map(|v| 2 * v).collect()));
    }

    #[test]
    fn test_run_all_wraps_evaluator_failure() {
        let samplers = samplers::<f64>(3, 10, 1.0);
        let result = run_all(TestKind::Independence { part: 5 }, vec![1, 2, 3], &samplers);

        assert_eq!(
            result,
            Err(Error::IterationFailed {
                iteration: 0,
                source: Box::new(Error::InvalidPartition {
                    rows: 3,
                    cols: 3,
                    k_rows: 5,
                    k_cols: 5,
                }),
            })
        );
    }

    #[test]
    fn test_run_all_rejects_non_finite_statistic() {
        // det(W) of a 40 x 40 draw at scale 1e10 is far past f32::MAX.
        let samplers = samplers::<f32>(40, 40, 1e10);
        let err = run_all(TestKind::GeneralizedVariance, vec![9, 10], &samplers).unwrap_err();

        assert_eq!(
            err,
            Error::IterationFailed {
                iteration: 0,
                source: Box::new(Error::NonFiniteStatistic),
            }
        );
        assert_eq!(err.root_cause(), &Error::NonFiniteStatistic);
    }

    #[test]
    fn test_run_all_succeeds_in_seed_order() {
        let samplers = samplers::<f64>(3, 10, 1.0);
        let values = run_all(TestKind::GeneralizedVariance, vec![4, 5, 4], &samplers).unwrap();

        assert_eq!(values.len(), 3);
        assert_eq!(values[0], values[2]);
        assert_ne!(values[0], values[1]);
    }
}
