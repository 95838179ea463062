use thiserror::Error as ThisError;

/// Represents errors that can occur while simulating a pivotal-statistic distribution.
#[derive(Debug, ThisError, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The split point does not leave four non-empty blocks.
    #[error(
        "Cannot partition a {rows}x{cols} matrix at ({k_rows}, {k_cols}); split points must lie \
         strictly inside the matrix."
    )]
    InvalidPartition {
        rows: usize,
        cols: usize,
        k_rows: usize,
        k_cols: usize,
    },

    /// The Wishart scale matrix has no Cholesky factor.
    #[error("The Wishart scale matrix is not positive definite.")]
    NonPositiveDefiniteScale,

    /// A matrix block that has to be inverted (or divided by) is singular.
    #[error("The {block} block is singular.")]
    SingularBlock { block: &'static str },

    /// A square matrix was required.
    #[error("Expected a square matrix, but was given a {rows}x{cols} matrix.")]
    NotSquare { rows: usize, cols: usize },

    /// Two matrices that have to be multiplied together have incompatible shapes.
    #[error("Matrices of order {left} and {right} cannot be combined.")]
    DimensionMismatch { left: usize, right: usize },

    /// The number of observations is too small for the requested dimensionality.
    #[error("Sample size must be at least {needed}, but was given {given}.")]
    InsufficientSampleSize { given: usize, needed: usize },

    /// The Bartlett decomposition needs at least as many degrees of freedom as variates.
    #[error("Degrees of freedom must be at least {needed}, but was given {given}.")]
    InsufficientDegreesOfFreedom { given: usize, needed: usize },

    /// The number of variates must be positive.
    #[error("The number of variates must be at least {needed}, but was given {given}.")]
    InvalidDimension { given: usize, needed: usize },

    /// A simulation needs at least one iteration.
    #[error("The number of iterations must be at least 1.")]
    InvalidIterations,

    /// Quantile levels live in `[0, 1]`.
    #[error("Probability must lie in [0, 1], but was given {0}.")]
    InvalidProbability(f64),

    /// The distribution holds no values.
    #[error("The empirical distribution is empty.")]
    EmptyDistribution,

    /// The evaluator produced `NaN` or an infinite value.
    #[error("The statistic evaluated to a non-finite value.")]
    NonFiniteStatistic,

    /// A Monte Carlo iteration failed; the whole run is aborted.
    #[error("Iteration {iteration} failed: {source}")]
    IterationFailed {
        iteration: usize,
        #[source]
        source: Box<Error>,
    },

    /// See [`statrs::distribution::NormalError`].
    #[error("{0}")]
    NormalDistributionError(#[from] statrs::distribution::NormalError),

    /// See [`statrs::distribution::GammaError`].
    #[error("{0}")]
    GammaError(#[from] statrs::distribution::GammaError),
}

impl Error {
    /// Returns the innermost error, looking through [`Error::IterationFailed`].
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::IterationFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
