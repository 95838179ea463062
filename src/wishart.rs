//! Random Wishart matrices via the Bartlett decomposition.

use nalgebra::{DMatrix, RealField};
use rand::Rng;
use rand::distributions::Distribution;
use statrs::distribution::{ChiSquared, Normal};

use crate::matrix::ensure_square;
use crate::{Error, Float};

/// The Wishart distribution `W_p(dof, scale)`.
///
/// Construction factors the scale matrix and prepares the scalar generators once; sampling is
/// then infallible and goes through [`rand::distributions::Distribution`], so the usual
/// `sample` and `sample_iter` methods are available.
///
/// A draw `W = C·L·Lᵗ·Cᵗ` combines the lower Cholesky factor `C` of `scale` with a random
/// lower-triangular `L` whose strict lower part is standard normal and whose `i`-th diagonal
/// entry (0-based) is the square root of a chi-squared variate with `dof - i` degrees of
/// freedom. The product is formed as `A·Aᵗ` with `A = C·L`, so every draw is exactly symmetric.
///
/// # Examples
///
/// ```
/// use nalgebra::DMatrix;
/// use rand::SeedableRng;
/// use rand::distributions::Distribution;
/// use rand::rngs::StdRng;
/// use wishart_pivots::Wishart;
///
/// let wishart = Wishart::new(9, &DMatrix::<f64>::identity(3, 3)).unwrap();
/// let mut rng = StdRng::seed_from_u64(7);
/// let draw = wishart.sample(&mut rng);
///
/// assert_eq!(draw.shape(), (3, 3));
/// assert_eq!(draw, draw.transpose());
/// assert!(draw.cholesky().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Wishart<T: Float + RealField> {
    dof: usize,
    scale: DMatrix<T>,
    scale_factor: DMatrix<T>,
    chi_squared: Vec<ChiSquared>,
    normal: Normal,
}

impl<T: Float + RealField> Wishart<T> {
    /// Creates a Wishart distribution with `dof` degrees of freedom and the given scale.
    ///
    /// The scale must be square and positive definite (only its lower triangle is read), and
    /// `dof` must be at least the dimension so that every Bartlett diagonal is well defined.
    pub fn new(dof: usize, scale: &DMatrix<T>) -> Result<Self, Error> {
        let p = ensure_square(scale)?;

        if dof < p {
            return Err(Error::InsufficientDegreesOfFreedom {
                given: dof,
                needed: p,
            });
        }

        let scale_factor = scale.clone().cholesky().ok_or(Error::NonPositiveDefiniteScale)?.l();
        let chi_squared = (0..p)
            .map(|i| ChiSquared::new((dof - i) as f64))
            .collect::<Result<Vec<_>, _>>()?;

        let normal = Normal::new(0.0, 1.0)?;

        log::trace!("prepared Wishart sampler with p = {p}, dof = {dof}");

        Ok(Self {
            dof,
            scale: scale.clone(),
            scale_factor,
            chi_squared,
            normal,
        })
    }

    /// Shorthand for `W_p(dof, factor · I_p)`.
    pub fn scaled_identity(dof: usize, p: usize, factor: T) -> Result<Self, Error> {
        Self::new(dof, &(DMatrix::identity(p, p) * factor))
    }

    /// Degrees of freedom.
    #[must_use]
    pub fn dof(&self) -> usize {
        self.dof
    }

    /// Dimension `p` of the drawn matrices.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.scale.nrows()
    }

    /// The scale matrix.
    #[must_use]
    pub fn scale(&self) -> &DMatrix<T> {
        &self.scale
    }

    /// The expectation `dof · scale`.
    #[must_use]
    pub fn mean(&self) -> DMatrix<T> {
        &self.scale * nalgebra::convert::<f64, T>(self.dof as f64)
    }
}

impl<T: Float + RealField> Distribution<DMatrix<T>> for Wishart<T> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DMatrix<T> {
        let p = self.dim();
        let mut bartlett = DMatrix::<T>::zeros(p, p);

        for i in 0..p {
            for j in 0..i {
                let z: f64 = self.normal.sample(rng);
                bartlett[(i, j)] = nalgebra::convert(z);
            }

            let chi: f64 = self.chi_squared[i].sample(rng);
            bartlett[(i, i)] = nalgebra::convert(chi.sqrt());
        }

        let factor = &self.scale_factor * bartlett;

        &factor * factor.transpose()
    }
}

/// Draws `count` independent matrices from `W_p(dof, scale)`.
///
/// Fails with [`Error::NonPositiveDefiniteScale`] when `scale` has no Cholesky factor.
pub fn draw_wishart<T: Float + RealField, R: Rng + ?Sized>(
    count: usize,
    dof: usize,
    scale: &DMatrix<T>,
    rng: &mut R,
) -> Result<Vec<DMatrix<T>>, Error> {
    let wishart = Wishart::new(dof, scale)?;

    Ok((0..count).map(|_| wishart.sample(rng)).collect())
}
