//! Block partitioning and checked linear algebra on dense matrices.

use nalgebra::{DMatrix, RealField};

use crate::{Error, Float};

/// The four blocks of a matrix split at a row/column index.
///
/// For a `p x p` matrix split at `k`, `m11` is `k x k`, `m12` is `k x (p - k)`,
/// `m21` is `(p - k) x k` and `m22` is `(p - k) x (p - k)`. The blocks own their storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<T: Float + RealField> {
    /// Top-left block.
    pub m11: DMatrix<T>,

    /// Top-right block.
    pub m12: DMatrix<T>,

    /// Bottom-left block.
    pub m21: DMatrix<T>,

    /// Bottom-right block.
    pub m22: DMatrix<T>,
}

impl<T: Float + RealField> Partition<T> {
    /// Consumes the partition and returns `(m11, m12, m21, m22)`.
    #[must_use]
    pub fn into_blocks(self) -> (DMatrix<T>, DMatrix<T>, DMatrix<T>, DMatrix<T>) {
        (self.m11, self.m12, self.m21, self.m22)
    }

    /// Rebuilds the matrix the blocks were taken from.
    #[must_use]
    pub fn reassemble(&self) -> DMatrix<T> {
        let (k_rows, k_cols) = self.m11.shape();
        let rows = k_rows + self.m21.nrows();
        let cols = k_cols + self.m12.ncols();
        let mut m = DMatrix::zeros(rows, cols);

        m.view_mut((0, 0), self.m11.shape()).copy_from(&self.m11);
        m.view_mut((0, k_cols), self.m12.shape()).copy_from(&self.m12);
        m.view_mut((k_rows, 0), self.m21.shape()).copy_from(&self.m21);
        m.view_mut((k_rows, k_cols), self.m22.shape()).copy_from(&self.m22);

        m
    }
}

/// Splits `m` into four blocks after row `k_rows` and column `k_cols`.
///
/// Both split points must be strictly inside the matrix, so `m` needs at least two rows and
/// two columns.
///
/// # Examples
///
/// ```
/// use nalgebra::DMatrix;
/// use wishart_pivots::partition;
///
/// let m = DMatrix::from_row_slice(3, 3, &[1.0, 2.0, 3.0, 2.0, 4.0, 5.0, 3.0, 5.0, 6.0]);
/// let blocks = partition(&m, 1, 1).unwrap();
///
/// assert_eq!(blocks.m11, DMatrix::from_element(1, 1, 1.0));
/// assert_eq!(blocks.m22, DMatrix::from_row_slice(2, 2, &[4.0, 5.0, 5.0, 6.0]));
/// assert_eq!(blocks.m21, blocks.m12.transpose());
/// ```
pub fn partition<T: Float + RealField>(
    m: &DMatrix<T>,
    k_rows: usize,
    k_cols: usize,
) -> Result<Partition<T>, Error> {
    let (rows, cols) = m.shape();

    if k_rows == 0 || k_cols == 0 || k_rows >= rows || k_cols >= cols {
        return Err(Error::InvalidPartition {
            rows,
            cols,
            k_rows,
            k_cols,
        });
    }

    let lower = rows - k_rows;
    let right = cols - k_cols;

    Ok(Partition {
        m11: m.view((0, 0), (k_rows, k_cols)).into_owned(),
        m12: m.view((0, k_cols), (k_rows, right)).into_owned(),
        m21: m.view((k_rows, 0), (lower, k_cols)).into_owned(),
        m22: m.view((k_rows, k_cols), (lower, right)).into_owned(),
    })
}

pub(crate) fn ensure_square<T: Float + RealField>(m: &DMatrix<T>) -> Result<usize, Error> {
    let (rows, cols) = m.shape();

    if rows != cols || rows == 0 {
        return Err(Error::NotSquare { rows, cols });
    }

    Ok(rows)
}

/// Inverts `m`, reporting `block` as the culprit when no finite inverse exists.
pub(crate) fn checked_inverse<T: Float + RealField>(
    m: DMatrix<T>,
    block: &'static str,
) -> Result<DMatrix<T>, Error> {
    ensure_square(&m)?;

    let inverse = m.try_inverse().ok_or(Error::SingularBlock { block })?;

    if inverse.iter().any(|&v| !num_traits::Float::is_finite(v)) {
        return Err(Error::SingularBlock { block });
    }

    Ok(inverse)
}

/// `ln det(m)` of a symmetric positive definite matrix, read off its Cholesky factor.
///
/// A matrix without a Cholesky factor, or whose log-determinant is not finite, is reported as
/// a singular `block`.
pub(crate) fn spd_log_determinant<T: Float + RealField>(
    m: DMatrix<T>,
    block: &'static str,
) -> Result<T, Error> {
    ensure_square(&m)?;

    let factor = m.cholesky().ok_or(Error::SingularBlock { block })?.l();
    let half = factor.diagonal().iter().map(|&d| num_traits::Float::ln(d)).sum::<T>();
    let log_det = half + half;

    if !num_traits::Float::is_finite(log_det) {
        return Err(Error::SingularBlock { block });
    }

    Ok(log_det)
}

/// Sign and `ln |det(m)|` from an LU factorization. A singular matrix has sign zero.
pub(crate) fn signed_log_determinant<T: Float + RealField>(
    m: DMatrix<T>,
) -> Result<(T, T), Error> {
    ensure_square(&m)?;

    let lu = m.lu();
    let mut sign: T = lu.p().determinant();
    let mut log_det = T::zero();

    for &u in lu.u().diagonal().iter() {
        if u == T::zero() {
            return Ok((T::zero(), num_traits::Float::neg_infinity()));
        }

        if u < T::zero() {
            sign = -sign;
        }

        log_det += num_traits::Float::ln(num_traits::Float::abs(u));
    }

    Ok((sign, log_det))
}
