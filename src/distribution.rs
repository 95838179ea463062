use std::cmp::Ordering;

use nalgebra::RealField;

use crate::{Error, Float};

/// Simulated values of a statistic, one per Monte Carlo iteration, in iteration order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct EmpiricalDistribution<T: Float + RealField> {
    values: Vec<T>,
}

impl<T: Float + RealField> EmpiricalDistribution<T> {
    #[must_use]
    pub fn from_values(values: Vec<T>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The values in iteration order.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.values
    }

    /// Arithmetic mean, or `None` for an empty distribution.
    #[must_use]
    pub fn mean(&self) -> Option<T> {
        if self.values.is_empty() {
            return None;
        }

        let n: T = nalgebra::convert(self.values.len() as f64);

        Some(self.values.iter().copied().sum::<T>() / n)
    }

    /// The values in ascending order.
    #[must_use]
    pub fn sorted(&self) -> Vec<T> {
        let mut sorted = self.values.clone();
        sort_if_parallel!(sorted.as_mut_slice(), |a: &T, b: &T| {
            a.partial_cmp(b).unwrap_or(Ordering::Equal)
        });

        sorted
    }

    /// Sample quantile at level `prob`.
    ///
    /// Interpolates linearly between the order statistics around position `(n - 1) · prob`,
    /// which is the default definition of R's `quantile`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wishart_pivots::EmpiricalDistribution;
    ///
    /// let distribution = EmpiricalDistribution::from_values(vec![4.0, 1.0, 3.0, 2.0, 5.0]);
    ///
    /// assert_eq!(distribution.quantile(0.5).unwrap(), 3.0);
    /// assert_eq!(distribution.quantile(0.875).unwrap(), 4.5);
    /// ```
    pub fn quantile(&self, prob: f64) -> Result<T, Error> {
        check_probability(prob)?;

        if self.values.is_empty() {
            return Err(Error::EmptyDistribution);
        }

        Ok(interpolate(&self.sorted(), prob))
    }

    /// Sample quantiles at several levels, sorting only once.
    pub fn quantiles(&self, probs: &[f64]) -> Result<Vec<T>, Error> {
        for &prob in probs {
            check_probability(prob)?;
        }

        if self.values.is_empty() {
            return Err(Error::EmptyDistribution);
        }

        let sorted = self.sorted();

        Ok(probs.iter().map(|&prob| interpolate(&sorted, prob)).collect())
    }
}

impl<'a, T: Float + RealField> IntoIterator for &'a EmpiricalDistribution<T> {
    type IntoIter = std::slice::Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

fn check_probability(prob: f64) -> Result<(), Error> {
    if (0.0..=1.0).contains(&prob) {
        Ok(())
    } else {
        Err(Error::InvalidProbability(prob))
    }
}

fn interpolate<T: Float + RealField>(sorted: &[T], prob: f64) -> T {
    let position = (sorted.len() - 1) as f64 * prob;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let fraction: T = nalgebra::convert(position - lower as f64);

    sorted[lower] + fraction * (sorted[upper] - sorted[lower])
}
