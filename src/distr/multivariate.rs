//! Multivariate continuous distribution object (SPEC_FULL.md §3.1 CVEC).
use std::fmt;
use std::sync::Arc;

use nalgebra::{DMatrix, DVector};

use crate::error::{ErrorKind, Result, UnurError};
use crate::misc::matrix;

type PdfFn = Arc<dyn Fn(&DVector<f64>) -> f64 + Send + Sync>;
type GradFn = Arc<dyn Fn(&DVector<f64>) -> DVector<f64> + Send + Sync>;

/// A multivariate continuous distribution, required to carry a mean
/// vector and covariance matrix (§3.1: "mean vector; covariance matrix
/// plus its Cholesky factor and inverse"); the Cholesky factor and
/// inverse are derived once at construction rather than recomputed on
/// every access.
#[derive(Clone)]
pub struct MultivariateDistribution {
    name: String,
    dim: usize,
    pdf: PdfFn,
    gradient: Option<GradFn>,
    mean: DVector<f64>,
    covar: DMatrix<f64>,
    cholesky: DMatrix<f64>,
    inv_covar: DMatrix<f64>,
    rank_correlation: Option<DMatrix<f64>>,
    mode: Option<DVector<f64>>,
    volume: Option<f64>,
}

impl fmt::Debug for MultivariateDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultivariateDistribution")
            .field("name", &self.name)
            .field("dim", &self.dim)
            .field("mean", &self.mean)
            .field("has_gradient", &self.gradient.is_some())
            .field("mode", &self.mode)
            .field("volume", &self.volume)
            .finish()
    }
}

impl MultivariateDistribution {
    /// Construct from a PDF, mean vector and covariance matrix. The
    /// covariance is validated as symmetric positive-definite and its
    /// Cholesky factor/inverse are computed eagerly so sampling methods
    /// never need to fail mid-setup on a linear-algebra error.
    pub fn new<F>(pdf: F, mean: DVector<f64>, covar: DMatrix<f64>) -> Result<Self>
    where
        F: Fn(&DVector<f64>) -> f64 + Send + Sync + 'static,
    {
        let dim = mean.len();
        if covar.nrows() != dim || covar.ncols() != dim {
            return Err(UnurError::error(ErrorKind::DistrDomain, "covariance dimension mismatch with mean"));
        }
        let cholesky = matrix::cholesky(&covar)?;
        let inv_covar = matrix::inverse(&covar)?;
        Ok(MultivariateDistribution {
            name: String::from("unnamed"),
            dim,
            pdf: Arc::new(pdf),
            gradient: None,
            mean,
            covar,
            cholesky,
            inv_covar,
            rank_correlation: None,
            mode: None,
            volume: None,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_gradient<F>(mut self, gradient: F) -> Self
    where
        F: Fn(&DVector<f64>) -> DVector<f64> + Send + Sync + 'static,
    {
        self.gradient = Some(Arc::new(gradient));
        self
    }

    pub fn with_rank_correlation(mut self, m: DMatrix<f64>) -> Result<Self> {
        if m.nrows() != self.dim || m.ncols() != self.dim {
            return Err(UnurError::error(ErrorKind::DistrDomain, "rank-correlation dimension mismatch"));
        }
        self.rank_correlation = Some(m);
        Ok(self)
    }

    pub fn with_mode(mut self, mode: DVector<f64>) -> Result<Self> {
        if mode.len() != self.dim {
            return Err(UnurError::error(ErrorKind::DistrDomain, "mode dimension mismatch"));
        }
        self.mode = Some(mode);
        Ok(self)
    }

    pub fn with_volume(mut self, volume: f64) -> Result<Self> {
        if !(volume > 0.0) {
            return Err(UnurError::error(ErrorKind::DistrDomain, "volume must be positive"));
        }
        self.volume = Some(volume);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn pdf(&self, x: &DVector<f64>) -> f64 {
        (self.pdf)(x).max(0.0)
    }

    pub fn gradient(&self, x: &DVector<f64>) -> Result<DVector<f64>> {
        match &self.gradient {
            Some(g) => Ok(g(x)),
            None => Err(UnurError::error(ErrorKind::DistrDataMissing, "gradient not set")),
        }
    }

    pub fn mean(&self) -> &DVector<f64> {
        &self.mean
    }

    pub fn covar(&self) -> &DMatrix<f64> {
        &self.covar
    }

    pub fn cholesky(&self) -> &DMatrix<f64> {
        &self.cholesky
    }

    pub fn inv_covar(&self) -> &DMatrix<f64> {
        &self.inv_covar
    }

    pub fn rank_correlation(&self) -> Result<&DMatrix<f64>> {
        self.rank_correlation
            .as_ref()
            .ok_or_else(|| UnurError::error(ErrorKind::DistrDataMissing, "rank correlation not set"))
    }

    pub fn mode(&self) -> Result<&DVector<f64>> {
        self.mode.as_ref().ok_or_else(|| UnurError::error(ErrorKind::DistrDataMissing, "mode not set"))
    }

    pub fn volume(&self) -> Result<f64> {
        self.volume.ok_or_else(|| UnurError::error(ErrorKind::DistrDataMissing, "volume not set"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_bivariate_normal_constructs() {
        let mean = DVector::from_vec(vec![0.0, 0.0]);
        let covar = DMatrix::<f64>::identity(2, 2);
        let pdf = |x: &DVector<f64>| (-0.5 * x.dot(x)).exp();
        let d = MultivariateDistribution::new(pdf, mean, covar).unwrap();
        assert::close(d.pdf(&DVector::from_vec(vec![0.0, 0.0])), 1.0, 1e-12);
        assert::close(d.cholesky()[(0, 0)], 1.0, 1e-12);
    }

    #[test]
    fn rejects_dimension_mismatch() {
        let mean = DVector::from_vec(vec![0.0, 0.0]);
        let covar = DMatrix::<f64>::identity(3, 3);
        let pdf = |_: &DVector<f64>| 1.0;
        assert!(MultivariateDistribution::new(pdf, mean, covar).is_err());
    }
}
