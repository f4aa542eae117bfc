//! Thin `nalgebra` wrappers for the covariance-matrix bookkeeping that
//! multivariate distribution objects need (SPEC_FULL.md §3.1 CVEC):
//! Cholesky factor, inverse, and a symmetric-positive-definite check.
use crate::error::{ErrorKind, Result, UnurError};
use nalgebra::DMatrix;

/// Cholesky-decompose a covariance matrix, validating that it is square
/// and symmetric positive-definite.
pub fn cholesky(covar: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    check_square_symmetric(covar)?;
    nalgebra::linalg::Cholesky::new(covar.clone())
        .map(|c| c.l())
        .ok_or_else(|| {
            UnurError::error(ErrorKind::DistrDomain, "covariance matrix is not positive-definite")
        })
}

/// Invert a covariance matrix via its Cholesky factor.
pub fn inverse(covar: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    check_square_symmetric(covar)?;
    nalgebra::linalg::Cholesky::new(covar.clone())
        .map(|c| c.inverse())
        .ok_or_else(|| {
            UnurError::error(ErrorKind::DistrDomain, "covariance matrix is not positive-definite")
        })
}

fn check_square_symmetric(m: &DMatrix<f64>) -> Result<()> {
    if m.nrows() != m.ncols() {
        return Err(UnurError::error(ErrorKind::DistrDomain, "covariance matrix must be square"));
    }
    let n = m.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            if (m[(i, j)] - m[(j, i)]).abs() > 1e-8 * (1.0 + m[(i, j)].abs()) {
                return Err(UnurError::error(
                    ErrorKind::DistrDomain,
                    "covariance matrix must be symmetric",
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_cholesky_is_identity() {
        let m = DMatrix::<f64>::identity(2, 2);
        let l = cholesky(&m).unwrap();
        assert::close(l[(0, 0)], 1.0, 1e-12);
        assert::close(l[(1, 1)], 1.0, 1e-12);
    }

    #[test]
    fn rejects_asymmetric_matrix() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 0.0, 1.0]);
        assert!(cholesky(&m).is_err());
    }
}
