//! Empirical sample distribution objects (SPEC_FULL.md §3.1 CEMP/CVEMP).
//!
//! These carry a raw sample instead of a functional form. No method in
//! this crate (TDR/PINV/NROU/MROU) consumes them directly, but the
//! distribution-object interface (§4.4) is uniform across all four kinds,
//! so the types are specified here for completeness of the data model.
use crate::error::{ErrorKind, Result, UnurError};

/// A raw sample of real scalars (§3.1 CEMP).
#[derive(Debug, Clone)]
pub struct EmpiricalSample {
    name: String,
    data: Vec<f64>,
}

impl EmpiricalSample {
    /// Build from a non-empty sample.
    pub fn new(data: Vec<f64>) -> Result<Self> {
        if data.is_empty() {
            return Err(UnurError::error(ErrorKind::DistrRequired, "empirical sample must be non-empty"));
        }
        Ok(EmpiricalSample { name: String::from("unnamed"), data })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A raw sample of real vectors, all of the same dimension (§3.1 CVEMP).
#[derive(Debug, Clone)]
pub struct EmpiricalVectorSample {
    name: String,
    dim: usize,
    data: Vec<Vec<f64>>,
}

impl EmpiricalVectorSample {
    pub fn new(data: Vec<Vec<f64>>) -> Result<Self> {
        let dim = data
            .first()
            .ok_or_else(|| UnurError::error(ErrorKind::DistrRequired, "empirical vector sample must be non-empty"))?
            .len();
        if data.iter().any(|row| row.len() != dim) {
            return Err(UnurError::error(ErrorKind::DistrDomain, "all rows of an empirical vector sample must share one dimension"));
        }
        Ok(EmpiricalVectorSample { name: String::from("unnamed"), dim, data })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn data(&self) -> &[Vec<f64>] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_sample() {
        assert!(EmpiricalSample::new(vec![]).is_err());
    }

    #[test]
    fn rejects_ragged_vector_sample() {
        let data = vec![vec![0.0, 1.0], vec![0.0]];
        assert!(EmpiricalVectorSample::new(data).is_err());
    }

    #[test]
    fn accepts_well_formed_vector_sample() {
        let data = vec![vec![0.0, 1.0], vec![2.0, 3.0]];
        let s = EmpiricalVectorSample::new(data).unwrap();
        assert_eq!(s.dim(), 2);
    }
}
