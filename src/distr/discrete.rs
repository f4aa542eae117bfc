//! Univariate discrete distribution object (SPEC_FULL.md §3.1 DISCR).
use std::fmt;
use std::sync::Arc;

use crate::error::{ErrorKind, Result, UnurError};

type PmfFn = Arc<dyn Fn(i64) -> f64 + Send + Sync>;
type CdfFn = Arc<dyn Fn(i64) -> f64 + Send + Sync>;

#[derive(Clone)]
pub struct DiscreteDistribution {
    name: String,
    pmf: Option<PmfFn>,
    /// Finite probability vector anchored at `pv_start`.
    pv: Option<Vec<f64>>,
    pv_start: i64,
    cdf: Option<CdfFn>,
    domain: (i64, i64),
    mode: Option<i64>,
    sum: Option<f64>,
}

impl fmt::Debug for DiscreteDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscreteDistribution")
            .field("name", &self.name)
            .field("domain", &self.domain)
            .field("mode", &self.mode)
            .field("sum", &self.sum)
            .field("has_pmf", &self.pmf.is_some())
            .field("has_pv", &self.pv.is_some())
            .finish()
    }
}

impl DiscreteDistribution {
    pub fn new() -> Self {
        DiscreteDistribution {
            name: String::from("unnamed"),
            pmf: None,
            pv: None,
            pv_start: 0,
            cdf: None,
            domain: (i64::MIN, i64::MAX),
            mode: None,
            sum: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_pmf<F>(mut self, pmf: F) -> Self
    where
        F: Fn(i64) -> f64 + Send + Sync + 'static,
    {
        self.pmf = Some(Arc::new(pmf));
        self
    }

    /// Install a finite probability vector anchored at `start` (i.e.
    /// `pv[i]` is the probability of `start + i`).
    pub fn with_pv(mut self, start: i64, pv: Vec<f64>) -> Result<Self> {
        if pv.iter().any(|&p| p < 0.0) {
            return Err(UnurError::error(ErrorKind::DistrDomain, "probability vector entries must be non-negative"));
        }
        self.pv_start = start;
        self.domain = (start, start + pv.len() as i64 - 1);
        self.pv = Some(pv);
        self
            .set_domain(self.domain.0, self.domain.1)
    }

    pub fn with_cdf<F>(mut self, cdf: F) -> Self
    where
        F: Fn(i64) -> f64 + Send + Sync + 'static,
    {
        self.cdf = Some(Arc::new(cdf));
        self
    }

    pub fn set_domain(mut self, a: i64, b: i64) -> Result<Self> {
        if a > b {
            return Err(UnurError::error(ErrorKind::DistrDomain, "domain requires a <= b"));
        }
        self.domain = (a, b);
        Ok(self)
    }

    pub fn set_mode(mut self, mode: i64) -> Result<Self> {
        if mode < self.domain.0 || mode > self.domain.1 {
            return Err(UnurError::error(ErrorKind::DistrDomain, "mode outside domain"));
        }
        self.mode = Some(mode);
        Ok(self)
    }

    pub fn set_sum(mut self, sum: f64) -> Result<Self> {
        if !(sum > 0.0) {
            return Err(UnurError::error(ErrorKind::DistrDomain, "sum must be positive"));
        }
        self.sum = Some(sum);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pmf(&self, k: i64) -> Result<f64> {
        if k < self.domain.0 || k > self.domain.1 {
            return Ok(0.0);
        }
        if let Some(pv) = &self.pv {
            let idx = (k - self.pv_start) as usize;
            return Ok(pv.get(idx).copied().unwrap_or(0.0));
        }
        if let Some(f) = &self.pmf {
            return Ok(f(k).max(0.0));
        }
        Err(UnurError::error(ErrorKind::DistrDataMissing, "neither pmf nor probability vector set"))
    }

    pub fn cdf(&self, k: i64) -> Result<f64> {
        match &self.cdf {
            Some(f) => Ok(f(k).clamp(0.0, 1.0)),
            None => Err(UnurError::error(ErrorKind::DistrDataMissing, "cdf not set")),
        }
    }

    pub fn domain(&self) -> (i64, i64) {
        self.domain
    }

    pub fn mode(&self) -> Result<i64> {
        self.mode.ok_or_else(|| UnurError::error(ErrorKind::DistrDataMissing, "mode not set"))
    }

    pub fn sum(&self) -> Result<f64> {
        self.sum.ok_or_else(|| UnurError::error(ErrorKind::DistrDataMissing, "sum not set"))
    }
}

impl Default for DiscreteDistribution {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_vector_lookup() {
        let d = DiscreteDistribution::new().with_pv(0, vec![0.2, 0.3, 0.5]).unwrap();
        assert::close(d.pmf(1).unwrap(), 0.3, 1e-12);
        assert_eq!(d.pmf(-1).unwrap(), 0.0);
        assert_eq!(d.pmf(10).unwrap(), 0.0);
    }

    #[test]
    fn rejects_negative_probabilities() {
        let d = DiscreteDistribution::new().with_pv(0, vec![0.5, -0.1]);
        assert!(d.is_err());
    }
}
