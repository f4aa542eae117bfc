//! Generator object (SPEC_FULL.md §3.3, §2 L2): a sealed sum type over
//! the method-specific generator structs, dispatching `sample` and
//! `reinit` on the tag (§9: "map directly to a sealed sum type whose
//! variants carry method-specific data").
use nalgebra::DVector;

use crate::error::{ErrorKind, Result, UnurError};
use crate::method::{pinv::PinvGenerator, rou::RouGenerator, tdr::TdrGenerator};

/// A drawn variate: scalar for TDR/PINV, vector for NROU/MROU.
#[derive(Debug, Clone)]
pub enum Sample {
    Scalar(f64),
    Vector(DVector<f64>),
}

impl Sample {
    /// Unwrap a scalar sample, panicking if this is a vector sample from
    /// MROU (`dim > 1`). Convenient for call sites that know their
    /// generator is univariate.
    pub fn scalar(&self) -> f64 {
        match self {
            Sample::Scalar(x) => *x,
            Sample::Vector(v) if v.len() == 1 => v[0],
            Sample::Vector(_) => panic!("sample is a vector with dim > 1, not a scalar"),
        }
    }
}

/// The tagged sum over per-method generators (§3.3, §9).
pub enum Generator {
    Tdr(TdrGenerator),
    Pinv(PinvGenerator),
    Rou(RouGenerator),
}

impl Generator {
    /// Draw one variate (§4.1/§4.2/§4.3 sampling contracts). Adaptive
    /// methods (TDR) may mutate internal tables; this is why `sample`
    /// takes `&mut self` (§9).
    pub fn sample(&mut self) -> Sample {
        match self {
            Generator::Tdr(g) => Sample::Scalar(g.sample()),
            Generator::Pinv(g) => Sample::Scalar(g.sample()),
            Generator::Rou(g) => Sample::Vector(g.sample()),
        }
    }

    /// Rebuild derived tables after the underlying distribution changed
    /// (§4.5 `[STALE] -> [INITIALIZED]` transition). PINV and NROU/MROU
    /// do not implement in-place reinit in this crate (there is no
    /// incremental update cheaper than building a fresh parameter object
    /// and calling `init` again), so they report `GenNoReinit` exactly as
    /// the original does for methods lacking a reinit routine (§6: the
    /// `Gen*` error-code group includes `no_reinit` for precisely this).
    pub fn reinit(&mut self) -> Result<()> {
        match self {
            Generator::Tdr(g) => g.reinit(),
            Generator::Pinv(_) => Err(UnurError::error(ErrorKind::GenNoReinit, "PINV does not implement in-place reinit; build a new generator instead")),
            Generator::Rou(_) => Err(UnurError::error(ErrorKind::GenNoReinit, "NROU/MROU do not implement in-place reinit; build a new generator instead")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distr::standard::normal;
    use crate::method::pinv::PinvParams;
    use crate::method::tdr::TdrParams;
    use crate::param::Parameter;
    use crate::urng::StdUrng;

    #[test]
    fn generator_dispatches_by_variant() {
        let d = normal();
        let params: Parameter = TdrParams::new(d, Box::new(StdUrng::seed_from_u64(1))).construction_points(vec![-1.0, 1.0]).into();
        let mut gen = params.init().unwrap();
        match gen.sample() {
            Sample::Scalar(x) => assert!(x.is_finite()),
            Sample::Vector(_) => panic!("TDR should produce scalar samples"),
        }
    }

    #[test]
    fn pinv_reports_no_reinit() {
        let d = normal();
        let params: Parameter = PinvParams::new(d, Box::new(StdUrng::seed_from_u64(2))).into();
        let mut gen = params.init().unwrap();
        assert_eq!(gen.reinit().unwrap_err().kind(), ErrorKind::GenNoReinit);
    }
}
