//! Distribution objects (SPEC_FULL.md §3.1, L1): a uniform handle over a
//! target distribution, exposing only the operations each kind actually
//! supports.
//!
//! `Distribution` is the tagged sum over the four kinds named in the
//! spec; each variant wraps a kind-specific struct carrying its own set
//! of optional attributes as `Option<T>` fields rather than a bitmask
//! (SPEC_FULL.md §3, "open questions" resolution) — pattern matching on
//! `Option` already gives us the "is this attribute populated" bit the
//! original tracked by hand.
pub mod continuous;
pub mod discrete;
pub mod empirical;
pub mod multivariate;
pub mod standard;

pub use continuous::ContinuousDistribution;
pub use discrete::DiscreteDistribution;
pub use empirical::{EmpiricalSample, EmpiricalVectorSample};
pub use multivariate::MultivariateDistribution;

/// The tagged sum over the four distribution kinds (§3.1).
#[derive(Clone)]
pub enum Distribution {
    Cont(ContinuousDistribution),
    Discr(DiscreteDistribution),
    Cvec(MultivariateDistribution),
    Cemp(EmpiricalSample),
    Cvemp(EmpiricalVectorSample),
}

impl Distribution {
    /// Human-readable name, as set by the constructing code.
    pub fn name(&self) -> &str {
        match self {
            Distribution::Cont(d) => d.name(),
            Distribution::Discr(d) => d.name(),
            Distribution::Cvec(d) => d.name(),
            Distribution::Cemp(d) => d.name(),
            Distribution::Cvemp(d) => d.name(),
        }
    }

    /// Dimension (1 for univariate kinds).
    pub fn dim(&self) -> usize {
        match self {
            Distribution::Cont(_) | Distribution::Discr(_) | Distribution::Cemp(_) => 1,
            Distribution::Cvec(d) => d.dim(),
            Distribution::Cvemp(d) => d.dim(),
        }
    }
}

impl From<ContinuousDistribution> for Distribution {
    fn from(d: ContinuousDistribution) -> Self {
        Distribution::Cont(d)
    }
}

impl From<DiscreteDistribution> for Distribution {
    fn from(d: DiscreteDistribution) -> Self {
        Distribution::Discr(d)
    }
}

impl From<MultivariateDistribution> for Distribution {
    fn from(d: MultivariateDistribution) -> Self {
        Distribution::Cvec(d)
    }
}

impl From<EmpiricalSample> for Distribution {
    fn from(d: EmpiricalSample) -> Self {
        Distribution::Cemp(d)
    }
}

impl From<EmpiricalVectorSample> for Distribution {
    fn from(d: EmpiricalVectorSample) -> Self {
        Distribution::Cvemp(d)
    }
}
