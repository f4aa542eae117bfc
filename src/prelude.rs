//! Re-imports for convenience.
#[doc(no_inline)]
pub use crate::config;
#[doc(no_inline)]
pub use crate::distr::standard;
#[doc(no_inline)]
pub use crate::distr::{ContinuousDistribution, DiscreteDistribution, Distribution, EmpiricalSample, EmpiricalVectorSample, MultivariateDistribution};
#[doc(no_inline)]
pub use crate::error::{ErrorKind, Result, Severity, UnurError};
#[doc(no_inline)]
pub use crate::gen::{Generator, Sample};
#[doc(no_inline)]
pub use crate::method::pinv::{PinvGenerator, PinvParams};
#[doc(no_inline)]
pub use crate::method::rou::{RouGenerator, RouParams};
#[doc(no_inline)]
pub use crate::method::tdr::{Transform, TdrGenerator, TdrParams, Variant};
#[doc(no_inline)]
pub use crate::param::Parameter;
#[doc(no_inline)]
pub use crate::urng::{StdUrng, Urng};
