//! Universal non-uniform random variate generation.
//!
//! `unuran` builds a random variate generator for an arbitrary
//! distribution from a description of its density (and, for some
//! methods, its derivative or CDF) rather than requiring a
//! closed-form inverse CDF. Three sampling methods are provided:
//!
//! - [`method::tdr`] — Transformed Density Rejection, for distributions
//!   with a known T-concave density.
//! - [`method::pinv`] — Polynomial interpolation of the inverse CDF,
//!   for distributions with a computable (possibly only numerically)
//!   CDF.
//! - [`method::rou`] — the ratio-of-uniforms method, univariate (NROU)
//!   and multivariate (MROU), for densities known only up to a
//!   normalizing constant.
//!
//! # Example
//!
//! ```
//! use unuran::prelude::*;
//!
//! let distr = standard::normal();
//! let urng = Box::new(StdUrng::seed_from_u64(42));
//! let params: Parameter = TdrParams::new(distr, urng).into();
//! let mut gen = params.init().unwrap();
//!
//! let x = gen.sample().scalar();
//! assert!(x.is_finite());
//! ```
//!
//! # Design
//!
//! Parameter and generator objects are sealed sum types ([`Parameter`],
//! [`Generator`]) rather than trait objects: the three methods differ
//! too much in their setup knobs and failure modes to share a common
//! interface beyond "consume a parameter object, produce a generator or
//! an error" (see [`param`], [`gen`]).

pub mod config;
pub mod consts;
pub mod distr;
pub mod error;
pub mod gen;
pub mod log;
pub mod method;
pub mod misc;
pub mod param;
pub mod prelude;
pub mod urng;

pub use error::{ErrorKind, Result, Severity, UnurError};
pub use gen::{Generator, Sample};
pub use param::Parameter;
