//! Numeric utilities shared by the method implementations (SPEC_FULL.md §2, L0).
//!
//! Every routine here is a pure function or a small, self-contained
//! algorithm with no knowledge of distributions or generators: Gauss-Lobatto
//! integration, bisection/Newton root finding, Hooke-Jeeves pattern search,
//! a guide table, and thin Cholesky/inverse wrappers around `nalgebra`.
pub mod guide;
pub mod hooke;
pub mod matrix;
pub mod quad;
pub mod roots;

pub use guide::GuideTable;
pub use hooke::HookeJeeves;
pub use quad::{adaptive_lobatto, gauss_lobatto5};
pub use roots::{bisect, newton};
