//! Method implementations (SPEC_FULL.md §2 L3, the core of the core).
//!
//! Each submodule is a self-contained method: its own parameter-object
//! struct, its own generator struct, its own `init`/`sample`/`reinit`.
//! [`crate::param::Parameter`] and [`crate::gen::Generator`] are the
//! sealed sum types that tie these together (§9: "map directly to a
//! sealed sum type ... do not attempt a single generator trait").
pub mod pinv;
pub mod rou;
pub mod tdr;
