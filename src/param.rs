//! Parameter object (SPEC_FULL.md §3.2, §2 L2): a sealed sum type over
//! the method-specific parameter-object structs in `method::*`.
//!
//! Mirrors the generator's sealed-sum-type dispatch (§9): no single
//! "parameter trait" is attempted, since each method's knobs and
//! `init` failure modes differ too much to share a common interface
//! beyond "consume self, produce a generator or an error."
use crate::error::Result;
use crate::gen::Generator;
use crate::method::{pinv::PinvParams, rou::RouParams, tdr::TdrParams};

/// The tagged sum over per-method parameter objects. `init` consumes
/// `self` regardless of success (§3.2: "exactly one `init` consumes
/// it; after `init` the parameter object is destroyed whether
/// initialization succeeded or failed").
pub enum Parameter {
    Tdr(TdrParams),
    Pinv(PinvParams),
    Rou(RouParams),
}

impl Parameter {
    pub fn init(self) -> Result<Generator> {
        match self {
            Parameter::Tdr(p) => p.init().map(Generator::Tdr),
            Parameter::Pinv(p) => p.init().map(Generator::Pinv),
            Parameter::Rou(p) => p.init().map(Generator::Rou),
        }
    }
}

impl From<TdrParams> for Parameter {
    fn from(p: TdrParams) -> Self {
        Parameter::Tdr(p)
    }
}

impl From<PinvParams> for Parameter {
    fn from(p: PinvParams) -> Self {
        Parameter::Pinv(p)
    }
}

impl From<RouParams> for Parameter {
    fn from(p: RouParams) -> Self {
        Parameter::Rou(p)
    }
}
