//! Per-process configuration toggles (SPEC_FULL.md §1/§6 expansion).
//!
//! `spec.md` §6 lists four compile-time toggles: logging, null-pointer
//! checks, cookie-tag checks, and a default URNG. The first is a Cargo
//! feature (`logging`); the middle two have no meaning in safe Rust and
//! are dropped (§9). What is left is the default URNG used by
//! `Params::new_default` convenience constructors when a caller does not
//! want to thread an explicit `Box<dyn Urng>` through every call site.
use std::cell::RefCell;

use crate::urng::{StdUrng, Urng};

thread_local! {
    static DEFAULT_URNG_SEED: RefCell<Option<u64>> = RefCell::new(None);
}

/// Fix the seed used by [`default_urng`]. Affects only the calling
/// thread, matching the thread-local error handler and log buffer.
pub fn set_default_urng_seed(seed: u64) {
    DEFAULT_URNG_SEED.with(|s| *s.borrow_mut() = Some(seed));
}

/// Revert to an OS-seeded default URNG.
pub fn clear_default_urng_seed() {
    DEFAULT_URNG_SEED.with(|s| *s.borrow_mut() = None);
}

/// Build the URNG that parameter-object convenience constructors fall
/// back to when the caller does not supply one: a seeded `StdUrng` if
/// [`set_default_urng_seed`] was called on this thread, otherwise an
/// OS-seeded one.
pub fn default_urng() -> Box<dyn Urng> {
    DEFAULT_URNG_SEED.with(|s| match *s.borrow() {
        Some(seed) => Box::new(StdUrng::seed_from_u64(seed)),
        None => Box::new(StdUrng::new()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_default_is_reproducible() {
        set_default_urng_seed(7);
        let mut a = default_urng();
        let mut b = default_urng();
        assert_eq!(a.next_uniform(), b.next_uniform());
        clear_default_urng_seed();
    }

    #[test]
    fn cleared_default_falls_back_to_os_seed() {
        set_default_urng_seed(7);
        clear_default_urng_seed();
        let mut u = default_urng();
        let x = u.next_uniform();
        assert!((0.0..1.0).contains(&x));
    }
}
