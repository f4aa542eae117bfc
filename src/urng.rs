//! Uniform random number generator abstraction (SPEC_FULL.md §6, the
//! `urng` module in the layer table of §2).
//!
//! Every method consumes uniform variates exclusively through this trait;
//! nothing in `method::*` ever touches `rand` directly, mirroring the way
//! the original treats the URNG as a fully swappable external
//! collaborator (§6: "consumes uniform streams from an external
//! abstraction"). [`StdUrng`] is the bundled implementation, backed by
//! `rand`'s PRNG the way `rand`'s own test helpers seed a `StdRng`.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{ErrorKind, Result, UnurError};

/// A source of independent `U(0,1)` draws, with optional stream-management
/// operations. Every method of the trait has a default that reports
/// `ErrorKind::UrngMissing`, matching the original's "optional" URNG
/// operations (§6): a minimal implementation only needs `next_uniform`.
pub trait Urng: Send {
    /// Draw one value uniformly distributed on `[0, 1)`.
    fn next_uniform(&mut self) -> f64;

    /// Rewind the stream to its initial state, if supported.
    fn reset(&mut self) -> Result<()> {
        Err(UnurError::warning(ErrorKind::UrngMissing, "reset is not supported by this URNG"))
    }

    /// Fill `out` with independent draws. The default simply calls
    /// `next_uniform` repeatedly; URNGs with a bulk-fill fast path may
    /// override it.
    fn sample_array(&mut self, out: &mut [f64]) {
        for slot in out.iter_mut() {
            *slot = self.next_uniform();
        }
    }

    /// Reseed the stream, if supported.
    fn set_seed(&mut self, _seed: u64) -> Result<()> {
        Err(UnurError::warning(ErrorKind::UrngMissing, "set_seed is not supported by this URNG"))
    }

    /// Jump to an independent substream, if supported.
    fn next_substream(&mut self) -> Result<()> {
        Err(UnurError::warning(ErrorKind::UrngMissing, "next_substream is not supported by this URNG"))
    }

    /// Toggle antithetic sampling (`1 - u` instead of `u`), if supported.
    fn anti(&mut self, _on: bool) -> Result<()> {
        Err(UnurError::warning(ErrorKind::UrngMissing, "anti is not supported by this URNG"))
    }
}

/// The bundled URNG: a seedable PRNG stream with antithetic toggling and
/// independent substreams via a splitmix64 seed sequence.
#[derive(Clone)]
pub struct StdUrng {
    rng: StdRng,
    seed: u64,
    substream: u64,
    antithetic: bool,
}

impl StdUrng {
    /// A fresh stream seeded from the OS entropy source.
    pub fn new() -> Self {
        let seed = rand::thread_rng().gen::<u64>();
        Self::seed_from_u64(seed)
    }

    /// A reproducible stream from an explicit seed. Two `StdUrng`s built
    /// from the same seed produce bit-identical output (§5: "sample output
    /// is a deterministic function of the URNG sequence").
    pub fn seed_from_u64(seed: u64) -> Self {
        StdUrng {
            rng: StdRng::seed_from_u64(seed),
            seed,
            substream: 0,
            antithetic: false,
        }
    }
}

impl Default for StdUrng {
    fn default() -> Self {
        Self::new()
    }
}

/// splitmix64, used only to derive independent substream seeds from a
/// running counter; not used for sampling itself.
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl Urng for StdUrng {
    fn next_uniform(&mut self) -> f64 {
        let u: f64 = self.rng.gen();
        if self.antithetic {
            1.0 - u
        } else {
            u
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.rng = StdRng::seed_from_u64(self.seed ^ self.substream);
        Ok(())
    }

    fn set_seed(&mut self, seed: u64) -> Result<()> {
        self.seed = seed;
        self.substream = 0;
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }

    fn next_substream(&mut self) -> Result<()> {
        self.substream += 1;
        let derived = splitmix64(self.seed.wrapping_add(self.substream));
        self.rng = StdRng::seed_from_u64(derived);
        Ok(())
    }

    fn anti(&mut self, on: bool) -> Result<()> {
        self.antithetic = on;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_reproduces_sequence() {
        let mut u = StdUrng::seed_from_u64(42);
        let first: Vec<f64> = (0..10).map(|_| u.next_uniform()).collect();
        u.reset().unwrap();
        let second: Vec<f64> = (0..10).map(|_| u.next_uniform()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn antithetic_complements() {
        let mut u = StdUrng::seed_from_u64(7);
        let x = u.next_uniform();
        u.reset().unwrap();
        u.anti(true).unwrap();
        let y = u.next_uniform();
        assert::close(x + y, 1.0, 1e-12);
    }

    #[test]
    fn substreams_are_independent_of_primary() {
        let mut a = StdUrng::seed_from_u64(1);
        let mut b = StdUrng::seed_from_u64(1);
        b.next_substream().unwrap();
        let xa: Vec<f64> = (0..5).map(|_| a.next_uniform()).collect();
        let xb: Vec<f64> = (0..5).map(|_| b.next_uniform()).collect();
        assert_ne!(xa, xb);
    }
}
