//! Random number engines and seed sources for the collision experiment.
//!
//! Sampling code never names a concrete engine. It asks a
//! `UniformSource` for integers in a closed range, and every `RngCore`
//! is one. The experiment varies two things underneath that seam:
//!   - which engine produces the stream (32-bit or 64-bit output),
//!   - where engine seeds come from (OS entropy or a fixed master seed).

use rand::rngs::OsRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::{Pcg32, Pcg64Mcg};
use serde::{Deserialize, Serialize};

use crate::error::ExperimentResult;

/// Produces uniformly distributed integers in a closed range.
pub trait UniformSource {
    /// Draw from `[lo, hi]`. Requires `lo <= hi`.
    fn uniform_inclusive(&mut self, lo: usize, hi: usize) -> usize;
}

impl<R: RngCore> UniformSource for R {
    fn uniform_inclusive(&mut self, lo: usize, hi: usize) -> usize {
        assert!(lo <= hi, "empty range [{lo}, {hi}]");
        self.gen_range(lo..=hi)
    }
}

/// Output width of the engine behind a strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineWidth {
    Bits32,
    Bits64,
}

impl EngineWidth {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bits32 => "32BIT",
            Self::Bits64 => "64BIT",
        }
    }
}

/// A seeded engine of either width.
#[derive(Clone, Debug)]
pub enum Engine {
    Bits32(Pcg32),
    Bits64(Pcg64Mcg),
}

impl Engine {
    pub fn seeded(width: EngineWidth, seed: u64) -> Self {
        match width {
            EngineWidth::Bits32 => Self::Bits32(Pcg32::seed_from_u64(seed)),
            EngineWidth::Bits64 => Self::Bits64(Pcg64Mcg::seed_from_u64(seed)),
        }
    }

    pub fn width(&self) -> EngineWidth {
        match self {
            Self::Bits32(_) => EngineWidth::Bits32,
            Self::Bits64(_) => EngineWidth::Bits64,
        }
    }
}

impl RngCore for Engine {
    fn next_u32(&mut self) -> u32 {
        match self {
            Self::Bits32(inner) => inner.next_u32(),
            Self::Bits64(inner) => inner.next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self {
            Self::Bits32(inner) => inner.next_u64(),
            Self::Bits64(inner) => inner.next_u64(),
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        match self {
            Self::Bits32(inner) => inner.fill_bytes(dest),
            Self::Bits64(inner) => inner.fill_bytes(dest),
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        match self {
            Self::Bits32(inner) => inner.try_fill_bytes(dest),
            Self::Bits64(inner) => inner.try_fill_bytes(dest),
        }
    }
}

/// Where engine seeds come from.
///
/// Seeds are 32 bits wide for both engine widths. The seed space is part
/// of what `Recreate` measures: with 2^32 seeds a fresh engine can replay
/// a nickname already in the population.
pub trait SeedSource: Send {
    /// Always `<= u32::MAX`.
    fn next_seed(&mut self) -> ExperimentResult<u64>;
}

/// Every seed is a fresh 32-bit read from the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEntropy;

impl SeedSource for OsEntropy {
    fn next_seed(&mut self) -> ExperimentResult<u64> {
        let mut bytes = [0u8; 4];
        OsRng.try_fill_bytes(&mut bytes)?;
        Ok(u64::from(u32::from_le_bytes(bytes)))
    }
}

/// Reproducible seed stream derived from a master seed and a stable slot.
///
/// Two `FixedSeed`s with the same master seed and slot yield the same
/// sequence.
#[derive(Clone, Debug)]
pub struct FixedSeed {
    base: u64,
    draws: u64,
}

impl FixedSeed {
    pub fn new(master_seed: u64, slot: u64) -> Self {
        let base = master_seed ^ slot.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self { base, draws: 0 }
    }
}

impl SeedSource for FixedSeed {
    fn next_seed(&mut self) -> ExperimentResult<u64> {
        let seed = self.base.wrapping_add(self.draws.wrapping_mul(0xd1b5_4a32_d192_ed03));
        self.draws += 1;
        // Odd multiplier: the low 32 bits cycle through all 2^32 values.
        Ok(u64::from(seed as u32))
    }
}

impl<S: SeedSource + ?Sized> SeedSource for Box<S> {
    fn next_seed(&mut self) -> ExperimentResult<u64> {
        (**self).next_seed()
    }
}
