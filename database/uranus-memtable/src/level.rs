use std::fmt::Debug;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Draws node levels from a geometric distribution capped at `max_level - 1`.
///
/// A uniform value with `max_level` significant bits is drawn and the position
/// of its lowest set bit becomes the level, so `P(level = i) = 1/2^(i+1)` and
/// the top level absorbs the remaining tail. Zero has no set bit and is
/// redrawn.
pub struct LevelGenerator {
    rng: StdRng,
    max_level: usize,
}

impl LevelGenerator {
    pub fn new(max_level: usize, seed: u64) -> LevelGenerator {
        debug_assert!(max_level > 0 && max_level < u64::BITS as usize);
        LevelGenerator {
            rng: StdRng::seed_from_u64(seed),
            max_level,
        }
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Zero indexed.
    pub fn pick_level(&mut self) -> usize {
        let bound = 1u64 << self.max_level;
        loop {
            let r = self.rng.gen_range(0..bound);
            if r != 0 {
                return r.trailing_zeros() as usize;
            }
        }
    }
}

impl Debug for LevelGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelGenerator")
            .field("max_level", &self.max_level)
            .finish_non_exhaustive()
    }
}
