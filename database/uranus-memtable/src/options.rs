use crate::error::{MemtableError, Result};

/// Number of levels used when the caller does not ask for anything else.
pub const DEFAULT_MAX_LEVEL: usize = 16;

/// Upper bound for `max_level`. Level draws take `max_level` bits out of a
/// `u64`, so this keeps plenty of headroom.
pub const MAX_LEVEL_LIMIT: usize = 32;

/// Seed shared by every memtable built with default options, which keeps the
/// shape of the list reproducible between runs.
pub const DEFAULT_SEED: u64 = 134787;

/// Construction parameters of a [`Memtable`](crate::Memtable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemtableOptions {
    /// Number of forward slots of the head sentinel. Node levels are drawn
    /// from `0..max_level`.
    pub max_level: usize,
    /// Seed of the level generator. Engines that keep many memtables alive
    /// at once may hand out distinct seeds.
    pub seed: u64,
}

impl Default for MemtableOptions {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            seed: DEFAULT_SEED,
        }
    }
}

impl MemtableOptions {
    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_level == 0 || self.max_level > MAX_LEVEL_LIMIT {
            return Err(MemtableError::InvalidMaxLevel {
                max_level: self.max_level,
                limit: MAX_LEVEL_LIMIT,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_valid() {
        let options = MemtableOptions::default();
        assert_eq!(options.max_level, 16);
        assert_eq!(options.seed, 134787);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn max_level_bounds() {
        let zero = MemtableOptions::default().with_max_level(0);
        assert_eq!(
            zero.validate(),
            Err(MemtableError::InvalidMaxLevel {
                max_level: 0,
                limit: MAX_LEVEL_LIMIT
            })
        );

        let too_tall = MemtableOptions::default().with_max_level(MAX_LEVEL_LIMIT + 1);
        assert!(too_tall.validate().is_err());

        assert!(MemtableOptions::default().with_max_level(1).validate().is_ok());
        assert!(MemtableOptions::default()
            .with_max_level(MAX_LEVEL_LIMIT)
            .validate()
            .is_ok());
    }
}
