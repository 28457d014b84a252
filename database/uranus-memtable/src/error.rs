use bytes::Bytes;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MemtableError>;

/// Every variant is a caller contract violation. None of them are transient,
/// so retrying the same call never helps.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemtableError {
    #[error("memtable keys must not be empty")]
    EmptyKey,
    #[error("key {key:?} is already present in the memtable")]
    DuplicateKey { key: Bytes },
    #[error("max level {max_level} is out of range, expected 1..={limit}")]
    InvalidMaxLevel { max_level: usize, limit: usize },
}
