//! Uranus memtable: the ordered in-memory write buffer of the storage engine.
//!
//! Recent writes are inserted into a [`Memtable`], served by point lookups, and
//! drained in ascending key order when the engine flushes them to disk.
//!
//! ```
//! use uranus_memtable::Memtable;
//!
//! let mut memtable = Memtable::new();
//! memtable.insert("b", vec![1]).unwrap();
//! memtable.insert("a", vec![2]).unwrap();
//!
//! assert_eq!(memtable.find("a").unwrap().unwrap(), &[2u8][..]);
//! let keys: Vec<_> = memtable.iter().map(|(k, _)| k.clone()).collect();
//! assert_eq!(keys, vec!["a", "b"]);
//! ```

mod arena;

pub mod error;
pub use error::*;

pub mod level;
pub use level::LevelGenerator;

pub mod memtable;
pub use memtable::*;

pub mod options;
pub use options::*;
