//! A skip list memtable in the spirit of LevelDB's `db/skiplist.h`.
//!
//! Writes are absorbed here and read back in ascending key order when the
//! table is flushed. Each node carries a tower of forward links; level 0 links
//! every node, and each level above links roughly half of the level below it.
//!
//! ```text
//! level 2:  HEAD ─────────────────► c ──────────────► NIL
//! level 1:  HEAD ───────► b ──────► c ──────────────► NIL
//! level 0:  HEAD ─► a ──► b ──► bb ► c ──► d ──► e ─► NIL
//! ```
//!
//! Insertion takes `&mut self` and every reader borrows `&self`, so the single
//! writer rule is upheld by the borrow checker. Engines that share a memtable
//! across threads wrap it in their own lock.

use std::fmt::Debug;
use std::iter::FusedIterator;

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::arena::{Index, Node, Nodes, HEAD, NULL};
use crate::error::{MemtableError, Result};
use crate::level::LevelGenerator;
use crate::options::{MemtableOptions, MAX_LEVEL_LIMIT};

pub struct Memtable {
    nodes: Nodes,
    levels: LevelGenerator,
    max_level: usize,
    size: usize,
}

impl Memtable {
    /// Empty memtable with the default max level and the fixed default seed.
    pub fn new() -> Memtable {
        Memtable::build(MemtableOptions::default())
    }

    pub fn with_options(options: MemtableOptions) -> Result<Memtable> {
        options.validate()?;
        Ok(Memtable::build(options))
    }

    fn build(options: MemtableOptions) -> Memtable {
        debug!(
            max_level = options.max_level,
            seed = options.seed,
            "creating memtable"
        );
        Memtable {
            nodes: Nodes::with_max_level(options.max_level),
            levels: LevelGenerator::new(options.max_level, options.seed),
            max_level: options.max_level,
            size: 0,
        }
    }

    /// Inserts `key` holding `value`.
    ///
    /// The key must be non-empty and must not be present yet. Updates are not
    /// supported; a rejected insert leaves the memtable untouched.
    pub fn insert(&mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> Result<()> {
        let key = key.into();
        if key.is_empty() {
            warn!("rejected insert with an empty key");
            return Err(MemtableError::EmptyKey);
        }

        let mut prev = [HEAD; MAX_LEVEL_LIMIT];
        let found = self.find_greater_or_equal(&key, Some(&mut prev[..self.max_level]));
        if found != NULL && self.nodes[found].key == key {
            warn!(key = ?key, "rejected insert of a duplicate key");
            return Err(MemtableError::DuplicateKey { key });
        }

        let level = self.levels.pick_level();
        let forward = prev[..=level]
            .iter()
            .enumerate()
            .map(|(l, &p)| self.nodes[p].forward[l])
            .collect();
        let node = Node {
            key,
            value: value.into(),
            forward,
        };
        trace!(key_len = node.key.len(), level, "inserting node");
        self.size += node.footprint();

        // The node's own links are complete before any predecessor points at it.
        let index = self.nodes.push(node);
        for (l, &p) in prev[..=level].iter().enumerate() {
            self.nodes[p].forward[l] = index;
        }
        Ok(())
    }

    /// Returns the value stored under `key`, or `None` when it was never
    /// inserted.
    pub fn find(&self, key: impl AsRef<[u8]>) -> Result<Option<&Bytes>> {
        let key = key.as_ref();
        if key.is_empty() {
            warn!("rejected lookup with an empty key");
            return Err(MemtableError::EmptyKey);
        }

        let found = self.find_greater_or_equal(key, None);
        if found != NULL && self.nodes[found].key == key {
            Ok(Some(&self.nodes[found].value))
        } else {
            Ok(None)
        }
    }

    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        Ok(self.find(key)?.is_some())
    }

    /// First node whose key is greater than or equal to `key`, or `NULL`.
    ///
    /// When `prev` is given it is filled with the last node visited on every
    /// level, which is where a new node for `key` has to be linked in.
    fn find_greater_or_equal(&self, key: &[u8], mut prev: Option<&mut [Index]>) -> Index {
        let mut current = HEAD;
        let mut level = self.max_level - 1;
        loop {
            let next = self.nodes[current].forward[level];
            if next != NULL && &self.nodes[next].key[..] < key {
                current = next;
            } else {
                if let Some(prev) = prev.as_deref_mut() {
                    prev[level] = current;
                }
                if level == 0 {
                    return next;
                }
                level -= 1;
            }
        }
    }

    /// A cursor positioned before the first entry.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor {
            memtable: self,
            current: HEAD,
        }
    }

    /// All entries in ascending key order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            memtable: self,
            next: self.nodes.head().forward[0],
            remaining: self.len(),
            exact: true,
        }
    }

    /// Entries whose key is greater than or equal to `key`, in ascending order.
    pub fn iter_from(&self, key: impl AsRef<[u8]>) -> Result<Iter<'_>> {
        let key = key.as_ref();
        if key.is_empty() {
            warn!("rejected iteration from an empty key");
            return Err(MemtableError::EmptyKey);
        }
        Ok(Iter {
            memtable: self,
            next: self.find_greater_or_equal(key, None),
            remaining: self.len(),
            exact: false,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes held by keys, values and forward links. The owning engine
    /// compares this against its flush threshold.
    pub fn approximate_size(&self) -> usize {
        self.size
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }
}

impl Default for Memtable {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Memtable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memtable")
            .field("len", &self.len())
            .field("approximate_size", &self.size)
            .field("max_level", &self.max_level)
            .finish()
    }
}

impl<'a> IntoIterator for &'a Memtable {
    type Item = (&'a Bytes, &'a Bytes);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A forward-only cursor over the level-0 chain.
///
/// The cursor starts before the first entry; call [`Cursor::advance`] to move
/// onto it. Once exhausted it stays exhausted, and a fresh cursor from
/// [`Memtable::cursor`] starts over.
pub struct Cursor<'a> {
    memtable: &'a Memtable,
    current: Index,
}

impl<'a> Cursor<'a> {
    /// Moves to the next entry and reports whether one is positioned.
    pub fn advance(&mut self) -> bool {
        if self.current == NULL {
            return false;
        }
        self.current = self.memtable.nodes[self.current].forward[0];
        self.current != NULL
    }

    pub fn is_valid(&self) -> bool {
        self.current != HEAD && self.current != NULL
    }

    /// `None` before the first [`advance`](Cursor::advance) and after the end.
    pub fn key(&self) -> Option<&'a Bytes> {
        self.entry().map(|node| &node.key)
    }

    /// `None` before the first [`advance`](Cursor::advance) and after the end.
    pub fn value(&self) -> Option<&'a Bytes> {
        self.entry().map(|node| &node.value)
    }

    fn entry(&self) -> Option<&'a Node> {
        let memtable: &'a Memtable = self.memtable;
        if self.is_valid() {
            Some(&memtable.nodes[self.current])
        } else {
            None
        }
    }
}

impl Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor").field("key", &self.key()).finish()
    }
}

pub struct Iter<'a> {
    memtable: &'a Memtable,
    next: Index,
    remaining: usize,
    // `remaining` is only an upper bound when iteration starts mid-list.
    exact: bool,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Bytes, &'a Bytes);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == NULL {
            return None;
        }
        let memtable: &'a Memtable = self.memtable;
        let node = &memtable.nodes[self.next];
        self.next = node.forward[0];
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.next == NULL {
            (0, Some(0))
        } else if self.exact {
            (self.remaining, Some(self.remaining))
        } else {
            (1, Some(self.remaining))
        }
    }
}

impl FusedIterator for Iter<'_> {}
