//! Index-addressed node storage backing the skip list.
//!
//! Nodes live in a `Vec` and refer to each other by position, so the whole
//! graph is torn down by dropping the vector. Slot 0 is reserved for the head
//! sentinel, which is kept outside the vector because it carries no key.

use std::mem::size_of;

use bytes::Bytes;

pub(crate) type Index = usize;

pub(crate) const NULL: Index = usize::MAX;
pub(crate) const HEAD: Index = 0;
const OFFSET: Index = 1;

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) key: Bytes,
    pub(crate) value: Bytes,
    /// One successor per level, `forward.len() == level + 1`.
    pub(crate) forward: Box<[Index]>,
}

impl Node {
    #[cfg(test)]
    pub(crate) fn level(&self) -> usize {
        self.forward.len() - 1
    }

    /// Bytes accounted to this node when sizing the memtable.
    pub(crate) fn footprint(&self) -> usize {
        size_of::<Node>()
            + self.key.len()
            + self.value.len()
            + self.forward.len() * size_of::<Index>()
    }
}

#[derive(Debug)]
pub(crate) struct Nodes {
    head: Node,
    data_nodes: Vec<Node>,
}

impl Nodes {
    pub(crate) fn with_max_level(max_level: usize) -> Self {
        Nodes {
            head: Node {
                key: Bytes::new(),
                value: Bytes::new(),
                forward: vec![NULL; max_level].into_boxed_slice(),
            },
            data_nodes: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, node: Node) -> Index {
        self.data_nodes.push(node);
        self.data_nodes.len() - 1 + OFFSET
    }

    pub(crate) fn len(&self) -> usize {
        self.data_nodes.len()
    }

    pub(crate) fn head(&self) -> &Node {
        &self.head
    }

    /// Data nodes in insertion order, not key order.
    #[cfg(test)]
    pub(crate) fn data_nodes(&self) -> &[Node] {
        &self.data_nodes
    }
}

impl std::ops::Index<Index> for Nodes {
    type Output = Node;

    fn index(&self, index: Index) -> &Self::Output {
        match index {
            HEAD => &self.head,
            _ => &self.data_nodes[index - OFFSET],
        }
    }
}

impl std::ops::IndexMut<Index> for Nodes {
    fn index_mut(&mut self, index: Index) -> &mut Self::Output {
        match index {
            HEAD => &mut self.head,
            _ => &mut self.data_nodes[index - OFFSET],
        }
    }
}
