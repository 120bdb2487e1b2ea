//! Persistent leftist heap of sidetrack edges.
//!
//! Nodes live in an append-only arena and are addressed by [`NodeId`]; once a
//! node is pushed it is never written again, so any number of heap roots can
//! share subtrees. `insert` and `merge` copy only the right spine they walk
//! (O(log m) nodes) and leave every older root valid. The whole arena is
//! dropped at once together with the forest that owns it.

use crate::graph::Cost;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    #[inline] pub fn index(self) -> usize { self.0 as usize }
}

/// Root handle of a (possibly empty) heap.
pub type HeapRef = Option<NodeId>;

/// A non-tree arc `origin -> target` and what taking it costs on top of the
/// shortest path from `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sidetrack {
    pub origin: u32,
    pub target: u32,
    pub edge: u32,
    pub extra_cost: Cost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidetrackNode {
    pub sidetrack: Sidetrack,
    pub left: HeapRef,
    pub right: HeapRef,
    pub rank: u32, // null-path length, 1 for a leaf
}

#[derive(Debug, Clone, Default)]
pub struct SidetrackArena { nodes: Vec<SidetrackNode> }

impl SidetrackArena {
    pub fn new() -> Self { Self::default() }
    pub fn with_capacity(cap: usize) -> Self { Self { nodes: Vec::with_capacity(cap) } }

    #[inline] pub fn len(&self) -> usize { self.nodes.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.nodes.is_empty() }
    #[inline] pub fn node(&self, id: NodeId) -> &SidetrackNode { &self.nodes[id.index()] }
    #[inline] pub fn key(&self, id: NodeId) -> Cost { self.nodes[id.index()].sidetrack.extra_cost }
    #[inline] pub fn rank(&self, heap: HeapRef) -> u32 { heap.map_or(0, |id| self.nodes[id.index()].rank) }
    #[inline] pub fn peek(&self, heap: HeapRef) -> Option<&Sidetrack> { heap.map(|id| &self.nodes[id.index()].sidetrack) }

    fn alloc(&mut self, node: SidetrackNode) -> NodeId {
        assert!(self.nodes.len() < u32::MAX as usize, "sidetrack arena exhausted the u32 id space");
        self.nodes.push(node);
        NodeId((self.nodes.len() - 1) as u32)
    }

    pub fn singleton(&mut self, sidetrack: Sidetrack) -> NodeId {
        self.alloc(SidetrackNode { sidetrack, left: None, right: None, rank: 1 })
    }

    /// `merge(heap, singleton(sidetrack))`. On equal keys the existing
    /// entries stay above the new one.
    pub fn insert(&mut self, heap: HeapRef, sidetrack: Sidetrack) -> HeapRef {
        let single = self.singleton(sidetrack);
        self.merge(heap, Some(single))
    }

    /// Non-destructive leftist merge. The smaller root wins, with `a` winning
    /// ties; the loser is merged into the winner's right child and children are
    /// swapped wherever `rank(left) < rank(right)`.
    ///
    /// Iterative: descends the right spines onto an explicit stack, then
    /// rebuilds fresh copies of the visited nodes bottom-up.
    pub fn merge(&mut self, a: HeapRef, b: HeapRef) -> HeapRef {
        let mut spine: Vec<NodeId> = Vec::new();
        let (mut a, mut b) = (a, b);
        let mut merged = loop {
            match (a, b) {
                (None, rest) | (rest, None) => break rest,
                (Some(x), Some(y)) => {
                    let (root, other) = if self.key(y) < self.key(x) { (y, x) } else { (x, y) };
                    spine.push(root);
                    a = self.nodes[root.index()].right;
                    b = Some(other);
                }
            }
        };
        while let Some(id) = spine.pop() {
            let node = self.nodes[id.index()];
            let (mut left, mut right) = (node.left, merged);
            if self.rank(left) < self.rank(right) { std::mem::swap(&mut left, &mut right); }
            let rank = self.rank(right) + 1;
            merged = Some(self.alloc(SidetrackNode { sidetrack: node.sidetrack, left, right, rank }));
        }
        merged
    }

    /// Preorder walk over every entry reachable from `heap`.
    pub fn iter(&self, heap: HeapRef) -> impl Iterator<Item = &Sidetrack> + '_ {
        let mut stack: Vec<NodeId> = heap.into_iter().collect();
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            let node = &self.nodes[id.index()];
            stack.extend(node.right);
            stack.extend(node.left);
            Some(&node.sidetrack)
        })
    }

    /// Checks heap order, the leftist property and stored ranks below `heap`.
    pub fn validate(&self, heap: HeapRef) -> Result<(), String> {
        let mut stack: Vec<NodeId> = heap.into_iter().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            for child in [node.left, node.right].into_iter().flatten() {
                if self.key(child) < node.sidetrack.extra_cost {
                    return Err(format!("node {} has child {} with smaller key", id.0, child.0));
                }
                stack.push(child);
            }
            if self.rank(node.left) < self.rank(node.right) {
                return Err(format!("node {} violates rank(left) >= rank(right)", id.0));
            }
            if node.rank != self.rank(node.right) + 1 {
                return Err(format!("node {} stores rank {} expected {}", id.0, node.rank, self.rank(node.right) + 1));
            }
        }
        Ok(())
    }
}
