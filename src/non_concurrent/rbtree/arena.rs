use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Index, IndexMut};

use super::node::{Color, NodeId, RbNode};

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaError {
    /// Every `NodeId` has been handed out already.
    CapacityOverflow,
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaError::CapacityOverflow => f.write_str("node arena cannot hold any more nodes"),
        }
    }
}

impl std::error::Error for ArenaError {}

/// Storage for tree nodes.
///
/// The arena owns the node memory; trees only own the links between nodes. Slot 0 is the
/// sentinel, shared by every tree built over this arena. Nodes are never removed from the
/// arena, so a [`NodeId`] stays valid (and keeps pointing at the same node) for as long as the
/// arena lives, no matter how much it grows.
pub struct NodeArena<K> {
    nodes: Vec<RbNode<K>>,
}

// the sentinel takes up slot 0, and one-past-the-last handle must still fit in a `u32`
const MAX_NODES: usize = u32::MAX as usize - 1;

impl<K: Default> NodeArena<K> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an arena with room for at least `capacity` nodes before it has to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.saturating_add(1));
        // a sentinel must be black
        nodes.push(RbNode::new(K::default(), 0));
        Self { nodes }
    }

    /// Appends `n` default-initialized nodes, returning their (contiguous) handles.
    ///
    /// The caller is expected to fill in `key` and `data` through `IndexMut` before inserting
    /// them into a tree.
    pub fn push_n(&mut self, n: usize) -> Result<NodeIds, ArenaError> {
        let start = self.nodes.len();
        if n > MAX_NODES - self.len() {
            return Err(ArenaError::CapacityOverflow)
        }

        self.nodes.resize_with(start + n, RbNode::default);

        Ok(NodeIds {
            next: start as u32,
            end: (start + n) as u32,
        })
    }
}

impl<K> NodeArena<K> {
    /// Appends a new, unlinked node and returns its handle. Amortized O(1).
    pub fn push(&mut self, key: K, data: u8) -> Result<NodeId, ArenaError> {
        if self.len() >= MAX_NODES {
            return Err(ArenaError::CapacityOverflow)
        }

        let id = NodeId::from_index(self.nodes.len() as u32);
        self.nodes.push(RbNode::new(key, data));
        Ok(id)
    }

    /// Reserves room for at least `additional` more nodes.
    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    /// Number of nodes in the arena, not counting the sentinel.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many nodes the arena can hold without reallocating, not counting the sentinel.
    pub fn capacity(&self) -> usize {
        self.nodes.capacity() - 1
    }

    pub fn sentinel(&self) -> &RbNode<K> {
        &self.nodes[0]
    }

    pub fn get(&self, id: NodeId) -> Option<&RbNode<K>> {
        self.nodes.get(id.index())
    }

    /// Mutable access to a node's payload. Returns `None` for the sentinel.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut RbNode<K>> {
        if id.is_sentinel() { return None }
        self.nodes.get_mut(id.index())
    }

    /// Handles of every node in the arena, in push order.
    pub fn ids(&self) -> NodeIds {
        NodeIds { next: 1, end: self.nodes.len() as u32 }
    }

    /// Leftmost node of the subtree rooted at `node` (which must not be the sentinel).
    pub fn min(&self, mut node: NodeId) -> NodeId {
        debug_assert!(!node.is_sentinel(), "minimum of an empty subtree");
        while !self.left(node).is_sentinel() {
            node = self.left(node);
        }
        node
    }

    /// Rightmost node of the subtree rooted at `node` (which must not be the sentinel).
    pub fn max(&self, mut node: NodeId) -> NodeId {
        debug_assert!(!node.is_sentinel(), "maximum of an empty subtree");
        while !self.right(node).is_sentinel() {
            node = self.right(node);
        }
        node
    }

    // link accessors used by the tree algorithms

    #[inline]
    pub(super) fn left(&self, id: NodeId) -> NodeId {
        self.nodes[id.index()].left
    }

    #[inline]
    pub(super) fn right(&self, id: NodeId) -> NodeId {
        self.nodes[id.index()].right
    }

    #[inline]
    pub(super) fn parent(&self, id: NodeId) -> NodeId {
        self.nodes[id.index()].parent
    }

    #[inline]
    pub(super) fn is_red(&self, id: NodeId) -> bool {
        self.nodes[id.index()].color == Color::Red
    }

    #[inline]
    pub(super) fn is_black(&self, id: NodeId) -> bool {
        !self.is_red(id)
    }

    #[inline]
    pub(super) fn color(&self, id: NodeId) -> Color {
        self.nodes[id.index()].color
    }

    /// Exclusive access for the tree algorithms. The sentinel must never be written.
    #[inline]
    pub(super) fn node_mut(&mut self, id: NodeId) -> &mut RbNode<K> {
        debug_assert!(!id.is_sentinel(), "attempted to write to the sentinel");
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub(super) fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).color = color;
    }

    /// Sets `child`'s parent link, unless `child` is the sentinel.
    #[inline]
    pub(super) fn set_parent(&mut self, child: NodeId, parent: NodeId) {
        if !child.is_sentinel() {
            self.node_mut(child).parent = parent;
        }
    }
}

impl<K: Default> Default for NodeArena<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for NodeArena<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.ids().map(|id| (id, &self.nodes[id.index()])))
            .finish()
    }
}

impl<K> Index<NodeId> for NodeArena<K> {
    type Output = RbNode<K>;
    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.index()]
    }
}

impl<K> IndexMut<NodeId> for NodeArena<K> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        assert!(!id.is_sentinel(), "the sentinel node cannot be modified");
        &mut self.nodes[id.index()]
    }
}

/// A contiguous run of node handles, as returned by [`NodeArena::push_n`].
#[derive(Debug, Clone)]
pub struct NodeIds {
    next: u32,
    end: u32,
}

impl Iterator for NodeIds {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.next == self.end { return None }
        let id = NodeId::from_index(self.next);
        self.next += 1;
        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = (self.end - self.next) as usize;
        (len, Some(len))
    }
}

impl DoubleEndedIterator for NodeIds {
    fn next_back(&mut self) -> Option<NodeId> {
        if self.next == self.end { return None }
        self.end -= 1;
        Some(NodeId::from_index(self.end))
    }
}

impl ExactSizeIterator for NodeIds {}
impl FusedIterator for NodeIds {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_black_and_first() {
        let arena = NodeArena::<u32>::new();
        assert!(arena.is_empty());
        assert!(arena.sentinel().is_black());
        assert_eq!(arena.get(NodeId::SENTINEL).map(|n| n.key), Some(0));
    }

    #[test]
    fn handles_survive_growth() {
        let mut arena = NodeArena::with_capacity(2);
        let first = arena.push(10_u64, 1).unwrap();
        let ids: Vec<_> = (0..1000).map(|i| arena.push(i, 0).unwrap()).collect();

        assert_eq!(arena.len(), 1001);
        assert_eq!(arena[first].key, 10);
        assert_eq!(arena[first].data, 1);
        for (i, id) in ids.into_iter().enumerate() {
            assert_eq!(arena[id].key, i as u64);
        }
    }

    #[test]
    fn push_n_is_contiguous() {
        let mut arena = NodeArena::<u32>::new();
        arena.push(7, 0).unwrap();

        let ids = arena.push_n(4).unwrap();
        assert_eq!(ids.len(), 4);
        let ids: Vec<_> = ids.collect();
        assert_eq!(ids.iter().map(|id| id.index()).collect::<Vec<_>>(), [2_usize, 3, 4, 5]);

        for (i, &id) in ids.iter().enumerate() {
            arena[id].key = 100 + i as u32;
        }
        assert_eq!(arena[ids[3]].key, 103);
        assert_eq!(arena.ids().count(), 5);
        assert!(arena.push_n(0).unwrap().next().is_none());
    }

    #[test]
    fn sentinel_rejects_mutation() {
        let mut arena = NodeArena::<u32>::new();
        assert!(arena.get_mut(NodeId::SENTINEL).is_none());
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn huge_capacity_is_rejected_by_the_allocator() {
        // sentinel slot included, the request must saturate rather than wrap
        let _ = NodeArena::<u8>::with_capacity(usize::MAX);
    }

    #[test]
    #[should_panic]
    fn sentinel_index_mut_panics() {
        let mut arena = NodeArena::<u32>::new();
        arena[NodeId::SENTINEL].key = 5;
    }
}
