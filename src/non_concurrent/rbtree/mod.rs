//! An intrusive red-black tree over caller-owned nodes.
//!
//! The tree itself owns no node memory: nodes live in a [`NodeArena`] and are referred to by
//! [`NodeId`] handles. A tree only remembers its root, its [`Placement`] policy and its length,
//! and every operation borrows the arena it was built over. The usual workflow is:
//!
//! ```
//! use rbindex::non_concurrent::rbtree::{NodeArena, Placement, RbTree};
//!
//! let mut arena = NodeArena::<u32>::new();
//! let mut timers = RbTree::new(Placement::Timer);
//!
//! let a = arena.push(0xFFFF_FFF0, 0).unwrap();
//! let b = arena.push(0x0000_0003, 0).unwrap();
//! timers.insert(&mut arena, b);
//! timers.insert(&mut arena, a);
//!
//! // `a` expires first even though it is numerically larger
//! assert_eq!(timers.first(&arena), Some(a));
//! timers.delete(&mut arena, a);
//! assert_eq!(timers.first(&arena), Some(b));
//! ```
//!
//! Using a handle with a tree it isn't linked into, inserting an already linked node, or
//! changing the key of a linked node are caller bugs. They are not detected (beyond a few
//! `debug_assert!`s) and leave the tree in an unspecified (but memory-safe) state.

// no red node has a red child, so a path from the root is at most twice the black height, and a
// subtree of black height `bh` holds at least `2^bh - 1` nodes: height <= 2*log2(len + 1)

use std::cmp::Ordering;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use log::debug;
#[cfg(feature = "invariant-checks")]
use log::error;

mod arena;
mod balance;
mod key;
mod node;
mod policy;
mod validate;

pub use arena::{ArenaError, NodeArena, NodeIds};
pub use key::RbKey;
pub use node::{Color, NodeId, RbNode};
pub use policy::Placement;
pub use validate::InvariantViolation;

/// The ordered index.
pub struct RbTree<K> {
    root: NodeId,
    placement: Placement,
    len: usize,
    _key: PhantomData<fn(K) -> K>,
}

impl<K> RbTree<K> {
    /// Creates an empty tree that places nodes with `placement` for its whole lifetime.
    pub const fn new(placement: Placement) -> Self {
        Self {
            root: NodeId::SENTINEL,
            placement,
            len: 0,
            _key: PhantomData,
        }
    }

    /// The root node, or the sentinel if the tree is empty.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// The number of linked nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_sentinel()
    }

    /// Forgets every node in O(1).
    ///
    /// The nodes themselves are untouched; their links are stale and must not be relied on until
    /// they are inserted again.
    pub fn clear(&mut self) {
        debug!("clearing tree with {} nodes", self.len);
        self.root = NodeId::SENTINEL;
        self.len = 0;
    }

    /// The smallest node, if any.
    pub fn first(&self, arena: &NodeArena<K>) -> Option<NodeId> {
        if self.is_empty() { return None }
        Some(arena.min(self.root))
    }

    /// The largest node, if any.
    pub fn last(&self, arena: &NodeArena<K>) -> Option<NodeId> {
        if self.is_empty() { return None }
        Some(arena.max(self.root))
    }

    /// The in-order successor of `node`, or `None` if `node` is the largest node.
    pub fn next(&self, arena: &NodeArena<K>, mut node: NodeId) -> Option<NodeId> {
        let right = arena.right(node);
        if !right.is_sentinel() {
            return Some(arena.min(right))
        }

        loop {
            if node == self.root { return None }
            let parent = arena.parent(node);
            if node == arena.left(parent) { return Some(parent) }
            node = parent;
        }
    }

    /// The in-order predecessor of `node`, or `None` if `node` is the smallest node.
    pub fn prev(&self, arena: &NodeArena<K>, mut node: NodeId) -> Option<NodeId> {
        let left = arena.left(node);
        if !left.is_sentinel() {
            return Some(arena.max(left))
        }

        loop {
            if node == self.root { return None }
            let parent = arena.parent(node);
            if node == arena.right(parent) { return Some(parent) }
            node = parent;
        }
    }

    /// In-order traversal, smallest first.
    pub fn iter<'a>(&'a self, arena: &'a NodeArena<K>) -> Iter<'a, K> {
        Iter {
            tree: self,
            arena,
            front: self.first(arena),
            remaining: self.len,
        }
    }
}

impl<K: RbKey> RbTree<K> {
    /// Links `node` into the tree.
    ///
    /// `node`'s key and data must already be set, and it must not be linked into any tree.
    pub fn insert(&mut self, arena: &mut NodeArena<K>, node: NodeId) {
        debug_assert!(!node.is_sentinel(), "the sentinel cannot be inserted");
        debug!("insert {node:?} (key {:?}, data {})", arena[node].key, arena[node].data);

        if self.root.is_sentinel() {
            let n = arena.node_mut(node);
            n.parent = NodeId::SENTINEL;
            n.left = NodeId::SENTINEL;
            n.right = NodeId::SENTINEL;
            n.color = Color::Black;
            self.root = node;
        } else {
            self.placement.place(arena, self.root, node);
            self.insert_fixup(arena, node);
        }
        self.len += 1;

        #[cfg(feature = "invariant-checks")]
        self.check_invariants(arena);
    }

    /// Unlinks `node` from the tree. Its links are reset to the sentinel.
    ///
    /// `node` must be linked into this tree.
    pub fn delete(&mut self, arena: &mut NodeArena<K>, node: NodeId) {
        debug_assert!(!node.is_sentinel(), "the sentinel cannot be deleted");
        debug_assert!(self.len > 0, "delete from an empty tree");
        debug!("delete {node:?} (key {:?}, data {})", arena[node].key, arena[node].data);

        let (subst, temp) = if arena.left(node).is_sentinel() {
            (node, arena.right(node))
        } else if arena.right(node).is_sentinel() {
            (node, arena.left(node))
        } else {
            let subst = arena.min(arena.right(node));
            (subst, arena.right(subst))
        };

        // `temp` takes the position `subst` leaves; that position lost `subst`'s color
        let removed_color = arena.color(subst);
        let temp_parent;

        if subst == node {
            let parent = arena.parent(node);
            self.replace_child(arena, parent, node, temp);
            arena.set_parent(temp, parent);
            temp_parent = parent;
        } else {
            if arena.parent(subst) == node {
                temp_parent = subst;
            } else {
                let subst_parent = arena.parent(subst);
                arena.node_mut(subst_parent).left = temp;
                arena.set_parent(temp, subst_parent);
                temp_parent = subst_parent;

                let right = arena.right(node);
                arena.node_mut(subst).right = right;
                arena.node_mut(right).parent = subst;
            }

            let left = arena.left(node);
            arena.node_mut(subst).left = left;
            arena.node_mut(left).parent = subst;

            let parent = arena.parent(node);
            self.replace_child(arena, parent, node, subst);
            let color = arena.color(node);
            let s = arena.node_mut(subst);
            s.parent = parent;
            s.color = color;
        }

        arena.node_mut(node).detach();
        self.len -= 1;

        if removed_color == Color::Black {
            self.delete_fixup(arena, temp, temp_parent);
        }

        #[cfg(feature = "invariant-checks")]
        self.check_invariants(arena);
    }

    /// The leftmost node whose key compares equal to `key` under this tree's placement policy.
    pub fn find(&self, arena: &NodeArena<K>, key: K) -> Option<NodeId> {
        let mut found = None;
        let mut temp = self.root;
        while !temp.is_sentinel() {
            match self.placement.compare_keys(key, arena[temp].key) {
                Ordering::Less => temp = arena.left(temp),
                Ordering::Greater => temp = arena.right(temp),
                Ordering::Equal => {
                    found = Some(temp);
                    temp = arena.left(temp);
                }
            }
        }
        found
    }

    #[cfg(feature = "invariant-checks")]
    fn check_invariants(&self, arena: &NodeArena<K>) {
        if let Err(e) = self.validate(arena) {
            error!("red-black invariant violated: {e}");
            panic!("red-black invariant violated: {e}");
        }
    }
}

impl<K> Default for RbTree<K> {
    fn default() -> Self {
        Self::new(Placement::default())
    }
}

impl<K> std::fmt::Debug for RbTree<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RbTree")
            .field("root", &self.root)
            .field("placement", &self.placement)
            .field("len", &self.len)
            .finish()
    }
}

/// In-order iterator over a tree's node handles. See [`RbTree::iter`].
pub struct Iter<'a, K> {
    tree: &'a RbTree<K>,
    arena: &'a NodeArena<K>,
    front: Option<NodeId>,
    remaining: usize,
}

impl<K> Iterator for Iter<'_, K> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.front?;
        self.front = self.tree.next(self.arena, current);
        self.remaining = self.remaining.saturating_sub(1);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
impl<K> FusedIterator for Iter<'_, K> {}
