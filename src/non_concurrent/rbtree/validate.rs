use std::cmp::Ordering;
use std::fmt;

use super::RbTree;
use super::arena::NodeArena;
use super::key::RbKey;
use super::node::NodeId;

/// A broken red-black or search-tree invariant, as reported by [`RbTree::validate`].
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    SentinelNotBlack,
    RedRoot(NodeId),
    /// The root's parent link doesn't point at the sentinel.
    RootHasParent { root: NodeId, parent: NodeId },
    RedRedEdge { parent: NodeId, child: NodeId },
    /// The two subtrees of `node` have different black heights.
    BlackHeightMismatch { node: NodeId, left: usize, right: usize },
    /// `child` hangs below `parent`, but its parent link says `found`.
    BrokenParentLink { parent: NodeId, child: NodeId, found: NodeId },
    /// `next` follows `prev` in-order but sorts before it.
    OutOfOrder { prev: NodeId, next: NodeId },
    /// The number of reachable nodes doesn't match the tree's length.
    LengthMismatch { expected: usize, found: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::SentinelNotBlack => f.write_str("the sentinel is red"),
            Self::RedRoot(root) => write!(f, "the root {root:?} is red"),
            Self::RootHasParent { root, parent } => write!(f, "the root {root:?} has parent {parent:?}"),
            Self::RedRedEdge { parent, child } => write!(f, "red node {parent:?} has red child {child:?}"),
            Self::BlackHeightMismatch { node, left, right } => {
                write!(f, "black heights below {node:?} differ (left {left}, right {right})")
            }
            Self::BrokenParentLink { parent, child, found } => {
                write!(f, "{child:?} is a child of {parent:?} but points at {found:?}")
            }
            Self::OutOfOrder { prev, next } => write!(f, "{next:?} sorts before its predecessor {prev:?}"),
            Self::LengthMismatch { expected, found } => {
                write!(f, "tree claims {expected} nodes but {found} are reachable")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

impl<K: RbKey> RbTree<K> {
    /// Walks the whole tree and checks every structural invariant. O(n).
    ///
    /// On success, returns the black height of the tree (the number of black nodes on any path
    /// from the root down to the sentinel, counting the sentinel).
    pub fn validate(&self, arena: &NodeArena<K>) -> Result<usize, InvariantViolation> {
        if arena.sentinel().is_red() {
            return Err(InvariantViolation::SentinelNotBlack)
        }

        if self.root.is_sentinel() {
            if self.len != 0 {
                return Err(InvariantViolation::LengthMismatch { expected: self.len, found: 0 })
            }
            return Ok(1)
        }

        if arena.is_red(self.root) {
            return Err(InvariantViolation::RedRoot(self.root))
        }
        let root_parent = arena.parent(self.root);
        if !root_parent.is_sentinel() {
            return Err(InvariantViolation::RootHasParent { root: self.root, parent: root_parent })
        }

        let mut count = 0;
        let black_height = self.check_subtree(arena, self.root, &mut count)?;

        if count != self.len {
            return Err(InvariantViolation::LengthMismatch { expected: self.len, found: count })
        }

        // in-order walk over the parent links, so `next` gets checked along the way
        let mut prev = arena.min(self.root);
        let mut seen = 1;
        while let Some(next) = self.next(arena, prev) {
            if self.placement.compare(&arena[prev], &arena[next]) == Ordering::Greater {
                return Err(InvariantViolation::OutOfOrder { prev, next })
            }
            prev = next;
            seen += 1;
            if seen > count { break }
        }
        if seen != count {
            return Err(InvariantViolation::LengthMismatch { expected: count, found: seen })
        }

        Ok(black_height)
    }

    /// Returns the black height of `node`'s subtree, adding the subtree's size to `count`.
    fn check_subtree(&self, arena: &NodeArena<K>, node: NodeId, count: &mut usize) -> Result<usize, InvariantViolation> {
        if node.is_sentinel() { return Ok(1) }
        *count += 1;

        let mut heights = [0; 2];
        for (height, child) in heights.iter_mut().zip([arena.left(node), arena.right(node)]) {
            if child.is_sentinel() {
                *height = 1;
                continue
            }

            let found = arena.parent(child);
            if found != node {
                return Err(InvariantViolation::BrokenParentLink { parent: node, child, found })
            }
            if arena.is_red(node) && arena.is_red(child) {
                return Err(InvariantViolation::RedRedEdge { parent: node, child })
            }
            if *count > self.len {
                // more nodes than the tree should hold, probably a cycle
                return Err(InvariantViolation::LengthMismatch { expected: self.len, found: *count })
            }
            *height = self.check_subtree(arena, child, count)?;
        }

        let [left, right] = heights;
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch { node, left, right })
        }

        Ok(left + usize::from(arena.is_black(node)))
    }
}
