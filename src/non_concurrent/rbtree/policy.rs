use std::cmp::Ordering;

use log::trace;

use super::arena::NodeArena;
use super::key::RbKey;
use super::node::{Color, NodeId, RbNode};

/// How a new node finds its place in the tree.
///
/// Picked once, when the tree is created. Both variants break ties between equal keys with the
/// node's `data` byte (smaller goes first), and keep insertion order between nodes that agree
/// on both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Keys compare by unsigned magnitude.
    #[default]
    UniqueValue,
    /// Keys compare as wrapping counters (see [`RbKey::wrapping_cmp`]), for timers and other
    /// monotonic clocks that may overflow.
    Timer,
}

impl Placement {
    /// Compares two keys the way this policy orders them.
    pub fn compare_keys<K: RbKey>(self, a: K, b: K) -> Ordering {
        match self {
            Placement::UniqueValue => a.cmp(&b),
            Placement::Timer => a.wrapping_cmp(b),
        }
    }

    /// Full in-order comparison of two nodes: key first, then `data`.
    pub fn compare<K: RbKey>(self, a: &RbNode<K>, b: &RbNode<K>) -> Ordering {
        self.compare_keys(a.key, b.key).then(a.data.cmp(&b.data))
    }

    /// Descends from `root` and links `node` in as a red leaf.
    ///
    /// `root` must be a real node; the empty tree is handled by the caller.
    pub(super) fn place<K: RbKey>(self, arena: &mut NodeArena<K>, root: NodeId, node: NodeId) {
        match self {
            Placement::UniqueValue => insert_value(arena, root, node),
            Placement::Timer => insert_timer_value(arena, root, node),
        }
    }
}

fn insert_value<K: RbKey>(arena: &mut NodeArena<K>, root: NodeId, node: NodeId) {
    descend_and_link(arena, root, node, |new, temp| {
        match new.key.cmp(&temp.key) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => new.data < temp.data,
        }
    })
}

fn insert_timer_value<K: RbKey>(arena: &mut NodeArena<K>, root: NodeId, node: NodeId) {
    descend_and_link(arena, root, node, |new, temp| {
        // a timer key may wrap around, so order by the signed difference
        match new.key.wrapping_cmp(temp.key) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => new.data < temp.data,
        }
    })
}

/// `goes_left(new, current)` decides which child of `current` to descend into.
fn descend_and_link<K, F>(arena: &mut NodeArena<K>, root: NodeId, node: NodeId, goes_left: F)
where
    F: Fn(&RbNode<K>, &RbNode<K>) -> bool,
{
    debug_assert!(!root.is_sentinel());

    let mut temp = root;
    let left = loop {
        let left = goes_left(&arena[node], &arena[temp]);
        let next = if left { arena.left(temp) } else { arena.right(temp) };
        if next.is_sentinel() { break left }
        temp = next;
    };

    trace!("linking {node:?} as the {} child of {temp:?}", if left { "left" } else { "right" });

    let parent = arena.node_mut(temp);
    if left { parent.left = node } else { parent.right = node }

    let new = arena.node_mut(node);
    new.parent = temp;
    new.left = NodeId::SENTINEL;
    new.right = NodeId::SENTINEL;
    new.color = Color::Red;
}
