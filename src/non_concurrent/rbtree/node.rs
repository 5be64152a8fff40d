use std::fmt;

/// Node color. The sentinel is always [`Color::Black`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Black = 0,
    Red = 1,
}

/// Handle to a node inside a [`NodeArena`](super::NodeArena).
///
/// Handles are plain indices: they are only meaningful for the arena that handed them out,
/// and they never move while the arena is alive.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The shared "nil" node. Every empty child slot, and the parent of the root, point here.
    pub const SENTINEL: NodeId = NodeId(0);

    pub(super) const fn from_index(index: u32) -> Self {
        NodeId(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_sentinel(self) -> bool {
        self.0 == Self::SENTINEL.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            f.write_str("NodeId(nil)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A tree node living in caller-owned storage.
///
/// `key` and `data` belong to the caller, but must not be changed while the node is linked
/// into a tree. The links and the color belong to the tree and are only readable from outside.
#[derive(Debug, Clone)]
pub struct RbNode<K> {
    pub key: K,
    /// One byte of opaque payload, used as the tie-break between equal keys.
    pub data: u8,
    pub(super) left: NodeId,
    pub(super) right: NodeId,
    pub(super) parent: NodeId,
    pub(super) color: Color,
}

impl<K> RbNode<K> {
    pub const fn new(key: K, data: u8) -> Self {
        Self {
            key,
            data,
            left: NodeId::SENTINEL,
            right: NodeId::SENTINEL,
            parent: NodeId::SENTINEL,
            color: Color::Black,
        }
    }

    pub fn left(&self) -> NodeId {
        self.left
    }

    pub fn right(&self) -> NodeId {
        self.right
    }

    pub fn parent(&self) -> NodeId {
        self.parent
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    pub fn is_black(&self) -> bool {
        self.color == Color::Black
    }

    /// Point every link back at the sentinel.
    ///
    /// Done by the tree when the node is deleted, so stale links never lead into a live tree.
    pub(super) fn detach(&mut self) {
        self.left = NodeId::SENTINEL;
        self.right = NodeId::SENTINEL;
        self.parent = NodeId::SENTINEL;
    }
}

impl<K: Default> Default for RbNode<K> {
    fn default() -> Self {
        RbNode::new(K::default(), 0)
    }
}
