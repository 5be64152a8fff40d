#![deny(unsafe_op_in_unsafe_fn)]

// not concurrent
pub mod non_concurrent;

// for callers that share an index between threads
pub mod spinlock_mutex;

// re-export the tree types, they are the main API to use
pub use non_concurrent::rbtree::{
    ArenaError, Color, InvariantViolation, Iter, NodeArena, NodeId, NodeIds, Placement, RbKey, RbNode, RbTree,
};
pub use spinlock_mutex::{SpinMutex, SpinMutexGuard};
