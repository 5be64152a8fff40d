//! Data structures that assume a single writer and do no synchronization of their own.

pub mod rbtree;
