//! Grid storage: readable views, owned buffers, disjoint output partitions and bulk copy.

pub mod buffer;
pub mod copy;
pub mod partition;
