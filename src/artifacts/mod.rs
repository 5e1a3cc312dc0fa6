//! Value types and algorithms: digests, stored objects, snapshot trees,
//! history traversal, diffing and merging.

pub mod ancestor;
pub mod diff;
pub mod digest;
pub mod merge;
pub mod objects;
pub mod snapshot;
pub mod stash;
