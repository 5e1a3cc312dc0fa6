//! vit — a small content-addressed version control engine.
//!
//! The crate is split along the same seam as its on-disk layout: `areas` are
//! the stateful places a repository is made of (working directory, index,
//! object database, refs), `artifacts` are the value types and algorithms
//! that move between them (objects, snapshots, diff, merge), and `commands`
//! holds the user-facing operations as methods on
//! [`areas::repository::Repository`].

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
