//! Object models stored in the database: blobs, trees and commits.

pub mod blob;
pub mod commit;
pub mod tree;
