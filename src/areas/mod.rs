//! The on-disk areas a repository is made of: the working directory, the
//! staging index, the object database and the refs.

pub mod database;
pub mod ignore;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
