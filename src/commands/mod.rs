//! User-facing commands, one module per command, each implemented as methods
//! on [`crate::areas::repository::Repository`].

pub mod add;
pub mod branch;
pub mod commit;
pub mod diff;
pub mod gc;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod restore;
pub mod stash;
pub mod status;
pub mod switch;
pub mod unstage;
