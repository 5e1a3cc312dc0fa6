//! Diff engine: Myers edit scripts plus record- and line-level reporting.

pub mod myers;
pub mod report;
