//! Git operations using git2-rs.

pub mod staged;

pub use staged::{StagedDiff, collect_staged, open_repo};
