//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the pipeline and an external
//! system (filesystem, version control). Implementations live in
//! `src/adapters/`.

pub mod filesystem;
pub mod git;

pub use filesystem::FileSystem;
pub use git::GitRepo;
