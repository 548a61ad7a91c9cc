//! File system storage management
//!
//! The [`VirtualFs`] interface used by sessions and its disk-backed
//! implementation.

pub mod filesystem;
pub mod operations;

pub use filesystem::{Entry, VirtualFs};
pub use operations::DiskFs;
