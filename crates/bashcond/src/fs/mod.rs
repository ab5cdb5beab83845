//! Filesystem collaborators for the file operators
//!
//! Provides the async [`FileSystem`] trait and implementations:
//! - `InMemoryFs`: in-memory inode table, the default
//! - `HostFs`: the real host filesystem (`realfs` feature, unix only)

#[cfg(all(unix, feature = "realfs"))]
mod host;
mod memory;
mod traits;

#[cfg(all(unix, feature = "realfs"))]
pub use host::HostFs;
pub use memory::{InMemoryFs, DEFAULT_GID, DEFAULT_UID};
pub use traits::{
    AccessMode, FileSystem, FileType, Metadata, MODE_SETGID, MODE_SETUID, MODE_STICKY,
};
