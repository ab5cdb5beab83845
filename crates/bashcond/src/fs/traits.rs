//! Filesystem trait definitions

use async_trait::async_trait;
use std::path::Path;
use std::time::SystemTime;

use crate::error::Result;

/// Set-user-ID bit.
pub const MODE_SETUID: u32 = 0o4000;
/// Set-group-ID bit.
pub const MODE_SETGID: u32 = 0o2000;
/// Sticky bit.
pub const MODE_STICKY: u32 = 0o1000;

/// Async filesystem trait.
///
/// This is the status and access-check provider behind the file operators.
/// Paths handed to it are always absolute and normalized. Any `Err` is read
/// by the evaluator as "predicate is false".
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Get file metadata, following symbolic links.
    async fn stat(&self, path: &Path) -> Result<Metadata>;

    /// Get file metadata without following a final symbolic link.
    async fn lstat(&self, path: &Path) -> Result<Metadata>;

    /// Check whether the caller may access `path` in the given mode, the way
    /// `access(2)` does. `Ok(())` means access is granted.
    async fn access(&self, path: &Path, mode: AccessMode) -> Result<()>;
}

/// Permission asked of [`FileSystem::access`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum AccessMode {
    Read = 4,
    Write = 2,
    Execute = 1,
}

impl AccessMode {
    /// The `R_OK`/`W_OK`/`X_OK` bit value.
    pub fn bits(self) -> u32 {
        self as u32
    }
}

/// File metadata.
#[derive(Debug, Clone)]
pub struct Metadata {
    /// File type
    pub file_type: FileType,
    /// File size in bytes
    pub size: u64,
    /// Permission bits including setuid/setgid/sticky (no file type bits)
    pub mode: u32,
    /// Last modification time
    pub modified: SystemTime,
    /// Last access time
    pub accessed: SystemTime,
    /// Device the file lives on
    pub dev: u64,
    /// Inode number
    pub ino: u64,
    /// Owner user id
    pub uid: u32,
    /// Owner group id
    pub gid: u32,
}

impl Default for Metadata {
    fn default() -> Self {
        let now = SystemTime::now();
        Self {
            file_type: FileType::File,
            size: 0,
            mode: 0o644,
            modified: now,
            accessed: now,
            dev: 0,
            ino: 0,
            uid: 0,
            gid: 0,
        }
    }
}

impl Metadata {
    /// Whether any of the given mode bits are set.
    pub fn has_mode(&self, bits: u32) -> bool {
        self.mode & bits != 0
    }

    /// Device and inode identity, as `-ef` compares it.
    pub fn same_file(&self, other: &Metadata) -> bool {
        self.dev == other.dev && self.ino == other.ino
    }
}

/// File type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link
    Symlink,
    /// Character device
    CharDevice,
    /// Block device
    BlockDevice,
    /// Named pipe (FIFO)
    Fifo,
    /// Unix domain socket
    Socket,
}

impl FileType {
    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, FileType::File)
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, FileType::Directory)
    }

    /// Check if this is a symlink.
    pub fn is_symlink(&self) -> bool {
        matches!(self, FileType::Symlink)
    }

    /// Character device. Block devices are devices that are not character
    /// devices, so the two never overlap.
    pub fn is_char_device(&self) -> bool {
        matches!(self, FileType::CharDevice)
    }

    pub fn is_block_device(&self) -> bool {
        matches!(self, FileType::BlockDevice)
    }

    pub fn is_fifo(&self) -> bool {
        matches!(self, FileType::Fifo)
    }

    pub fn is_socket(&self) -> bool {
        matches!(self, FileType::Socket)
    }
}

/// Common filesystem errors.
pub(crate) mod fs_errors {
    use std::io::{Error as IoError, ErrorKind};

    use crate::error::Error;

    pub fn not_found() -> Error {
        IoError::new(ErrorKind::NotFound, "not found").into()
    }

    pub fn parent_not_found() -> Error {
        IoError::new(ErrorKind::NotFound, "parent directory not found").into()
    }

    pub fn already_exists() -> Error {
        IoError::new(ErrorKind::AlreadyExists, "file exists").into()
    }

    pub fn permission_denied() -> Error {
        IoError::new(ErrorKind::PermissionDenied, "permission denied").into()
    }

    pub fn too_many_links() -> Error {
        IoError::other("too many levels of symbolic links").into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_mode_bits() {
        assert_eq!(AccessMode::Read.bits(), 4);
        assert_eq!(AccessMode::Write.bits(), 2);
        assert_eq!(AccessMode::Execute.bits(), 1);
    }

    #[test]
    fn test_same_file_uses_dev_and_ino() {
        let a = Metadata {
            dev: 1,
            ino: 10,
            ..Metadata::default()
        };
        let b = Metadata {
            dev: 1,
            ino: 10,
            size: 99,
            ..Metadata::default()
        };
        let c = Metadata {
            dev: 2,
            ino: 10,
            ..Metadata::default()
        };
        assert!(a.same_file(&b));
        assert!(!a.same_file(&c));
    }
}
