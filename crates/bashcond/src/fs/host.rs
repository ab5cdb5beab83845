//! Host filesystem backend.
//!
//! [`HostFs`] answers file operators against the real machine: metadata comes
//! from `tokio::fs`, permission checks from `access(2)` so ACLs and read-only
//! mounts are honored the same way the kernel would.
//!
//! WARNING: this intentionally looks outside any sandbox. It is only built with
//! the `realfs` feature.

use async_trait::async_trait;
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{FileTypeExt, MetadataExt};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::traits::{AccessMode, FileSystem, FileType, Metadata};
use crate::error::Result;

/// Filesystem backed by the host OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFs;

impl HostFs {
    pub fn new() -> Self {
        Self
    }
}

fn convert(meta: &std::fs::Metadata) -> Metadata {
    let ft = meta.file_type();
    let file_type = if ft.is_symlink() {
        FileType::Symlink
    } else if ft.is_dir() {
        FileType::Directory
    } else if ft.is_char_device() {
        FileType::CharDevice
    } else if ft.is_block_device() {
        FileType::BlockDevice
    } else if ft.is_fifo() {
        FileType::Fifo
    } else if ft.is_socket() {
        FileType::Socket
    } else {
        FileType::File
    };

    Metadata {
        file_type,
        size: meta.size(),
        mode: meta.mode() & 0o7777,
        modified: unix_time(meta.mtime(), meta.mtime_nsec()),
        accessed: unix_time(meta.atime(), meta.atime_nsec()),
        dev: meta.dev(),
        ino: meta.ino(),
        uid: meta.uid(),
        gid: meta.gid(),
    }
}

fn unix_time(secs: i64, nsecs: i64) -> SystemTime {
    let nanos = Duration::from_nanos(nsecs.clamp(0, 999_999_999) as u64);
    if secs >= 0 {
        UNIX_EPOCH + Duration::from_secs(secs as u64) + nanos
    } else {
        UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs()) + nanos
    }
}

#[async_trait]
impl FileSystem for HostFs {
    async fn stat(&self, path: &Path) -> Result<Metadata> {
        let meta = tokio::fs::metadata(path).await?;
        Ok(convert(&meta))
    }

    async fn lstat(&self, path: &Path) -> Result<Metadata> {
        let meta = tokio::fs::symlink_metadata(path).await?;
        Ok(convert(&meta))
    }

    async fn access(&self, path: &Path, mode: AccessMode) -> Result<()> {
        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| std::io::Error::from(std::io::ErrorKind::InvalidInput))?;
        let bits = match mode {
            AccessMode::Read => libc::R_OK,
            AccessMode::Write => libc::W_OK,
            AccessMode::Execute => libc::X_OK,
        };
        // SAFETY: c_path is a valid NUL-terminated string for the duration of the call.
        let rc = unsafe { libc::access(c_path.as_ptr(), bits) };
        if rc == 0 {
            Ok(())
        } else {
            Err(std::io::Error::last_os_error().into())
        }
    }
}
