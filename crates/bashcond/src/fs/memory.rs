//! In-memory filesystem implementation
//!
//! # Fail Points (enabled with `failpoints` feature)
//!
//! - `fs::stat` - Inject failures in `stat`/`lstat`
//! - `fs::access` - Inject failures in `access`

use async_trait::async_trait;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

#[cfg(feature = "failpoints")]
use fail::fail_point;

use super::traits::{fs_errors, AccessMode, FileSystem, FileType, Metadata};
use crate::error::Result;
use crate::identity::Identity;
use crate::path::normalize_path;

/// Symlink hops followed before a lookup fails, like `ELOOP`.
const MAX_SYMLINK_HOPS: usize = 40;

/// Device number reported for every in-memory node.
const MEMORY_DEV: u64 = 1;

/// Identity used by [`InMemoryFs::new`] for new nodes and access checks.
pub const DEFAULT_UID: u32 = 1000;
pub const DEFAULT_GID: u32 = 1000;

/// In-memory filesystem.
///
/// Paths map to inodes, so hard links share metadata and `-ef` can tell two
/// names of one file apart from two equal files. New nodes are owned by the
/// caller identity, which is also who `access` checks permissions for.
pub struct InMemoryFs {
    state: RwLock<FsState>,
    caller: Identity,
}

struct FsState {
    paths: HashMap<PathBuf, u64>,
    nodes: HashMap<u64, Node>,
    next_ino: u64,
}

#[derive(Debug, Clone)]
struct Node {
    symlink_target: Option<PathBuf>,
    metadata: Metadata,
}

impl FsState {
    fn node_at(&self, path: &Path) -> Option<&Node> {
        self.paths.get(path).and_then(|ino| self.nodes.get(ino))
    }

    fn node_at_mut(&mut self, path: &Path) -> Option<&mut Node> {
        let ino = *self.paths.get(path)?;
        self.nodes.get_mut(&ino)
    }

    fn insert(&mut self, path: PathBuf, node: Node) {
        let ino = node.metadata.ino;
        self.nodes.insert(ino, node);
        self.paths.insert(path, ino);
    }

    fn alloc_ino(&mut self) -> u64 {
        let ino = self.next_ino;
        self.next_ino += 1;
        ino
    }

    /// Resolve symlinks along `path`. The final component is only followed
    /// when `follow_last` is set; a missing final component is not an error.
    fn resolve(&self, path: &Path, follow_last: bool) -> Result<PathBuf> {
        let mut pending = components_reversed(&normalize_path(path));
        let mut current = PathBuf::from("/");
        let mut hops = 0;

        while let Some(name) = pending.pop() {
            let candidate = current.join(&name);
            let is_last = pending.is_empty();

            match self.node_at(&candidate) {
                Some(Node {
                    symlink_target: Some(target),
                    ..
                }) if !is_last || follow_last => {
                    hops += 1;
                    if hops > MAX_SYMLINK_HOPS {
                        return Err(fs_errors::too_many_links());
                    }
                    let target = if target.is_absolute() {
                        normalize_path(target)
                    } else {
                        normalize_path(&current.join(target))
                    };
                    pending.extend(components_reversed(&target));
                    current = PathBuf::from("/");
                }
                Some(node) => {
                    if !is_last && !node.metadata.file_type.is_dir() {
                        return Err(fs_errors::not_found());
                    }
                    current = candidate;
                }
                None if is_last => current = candidate,
                None => return Err(fs_errors::not_found()),
            }
        }

        Ok(current)
    }

    /// Check that the parent of `path` exists and is a directory.
    fn check_parent(&self, path: &Path) -> Result<()> {
        let Some(parent) = path.parent() else {
            return Ok(());
        };
        let parent = self.resolve(parent, true)?;
        match self.node_at(&parent) {
            Some(node) if node.metadata.file_type.is_dir() => Ok(()),
            _ => Err(fs_errors::parent_not_found()),
        }
    }
}

/// Normal components of an absolute path, last one first (a pop-stack).
fn components_reversed(path: &Path) -> Vec<OsString> {
    let mut names: Vec<OsString> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_os_string()),
            _ => None,
        })
        .collect();
    names.reverse();
    names
}

impl Default for InMemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryFs {
    /// Create a new in-memory filesystem with `/`, `/tmp`, `/home` and
    /// `/home/user`, acting as uid/gid 1000.
    pub fn new() -> Self {
        Self::with_caller(Identity::new(DEFAULT_UID, DEFAULT_GID))
    }

    /// Create a filesystem whose new nodes and access checks use `caller`.
    pub fn with_caller(caller: Identity) -> Self {
        let mut state = FsState {
            paths: HashMap::new(),
            nodes: HashMap::new(),
            next_ino: 1,
        };

        for (dir, mode) in [
            ("/", 0o755),
            ("/tmp", 0o1777),
            ("/home", 0o755),
            ("/home/user", 0o755),
        ] {
            let ino = state.alloc_ino();
            let owner = if dir == "/home/user" {
                caller
            } else {
                Identity::root()
            };
            state.insert(
                PathBuf::from(dir),
                Node {
                    symlink_target: None,
                    metadata: node_metadata(FileType::Directory, mode, ino, owner),
                },
            );
        }

        Self {
            state: RwLock::new(state),
            caller,
        }
    }

    /// Identity used for ownership of new nodes and for access checks.
    pub fn caller(&self) -> Identity {
        self.caller
    }

    fn read_state(&self) -> RwLockReadGuard<'_, FsState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, FsState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a node of the given type at `path`; fails if something exists.
    fn create(&self, path: &Path, file_type: FileType, mode: u32, size: u64) -> Result<()> {
        let path = normalize_path(path);
        let mut state = self.write_state();
        state.check_parent(&path)?;
        let path = state.resolve(&path, false)?;
        if state.paths.contains_key(&path) {
            return Err(fs_errors::already_exists());
        }
        let ino = state.alloc_ino();
        let mut metadata = node_metadata(file_type, mode, ino, self.caller);
        metadata.size = size;
        state.insert(
            path,
            Node {
                symlink_target: None,
                metadata,
            },
        );
        Ok(())
    }

    /// Write a regular file. Existing files keep their inode and get a new
    /// size and modification time.
    pub async fn write_file(&self, path: &Path, content: &[u8]) -> Result<()> {
        let normalized = normalize_path(path);
        {
            let mut state = self.write_state();
            let target = state.resolve(&normalized, true)?;
            if let Some(node) = state.node_at_mut(&target) {
                if node.metadata.file_type.is_dir() {
                    return Err(std::io::Error::other("is a directory").into());
                }
                node.metadata.size = content.len() as u64;
                node.metadata.modified = SystemTime::now();
                return Ok(());
            }
        }
        self.create(&normalized, FileType::File, 0o644, content.len() as u64)
    }

    /// Create a directory.
    pub async fn mkdir(&self, path: &Path, recursive: bool) -> Result<()> {
        let path = normalize_path(path);
        if !recursive {
            return self.create(&path, FileType::Directory, 0o755, 0);
        }

        let mut current = PathBuf::from("/");
        for component in path.components().skip(1) {
            current.push(component);
            let exists = {
                let state = self.read_state();
                let resolved = state.resolve(&current, true)?;
                match state.node_at(&resolved) {
                    Some(node) if node.metadata.file_type.is_dir() => true,
                    Some(_) => return Err(fs_errors::already_exists()),
                    None => false,
                }
            };
            if !exists {
                self.create(&current, FileType::Directory, 0o755, 0)?;
            }
        }
        Ok(())
    }

    /// Create a symbolic link at `link` pointing to `target`. The target does
    /// not need to exist.
    pub async fn symlink(&self, target: &Path, link: &Path) -> Result<()> {
        let link = normalize_path(link);
        let mut state = self.write_state();
        state.check_parent(&link)?;
        if state.paths.contains_key(&link) {
            return Err(fs_errors::already_exists());
        }
        let ino = state.alloc_ino();
        let mut metadata = node_metadata(FileType::Symlink, 0o777, ino, self.caller);
        metadata.size = target.as_os_str().len() as u64;
        state.insert(
            link,
            Node {
                symlink_target: Some(target.to_path_buf()),
                metadata,
            },
        );
        Ok(())
    }

    /// Create a second name for an existing node (`ln existing new`).
    pub async fn hard_link(&self, existing: &Path, new: &Path) -> Result<()> {
        let new = normalize_path(new);
        let mut state = self.write_state();
        let source = state.resolve(existing, true)?;
        let ino = *state.paths.get(&source).ok_or_else(fs_errors::not_found)?;
        state.check_parent(&new)?;
        if state.paths.contains_key(&new) {
            return Err(fs_errors::already_exists());
        }
        state.paths.insert(new, ino);
        Ok(())
    }

    /// Create a special node: device, FIFO or socket (`mknod`/`mkfifo`).
    pub async fn mknod(&self, path: &Path, file_type: FileType, mode: u32) -> Result<()> {
        self.create(path, file_type, mode, 0)
    }

    /// Change permission bits, following symlinks.
    pub async fn chmod(&self, path: &Path, mode: u32) -> Result<()> {
        self.update(path, |metadata| metadata.mode = mode & 0o7777)
    }

    /// Change ownership, following symlinks.
    pub async fn chown(&self, path: &Path, uid: u32, gid: u32) -> Result<()> {
        self.update(path, |metadata| {
            metadata.uid = uid;
            metadata.gid = gid;
        })
    }

    /// Set modification and access times, following symlinks.
    pub async fn set_times(
        &self,
        path: &Path,
        modified: SystemTime,
        accessed: SystemTime,
    ) -> Result<()> {
        self.update(path, |metadata| {
            metadata.modified = modified;
            metadata.accessed = accessed;
        })
    }

    fn update(&self, path: &Path, f: impl FnOnce(&mut Metadata)) -> Result<()> {
        let mut state = self.write_state();
        let target = state.resolve(path, true)?;
        let node = state.node_at_mut(&target).ok_or_else(fs_errors::not_found)?;
        f(&mut node.metadata);
        Ok(())
    }

    fn lookup(&self, path: &Path, follow: bool) -> Result<Metadata> {
        let state = self.read_state();
        let target = state.resolve(path, follow)?;
        state
            .node_at(&target)
            .map(|node| node.metadata.clone())
            .ok_or_else(fs_errors::not_found)
    }

    /// Permission check against the owner/group/other class of the caller.
    fn permits(&self, metadata: &Metadata, mode: AccessMode) -> bool {
        let wanted = mode.bits();
        if self.caller.is_root() {
            // root reads and writes anything, but executes only if some x bit is set
            return mode != AccessMode::Execute
                || metadata.file_type.is_dir()
                || metadata.mode & 0o111 != 0;
        }
        let class = if metadata.uid == self.caller.uid {
            (metadata.mode >> 6) & 0o7
        } else if metadata.gid == self.caller.gid {
            (metadata.mode >> 3) & 0o7
        } else {
            metadata.mode & 0o7
        };
        class & wanted != 0
    }
}

fn node_metadata(file_type: FileType, mode: u32, ino: u64, owner: Identity) -> Metadata {
    let now = SystemTime::now();
    Metadata {
        file_type,
        size: 0,
        mode,
        modified: now,
        accessed: now,
        dev: MEMORY_DEV,
        ino,
        uid: owner.uid,
        gid: owner.gid,
    }
}

#[async_trait]
impl FileSystem for InMemoryFs {
    async fn stat(&self, path: &Path) -> Result<Metadata> {
        #[cfg(feature = "failpoints")]
        fail_point!("fs::stat", |_| Err(fs_errors::not_found()));

        self.lookup(path, true)
    }

    async fn lstat(&self, path: &Path) -> Result<Metadata> {
        #[cfg(feature = "failpoints")]
        fail_point!("fs::stat", |_| Err(fs_errors::not_found()));

        self.lookup(path, false)
    }

    async fn access(&self, path: &Path, mode: AccessMode) -> Result<()> {
        #[cfg(feature = "failpoints")]
        fail_point!("fs::access", |_| Err(fs_errors::permission_denied()));

        let metadata = self.lookup(path, true)?;
        if self.permits(&metadata, mode) {
            Ok(())
        } else {
            Err(fs_errors::permission_denied())
        }
    }
}
