//! Path resolution against the shell's working directory

use std::path::{Component, Path, PathBuf};

/// Resolve a test operand to an absolute path relative to the current working
/// directory.
///
/// If the path is absolute, it is only normalized.
/// If relative, it is joined with the cwd first.
///
/// # Example
///
/// ```
/// use bashcond::resolve_path;
/// use std::path::{Path, PathBuf};
///
/// let abs = resolve_path(Path::new("/home"), "/etc/passwd");
/// assert_eq!(abs, PathBuf::from("/etc/passwd"));
///
/// let rel = resolve_path(Path::new("/home"), "file.txt");
/// assert_eq!(rel, PathBuf::from("/home/file.txt"));
///
/// let dot = resolve_path(Path::new("/"), ".");
/// assert_eq!(dot, PathBuf::from("/"));
/// ```
pub fn resolve_path(cwd: &Path, path_str: &str) -> PathBuf {
    let path = Path::new(path_str);
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    normalize_path(&joined)
}

/// Normalize a path by resolving `.` and `..` components lexically.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::RootDir => {
                result.push("/");
            }
            Component::Normal(name) => {
                result.push(name);
            }
            Component::ParentDir => {
                result.pop();
            }
            Component::CurDir | Component::Prefix(_) => {}
        }
    }

    // "/.." pops the root away
    if result.as_os_str().is_empty() {
        result.push("/");
    }

    result
}
