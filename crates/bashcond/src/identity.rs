//! Effective user/group identity for `-O` and `-G`
//!
//! Ownership semantics are platform dependent, so the capability is optional:
//! an evaluator without an identity answers false to both operators.

/// Effective uid/gid of the shell process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub uid: u32,
    pub gid: u32,
}

impl Identity {
    pub fn new(uid: u32, gid: u32) -> Self {
        Self { uid, gid }
    }

    /// Superuser identity.
    pub fn root() -> Self {
        Self { uid: 0, gid: 0 }
    }

    pub fn is_root(&self) -> bool {
        self.uid == 0
    }

    /// Effective ids of the current process.
    #[cfg(all(unix, feature = "realfs"))]
    pub fn current() -> Self {
        // SAFETY: geteuid/getegid have no preconditions and cannot fail.
        let (uid, gid) = unsafe { (libc::geteuid(), libc::getegid()) };
        Self { uid, gid }
    }
}
