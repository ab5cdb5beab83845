//! Standard stream handles for `-t fd`
//!
//! Only descriptors 0, 1 and 2 are known. Each slot may or may not carry a
//! terminal check; a missing check answers "not a terminal".

use std::io::IsTerminal;
use std::sync::Arc;

/// Terminal-detection capability of a stream handle.
pub trait Terminal: Send + Sync {
    fn is_terminal(&self) -> bool;
}

/// Terminal check backed by the process's own stdin.
#[derive(Debug, Clone, Copy)]
pub struct ProcessStdin;

/// Terminal check backed by the process's own stdout.
#[derive(Debug, Clone, Copy)]
pub struct ProcessStdout;

/// Terminal check backed by the process's own stderr.
#[derive(Debug, Clone, Copy)]
pub struct ProcessStderr;

impl Terminal for ProcessStdin {
    fn is_terminal(&self) -> bool {
        std::io::stdin().is_terminal()
    }
}

impl Terminal for ProcessStdout {
    fn is_terminal(&self) -> bool {
        std::io::stdout().is_terminal()
    }
}

impl Terminal for ProcessStderr {
    fn is_terminal(&self) -> bool {
        std::io::stderr().is_terminal()
    }
}

/// Fixed answer; useful for redirected streams and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedTerminal(pub bool);

impl Terminal for FixedTerminal {
    fn is_terminal(&self) -> bool {
        self.0
    }
}

/// The three conventional descriptors.
#[derive(Clone, Default)]
pub struct StdStreams {
    pub stdin: Option<Arc<dyn Terminal>>,
    pub stdout: Option<Arc<dyn Terminal>>,
    pub stderr: Option<Arc<dyn Terminal>>,
}

impl std::fmt::Debug for StdStreams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdStreams")
            .field("stdin", &self.stdin.is_some())
            .field("stdout", &self.stdout.is_some())
            .field("stderr", &self.stderr.is_some())
            .finish()
    }
}

impl StdStreams {
    /// No checks: every `-t` is false.
    pub fn none() -> Self {
        Self::default()
    }

    /// The process's real stdin/stdout/stderr.
    pub fn inherit() -> Self {
        Self {
            stdin: Some(Arc::new(ProcessStdin)),
            stdout: Some(Arc::new(ProcessStdout)),
            stderr: Some(Arc::new(ProcessStderr)),
        }
    }

    /// Set the check for one descriptor. Descriptors other than 0-2 are ignored.
    pub fn with(mut self, fd: i64, terminal: Arc<dyn Terminal>) -> Self {
        match fd {
            0 => self.stdin = Some(terminal),
            1 => self.stdout = Some(terminal),
            2 => self.stderr = Some(terminal),
            _ => {}
        }
        self
    }

    /// `-t fd`.
    pub fn is_terminal(&self, fd: i64) -> bool {
        let terminal = match fd {
            0 => self.stdin.as_ref(),
            1 => self.stdout.as_ref(),
            2 => self.stderr.as_ref(),
            _ => None,
        };
        terminal.is_some_and(|p| p.is_terminal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_never_terminal() {
        let streams = StdStreams::none();
        assert!(!streams.is_terminal(0));
        assert!(!streams.is_terminal(1));
        assert!(!streams.is_terminal(2));
    }

    #[test]
    fn test_fixed_terminal() {
        let streams = StdStreams::none().with(1, Arc::new(FixedTerminal(true)));
        assert!(!streams.is_terminal(0));
        assert!(streams.is_terminal(1));
    }

    #[test]
    fn test_out_of_range_fd() {
        let streams = StdStreams::none()
            .with(0, Arc::new(FixedTerminal(true)))
            .with(3, Arc::new(FixedTerminal(true)));
        assert!(!streams.is_terminal(3));
        assert!(!streams.is_terminal(-1));
    }
}
