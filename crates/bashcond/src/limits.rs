//! Resource limits for evaluation
//!
//! `=~` compiles a user-supplied regular expression on every evaluation. These
//! limits bound what one compile may cost; a pattern that exceeds them fails the
//! same way a malformed one does (status 2, result false). The defaults are the
//! regex crate's own, so any pattern `Regex::new` accepts compiles here too.

/// Default compiled-program size limit for `=~` patterns (10 MiB, the same as
/// `regex::Regex::new`).
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Default lazy-DFA cache size limit for `=~` patterns (2 MiB, the same as
/// `regex::Regex::new`).
pub const DEFAULT_REGEX_DFA_SIZE_LIMIT: usize = 2 * (1 << 20);

/// Resource limits for test evaluation
#[derive(Debug, Clone)]
pub struct TestLimits {
    /// Maximum size of a compiled `=~` regex
    /// Default: 10 MiB
    pub regex_size_limit: usize,

    /// Maximum lazy-DFA cache for a `=~` regex
    /// Default: 2 MiB
    pub regex_dfa_size_limit: usize,
}

impl Default for TestLimits {
    fn default() -> Self {
        Self {
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
            regex_dfa_size_limit: DEFAULT_REGEX_DFA_SIZE_LIMIT,
        }
    }
}

impl TestLimits {
    /// Create new limits with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set compiled regex size limit
    pub fn regex_size_limit(mut self, bytes: usize) -> Self {
        self.regex_size_limit = bytes;
        self
    }

    /// Set regex DFA cache limit
    pub fn regex_dfa_size_limit(mut self, bytes: usize) -> Self {
        self.regex_dfa_size_limit = bytes;
        self
    }
}
