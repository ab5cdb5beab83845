//! Per-call shell state handed to the evaluator

use std::path::Path;

use crate::options::OptionTable;
use crate::variables::VariableStore;

/// Receiver of the shell's last exit status.
///
/// The evaluator writes to it only when a `=~` pattern fails to compile.
pub trait StatusSink: Send {
    fn set_exit_code(&mut self, code: i32);
}

/// Reference status sink: remembers the last code it was given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExitStatus {
    code: Option<i32>,
}

impl ExitStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last code set, or `None` if nothing was written.
    pub fn code(&self) -> Option<i32> {
        self.code
    }
}

impl StatusSink for ExitStatus {
    fn set_exit_code(&mut self, code: i32) {
        self.code = Some(code);
    }
}

/// Mutable and contextual shell state for one evaluation.
///
/// Borrowed for the whole call: the evaluator is the only writer of the
/// variable store and the status sink while it runs.
pub struct ShellState<'a> {
    /// Working directory relative file operands are resolved against
    pub cwd: &'a Path,
    /// Variables for expansion, `-v`, `-R` and `BASH_REMATCH`
    pub variables: &'a mut dyn VariableStore,
    /// `set -o` table for `-o`
    pub options: &'a dyn OptionTable,
    /// Exit status sink
    pub status: &'a mut dyn StatusSink,
}

impl<'a> ShellState<'a> {
    pub fn new(
        cwd: &'a Path,
        variables: &'a mut dyn VariableStore,
        options: &'a dyn OptionTable,
        status: &'a mut dyn StatusSink,
    ) -> Self {
        Self {
            cwd,
            variables,
            options,
            status,
        }
    }
}
