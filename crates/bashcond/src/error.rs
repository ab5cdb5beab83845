//! Error types for Bashcond
//!
//! Evaluation itself never fails: every operator degrades to a false result or to
//! the status sink (see [`crate::StatusSink`]). These errors come from the setup
//! APIs around it: turning operator spellings into operators, toggling shell
//! options, and populating filesystems.

use thiserror::Error;

/// Result type alias using Bashcond's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Bashcond error types.
#[derive(Error, Debug)]
pub enum Error {
    /// An operator spelling that is not part of the test grammar.
    ///
    /// Raised by `FromStr` on [`crate::BinaryOp`] and [`crate::UnaryOp`]; the
    /// evaluator itself only ever sees well-formed operators.
    #[error("unknown test operator: {0}")]
    UnknownOperator(String),

    /// A `set -o` option name that the option table does not know.
    #[error("unknown shell option: {0}")]
    UnknownOption(String),

    /// I/O error from filesystem operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
