//! Bashcond - conditional-expression evaluator for bash-compatible shells
//!
//! Part of the Everruns ecosystem.
//!
//! Decides the truth value of `test`, `[ ... ]` and `[[ ... ]]` expression
//! trees. Parsing and the rest of the interpreter live elsewhere; this crate
//! takes a parsed [`TestExpr`], a dialect flag and the shell state, and answers
//! with a shell boolean (`"1"` or `""`).
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use bashcond::{
//!     BinaryOp, Evaluator, ExitStatus, InMemoryFs, ShellOptions, ShellState, ShellVars,
//!     TestExpr, UnaryOp, VariableStore,
//! };
//!
//! #[tokio::main]
//! async fn main() -> bashcond::Result<()> {
//!     let fs = Arc::new(InMemoryFs::new());
//!     fs.write_file(Path::new("/tmp/notes.txt"), b"hello").await?;
//!     let evaluator = Evaluator::builder().fs(fs).build();
//!
//!     let mut vars = ShellVars::new();
//!     let options = ShellOptions::new();
//!     let mut status = ExitStatus::new();
//!     let mut state = ShellState::new(Path::new("/tmp"), &mut vars, &options, &mut status);
//!
//!     // [[ -f notes.txt && notes.txt =~ ^([a-z]+)\. ]]
//!     let expr = TestExpr::binary(
//!         BinaryOp::And,
//!         TestExpr::unary(UnaryOp::RegularFile, TestExpr::lit("notes.txt")),
//!         TestExpr::binary(BinaryOp::ReMatch, TestExpr::lit("notes.txt"), TestExpr::lit(r"^([a-z]+)\.")),
//!     );
//!     assert_eq!(evaluator.eval_str(&expr, false, &mut state).await, "1");
//!     assert_eq!(vars.lookup_var("BASH_REMATCH").as_str(), "notes.");
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `logging`: emit `tracing` events for operator results and failures
//! - `realfs`: [`HostFs`] and [`Identity::current`] for evaluating against the
//!   real machine (unix)
//! - `failpoints`: fault injection in [`InMemoryFs`] for testing

mod ast;
mod error;
mod evaluator;
mod expand;
pub mod fs;
mod identity;
mod limits;
mod logging;
mod numeric;
mod options;
mod path;
mod streams;
mod variables;

pub use ast::{BinaryOp, ParameterOp, TestExpr, UnaryOp, Word, WordPart};
pub use error::{Error, Result};
pub use evaluator::{
    shell_bool, Evaluator, EvaluatorBuilder, ExitStatus, ShellState, StatusSink,
};
pub use expand::{DefaultExpander, Expander};
#[cfg(all(unix, feature = "realfs"))]
pub use fs::HostFs;
pub use fs::{AccessMode, FileSystem, FileType, InMemoryFs, Metadata};
pub use identity::Identity;
pub use limits::TestLimits;
pub use logging::{sanitize_for_log, LogConfig};
pub use numeric::{Arithmetic, DecimalArithmetic};
pub use options::{OptionTable, ShellOptions};
pub use path::{normalize_path, resolve_path};
pub use streams::{
    FixedTerminal, ProcessStderr, ProcessStdin, ProcessStdout, StdStreams, Terminal,
};
pub use variables::{ShellVars, VarKind, VarValue, Variable, VariableStore, BASH_REMATCH};
