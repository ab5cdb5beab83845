//! Test expression evaluator
//!
//! Walks a [`TestExpr`] depth-first. Leaves are reduced to strings through the
//! [`Expander`]; operator nodes are computed by the binary and unary operator
//! tables. Every node yields a shell boolean: `"1"` for true, `""` for false.
//!
//! Two dialects share the walk:
//! - classic (`test`, `[`): leaves are field-split, `=`/`==`/`!=` compare
//!   literally
//! - extended (`[[`): leaves are not split, `=`/`==`/`!=` match the right-hand
//!   side as a glob pattern
//!
//! `&&`/`||` evaluate both sides before combining, so side effects of the
//! right operand (such as `${x:=y}`) happen even when the left operand already
//! decides the result.

mod binary;
#[cfg(test)]
mod harness;
mod state;
mod unary;

pub use state::{ExitStatus, ShellState, StatusSink};

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use glob::{MatchOptions, Pattern};

use crate::ast::{BinaryOp, TestExpr, Word};
use crate::expand::{DefaultExpander, Expander};
use crate::fs::{AccessMode, FileSystem, InMemoryFs, Metadata};
use crate::identity::Identity;
use crate::limits::TestLimits;
use crate::logging::LogConfig;
use crate::numeric::{Arithmetic, DecimalArithmetic};
use crate::path::resolve_path;
use crate::streams::StdStreams;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Glob options for `[[ x == pattern ]]`: `*` and `?` cross `/`, and a
/// leading dot needs no explicit match.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Render a boolean as a shell boolean.
pub fn shell_bool(value: bool) -> &'static str {
    if value { "1" } else { "" }
}

/// Conditional-expression evaluator.
///
/// Holds only immutable collaborators; all mutable state arrives per call in
/// a [`ShellState`]. One evaluator can be shared across tasks.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use bashcond::{BinaryOp, Evaluator, ExitStatus, ShellOptions, ShellState, ShellVars, TestExpr};
///
/// # #[tokio::main]
/// # async fn main() {
/// let evaluator = Evaluator::new();
/// let mut vars = ShellVars::new();
/// let options = ShellOptions::new();
/// let mut status = ExitStatus::new();
/// let mut state = ShellState::new(Path::new("/"), &mut vars, &options, &mut status);
///
/// let expr = TestExpr::binary(BinaryOp::Match, TestExpr::lit("file.txt"), TestExpr::lit("file.*"));
/// assert_eq!(evaluator.eval_str(&expr, false, &mut state).await, "1");
/// # }
/// ```
pub struct Evaluator {
    fs: Arc<dyn FileSystem>,
    expander: Arc<dyn Expander>,
    arithmetic: Arc<dyn Arithmetic>,
    streams: StdStreams,
    identity: Option<Identity>,
    limits: TestLimits,
    #[cfg_attr(not(feature = "logging"), allow(dead_code))]
    log_config: LogConfig,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Create an evaluator with default collaborators (see [`EvaluatorBuilder`]).
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new EvaluatorBuilder for customized configuration.
    pub fn builder() -> EvaluatorBuilder {
        EvaluatorBuilder::default()
    }

    /// The filesystem file operators consult.
    pub fn fs(&self) -> Arc<dyn FileSystem> {
        Arc::clone(&self.fs)
    }

    /// Evaluate `expr`. `classic` selects `test`/`[` semantics over `[[`.
    pub async fn eval(&self, expr: &TestExpr, classic: bool, state: &mut ShellState<'_>) -> bool {
        self.eval_expr(expr, classic, state).await
    }

    /// Evaluate `expr` and return the shell boolean: `"1"` or `""`.
    pub async fn eval_str(
        &self,
        expr: &TestExpr,
        classic: bool,
        state: &mut ShellState<'_>,
    ) -> &'static str {
        shell_bool(self.eval(expr, classic, state).await)
    }

    fn eval_expr<'a, 's: 'a>(
        &'a self,
        expr: &'a TestExpr,
        classic: bool,
        state: &'a mut ShellState<'s>,
    ) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            match expr {
                TestExpr::Literal(word) => !self.expand(word, classic, state).is_empty(),
                TestExpr::Paren(inner) => self.eval_expr(inner, classic, state).await,
                TestExpr::Binary { op, left, right } if op.is_match() => {
                    let result = self.eval_match(*op, left, right, classic, state).await;
                    #[cfg(feature = "logging")]
                    tracing::trace!(op = %op, result, "test operator");
                    result
                }
                TestExpr::Binary { op, left, right } => {
                    // Both sides are always reduced, left first.
                    let x = self.operand(left, classic, state).await;
                    let y = self.operand(right, classic, state).await;
                    let result = self.binary(*op, &x, &y, state).await;
                    #[cfg(feature = "logging")]
                    tracing::trace!(op = %op, result, "test operator");
                    result
                }
                TestExpr::Unary { op, operand } => {
                    let x = self.operand(operand, classic, state).await;
                    let result = self.unary(*op, &x, state).await;
                    #[cfg(feature = "logging")]
                    tracing::trace!(op = %op, result, "test operator");
                    result
                }
            }
        })
    }

    /// Reduce a child node to the string an operator sees: a leaf's expanded
    /// text, or `"1"`/`""` for an operator node.
    fn operand<'a, 's: 'a>(
        &'a self,
        expr: &'a TestExpr,
        classic: bool,
        state: &'a mut ShellState<'s>,
    ) -> BoxFuture<'a, String> {
        Box::pin(async move {
            match expr {
                TestExpr::Literal(word) => self.expand(word, classic, state),
                TestExpr::Paren(inner) => self.operand(inner, classic, state).await,
                _ => shell_bool(self.eval_expr(expr, classic, state).await).to_string(),
            }
        })
    }

    fn expand(&self, word: &Word, classic: bool, state: &mut ShellState<'_>) -> String {
        if classic {
            self.expander.document(word, state.variables)
        } else {
            self.expander.literal(word, state.variables)
        }
    }

    /// `=`, `==`, `!=`: the subject is never split, and in `[[` the right side
    /// keeps its pattern characters.
    async fn eval_match(
        &self,
        op: BinaryOp,
        left: &TestExpr,
        right: &TestExpr,
        classic: bool,
        state: &mut ShellState<'_>,
    ) -> bool {
        let subject = match left {
            TestExpr::Literal(word) => self.expander.literal(word, state.variables),
            _ => self.operand(left, classic, state).await,
        };
        let matched = match right {
            TestExpr::Literal(word) if classic => {
                subject == self.expander.literal(word, state.variables)
            }
            TestExpr::Literal(word) => {
                pattern_match(&self.expander.pattern(word, state.variables), &subject)
            }
            _ => {
                let other = self.operand(right, classic, state).await;
                if classic {
                    subject == other
                } else {
                    pattern_match(&other, &subject)
                }
            }
        };
        matched != (op == BinaryOp::NoMatch)
    }

    /// Symlink-following status of a file operand. An empty operand names no
    /// file.
    async fn lookup(&self, cwd: &Path, operand: &str) -> Option<Metadata> {
        if operand.is_empty() {
            return None;
        }
        let path = resolve_path(cwd, operand);
        match self.fs.stat(&path).await {
            Ok(meta) => Some(meta),
            Err(_err) => {
                #[cfg(feature = "logging")]
                tracing::trace!(path = %self.log_config.operand(operand), error = %_err, "stat failed");
                None
            }
        }
    }

    /// Like [`lookup`](Self::lookup) without following a final symlink.
    async fn lookup_link(&self, cwd: &Path, operand: &str) -> Option<Metadata> {
        if operand.is_empty() {
            return None;
        }
        let path = resolve_path(cwd, operand);
        match self.fs.lstat(&path).await {
            Ok(meta) => Some(meta),
            Err(_err) => {
                #[cfg(feature = "logging")]
                tracing::trace!(path = %self.log_config.operand(operand), error = %_err, "lstat failed");
                None
            }
        }
    }

    async fn accessible(&self, cwd: &Path, operand: &str, mode: AccessMode) -> bool {
        if operand.is_empty() {
            return false;
        }
        let path = resolve_path(cwd, operand);
        self.fs.access(&path, mode).await.is_ok()
    }
}

/// Glob-match `subject` against `pattern`. A pattern the matcher rejects is
/// compared literally.
fn pattern_match(pattern: &str, subject: &str) -> bool {
    let pattern = normalize_pattern(pattern);
    match Pattern::new(&pattern) {
        Ok(compiled) => compiled.matches_with(subject, MATCH_OPTIONS),
        Err(_) => pattern == subject,
    }
}

/// Rewrite shell pattern syntax into what the glob crate accepts.
///
/// Runs of `*` collapse to one, since `**` is only valid there as a whole path
/// component. A bracket opened with `[^` becomes `[!`. A `[` without a closing
/// `]` is a literal and is escaped as `[[]`.
fn normalize_pattern(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                if !out.ends_with('*') {
                    out.push('*');
                }
                i += 1;
            }
            '[' => {
                let negated = matches!(chars.get(i + 1), Some('!' | '^'));
                let start = if negated { i + 2 } else { i + 1 };
                // The first member is taken as-is, so `[]]` is a class of `]`.
                let close = chars
                    .get(start + 1..)
                    .and_then(|rest| rest.iter().position(|&c| c == ']'))
                    .map(|j| start + 1 + j);
                match close {
                    Some(end) => {
                        out.push('[');
                        if negated {
                            out.push('!');
                        }
                        out.extend(&chars[start..=end]);
                        i = end + 1;
                    }
                    None => {
                        out.push_str("[[]");
                        i += 1;
                    }
                }
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Builder for customized [`Evaluator`] configuration.
#[derive(Default)]
pub struct EvaluatorBuilder {
    fs: Option<Arc<dyn FileSystem>>,
    expander: Option<Arc<dyn Expander>>,
    arithmetic: Option<Arc<dyn Arithmetic>>,
    streams: StdStreams,
    identity: Option<Identity>,
    limits: TestLimits,
    log_config: LogConfig,
}

impl EvaluatorBuilder {
    /// Set the filesystem. Default: an empty [`InMemoryFs`].
    pub fn fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Set the word expander. Default: [`DefaultExpander`].
    pub fn expander(mut self, expander: Arc<dyn Expander>) -> Self {
        self.expander = Some(expander);
        self
    }

    /// Set numeric coercion. Default: [`DecimalArithmetic`].
    pub fn arithmetic(mut self, arithmetic: Arc<dyn Arithmetic>) -> Self {
        self.arithmetic = Some(arithmetic);
        self
    }

    /// Set the terminal checks for `-t`. Default: none, so `-t` is false.
    pub fn streams(mut self, streams: StdStreams) -> Self {
        self.streams = streams;
        self
    }

    /// Set the effective identity for `-O`/`-G`. Without one both are false.
    pub fn identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Set resource limits.
    pub fn limits(mut self, limits: TestLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set logging configuration.
    pub fn log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    /// Build the evaluator.
    pub fn build(self) -> Evaluator {
        Evaluator {
            fs: self.fs.unwrap_or_else(|| Arc::new(InMemoryFs::new())),
            expander: self.expander.unwrap_or_else(|| Arc::new(DefaultExpander)),
            arithmetic: self
                .arithmetic
                .unwrap_or_else(|| Arc::new(DecimalArithmetic)),
            streams: self.streams,
            identity: self.identity,
            limits: self.limits,
            log_config: self.log_config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::harness::Harness;
    use super::*;
    use crate::ast::{ParameterOp, UnaryOp, WordPart};
    use crate::variables::VariableStore;

    fn assign_default(name: &str, value: &str) -> TestExpr {
        TestExpr::word(Word::from_parts(vec![WordPart::ParameterExpansion {
            name: name.into(),
            operator: ParameterOp::AssignDefault,
            operand: value.into(),
        }]))
    }

    #[test]
    fn test_evaluator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Evaluator>();
    }

    #[test]
    fn test_shell_bool() {
        assert_eq!(shell_bool(true), "1");
        assert_eq!(shell_bool(false), "");
    }

    #[tokio::test]
    async fn test_literal_truthiness() {
        let mut h = Harness::new();
        let ev = Evaluator::new();
        assert!(h.eval(&ev, &TestExpr::lit("x"), false).await);
        assert!(!h.eval(&ev, &TestExpr::lit(""), false).await);
        assert!(!h.eval(&ev, &TestExpr::word(Word::variable("unset")), true).await);
    }

    #[tokio::test]
    async fn test_paren_passes_through() {
        let mut h = Harness::new();
        let ev = Evaluator::new();
        let expr = TestExpr::paren(TestExpr::unary(UnaryOp::EmptyString, TestExpr::lit("")));
        assert_eq!(h.eval_str(&ev, &expr, false).await, "1");
    }

    #[tokio::test]
    async fn test_classic_match_is_literal() {
        let mut h = Harness::new();
        let ev = Evaluator::new();
        let eq = TestExpr::binary(BinaryOp::MatchShort, TestExpr::lit("foo"), TestExpr::lit("foo"));
        let glob = TestExpr::binary(BinaryOp::MatchShort, TestExpr::lit("foo"), TestExpr::lit("f*"));
        assert_eq!(h.eval_str(&ev, &eq, true).await, "1");
        assert_eq!(h.eval_str(&ev, &glob, true).await, "");
    }

    #[tokio::test]
    async fn test_extended_match_is_glob() {
        let mut h = Harness::new();
        let ev = Evaluator::new();
        let expr = TestExpr::binary(BinaryOp::Match, TestExpr::lit("file.txt"), TestExpr::lit("file.*"));
        assert_eq!(h.eval_str(&ev, &expr, false).await, "1");

        let expr = TestExpr::binary(BinaryOp::NoMatch, TestExpr::lit("file.txt"), TestExpr::lit("*.rs"));
        assert_eq!(h.eval_str(&ev, &expr, false).await, "1");
    }

    #[tokio::test]
    async fn test_extended_quoted_pattern_is_literal() {
        let mut h = Harness::new();
        let ev = Evaluator::new();
        let expr = TestExpr::binary(
            BinaryOp::Match,
            TestExpr::lit("foo"),
            TestExpr::word(Word::quoted("f*")),
        );
        assert_eq!(h.eval_str(&ev, &expr, false).await, "");
    }

    #[tokio::test]
    async fn test_match_subject_not_split_in_classic() {
        let mut h = Harness::new();
        h.vars.set_scalar("x", "a  b");
        let ev = Evaluator::new();
        let expr = TestExpr::binary(
            BinaryOp::MatchShort,
            TestExpr::word(Word::variable("x")),
            TestExpr::word(Word::quoted("a  b")),
        );
        assert_eq!(h.eval_str(&ev, &expr, true).await, "1");
    }

    #[tokio::test]
    async fn test_operator_child_reduces_to_shell_bool() {
        let mut h = Harness::new();
        let ev = Evaluator::new();
        // ( -n x ) -eq 1
        let expr = TestExpr::binary(
            BinaryOp::Eq,
            TestExpr::paren(TestExpr::unary(UnaryOp::NonEmptyString, TestExpr::lit("x"))),
            TestExpr::lit("1"),
        );
        assert_eq!(h.eval_str(&ev, &expr, false).await, "1");
    }

    #[tokio::test]
    async fn test_and_evaluates_right_side_when_left_false() {
        let mut h = Harness::new();
        let ev = Evaluator::new();
        let expr = TestExpr::binary(BinaryOp::And, TestExpr::lit(""), assign_default("side", "done"));
        assert_eq!(h.eval_str(&ev, &expr, false).await, "");
        assert_eq!(h.vars.lookup_var("side").as_str(), "done");
    }

    #[tokio::test]
    async fn test_or_evaluates_right_side_when_left_true() {
        let mut h = Harness::new();
        let ev = Evaluator::new();
        let expr = TestExpr::binary(BinaryOp::Or, TestExpr::lit("yes"), assign_default("side", "done"));
        assert_eq!(h.eval_str(&ev, &expr, true).await, "1");
        assert_eq!(h.vars.lookup_var("side").as_str(), "done");
    }

    #[tokio::test]
    async fn test_left_reduced_before_right() {
        let mut h = Harness::new();
        let ev = Evaluator::new();
        // ${v:=first} = ${v:=second}
        let expr = TestExpr::binary(
            BinaryOp::Eq,
            TestExpr::binary(BinaryOp::Or, assign_default("v", "first"), TestExpr::lit("")),
            TestExpr::binary(BinaryOp::Or, assign_default("v", "second"), TestExpr::lit("")),
        );
        assert!(h.eval(&ev, &expr, false).await);
        assert_eq!(h.vars.lookup_var("v").as_str(), "first");
    }

    #[test]
    fn test_pattern_match_helpers() {
        assert!(pattern_match("a**", "abc"));
        assert!(pattern_match("*/b", "a/b"));
        assert!(pattern_match(".*", ".hidden"));
        assert!(pattern_match("[a-c]x", "bx"));
        assert!(!pattern_match("[a-c]x", "dx"));
        assert_eq!(normalize_pattern("a***b*"), "a*b*");
        assert!(pattern_match("[^a]", "b"));
        assert!(!pattern_match("[^a]", "a"));
        assert!(pattern_match("[!a]", "b"));
        assert_eq!(normalize_pattern("[^a]"), "[!a]");
        // an unclosed bracket is a literal `[`; the rest stays a pattern
        assert!(pattern_match("a[*", "a[b"));
        assert!(!pattern_match("a[*", "ab"));
        assert_eq!(normalize_pattern("a[*"), "a[[]*");
        // escaped forms pass through untouched
        assert!(pattern_match("[[]x[]]", "[x]"));
        assert!(pattern_match("a[*]", "a*"));
        assert!(!pattern_match("a[*]", "ab"));
    }
}
