//! Binary operator table
//!
//! Operands arrive already reduced. The evaluator routes `=`, `==` and `!=`
//! around this table, so they only reach it through non-literal operands.

use std::path::Path;

use regex::RegexBuilder;

use super::{Evaluator, ShellState};
use crate::ast::BinaryOp;
use crate::fs::Metadata;

impl Evaluator {
    pub(super) async fn binary(
        &self,
        op: BinaryOp,
        x: &str,
        y: &str,
        state: &mut ShellState<'_>,
    ) -> bool {
        match op {
            BinaryOp::MatchShort | BinaryOp::Match => x == y,
            BinaryOp::NoMatch => x != y,
            BinaryOp::ReMatch => self.regex_match(x, y, state),
            BinaryOp::Newer => match self.lookup_pair(x, y, state.cwd).await {
                Some((a, b)) => a.modified > b.modified,
                None => false,
            },
            BinaryOp::Older => match self.lookup_pair(x, y, state.cwd).await {
                Some((a, b)) => a.modified < b.modified,
                None => false,
            },
            BinaryOp::SameFile => match self.lookup_pair(x, y, state.cwd).await {
                Some((a, b)) => a.same_file(&b),
                None => false,
            },
            BinaryOp::Eq => self.arithmetic.coerce(x) == self.arithmetic.coerce(y),
            BinaryOp::Ne => self.arithmetic.coerce(x) != self.arithmetic.coerce(y),
            BinaryOp::Le => self.arithmetic.coerce(x) <= self.arithmetic.coerce(y),
            BinaryOp::Ge => self.arithmetic.coerce(x) >= self.arithmetic.coerce(y),
            BinaryOp::Lt => self.arithmetic.coerce(x) < self.arithmetic.coerce(y),
            BinaryOp::Gt => self.arithmetic.coerce(x) > self.arithmetic.coerce(y),
            BinaryOp::Before => x.as_bytes() < y.as_bytes(),
            BinaryOp::After => x.as_bytes() > y.as_bytes(),
            BinaryOp::And => !x.is_empty() && !y.is_empty(),
            BinaryOp::Or => !x.is_empty() || !y.is_empty(),
        }
    }

    /// Status of both operands; `None` unless both lookups succeed.
    async fn lookup_pair(
        &self,
        x: &str,
        y: &str,
        cwd: &Path,
    ) -> Option<(Metadata, Metadata)> {
        let a = self.lookup(cwd, x).await;
        let b = self.lookup(cwd, y).await;
        a.zip(b)
    }

    /// `x =~ y`. A pattern that does not compile sets status 2.
    fn regex_match(&self, x: &str, y: &str, state: &mut ShellState<'_>) -> bool {
        let re = match RegexBuilder::new(y)
            .size_limit(self.limits.regex_size_limit)
            .dfa_size_limit(self.limits.regex_dfa_size_limit)
            .build()
        {
            Ok(re) => re,
            Err(_err) => {
                #[cfg(feature = "logging")]
                tracing::debug!(
                    pattern = %self.log_config.operand(y),
                    error = %_err,
                    "invalid =~ pattern"
                );
                state.status.set_exit_code(2);
                return false;
            }
        };

        let Some(caps) = re.captures(x) else {
            return false;
        };
        let groups: Vec<String> = caps
            .iter()
            .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect();

        #[cfg(feature = "logging")]
        tracing::trace!(groups = groups.len(), "exporting BASH_REMATCH");

        state.variables.export_rematch(groups);
        true
    }
}
