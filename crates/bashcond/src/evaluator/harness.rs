//! Shell state fixture for evaluator unit tests

use std::path::PathBuf;

use super::{Evaluator, ExitStatus, ShellState};
use crate::ast::TestExpr;
use crate::options::ShellOptions;
use crate::variables::ShellVars;

pub(super) struct Harness {
    pub cwd: PathBuf,
    pub vars: ShellVars,
    pub options: ShellOptions,
    pub status: ExitStatus,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            cwd: PathBuf::from("/home/user"),
            vars: ShellVars::new(),
            options: ShellOptions::new(),
            status: ExitStatus::new(),
        }
    }

    pub fn state(&mut self) -> ShellState<'_> {
        ShellState::new(&self.cwd, &mut self.vars, &self.options, &mut self.status)
    }

    pub async fn eval(&mut self, ev: &Evaluator, expr: &TestExpr, classic: bool) -> bool {
        let mut state = ShellState::new(&self.cwd, &mut self.vars, &self.options, &mut self.status);
        ev.eval(expr, classic, &mut state).await
    }

    pub async fn eval_str(&mut self, ev: &Evaluator, expr: &TestExpr, classic: bool) -> &'static str {
        let mut state = ShellState::new(&self.cwd, &mut self.vars, &self.options, &mut self.status);
        ev.eval_str(expr, classic, &mut state).await
    }
}
