//! Evaluate file operators against the real machine
//!
//! Run with: cargo run --example host_conditions --features realfs -- PATH...

use std::path::PathBuf;
use std::sync::Arc;

use bashcond::{
    Evaluator, ExitStatus, HostFs, Identity, ShellOptions, ShellState, ShellVars, StdStreams,
    TestExpr, UnaryOp,
};

const OPERATORS: &[UnaryOp] = &[
    UnaryOp::Exists,
    UnaryOp::RegularFile,
    UnaryOp::Directory,
    UnaryOp::Symlink,
    UnaryOp::CharDevice,
    UnaryOp::NamedPipe,
    UnaryOp::Readable,
    UnaryOp::Writable,
    UnaryOp::Executable,
    UnaryOp::NonEmptyFile,
    UnaryOp::OwnedByUser,
    UnaryOp::OwnedByGroup,
];

#[tokio::main]
async fn main() -> bashcond::Result<()> {
    let evaluator = Evaluator::builder()
        .fs(Arc::new(HostFs::new()))
        .identity(Identity::current())
        .streams(StdStreams::inherit())
        .build();

    let cwd: PathBuf = std::env::current_dir()?;
    let mut vars = ShellVars::new();
    let options = ShellOptions::new();
    let mut status = ExitStatus::new();
    let mut state = ShellState::new(&cwd, &mut vars, &options, &mut status);

    let stdout_tty = TestExpr::unary(UnaryOp::Terminal, TestExpr::lit("1"));
    println!("-t 1: {}", evaluator.eval(&stdout_tty, true, &mut state).await);

    for path in std::env::args().skip(1) {
        let mut holds = Vec::new();
        for op in OPERATORS {
            let expr = TestExpr::unary(*op, TestExpr::lit(&path));
            if evaluator.eval(&expr, true, &mut state).await {
                holds.push(op.to_string());
            }
        }
        println!("{path}: {}", holds.join(" "));
    }
    Ok(())
}
