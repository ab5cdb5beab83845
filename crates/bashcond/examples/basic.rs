//! Basic Bashcond usage example
//!
//! Run with: cargo run --example basic

use std::path::Path;
use std::sync::Arc;

use bashcond::{
    BinaryOp, Evaluator, ExitStatus, InMemoryFs, ShellOptions, ShellState, ShellVars, TestExpr,
    UnaryOp, VariableStore, Word, BASH_REMATCH,
};

#[tokio::main]
async fn main() -> bashcond::Result<()> {
    // A small virtual filesystem
    let fs = Arc::new(InMemoryFs::new());
    fs.mkdir(Path::new("/home/user/project"), false).await?;
    fs.write_file(Path::new("/home/user/project/Cargo.toml"), b"[package]\n")
        .await?;

    let evaluator = Evaluator::builder().fs(fs).build();

    let mut vars = ShellVars::new();
    vars.set_scalar("version", "v1.42.0");
    let options = ShellOptions::new();
    let mut status = ExitStatus::new();
    let mut state = ShellState::new(
        Path::new("/home/user/project"),
        &mut vars,
        &options,
        &mut status,
    );

    // [ -f Cargo.toml ]
    let expr = TestExpr::unary(UnaryOp::RegularFile, TestExpr::lit("Cargo.toml"));
    println!("[ {} ] -> {:?}", expr, evaluator.eval_str(&expr, true, &mut state).await);

    // [ 9 -lt 10 ] versus [[ 9 < 10 ]]
    let numeric = TestExpr::binary(BinaryOp::Lt, TestExpr::lit("9"), TestExpr::lit("10"));
    let bytes = TestExpr::binary(BinaryOp::Before, TestExpr::lit("9"), TestExpr::lit("10"));
    println!("[ {} ] -> {:?}", numeric, evaluator.eval_str(&numeric, true, &mut state).await);
    println!("[[ {} ]] -> {:?}", bytes, evaluator.eval_str(&bytes, false, &mut state).await);

    // [[ $version =~ ^v([0-9]+)\.([0-9]+) ]]
    let semver = TestExpr::binary(
        BinaryOp::ReMatch,
        TestExpr::word(Word::variable("version")),
        TestExpr::lit(r"^v([0-9]+)\.([0-9]+)"),
    );
    println!("[[ {} ]] -> {:?}", semver, evaluator.eval_str(&semver, false, &mut state).await);

    println!("BASH_REMATCH = {:?}", vars.lookup_var(BASH_REMATCH).value);
    Ok(())
}
