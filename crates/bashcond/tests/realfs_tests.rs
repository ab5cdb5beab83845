//! File operators against the host filesystem
//!
//! Requires the `realfs` feature:
//!
//! ```sh
//! cargo test --features realfs --test realfs_tests
//! ```

#![cfg(all(unix, feature = "realfs"))]

use std::os::unix::fs::{symlink, PermissionsExt};
use std::path::Path;
use std::sync::Arc;

use bashcond::{
    BinaryOp, Evaluator, ExitStatus, HostFs, Identity, ShellOptions, ShellState, ShellVars,
    TestExpr, UnaryOp,
};
use tempfile::TempDir;

async fn check(evaluator: &Evaluator, cwd: &Path, expr: &TestExpr) -> bool {
    let mut vars = ShellVars::new();
    let options = ShellOptions::new();
    let mut status = ExitStatus::new();
    let mut state = ShellState::new(cwd, &mut vars, &options, &mut status);
    evaluator.eval(expr, true, &mut state).await
}

fn host() -> Evaluator {
    Evaluator::builder()
        .fs(Arc::new(HostFs::new()))
        .identity(Identity::current())
        .build()
}

fn un(op: UnaryOp, x: &str) -> TestExpr {
    TestExpr::unary(op, TestExpr::lit(x))
}

#[tokio::test]
async fn host_file_types() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("file"), b"content").unwrap();
    std::fs::write(dir.path().join("empty"), b"").unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    symlink(dir.path().join("file"), dir.path().join("link")).unwrap();

    let ev = host();
    let cwd = dir.path();
    assert!(check(&ev, cwd, &un(UnaryOp::RegularFile, "file")).await);
    assert!(check(&ev, cwd, &un(UnaryOp::Directory, "sub")).await);
    assert!(check(&ev, cwd, &un(UnaryOp::Symlink, "link")).await);
    assert!(check(&ev, cwd, &un(UnaryOp::RegularFile, "link")).await);
    assert!(!check(&ev, cwd, &un(UnaryOp::Symlink, "file")).await);
    assert!(check(&ev, cwd, &un(UnaryOp::NonEmptyFile, "file")).await);
    assert!(!check(&ev, cwd, &un(UnaryOp::NonEmptyFile, "empty")).await);
    assert!(!check(&ev, cwd, &un(UnaryOp::Exists, "missing")).await);
}

#[tokio::test]
async fn host_devices() {
    let ev = host();
    let cwd = Path::new("/");
    assert!(check(&ev, cwd, &un(UnaryOp::CharDevice, "/dev/null")).await);
    assert!(!check(&ev, cwd, &un(UnaryOp::BlockDevice, "/dev/null")).await);
    assert!(check(&ev, cwd, &un(UnaryOp::Writable, "/dev/null")).await);
}

#[tokio::test]
async fn host_permissions() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("run.sh");
    std::fs::write(&script, b"#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let ev = host();
    assert!(check(&ev, dir.path(), &un(UnaryOp::Readable, "run.sh")).await);
    assert!(check(&ev, dir.path(), &un(UnaryOp::Executable, "run.sh")).await);
    assert!(check(&ev, dir.path(), &un(UnaryOp::OwnedByUser, "run.sh")).await);
    assert!(!check(&ev, dir.path(), &un(UnaryOp::Readable, "missing")).await);
}

#[tokio::test]
async fn host_same_file_through_hard_link() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a"), b"x").unwrap();
    std::fs::write(dir.path().join("c"), b"x").unwrap();
    std::fs::hard_link(dir.path().join("a"), dir.path().join("b")).unwrap();

    let ev = host();
    let same = TestExpr::binary(BinaryOp::SameFile, TestExpr::lit("a"), TestExpr::lit("b"));
    let other = TestExpr::binary(BinaryOp::SameFile, TestExpr::lit("a"), TestExpr::lit("c"));
    assert!(check(&ev, dir.path(), &same).await);
    assert!(!check(&ev, dir.path(), &other).await);
}
