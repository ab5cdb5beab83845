//! Unary operator table

use super::{Evaluator, ShellState};
use crate::ast::UnaryOp;
use crate::fs::{AccessMode, MODE_SETGID, MODE_SETUID, MODE_STICKY};
use crate::variables::VarKind;

impl Evaluator {
    pub(super) async fn unary(&self, op: UnaryOp, x: &str, state: &mut ShellState<'_>) -> bool {
        let cwd = state.cwd;
        match op {
            UnaryOp::Exists => self.lookup(cwd, x).await.is_some(),
            UnaryOp::RegularFile => self
                .lookup(cwd, x)
                .await
                .is_some_and(|m| m.file_type.is_file()),
            UnaryOp::Directory => self
                .lookup(cwd, x)
                .await
                .is_some_and(|m| m.file_type.is_dir()),
            UnaryOp::CharDevice => self
                .lookup(cwd, x)
                .await
                .is_some_and(|m| m.file_type.is_char_device()),
            UnaryOp::BlockDevice => self
                .lookup(cwd, x)
                .await
                .is_some_and(|m| m.file_type.is_block_device()),
            UnaryOp::NamedPipe => self
                .lookup(cwd, x)
                .await
                .is_some_and(|m| m.file_type.is_fifo()),
            UnaryOp::Socket => self
                .lookup(cwd, x)
                .await
                .is_some_and(|m| m.file_type.is_socket()),
            UnaryOp::Symlink => self
                .lookup_link(cwd, x)
                .await
                .is_some_and(|m| m.file_type.is_symlink()),
            UnaryOp::Sticky => self
                .lookup(cwd, x)
                .await
                .is_some_and(|m| m.has_mode(MODE_STICKY)),
            UnaryOp::SetUid => self
                .lookup(cwd, x)
                .await
                .is_some_and(|m| m.has_mode(MODE_SETUID)),
            UnaryOp::SetGid => self
                .lookup(cwd, x)
                .await
                .is_some_and(|m| m.has_mode(MODE_SETGID)),
            UnaryOp::OwnedByUser => match self.identity {
                Some(id) => self.lookup(cwd, x).await.is_some_and(|m| m.uid == id.uid),
                None => false,
            },
            UnaryOp::OwnedByGroup => match self.identity {
                Some(id) => self.lookup(cwd, x).await.is_some_and(|m| m.gid == id.gid),
                None => false,
            },
            UnaryOp::ModifiedSinceRead => self
                .lookup(cwd, x)
                .await
                .is_some_and(|m| m.modified > m.accessed),
            UnaryOp::Readable => self.accessible(cwd, x, AccessMode::Read).await,
            UnaryOp::Writable => self.accessible(cwd, x, AccessMode::Write).await,
            UnaryOp::Executable => self.accessible(cwd, x, AccessMode::Execute).await,
            UnaryOp::NonEmptyFile => self.lookup(cwd, x).await.is_some_and(|m| m.size > 0),
            UnaryOp::Terminal => self.streams.is_terminal(self.arithmetic.coerce(x)),
            UnaryOp::EmptyString => x.is_empty(),
            UnaryOp::NonEmptyString => !x.is_empty(),
            UnaryOp::OptionSet => state.options.option(x).unwrap_or(false),
            UnaryOp::VarSet => state.variables.lookup_var(x).is_set(),
            UnaryOp::NameRef => state.variables.lookup_var(x).kind() == VarKind::NameRef,
            UnaryOp::Not => x.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, UNIX_EPOCH};

    use super::super::harness::Harness;
    use super::*;
    use crate::ast::{TestExpr, Word};
    use crate::fs::{FileType, InMemoryFs};
    use crate::identity::Identity;
    use crate::streams::{FixedTerminal, StdStreams};

    fn un(op: UnaryOp, x: &str) -> TestExpr {
        TestExpr::unary(op, TestExpr::lit(x))
    }

    async fn fixture() -> Arc<InMemoryFs> {
        let fs = Arc::new(InMemoryFs::new());
        fs.write_file("/home/user/file".as_ref(), b"data").await.unwrap();
        fs.write_file("/home/user/empty".as_ref(), b"").await.unwrap();
        fs.mkdir("/home/user/dir".as_ref(), false).await.unwrap();
        fs.symlink("/home/user/file".as_ref(), "/home/user/link".as_ref())
            .await
            .unwrap();
        fs.symlink("/home/user/nowhere".as_ref(), "/home/user/dangling".as_ref())
            .await
            .unwrap();
        fs.mknod("/home/user/tty".as_ref(), FileType::CharDevice, 0o620)
            .await
            .unwrap();
        fs.mknod("/home/user/disk".as_ref(), FileType::BlockDevice, 0o660)
            .await
            .unwrap();
        fs.mknod("/home/user/fifo".as_ref(), FileType::Fifo, 0o644)
            .await
            .unwrap();
        fs.mknod("/home/user/sock".as_ref(), FileType::Socket, 0o755)
            .await
            .unwrap();
        fs
    }

    #[tokio::test]
    async fn test_file_type_operators() {
        let ev = Evaluator::builder().fs(fixture().await).build();
        let mut h = Harness::new();
        let cases = [
            (UnaryOp::Exists, "file", true),
            (UnaryOp::Exists, "missing", false),
            (UnaryOp::RegularFile, "file", true),
            (UnaryOp::RegularFile, "dir", false),
            (UnaryOp::RegularFile, "link", true),
            (UnaryOp::Directory, "dir", true),
            (UnaryOp::Directory, "/home/user/dir/..", true),
            (UnaryOp::CharDevice, "tty", true),
            (UnaryOp::CharDevice, "disk", false),
            (UnaryOp::BlockDevice, "disk", true),
            (UnaryOp::BlockDevice, "tty", false),
            (UnaryOp::NamedPipe, "fifo", true),
            (UnaryOp::Socket, "sock", true),
            (UnaryOp::Socket, "fifo", false),
            (UnaryOp::NonEmptyFile, "file", true),
            (UnaryOp::NonEmptyFile, "empty", false),
        ];
        for (op, path, want) in cases {
            assert_eq!(h.eval(&ev, &un(op, path), false).await, want, "{op} {path}");
        }
    }

    #[tokio::test]
    async fn test_symlink_not_followed() {
        let ev = Evaluator::builder().fs(fixture().await).build();
        let mut h = Harness::new();
        assert!(h.eval(&ev, &un(UnaryOp::Symlink, "link"), false).await);
        assert!(h.eval(&ev, &un(UnaryOp::Symlink, "dangling"), false).await);
        assert!(!h.eval(&ev, &un(UnaryOp::Exists, "dangling"), false).await);
        assert!(!h.eval(&ev, &un(UnaryOp::Symlink, "file"), false).await);
    }

    #[tokio::test]
    async fn test_empty_operand_names_no_file() {
        let ev = Evaluator::builder().fs(fixture().await).build();
        let mut h = Harness::new();
        for op in [UnaryOp::Exists, UnaryOp::Directory, UnaryOp::Readable, UnaryOp::Symlink] {
            assert!(!h.eval(&ev, &un(op, ""), false).await, "{op}");
        }
    }

    #[tokio::test]
    async fn test_mode_bits() {
        let fs = fixture().await;
        fs.chmod("/home/user/file".as_ref(), 0o4755).await.unwrap();
        fs.chmod("/home/user/dir".as_ref(), 0o2755).await.unwrap();
        let ev = Evaluator::builder().fs(fs).build();
        let mut h = Harness::new();
        assert!(h.eval(&ev, &un(UnaryOp::SetUid, "file"), false).await);
        assert!(!h.eval(&ev, &un(UnaryOp::SetGid, "file"), false).await);
        assert!(h.eval(&ev, &un(UnaryOp::SetGid, "dir"), false).await);
        assert!(h.eval(&ev, &un(UnaryOp::Sticky, "/tmp"), false).await);
        assert!(!h.eval(&ev, &un(UnaryOp::Sticky, "dir"), false).await);
    }

    #[tokio::test]
    async fn test_access_checks() {
        let fs = fixture().await;
        fs.chmod("/home/user/file".as_ref(), 0o400).await.unwrap();
        fs.write_file("/home/user/script".as_ref(), b"#!").await.unwrap();
        fs.chmod("/home/user/script".as_ref(), 0o700).await.unwrap();
        let ev = Evaluator::builder().fs(fs).build();
        let mut h = Harness::new();
        assert!(h.eval(&ev, &un(UnaryOp::Readable, "file"), false).await);
        assert!(!h.eval(&ev, &un(UnaryOp::Writable, "file"), false).await);
        assert!(!h.eval(&ev, &un(UnaryOp::Executable, "file"), false).await);
        assert!(h.eval(&ev, &un(UnaryOp::Executable, "script"), false).await);
        assert!(!h.eval(&ev, &un(UnaryOp::Readable, "missing"), false).await);
    }

    #[tokio::test]
    async fn test_ownership_needs_identity() {
        let fs = fixture().await;
        fs.chown("/home/user/empty".as_ref(), 0, 1000).await.unwrap();

        let without = Evaluator::builder().fs(fs.clone()).build();
        let mut h = Harness::new();
        assert!(!h.eval(&without, &un(UnaryOp::OwnedByUser, "file"), false).await);
        assert!(!h.eval(&without, &un(UnaryOp::OwnedByGroup, "file"), false).await);

        let with = Evaluator::builder()
            .fs(fs)
            .identity(Identity::new(1000, 1000))
            .build();
        assert!(h.eval(&with, &un(UnaryOp::OwnedByUser, "file"), false).await);
        assert!(h.eval(&with, &un(UnaryOp::OwnedByGroup, "file"), false).await);
        assert!(!h.eval(&with, &un(UnaryOp::OwnedByUser, "empty"), false).await);
        assert!(h.eval(&with, &un(UnaryOp::OwnedByGroup, "empty"), false).await);
        assert!(!h.eval(&with, &un(UnaryOp::OwnedByUser, "missing"), false).await);
    }

    #[tokio::test]
    async fn test_modified_since_read() {
        let fs = fixture().await;
        let earlier = UNIX_EPOCH + Duration::from_secs(100);
        let later = UNIX_EPOCH + Duration::from_secs(200);
        fs.set_times("/home/user/file".as_ref(), later, earlier).await.unwrap();
        fs.set_times("/home/user/empty".as_ref(), earlier, later).await.unwrap();
        let ev = Evaluator::builder().fs(fs).build();
        let mut h = Harness::new();
        assert!(h.eval(&ev, &un(UnaryOp::ModifiedSinceRead, "file"), false).await);
        assert!(!h.eval(&ev, &un(UnaryOp::ModifiedSinceRead, "empty"), false).await);
    }

    #[tokio::test]
    async fn test_terminal() {
        let streams = StdStreams::none()
            .with(0, Arc::new(FixedTerminal(true)))
            .with(2, Arc::new(FixedTerminal(false)));
        let ev = Evaluator::builder().streams(streams).build();
        let mut h = Harness::new();
        assert!(h.eval(&ev, &un(UnaryOp::Terminal, "0"), false).await);
        assert!(!h.eval(&ev, &un(UnaryOp::Terminal, "1"), false).await);
        assert!(!h.eval(&ev, &un(UnaryOp::Terminal, "2"), false).await);
        assert!(!h.eval(&ev, &un(UnaryOp::Terminal, "7"), false).await);
        // non-numeric coerces to 0
        assert!(h.eval(&ev, &un(UnaryOp::Terminal, "stdin"), false).await);
    }

    #[tokio::test]
    async fn test_string_operators() {
        let ev = Evaluator::new();
        let mut h = Harness::new();
        assert!(h.eval(&ev, &un(UnaryOp::EmptyString, ""), false).await);
        assert!(!h.eval(&ev, &un(UnaryOp::EmptyString, "a"), false).await);
        assert!(h.eval(&ev, &un(UnaryOp::NonEmptyString, "a"), false).await);
        assert!(h.eval(&ev, &un(UnaryOp::Not, ""), false).await);
        assert!(!h.eval(&ev, &un(UnaryOp::Not, "x"), false).await);
    }

    #[tokio::test]
    async fn test_not_of_operator_node() {
        let ev = Evaluator::new();
        let mut h = Harness::new();
        let expr = TestExpr::unary(UnaryOp::Not, un(UnaryOp::Exists, "/missing"));
        assert!(h.eval(&ev, &expr, false).await);
    }

    #[tokio::test]
    async fn test_option_set() {
        let ev = Evaluator::new();
        let mut h = Harness::new();
        h.options.set("errexit", true).unwrap();
        assert!(h.eval(&ev, &un(UnaryOp::OptionSet, "errexit"), false).await);
        assert!(!h.eval(&ev, &un(UnaryOp::OptionSet, "nounset"), false).await);
        assert!(!h.eval(&ev, &un(UnaryOp::OptionSet, "bogus"), false).await);
    }

    #[tokio::test]
    async fn test_variable_operators() {
        let ev = Evaluator::new();
        let mut h = Harness::new();
        h.vars.set_scalar("empty", "");
        h.vars.declare("declared");
        h.vars.set_scalar("target", "v");
        h.vars.declare_nameref("ref", "target");
        h.vars.declare_nameref("dangling", "missing");
        assert!(h.eval(&ev, &un(UnaryOp::VarSet, "empty"), false).await);
        assert!(!h.eval(&ev, &un(UnaryOp::VarSet, "declared"), false).await);
        assert!(!h.eval(&ev, &un(UnaryOp::VarSet, "missing"), false).await);
        assert!(h.eval(&ev, &un(UnaryOp::VarSet, "ref"), false).await);
        // -v looks at the reference itself, not its target
        assert!(h.eval(&ev, &un(UnaryOp::VarSet, "dangling"), false).await);
        assert!(h.eval(&ev, &un(UnaryOp::NameRef, "ref"), false).await);
        assert!(h.eval(&ev, &un(UnaryOp::NameRef, "dangling"), false).await);
        assert!(!h.eval(&ev, &un(UnaryOp::NameRef, "target"), false).await);
    }

    #[tokio::test]
    async fn test_operand_is_expanded() {
        let ev = Evaluator::builder().fs(fixture().await).build();
        let mut h = Harness::new();
        h.vars.set_scalar("f", "/home/user/dir");
        let expr = TestExpr::unary(UnaryOp::Directory, TestExpr::word(Word::variable("f")));
        assert!(h.eval(&ev, &expr, true).await);
        assert!(h.eval(&ev, &expr, false).await);
    }
}
