//! AST types for test expressions
//!
//! These are the trees an external parser builds for `test`, `[ ... ]` and
//! `[[ ... ]]`. The evaluator consumes them as-is and never re-validates arity.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A word (potentially with expansions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub parts: Vec<WordPart>,
}

impl Word {
    /// Create a simple literal word.
    pub fn literal(s: impl Into<String>) -> Self {
        Self {
            parts: vec![WordPart::Literal(s.into())],
        }
    }

    /// Create a fully quoted word (`"..."` or `'...'`).
    pub fn quoted(s: impl Into<String>) -> Self {
        Self {
            parts: vec![WordPart::Quoted(s.into())],
        }
    }

    /// Create a word made of a single `$name` expansion.
    pub fn variable(name: impl Into<String>) -> Self {
        Self {
            parts: vec![WordPart::Variable(name.into())],
        }
    }

    /// Create a word from parts.
    pub fn from_parts(parts: Vec<WordPart>) -> Self {
        Self { parts }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            match part {
                WordPart::Literal(s) => write!(f, "{}", s)?,
                WordPart::Quoted(s) => write!(f, "\"{}\"", s)?,
                WordPart::Variable(name) => write!(f, "${}", name)?,
                WordPart::ParameterExpansion {
                    name,
                    operator,
                    operand,
                } => {
                    let op_str = match operator {
                        ParameterOp::UseDefault => ":-",
                        ParameterOp::AssignDefault => ":=",
                        ParameterOp::UseReplacement => ":+",
                    };
                    write!(f, "${{{}{}{}}}", name, op_str, operand)?
                }
                WordPart::Length(name) => write!(f, "${{#{}}}", name)?,
            }
        }
        Ok(())
    }
}

/// Parts of a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordPart {
    /// Unquoted literal text; backslashes escape the next character
    Literal(String),
    /// Quoted text; never split, never a pattern
    Quoted(String),
    /// Variable expansion ($VAR or ${VAR})
    Variable(String),
    /// Parameter expansion with operator ${var:-default}, ${var:=default}, ${var:+alt}
    ParameterExpansion {
        name: String,
        operator: ParameterOp,
        operand: String,
    },
    /// Length expansion ${#var}
    Length(String),
}

/// Parameter expansion operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterOp {
    /// :- use default if unset/empty
    UseDefault,
    /// := assign default if unset/empty
    AssignDefault,
    /// :+ use replacement if set and non-empty
    UseReplacement,
}

/// A test expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestExpr {
    /// A word, reduced to a string when evaluated
    Literal(Word),
    /// `( expr )`
    Paren(Box<TestExpr>),
    /// `left op right`
    Binary {
        op: BinaryOp,
        left: Box<TestExpr>,
        right: Box<TestExpr>,
    },
    /// `op operand`
    Unary { op: UnaryOp, operand: Box<TestExpr> },
}

impl TestExpr {
    /// A literal leaf holding plain text.
    pub fn lit(s: impl Into<String>) -> Self {
        Self::Literal(Word::literal(s))
    }

    /// A literal leaf holding an arbitrary word.
    pub fn word(word: Word) -> Self {
        Self::Literal(word)
    }

    pub fn paren(inner: TestExpr) -> Self {
        Self::Paren(Box::new(inner))
    }

    pub fn binary(op: BinaryOp, left: TestExpr, right: TestExpr) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: TestExpr) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }
}

impl fmt::Display for TestExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestExpr::Literal(word) => write!(f, "{}", word),
            TestExpr::Paren(inner) => write!(f, "( {} )", inner),
            TestExpr::Binary { op, left, right } => write!(f, "{} {} {}", left, op, right),
            TestExpr::Unary { op, operand } => write!(f, "{} {}", op, operand),
        }
    }
}

/// Binary test operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `=` - string match (pattern match inside `[[`)
    MatchShort,
    /// `==` - string match (pattern match inside `[[`)
    Match,
    /// `!=` - negated string match
    NoMatch,
    /// `=~` - regular expression match
    ReMatch,
    /// `-nt` - left file is newer
    Newer,
    /// `-ot` - left file is older
    Older,
    /// `-ef` - same device and inode
    SameFile,
    /// `-eq`
    Eq,
    /// `-ne`
    Ne,
    /// `-le`
    Le,
    /// `-ge`
    Ge,
    /// `-lt`
    Lt,
    /// `-gt`
    Gt,
    /// `<` - sorts before, byte-wise
    Before,
    /// `>` - sorts after, byte-wise
    After,
    /// `&&` / `-a`
    And,
    /// `||` / `-o`
    Or,
}

impl BinaryOp {
    /// The pattern-match family, whose right-hand side is not reduced like
    /// other operands.
    pub fn is_match(self) -> bool {
        matches!(self, BinaryOp::MatchShort | BinaryOp::Match | BinaryOp::NoMatch)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::MatchShort => "=",
            BinaryOp::Match => "==",
            BinaryOp::NoMatch => "!=",
            BinaryOp::ReMatch => "=~",
            BinaryOp::Newer => "-nt",
            BinaryOp::Older => "-ot",
            BinaryOp::SameFile => "-ef",
            BinaryOp::Eq => "-eq",
            BinaryOp::Ne => "-ne",
            BinaryOp::Le => "-le",
            BinaryOp::Ge => "-ge",
            BinaryOp::Lt => "-lt",
            BinaryOp::Gt => "-gt",
            BinaryOp::Before => "<",
            BinaryOp::After => ">",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BinaryOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s {
            "=" => BinaryOp::MatchShort,
            "==" => BinaryOp::Match,
            "!=" => BinaryOp::NoMatch,
            "=~" => BinaryOp::ReMatch,
            "-nt" => BinaryOp::Newer,
            "-ot" => BinaryOp::Older,
            "-ef" => BinaryOp::SameFile,
            "-eq" => BinaryOp::Eq,
            "-ne" => BinaryOp::Ne,
            "-le" => BinaryOp::Le,
            "-ge" => BinaryOp::Ge,
            "-lt" => BinaryOp::Lt,
            "-gt" => BinaryOp::Gt,
            "<" => BinaryOp::Before,
            ">" => BinaryOp::After,
            "&&" | "-a" => BinaryOp::And,
            "||" | "-o" => BinaryOp::Or,
            _ => return Err(Error::UnknownOperator(s.to_string())),
        };
        Ok(op)
    }
}

/// Unary test operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-e` / `-a`
    Exists,
    /// `-f`
    RegularFile,
    /// `-d`
    Directory,
    /// `-c`
    CharDevice,
    /// `-b`
    BlockDevice,
    /// `-p`
    NamedPipe,
    /// `-S`
    Socket,
    /// `-L` / `-h`
    Symlink,
    /// `-k`
    Sticky,
    /// `-u`
    SetUid,
    /// `-g`
    SetGid,
    /// `-O` - owned by the effective user id
    OwnedByUser,
    /// `-G` - owned by the effective group id
    OwnedByGroup,
    /// `-N` - modified since it was last read
    ModifiedSinceRead,
    /// `-r`
    Readable,
    /// `-w`
    Writable,
    /// `-x`
    Executable,
    /// `-s` - size greater than zero
    NonEmptyFile,
    /// `-t` - file descriptor is a terminal
    Terminal,
    /// `-z`
    EmptyString,
    /// `-n`
    NonEmptyString,
    /// `-o` - shell option is enabled
    OptionSet,
    /// `-v` - variable is set
    VarSet,
    /// `-R` - variable is a name reference
    NameRef,
    /// `!`
    Not,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Exists => "-e",
            UnaryOp::RegularFile => "-f",
            UnaryOp::Directory => "-d",
            UnaryOp::CharDevice => "-c",
            UnaryOp::BlockDevice => "-b",
            UnaryOp::NamedPipe => "-p",
            UnaryOp::Socket => "-S",
            UnaryOp::Symlink => "-L",
            UnaryOp::Sticky => "-k",
            UnaryOp::SetUid => "-u",
            UnaryOp::SetGid => "-g",
            UnaryOp::OwnedByUser => "-O",
            UnaryOp::OwnedByGroup => "-G",
            UnaryOp::ModifiedSinceRead => "-N",
            UnaryOp::Readable => "-r",
            UnaryOp::Writable => "-w",
            UnaryOp::Executable => "-x",
            UnaryOp::NonEmptyFile => "-s",
            UnaryOp::Terminal => "-t",
            UnaryOp::EmptyString => "-z",
            UnaryOp::NonEmptyString => "-n",
            UnaryOp::OptionSet => "-o",
            UnaryOp::VarSet => "-v",
            UnaryOp::NameRef => "-R",
            UnaryOp::Not => "!",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnaryOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s {
            "-e" | "-a" => UnaryOp::Exists,
            "-f" => UnaryOp::RegularFile,
            "-d" => UnaryOp::Directory,
            "-c" => UnaryOp::CharDevice,
            "-b" => UnaryOp::BlockDevice,
            "-p" => UnaryOp::NamedPipe,
            "-S" => UnaryOp::Socket,
            "-L" | "-h" => UnaryOp::Symlink,
            "-k" => UnaryOp::Sticky,
            "-u" => UnaryOp::SetUid,
            "-g" => UnaryOp::SetGid,
            "-O" => UnaryOp::OwnedByUser,
            "-G" => UnaryOp::OwnedByGroup,
            "-N" => UnaryOp::ModifiedSinceRead,
            "-r" => UnaryOp::Readable,
            "-w" => UnaryOp::Writable,
            "-x" => UnaryOp::Executable,
            "-s" => UnaryOp::NonEmptyFile,
            "-t" => UnaryOp::Terminal,
            "-z" => UnaryOp::EmptyString,
            "-n" => UnaryOp::NonEmptyString,
            "-o" => UnaryOp::OptionSet,
            "-v" => UnaryOp::VarSet,
            "-R" => UnaryOp::NameRef,
            "!" => UnaryOp::Not,
            _ => return Err(Error::UnknownOperator(s.to_string())),
        };
        Ok(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_op_spellings() {
        assert_eq!("=".parse::<BinaryOp>().unwrap(), BinaryOp::MatchShort);
        assert_eq!("==".parse::<BinaryOp>().unwrap(), BinaryOp::Match);
        assert_eq!("-a".parse::<BinaryOp>().unwrap(), BinaryOp::And);
        assert_eq!("||".parse::<BinaryOp>().unwrap(), BinaryOp::Or);
        assert!(BinaryOp::NoMatch.is_match());
        assert!(!BinaryOp::ReMatch.is_match());
    }

    #[test]
    fn test_unary_op_aliases() {
        assert_eq!("-a".parse::<UnaryOp>().unwrap(), UnaryOp::Exists);
        assert_eq!("-h".parse::<UnaryOp>().unwrap(), UnaryOp::Symlink);
        assert_eq!(UnaryOp::Symlink.to_string(), "-L");
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let err = "-q".parse::<UnaryOp>().unwrap_err();
        assert!(matches!(err, Error::UnknownOperator(ref s) if s == "-q"));
        assert!("-xx".parse::<BinaryOp>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for op in [BinaryOp::Newer, BinaryOp::Before, BinaryOp::ReMatch] {
            assert_eq!(op.to_string().parse::<BinaryOp>().unwrap(), op);
        }
    }

    #[test]
    fn test_expr_display() {
        let expr = TestExpr::binary(
            BinaryOp::And,
            TestExpr::unary(UnaryOp::Directory, TestExpr::lit("/tmp")),
            TestExpr::paren(TestExpr::binary(
                BinaryOp::Match,
                TestExpr::word(Word::variable("x")),
                TestExpr::lit("a*"),
            )),
        );
        assert_eq!(expr.to_string(), "-d /tmp && ( $x == a* )");
    }
}
