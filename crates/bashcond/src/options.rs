//! Shell option table (`set -o`)
//!
//! `-o name` asks whether a shell option is currently enabled. Unknown names
//! are simply false there; only [`ShellOptions::set`] treats them as errors.

use crate::error::{Error, Result};

/// Option table collaborator.
pub trait OptionTable: Sync {
    /// `Some(enabled)` for a known option, `None` for an unknown name.
    fn option(&self, name: &str) -> Option<bool>;
}

/// `set -o` options: long name and the single-letter flag, if any.
const SET_OPTIONS: &[(&str, Option<char>)] = &[
    ("allexport", Some('a')),
    ("braceexpand", Some('B')),
    ("emacs", None),
    ("errexit", Some('e')),
    ("errtrace", Some('E')),
    ("functrace", Some('T')),
    ("hashall", Some('h')),
    ("histexpand", Some('H')),
    ("history", None),
    ("ignoreeof", None),
    ("interactive-comments", None),
    ("keyword", Some('k')),
    ("monitor", Some('m')),
    ("noclobber", Some('C')),
    ("noexec", Some('n')),
    ("noglob", Some('f')),
    ("nolog", None),
    ("notify", Some('b')),
    ("nounset", Some('u')),
    ("onecmd", Some('t')),
    ("physical", Some('P')),
    ("pipefail", None),
    ("posix", None),
    ("privileged", Some('p')),
    ("verbose", Some('v')),
    ("vi", None),
    ("xtrace", Some('x')),
];

/// Options a non-interactive bash starts with.
const DEFAULT_ENABLED: &[&str] = &["braceexpand", "hashall", "interactive-comments"];

/// In-memory `set -o` table.
#[derive(Debug, Clone)]
pub struct ShellOptions {
    enabled: Vec<bool>,
}

impl Default for ShellOptions {
    fn default() -> Self {
        let enabled = SET_OPTIONS
            .iter()
            .map(|(name, _)| DEFAULT_ENABLED.contains(name))
            .collect();
        Self { enabled }
    }
}

impl ShellOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// All options off, including the usual defaults.
    pub fn all_off() -> Self {
        Self {
            enabled: vec![false; SET_OPTIONS.len()],
        }
    }

    fn index(name: &str) -> Option<usize> {
        SET_OPTIONS.iter().position(|(n, _)| *n == name)
    }

    /// `set -o name` / `set +o name`.
    pub fn set(&mut self, name: &str, enabled: bool) -> Result<()> {
        let idx = Self::index(name).ok_or_else(|| Error::UnknownOption(name.to_string()))?;
        self.enabled[idx] = enabled;
        Ok(())
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: &str, enabled: bool) -> Result<Self> {
        self.set(name, enabled)?;
        Ok(self)
    }

    /// Long option name for a `set -x` style flag letter.
    pub fn by_flag(flag: char) -> Option<&'static str> {
        SET_OPTIONS
            .iter()
            .find(|(_, f)| *f == Some(flag))
            .map(|(name, _)| *name)
    }

    /// The `$-` string: flag letters of every enabled option that has one.
    pub fn flags(&self) -> String {
        SET_OPTIONS
            .iter()
            .zip(&self.enabled)
            .filter_map(|((_, flag), on)| if *on { *flag } else { None })
            .collect()
    }

    /// Names of all known options.
    pub fn names() -> impl Iterator<Item = &'static str> {
        SET_OPTIONS.iter().map(|(name, _)| *name)
    }
}

impl OptionTable for ShellOptions {
    fn option(&self, name: &str) -> Option<bool> {
        Self::index(name).map(|idx| self.enabled[idx])
    }
}
