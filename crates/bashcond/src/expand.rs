//! Word reduction for test operands
//!
//! The expansion layer proper belongs to the interpreter; the evaluator only
//! needs three ways of turning a [`Word`] into a string:
//!
//! - `literal`: full expansion and quote removal, no splitting, no globbing
//! - `pattern`: like `literal`, but glob metacharacters in unquoted text stay
//!   active and quoted text is escaped so it matches itself
//! - `document`: like `literal`, then field splitting; used by classic `test`,
//!   whose arguments were already split once
//!
//! [`DefaultExpander`] implements all three over a [`VariableStore`].

use glob::Pattern;

use crate::ast::{ParameterOp, Word, WordPart};
use crate::variables::{Variable, VariableStore};

/// Default IFS when the variable is unset.
const DEFAULT_IFS: &str = " \t\n";

/// Word-reduction collaborator.
pub trait Expander: Send + Sync {
    fn literal(&self, word: &Word, vars: &mut dyn VariableStore) -> String;
    fn pattern(&self, word: &Word, vars: &mut dyn VariableStore) -> String;
    fn document(&self, word: &Word, vars: &mut dyn VariableStore) -> String;
}

/// Reference expander for literal text, quoting, `$var`, `${var:-x}`,
/// `${var:=x}`, `${var:+x}` and `${#var}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExpander;

impl DefaultExpander {
    /// Value of an expansion part. `${var:=x}` writes to the store.
    fn expand_part(&self, part: &WordPart, vars: &mut dyn VariableStore) -> String {
        match part {
            WordPart::Literal(s) | WordPart::Quoted(s) => s.clone(),
            WordPart::Variable(name) => vars.resolve_var(name).as_str().to_string(),
            WordPart::ParameterExpansion {
                name,
                operator,
                operand,
            } => {
                let value = vars.resolve_var(name).as_str().to_string();
                match operator {
                    ParameterOp::UseDefault if value.is_empty() => operand.clone(),
                    ParameterOp::AssignDefault if value.is_empty() => {
                        let target = vars.resolve_name(name);
                        vars.set_var(&target, Variable::scalar(operand.clone()));
                        operand.clone()
                    }
                    ParameterOp::UseReplacement if !value.is_empty() => operand.clone(),
                    ParameterOp::UseReplacement => String::new(),
                    _ => value,
                }
            }
            WordPart::Length(name) => vars
                .resolve_var(name)
                .as_str()
                .chars()
                .count()
                .to_string(),
        }
    }

    fn ifs(vars: &dyn VariableStore) -> String {
        let ifs = vars.lookup_var("IFS");
        if ifs.is_set() {
            ifs.as_str().to_string()
        } else {
            DEFAULT_IFS.to_string()
        }
    }
}

impl Expander for DefaultExpander {
    fn literal(&self, word: &Word, vars: &mut dyn VariableStore) -> String {
        let mut out = String::new();
        for part in &word.parts {
            match part {
                WordPart::Literal(s) => out.push_str(&unescape(s)),
                _ => out.push_str(&self.expand_part(part, vars)),
            }
        }
        out
    }

    fn pattern(&self, word: &Word, vars: &mut dyn VariableStore) -> String {
        let mut out = String::new();
        for part in &word.parts {
            match part {
                WordPart::Literal(s) => out.push_str(&escape_backslashed(s)),
                WordPart::Quoted(s) => out.push_str(&Pattern::escape(s)),
                _ => out.push_str(&self.expand_part(part, vars)),
            }
        }
        out
    }

    fn document(&self, word: &Word, vars: &mut dyn VariableStore) -> String {
        let ifs = Self::ifs(vars);
        let mut fields: Vec<String> = Vec::new();
        let mut current = String::new();

        for part in &word.parts {
            match part {
                WordPart::Literal(s) => current.push_str(&unescape(s)),
                WordPart::Quoted(s) => current.push_str(s),
                _ => {
                    for c in self.expand_part(part, vars).chars() {
                        if ifs.contains(c) {
                            if !current.is_empty() {
                                fields.push(std::mem::take(&mut current));
                            }
                        } else {
                            current.push(c);
                        }
                    }
                }
            }
        }
        if !current.is_empty() {
            fields.push(current);
        }
        fields.join(" ")
    }
}

/// Quote removal for unquoted text: `\x` becomes `x`.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Unquoted pattern text: metacharacters stay active, but a backslash-escaped
/// character is made literal for the glob matcher.
fn escape_backslashed(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            let next = chars.next().unwrap_or('\\');
            out.push_str(&Pattern::escape(&next.to_string()));
        } else {
            out.push(c);
        }
    }
    out
}
