//! Shell variables as seen by the evaluator
//!
//! The evaluator reads variables for `-v`/`-R` and for word expansion, and
//! writes exactly one: `BASH_REMATCH`, after a successful `=~`.

use std::collections::{BTreeMap, HashMap};

/// Name of the array `=~` exports its match and capture groups into.
pub const BASH_REMATCH: &str = "BASH_REMATCH";

/// Maximum name-reference chain followed before giving up.
const MAX_NAMEREF_DEPTH: usize = 16;

/// Kind of a shell variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Scalar,
    Indexed,
    Associative,
    NameRef,
}

/// Value of a shell variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarValue {
    Scalar(String),
    Indexed(Vec<String>),
    Associative(BTreeMap<String, String>),
    /// Name of the variable this one refers to
    NameRef(String),
}

/// A shell variable.
///
/// `set` is tracked separately from the value: `declare x` creates a variable
/// that exists but is not set, which `-v` must report as false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub set: bool,
    pub value: VarValue,
}

impl Default for Variable {
    fn default() -> Self {
        Self::unset()
    }
}

impl Variable {
    /// A variable that does not exist.
    pub fn unset() -> Self {
        Self {
            set: false,
            value: VarValue::Scalar(String::new()),
        }
    }

    pub fn scalar(value: impl Into<String>) -> Self {
        Self {
            set: true,
            value: VarValue::Scalar(value.into()),
        }
    }

    pub fn indexed(values: Vec<String>) -> Self {
        Self {
            set: true,
            value: VarValue::Indexed(values),
        }
    }

    pub fn associative(values: BTreeMap<String, String>) -> Self {
        Self {
            set: true,
            value: VarValue::Associative(values),
        }
    }

    pub fn nameref(target: impl Into<String>) -> Self {
        Self {
            set: true,
            value: VarValue::NameRef(target.into()),
        }
    }

    pub fn is_set(&self) -> bool {
        self.set
    }

    pub fn kind(&self) -> VarKind {
        match self.value {
            VarValue::Scalar(_) => VarKind::Scalar,
            VarValue::Indexed(_) => VarKind::Indexed,
            VarValue::Associative(_) => VarKind::Associative,
            VarValue::NameRef(_) => VarKind::NameRef,
        }
    }

    /// The string `$name` expands to: element 0 for indexed arrays, key `"0"`
    /// for associative arrays. Name references must be resolved first.
    pub fn as_str(&self) -> &str {
        if !self.set {
            return "";
        }
        match &self.value {
            VarValue::Scalar(s) => s,
            VarValue::Indexed(list) => list.first().map(String::as_str).unwrap_or(""),
            VarValue::Associative(map) => map.get("0").map(String::as_str).unwrap_or(""),
            VarValue::NameRef(_) => "",
        }
    }
}

/// Variable store collaborator.
///
/// Implementations own the real representation; the evaluator only needs
/// lookups and a way to publish regex captures.
pub trait VariableStore: Send {
    /// Look up a variable by name. Missing variables are [`Variable::unset`].
    ///
    /// Name references are returned as-is, not resolved, so `-R` can see them.
    fn lookup_var(&self, name: &str) -> Variable;

    /// Create or replace a variable.
    fn set_var(&mut self, name: &str, var: Variable);

    /// Capture sink for `=~`: the whole match followed by each group.
    ///
    /// The default publishes them as the indexed array `BASH_REMATCH`.
    fn export_rematch(&mut self, groups: Vec<String>) {
        self.set_var(BASH_REMATCH, Variable::indexed(groups));
    }

    /// Follow name references until a non-reference variable is reached.
    fn resolve_var(&self, name: &str) -> Variable {
        let mut var = self.lookup_var(name);
        for _ in 0..MAX_NAMEREF_DEPTH {
            match &var.value {
                VarValue::NameRef(target) if var.set => {
                    var = self.lookup_var(target);
                }
                _ => return var,
            }
        }
        Variable::unset()
    }

    /// Name of the variable a (possibly reference) name finally resolves to.
    fn resolve_name(&self, name: &str) -> String {
        let mut current = name.to_string();
        for _ in 0..MAX_NAMEREF_DEPTH {
            match self.lookup_var(&current).value {
                VarValue::NameRef(target) => current = target,
                _ => return current,
            }
        }
        current
    }
}

/// In-memory variable store.
#[derive(Debug, Clone, Default)]
pub struct ShellVars {
    vars: HashMap<String, Variable>,
}

impl ShellVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a scalar variable.
    pub fn set_scalar(&mut self, name: &str, value: impl Into<String>) {
        self.vars.insert(name.to_string(), Variable::scalar(value));
    }

    /// Set an indexed array.
    pub fn set_indexed(&mut self, name: &str, values: Vec<String>) {
        self.vars.insert(name.to_string(), Variable::indexed(values));
    }

    /// `declare -n name=target`
    pub fn declare_nameref(&mut self, name: &str, target: &str) {
        self.vars.insert(name.to_string(), Variable::nameref(target));
    }

    /// `declare name` without a value: exists but is not set.
    pub fn declare(&mut self, name: &str) {
        self.vars.insert(name.to_string(), Variable::unset());
    }

    /// Remove a variable.
    pub fn unset(&mut self, name: &str) -> Option<Variable> {
        self.vars.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.vars.get(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl VariableStore for ShellVars {
    fn lookup_var(&self, name: &str) -> Variable {
        self.vars.get(name).cloned().unwrap_or_default()
    }

    fn set_var(&mut self, name: &str, var: Variable) {
        self.vars.insert(name.to_string(), var);
    }
}
