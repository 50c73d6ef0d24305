//! Terms and the symbol token language.
//!
//! Arguments are atomic: a symbol is either a constant or a variable,
//! never a nested term. A raw token beginning with `$` denotes a variable;
//! the sigil is stripped on parse and restored by `Display`. Two markers
//! inside a variable name carry extra meaning during backchaining:
//! `$v#c` requests a fresh skolem id keyed by the context tag `c`, and
//! `$a+b` is a concatenation variable whose bound value is decomposed
//! into `$a` and `$b` sub-bindings joined by `+`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A variable. The name excludes the leading `$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
}

/// A constant symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Constant {
    pub name: String,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Variable { name: name.into() }
    }

    /// Split a skolem-tagged name `v#c` into `(base, context)`.
    ///
    /// Only names with exactly one `#` are skolem forms.
    pub fn skolem_parts(&self) -> Option<(&str, &str)> {
        let (base, context) = self.name.split_once('#')?;
        if context.contains('#') {
            return None;
        }
        Some((base, context))
    }

    /// Split a concatenation name `a+b` into `(left, right)`.
    ///
    /// Only names with exactly one `+` are concatenation forms.
    pub fn concat_parts(&self) -> Option<(&str, &str)> {
        let (left, right) = self.name.split_once('+')?;
        if right.contains('+') {
            return None;
        }
        Some((left, right))
    }
}

impl Constant {
    pub fn new(name: impl Into<String>) -> Self {
        Constant { name: name.into() }
    }
}

/// An argument position: a constant or a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Variable(Variable),
    Constant(Constant),
}

impl Symbol {
    /// Parse a raw token: `$`-prefixed tokens are variables, everything
    /// else is a constant.
    pub fn parse(token: &str) -> Symbol {
        match token.strip_prefix('$') {
            Some(name) => Symbol::Variable(Variable::new(name)),
            None => Symbol::Constant(Constant::new(token)),
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Symbol::Variable(_))
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Symbol::Variable(v) => Some(v),
            Symbol::Constant(_) => None,
        }
    }
}

/// A term: a name applied to atomic arguments.
///
/// Terms are compared structurally, but their canonical string (the
/// `Display` rendering) is the identity used for atom deduplication and as
/// the literal name at the SAT boundary: `name` at arity 0, otherwise
/// `name(a0,a1,...)` with comma separator and no spaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub args: Vec<Symbol>,
}

impl Term {
    /// Build a term from a name and raw argument tokens.
    pub fn new(name: impl Into<String>, args: &[&str]) -> Self {
        Term {
            name: name.into(),
            args: args.iter().map(|token| Symbol::parse(token)).collect(),
        }
    }

    /// A term is ground when no argument is a variable.
    pub fn is_ground(&self) -> bool {
        self.args.iter().all(|arg| !arg.is_variable())
    }

    /// Iterate the variable arguments in position order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.args.iter().filter_map(Symbol::as_variable)
    }
}

// Display implementations; the Term rendering is load-bearing.

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.name)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Variable(v) => write!(f, "{}", v),
            Symbol::Constant(c) => write!(f, "{}", c),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "(")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
