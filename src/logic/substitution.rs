//! Variable bindings with trail-based rollback, and term substitution.
//!
//! Matching threads one mutable binding map through a depth-first search.
//! Instead of cloning the map per frame, additions are recorded on an undo
//! trail: `mark` snapshots the trail position and `undo_to` removes every
//! binding added since, which scopes tentative bindings to a search frame.

use super::term::{Constant, Symbol, Term, Variable};
use indexmap::IndexMap;

/// A substitution mapping variables to constant tokens.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    map: IndexMap<Variable, Constant>,
    trail: Vec<Variable>,
}

impl Bindings {
    /// Create an empty substitution.
    pub fn new() -> Self {
        Bindings::default()
    }

    /// Get the value bound to `var`, if any.
    pub fn get(&self, var: &Variable) -> Option<&Constant> {
        self.map.get(var)
    }

    /// Check whether `var` is bound.
    pub fn contains(&self, var: &Variable) -> bool {
        self.map.contains_key(var)
    }

    /// Bind `var` to `value`, recording the addition on the trail.
    pub fn bind(&mut self, var: Variable, value: Constant) {
        self.trail.push(var.clone());
        self.map.insert(var, value);
    }

    /// Current trail position, for later rollback with [`Bindings::undo_to`].
    pub fn mark(&self) -> usize {
        self.trail.len()
    }

    /// Remove every binding added since `mark`.
    pub fn undo_to(&mut self, mark: usize) {
        for var in self.trail.drain(mark..) {
            self.map.shift_remove(&var);
        }
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Constant)> + '_ {
        self.map.iter()
    }
}

impl Term {
    /// Apply `bindings` to every variable argument.
    ///
    /// Returns the substituted term and whether it is ground: `true` iff no
    /// unbound variable remains.
    pub fn substitute(&self, bindings: &Bindings) -> (Term, bool) {
        let mut ground = true;
        let args = self
            .args
            .iter()
            .map(|arg| match arg {
                Symbol::Variable(var) => match bindings.get(var) {
                    Some(value) => Symbol::Constant(value.clone()),
                    None => {
                        ground = false;
                        arg.clone()
                    }
                },
                Symbol::Constant(_) => arg.clone(),
            })
            .collect();
        (
            Term {
                name: self.name.clone(),
                args,
            },
            ground,
        )
    }

    /// Like [`Term::substitute`], but skolem-tagged variables (`$v#c`) are
    /// left in place even when bound and do not count against groundness.
    ///
    /// Rule instantiation binds plain variables by unification and skolem
    /// variables per match; this variant preserves the skolem positions for
    /// a later resolution pass.
    pub fn substitute_keep_skolems(&self, bindings: &Bindings) -> (Term, bool) {
        let mut ground = true;
        let args = self
            .args
            .iter()
            .map(|arg| match arg {
                Symbol::Variable(var) if var.skolem_parts().is_none() => {
                    match bindings.get(var) {
                        Some(value) => Symbol::Constant(value.clone()),
                        None => {
                            ground = false;
                            arg.clone()
                        }
                    }
                }
                _ => arg.clone(),
            })
            .collect();
        (
            Term {
                name: self.name.clone(),
                args,
            },
            ground,
        )
    }
}
