//! Rules and backward chaining.
//!
//! A rule reads right to left: when every consequent is entailed by the
//! atom set, the antecedents may be hypothesized. Backchaining enumerates
//! the binding extensions under which all consequents unify with known
//! atoms and reports each completed match to a visitor.

use crate::error::{AbductionError, Result};
use crate::logic::{unify, AtomSet, Bindings, Constant, Term, Variable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A consequent atom of a rule, optionally marked exclusive.
///
/// Among all rule instances producing a given atom, at most one whose
/// consequent is exclusive may fire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConsequent {
    pub term: Term,
    pub exclusive: bool,
}

impl RuleConsequent {
    /// A non-exclusive consequent.
    pub fn plain(term: Term) -> Self {
        RuleConsequent {
            term,
            exclusive: false,
        }
    }

    /// An exclusive consequent.
    pub fn exclusive(term: Term) -> Self {
        RuleConsequent {
            term,
            exclusive: true,
        }
    }
}

/// A backward-chaining rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub antecedents: Vec<Term>,
    pub consequents: Vec<RuleConsequent>,
}

impl Rule {
    pub fn new(antecedents: Vec<Term>, consequents: Vec<RuleConsequent>) -> Self {
        Rule {
            antecedents,
            consequents,
        }
    }

    /// Enumerate every binding extension under which all consequents
    /// unify with atoms in the set, invoking `visit` once per completed
    /// match (or once per concatenation split, see below).
    ///
    /// A match fires only when the newest atom it touches was introduced
    /// at `level`: older combinations already fired in a previous closure
    /// pass. Bindings added for a match are scoped to it; the map is
    /// restored between candidates and after the call.
    pub fn backchain(
        &self,
        atoms: &AtomSet,
        bindings: &mut Bindings,
        level: usize,
        visit: &mut dyn FnMut(&mut Bindings) -> Result<()>,
    ) -> Result<()> {
        self.chain_from(0, atoms, bindings, level, 0, visit)
    }

    fn chain_from(
        &self,
        index: usize,
        atoms: &AtomSet,
        bindings: &mut Bindings,
        level: usize,
        max_level: usize,
        visit: &mut dyn FnMut(&mut Bindings) -> Result<()>,
    ) -> Result<()> {
        let Some(consequent) = self.consequents.get(index) else {
            if max_level != level {
                return Ok(());
            }
            return self.split_concatenation(bindings, visit);
        };
        for (atom, atom_level) in atoms.iter() {
            let mark = bindings.mark();
            if unify(&consequent.term, atom, bindings) {
                self.chain_from(
                    index + 1,
                    atoms,
                    bindings,
                    level,
                    max_level.max(atom_level),
                    visit,
                )?;
            }
            bindings.undo_to(mark);
        }
        Ok(())
    }

    /// Decompose the first bound concatenation variable, if any.
    ///
    /// The bound value splits on `+`; for every two-part split point the
    /// left and right joins are bound to the component variables and
    /// `visit` fires once. A value with no `+` fires nothing. Without a
    /// concatenation variable, `visit` fires once directly. Only the
    /// first concatenation key (in binding insertion order) is processed;
    /// a single rule must not bind more than one.
    fn split_concatenation(
        &self,
        bindings: &mut Bindings,
        visit: &mut dyn FnMut(&mut Bindings) -> Result<()>,
    ) -> Result<()> {
        let concat = bindings.iter().find_map(|(var, value)| {
            var.concat_parts()
                .map(|(left, right)| (Variable::new(left), Variable::new(right), value.clone()))
        });
        let Some((left, right, value)) = concat else {
            return visit(bindings);
        };
        for var in [&left, &right] {
            if bindings.contains(var) {
                return Err(AbductionError::ConcatComponentBound {
                    variable: var.to_string(),
                });
            }
        }
        let parts: Vec<&str> = value.name.split('+').collect();
        for split in 1..parts.len() {
            let mark = bindings.mark();
            bindings.bind(left.clone(), Constant::new(parts[..split].join("+")));
            bindings.bind(right.clone(), Constant::new(parts[split..].join("+")));
            visit(bindings)?;
            bindings.undo_to(mark);
        }
        Ok(())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for term in &self.antecedents {
            write!(f, "{} ", term)?;
        }
        write!(f, "->")?;
        for consequent in &self.consequents {
            write!(f, " {}", consequent.term)?;
        }
        Ok(())
    }
}
