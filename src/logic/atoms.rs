//! The deduplicated, level-tagged atom store.

use super::term::Term;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Insertion-ordered set of ground atoms, deduplicated by canonical
/// string and tagged with the closure level that introduced each.
///
/// Observations and assumptions enter at level 0; closure inserts derived
/// antecedents at the next level. The first insertion fixes an atom's
/// level, so the recorded level is the minimum depth at which the atom
/// appeared.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtomSet {
    atoms: IndexMap<String, (Term, usize)>,
}

impl AtomSet {
    pub fn new() -> Self {
        AtomSet::default()
    }

    /// Insert `term` at `level`. A term whose canonical string is already
    /// present is silently ignored; returns whether the term was new.
    pub fn add(&mut self, term: Term, level: usize) -> bool {
        let key = term.to_string();
        if self.atoms.contains_key(&key) {
            return false;
        }
        self.atoms.insert(key, (term, level));
        true
    }

    /// Check membership by canonical string.
    pub fn contains(&self, canonical: &str) -> bool {
        self.atoms.contains_key(canonical)
    }

    /// The level at which the atom with this canonical string entered.
    pub fn level_of(&self, canonical: &str) -> Option<usize> {
        self.atoms.get(canonical).map(|(_, level)| *level)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Iterate `(term, level)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Term, usize)> + '_ {
        self.atoms.values().map(|(term, level)| (term, *level))
    }
}

impl fmt::Display for AtomSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (term, _) in self.iter() {
            writeln!(f, "{}", term)?;
        }
        Ok(())
    }
}
