//! The SAT boundary: literal numbering, the oracle abstraction, and
//! model enumeration over blocking clauses.

pub mod varisat;

use crate::encoding::Theory;
use log::debug;
use std::collections::HashMap;

pub use self::varisat::VarisatOracle;

/// A black-box satisfiability oracle.
///
/// Clauses use the DIMACS convention: non-zero integers whose sign is the
/// polarity and whose magnitude is a variable id ≥ 1. `Some(assignment)`
/// maps the zero-based variable index to its truth value; `None` means
/// the clause set is unsatisfiable or the backend rejected a clause — the
/// driver treats both as the end of enumeration.
pub trait SatOracle {
    fn solve(&mut self, clauses: &[Vec<i32>]) -> Option<Vec<bool>>;
}

/// Bijection between literal names and variable ids ≥ 1, assigned in
/// first-seen order.
#[derive(Debug, Clone, Default)]
pub struct LiteralMap {
    names: Vec<String>,
    lookup: HashMap<String, i32>,
}

impl LiteralMap {
    pub fn new() -> Self {
        LiteralMap::default()
    }

    /// Get-or-assign the variable id for `name`.
    pub fn intern(&mut self, name: &str) -> i32 {
        if let Some(&id) = self.lookup.get(name) {
            return id;
        }
        let id = self.names.len() as i32 + 1;
        self.names.push(name.to_string());
        self.lookup.insert(name.to_string(), id);
        id
    }

    /// Resolve a variable id back to its literal name.
    pub fn resolve(&self, var: i32) -> &str {
        &self.names[(var - 1) as usize]
    }

    /// Number of mapped literals.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Configuration for model enumeration.
#[derive(Debug, Clone, Default)]
pub struct SolveConfig {
    /// Maximum number of models to enumerate (None = unlimited).
    pub max_models: Option<usize>,
}

/// Statistics from model enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Number of oracle invocations.
    pub sat_calls: u64,
    /// Number of models found.
    pub models_found: u64,
    /// Number of blocking clauses appended.
    pub blocking_clauses: u64,
}

impl Theory {
    /// Enumerate every model with the default varisat backend.
    ///
    /// `on_model` receives one explanation per distinct model: the sorted
    /// positive atom literals of the assignment, with `@` rule indicators
    /// and `#` explained markers projected away.
    pub fn solve<F>(&self, on_model: F) -> SolveStats
    where
        F: FnMut(&[String]),
    {
        self.solve_with(&mut VarisatOracle::new(), &SolveConfig::default(), on_model)
    }

    /// Enumerate models through `oracle`.
    ///
    /// After each model the full assignment is blocked, so every
    /// subsequent solve call produces a distinct assignment; enumeration
    /// ends when the oracle reports no further model or the configured
    /// bound is reached.
    pub fn solve_with<F>(
        &self,
        oracle: &mut dyn SatOracle,
        config: &SolveConfig,
        mut on_model: F,
    ) -> SolveStats
    where
        F: FnMut(&[String]),
    {
        let mut map = LiteralMap::new();
        let mut clauses: Vec<Vec<i32>> = self
            .clauses
            .iter()
            .map(|clause| {
                clause
                    .iter()
                    .map(|literal| {
                        let var = map.intern(&literal.name);
                        if literal.polarity {
                            var
                        } else {
                            -var
                        }
                    })
                    .collect()
            })
            .collect();
        debug!("{} clauses, {} literals", clauses.len(), map.len());

        let mut stats = SolveStats::default();
        loop {
            if let Some(max) = config.max_models {
                if stats.models_found >= max as u64 {
                    break;
                }
            }
            stats.sat_calls += 1;
            let Some(assignment) = oracle.solve(&clauses) else {
                break;
            };
            let holds =
                |var: i32| assignment.get((var - 1) as usize).copied().unwrap_or(false);

            let mut explanation: Vec<String> = Vec::new();
            for var in 1..=map.len() as i32 {
                if holds(var) {
                    let name = map.resolve(var);
                    if !name.starts_with('@') && !name.starts_with('#') {
                        explanation.push(name.to_string());
                    }
                }
            }
            explanation.sort();
            stats.models_found += 1;
            on_model(&explanation);

            let blocking: Vec<i32> = (1..=map.len() as i32)
                .map(|var| if holds(var) { -var } else { var })
                .collect();
            clauses.push(blocking);
            stats.blocking_clauses += 1;
        }
        stats
    }
}
