//! Abductive inference over Horn-style rule bases, reduced to
//! propositional satisfiability.
//!
//! Observed ground atoms seed a proof graph; backward chaining of rules
//! saturates it into a finite set of atoms and grounded rule instances;
//! the graph is encoded as a CNF theory whose models are enumerated by a
//! SAT oracle, each model projecting back to one explanation of the
//! observations.

pub mod encoding;
pub mod error;
pub mod graph;
pub mod logic;
pub mod rules;
pub mod sat;

// Re-export the term language
pub use logic::{unify, AtomSet, Bindings, Constant, Symbol, Term, Variable};

// Re-export rule and proof-graph types
pub use graph::{ClosureConfig, ClosureResult, ProofGraph, RuleSignature};
pub use rules::{Rule, RuleConsequent};

// Re-export the encoding and the enumeration driver
pub use encoding::{Literal, Theory};
pub use sat::{LiteralMap, SatOracle, SolveConfig, SolveStats, VarisatOracle};

pub use error::{AbductionError, Result};
