//! The term language: symbols, terms, bindings, unification, and the
//! atom store.

pub mod atoms;
pub mod substitution;
pub mod term;
pub mod unification;


// Re-export commonly used types
pub use atoms::AtomSet;
pub use substitution::Bindings;
pub use term::{Constant, Symbol, Term, Variable};
pub use unification::unify;
