//! Error types for the abduction engine.

use thiserror::Error;

/// Errors surfaced by backchaining and closure.
///
/// Both variants indicate a malformed rule base and are raised before any
/// model is produced; ordinary control flow (unification mismatch, duplicate
/// atom insertion, an unsatisfiable theory) is not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbductionError {
    /// A rule instance produced an antecedent that still contains
    /// variables: some antecedent variable occurs in no consequent.
    #[error("atom isn't ground: {atom} ({rule})")]
    NonGroundAtom { rule: String, atom: String },

    /// A component variable of a concatenation (`$a` or `$b` of `$a+b`)
    /// was already bound when the splitter ran.
    #[error("variable in a concatenation must be free: {variable}")]
    ConcatComponentBound { variable: String },
}

pub type Result<T> = std::result::Result<T, AbductionError>;
