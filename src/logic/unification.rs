//! Unification of rule patterns against ground atoms.

use super::substitution::Bindings;
use super::term::{Symbol, Term};

/// Unify `pattern` against `atom` under `bindings`.
///
/// Succeeds iff the names and arities match and every argument pair is
/// compatible: a bound pattern variable must agree with the atom's
/// constant, an unbound one is bound to it, and constants must be equal.
/// Atoms in the set are ground by invariant, so a variable in the atom
/// position never unifies.
///
/// On success the bindings added here persist for the caller's
/// continuation; on failure every addition is rolled back before
/// returning.
pub fn unify(pattern: &Term, atom: &Term, bindings: &mut Bindings) -> bool {
    if pattern.name != atom.name || pattern.args.len() != atom.args.len() {
        return false;
    }
    let mark = bindings.mark();
    for (pat, arg) in pattern.args.iter().zip(atom.args.iter()) {
        let compatible = match (pat, arg) {
            (Symbol::Variable(var), Symbol::Constant(value)) => match bindings.get(var) {
                Some(bound) => bound == value,
                None => {
                    bindings.bind(var.clone(), value.clone());
                    true
                }
            },
            (Symbol::Constant(c1), Symbol::Constant(c2)) => c1 == c2,
            (_, Symbol::Variable(_)) => false,
        };
        if !compatible {
            bindings.undo_to(mark);
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::term::{Constant, Variable};

    #[test]
    fn test_unify_constants() {
        let mut bindings = Bindings::new();
        assert!(unify(
            &Term::new("p", &["a", "b"]),
            &Term::new("p", &["a", "b"]),
            &mut bindings
        ));
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_unify_binds_variables() {
        let mut bindings = Bindings::new();
        assert!(unify(
            &Term::new("p", &["$x", "b"]),
            &Term::new("p", &["a", "b"]),
            &mut bindings
        ));
        assert_eq!(bindings.get(&Variable::new("x")), Some(&Constant::new("a")));
    }

    #[test]
    fn test_unify_respects_existing_bindings() {
        let mut bindings = Bindings::new();
        bindings.bind(Variable::new("x"), Constant::new("a"));

        assert!(unify(
            &Term::new("p", &["$x"]),
            &Term::new("p", &["a"]),
            &mut bindings
        ));
        assert!(!unify(
            &Term::new("p", &["$x"]),
            &Term::new("p", &["b"]),
            &mut bindings
        ));
    }

    #[test]
    fn test_name_and_arity_mismatch() {
        let mut bindings = Bindings::new();
        assert!(!unify(
            &Term::new("p", &["a"]),
            &Term::new("q", &["a"]),
            &mut bindings
        ));
        assert!(!unify(
            &Term::new("p", &["a"]),
            &Term::new("p", &["a", "b"]),
            &mut bindings
        ));
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_failure_rolls_back_partial_bindings() {
        let mut bindings = Bindings::new();
        bindings.bind(Variable::new("z"), Constant::new("c"));

        // $x binds to a, then the constant clash on the second argument
        // must undo it.
        assert!(!unify(
            &Term::new("p", &["$x", "d"]),
            &Term::new("p", &["a", "b"]),
            &mut bindings
        ));
        assert_eq!(bindings.len(), 1);
        assert!(!bindings.contains(&Variable::new("x")));
        assert!(bindings.contains(&Variable::new("z")));
    }

    #[test]
    fn test_shared_variable_across_positions() {
        let mut bindings = Bindings::new();
        assert!(unify(
            &Term::new("p", &["$x", "$x"]),
            &Term::new("p", &["a", "a"]),
            &mut bindings
        ));

        let mut bindings = Bindings::new();
        assert!(!unify(
            &Term::new("p", &["$x", "$x"]),
            &Term::new("p", &["a", "b"]),
            &mut bindings
        ));
        assert!(bindings.is_empty());
    }
}
