//! Propositional encoding of a closed proof graph.
//!
//! Literal names are canonical atom strings plus two marker alphabets:
//! `@r<k>` ("instance r<k> fired") and `#<atom>` ("atom is explained by
//! some fired instance"). Satisfying assignments of the emitted theory
//! correspond to the valid explanations of the observations.

use crate::graph::ProofGraph;
use crate::logic::Term;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A propositional literal over the canonical-string alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub name: String,
    pub polarity: bool,
}

impl Literal {
    /// Create a new positive literal.
    pub fn positive(name: impl Into<String>) -> Self {
        Literal {
            name: name.into(),
            polarity: true,
        }
    }

    /// Create a new negative literal.
    pub fn negative(name: impl Into<String>) -> Self {
        Literal {
            name: name.into(),
            polarity: false,
        }
    }

    /// Get the complement of this literal.
    pub fn complement(&self) -> Literal {
        Literal {
            name: self.name.clone(),
            polarity: !self.polarity,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.polarity {
            write!(f, "-")?;
        }
        write!(f, "{}", self.name)
    }
}

/// A CNF theory: an ordered list of clauses over [`Literal`]s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Theory {
    pub clauses: Vec<Vec<Literal>>,
}

impl Theory {
    /// Require `term` to hold in every model.
    pub fn require(&mut self, term: &Term) {
        self.clauses
            .push(vec![Literal::positive(term.to_string())]);
    }
}

impl fmt::Display for Theory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for clause in &self.clauses {
            for (i, literal) in clause.iter().enumerate() {
                if i > 0 {
                    write!(f, " ∨ ")?;
                }
                write!(f, "{}", literal)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl ProofGraph {
    /// Encode the closed graph as a propositional theory.
    ///
    /// Per observation: a unit clause. Per rule instance `r`: clauses
    /// tying `@r` to its antecedents, its consequents, and the explained
    /// markers of its consequents. Per atom: the explanation clause over
    /// its producers, pairwise exclusivity between exclusive producers,
    /// a support clause requiring hypothesized atoms to be consumed by
    /// some fired instance, a forced explained marker for observations
    /// that have producers, and a unit clause for assumptions.
    pub fn theory(&self) -> Theory {
        let mut clauses: Vec<Vec<Literal>> = Vec::new();

        for observation in &self.observations {
            clauses.push(vec![Literal::positive(observation.to_string())]);
        }

        for sig in &self.rule_sigs {
            let fired = format!("@{}", sig.id);
            for antecedent in &sig.antecedents {
                clauses.push(vec![
                    Literal::negative(fired.clone()),
                    Literal::positive(antecedent.to_string()),
                ]);
            }
            for consequent in &sig.consequents {
                clauses.push(vec![
                    Literal::negative(fired.clone()),
                    Literal::positive(consequent.term.to_string()),
                ]);
            }
            for consequent in &sig.consequents {
                clauses.push(vec![
                    Literal::negative(fired.clone()),
                    Literal::positive(format!("#{}", consequent.term)),
                ]);
            }
        }

        for (atom, _) in self.atoms.iter() {
            let key = atom.to_string();

            let mut producers: Vec<String> = Vec::new();
            let mut exclusive: Vec<String> = Vec::new();
            for sig in &self.rule_sigs {
                for consequent in &sig.consequents {
                    if consequent.term.to_string() == key {
                        let fired = format!("@{}", sig.id);
                        if consequent.exclusive {
                            exclusive.push(fired.clone());
                        }
                        producers.push(fired);
                    }
                }
            }

            let is_observation = self.is_observation(atom);
            let is_assumption = self.is_assumption(atom);

            // Explained only if some producer fired. With no producers
            // the marker occurs nowhere else, so the clause is dropped
            // rather than pinning a vacuous variable.
            if !producers.is_empty() {
                let mut clause = vec![Literal::negative(format!("#{}", key))];
                clause.extend(producers.iter().map(|fired| Literal::positive(fired.clone())));
                clauses.push(clause);
            }

            for (i, first) in exclusive.iter().enumerate() {
                for second in &exclusive[i + 1..] {
                    clauses.push(vec![
                        Literal::negative(first.clone()),
                        Literal::negative(second.clone()),
                    ]);
                }
            }

            // A hypothesized atom must be consumed by some fired
            // instance; observations are given, assumptions are
            // unconditionally true.
            if !is_observation && !is_assumption {
                let mut clause = vec![Literal::negative(key.clone())];
                for sig in &self.rule_sigs {
                    for antecedent in &sig.antecedents {
                        if antecedent.to_string() == key {
                            clause.push(Literal::positive(format!("@{}", sig.id)));
                        }
                    }
                }
                clauses.push(clause);
            }

            // An observation with producers must actually be explained.
            if is_observation && !producers.is_empty() {
                clauses.push(vec![Literal::positive(format!("#{}", key))]);
            }

            if is_assumption {
                clauses.push(vec![Literal::positive(key)]);
            }
        }

        Theory { clauses }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Rule, RuleConsequent};

    fn render(theory: &Theory) -> Vec<String> {
        theory
            .clauses
            .iter()
            .map(|clause| {
                clause
                    .iter()
                    .map(|lit| lit.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    #[test]
    fn test_literal_display_and_complement() {
        let lit = Literal::positive("p(a)");
        assert_eq!(lit.to_string(), "p(a)");
        assert_eq!(lit.complement().to_string(), "-p(a)");
        assert_eq!(lit.complement().complement(), lit);
    }

    #[test]
    fn test_observation_without_rules() {
        let mut graph = ProofGraph::new();
        graph.add_observation(Term::new("p", &["x"]));
        graph.close(&[]).unwrap();

        assert_eq!(render(&graph.theory()), vec!["p(x)"]);
    }

    #[test]
    fn test_assumption_without_rules() {
        let mut graph = ProofGraph::new();
        graph.add_assumption(Term::new("r", &["a"]));
        graph.close(&[]).unwrap();

        assert_eq!(render(&graph.theory()), vec!["r(a)"]);
    }

    #[test]
    fn test_one_step_encoding() {
        let mut graph = ProofGraph::new();
        graph.add_observation(Term::new("p", &["a"]));
        let rules = [Rule::new(
            vec![Term::new("q", &["$x"])],
            vec![RuleConsequent::plain(Term::new("p", &["$x"]))],
        )];
        graph.close(&rules).unwrap();

        assert_eq!(
            render(&graph.theory()),
            vec![
                "p(a)",
                "-@r1 q(a)",
                "-@r1 p(a)",
                "-@r1 #p(a)",
                "-#p(a) @r1",
                "#p(a)",
                "-q(a) @r1",
            ]
        );
    }

    #[test]
    fn test_exclusive_producers_pairwise_blocked() {
        let mut graph = ProofGraph::new();
        graph.add_observation(Term::new("p", &["a"]));
        let rules = [
            Rule::new(
                vec![Term::new("q", &["a"])],
                vec![RuleConsequent::exclusive(Term::new("p", &["a"]))],
            ),
            Rule::new(
                vec![Term::new("s", &["a"])],
                vec![RuleConsequent::exclusive(Term::new("p", &["a"]))],
            ),
        ];
        graph.close(&rules).unwrap();

        let clauses = render(&graph.theory());
        assert!(clauses.contains(&"-@r1 -@r2".to_string()));
        assert!(clauses.contains(&"-#p(a) @r1 @r2".to_string()));
    }

    #[test]
    fn test_require_appends_unit_clause() {
        let mut theory = Theory::default();
        theory.require(&Term::new("p", &["a"]));
        assert_eq!(render(&theory), vec!["p(a)"]);
    }

    #[test]
    fn test_theory_display() {
        let mut graph = ProofGraph::new();
        graph.add_observation(Term::new("p", &["x"]));
        graph.close(&[]).unwrap();
        assert_eq!(graph.theory().to_string(), "p(x)\n");
    }
}
