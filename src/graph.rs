//! The proof graph: observation and assumption intake, closure to a
//! fixed point, and the rule instances recorded along the way.

use crate::error::{AbductionError, Result};
use crate::logic::{AtomSet, Bindings, Constant, Symbol, Term};
use crate::rules::{Rule, RuleConsequent};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A grounded rule instance recorded during closure.
///
/// The id (`r<k>`) doubles as the propositional switch for the instance
/// in the CNF encoding. Antecedents are always ground; consequents may
/// remain partially open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSignature {
    pub id: String,
    pub antecedents: Vec<Term>,
    pub consequents: Vec<RuleConsequent>,
}

impl RuleSignature {
    fn new(id: u64, antecedents: Vec<Term>, consequents: Vec<RuleConsequent>) -> Self {
        RuleSignature {
            id: format!("r{}", id),
            antecedents,
            consequents,
        }
    }
}

impl fmt::Display for RuleSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.id)?;
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

/// Configuration for closure.
#[derive(Debug, Clone, Default)]
pub struct ClosureConfig {
    /// Maximum number of closure passes (0 means no limit). Rule sets
    /// with unbounded saturation need a limit to terminate.
    pub max_level: usize,
}

/// How closure ended, with the number of passes run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClosureResult {
    /// A full pass introduced no new rule instance.
    Saturated { levels: usize },
    /// The configured level bound was reached while still augmenting.
    LevelLimit { levels: usize },
}

/// The saturated structure handed to the encoder: atoms plus recorded
/// rule instances, with the observations and assumptions that seeded it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProofGraph {
    pub atoms: AtomSet,
    pub observations: Vec<Term>,
    pub assumptions: Vec<Term>,
    pub rule_sigs: Vec<RuleSignature>,
    /// Skolem id counter; never resets within a graph.
    var_uid: u64,
    /// Signature id counter, monotonic across `close` calls.
    next_sig_id: u64,
}

impl ProofGraph {
    pub fn new() -> Self {
        ProofGraph::default()
    }

    /// Record an observation: an atom every model must hold.
    pub fn add_observation(&mut self, term: Term) {
        self.atoms.add(term.clone(), 0);
        self.observations.push(term);
    }

    /// Record an assumption: an atom unconditionally true in every model.
    pub fn add_assumption(&mut self, term: Term) {
        self.atoms.add(term.clone(), 0);
        self.assumptions.push(term);
    }

    pub fn is_observation(&self, term: &Term) -> bool {
        let key = term.to_string();
        self.observations.iter().any(|o| o.to_string() == key)
    }

    pub fn is_assumption(&self, term: &Term) -> bool {
        let key = term.to_string();
        self.assumptions.iter().any(|a| a.to_string() == key)
    }

    /// Saturate the atom set under backward chaining of `rules`.
    pub fn close(&mut self, rules: &[Rule]) -> Result<ClosureResult> {
        self.close_with(rules, &ClosureConfig::default())
    }

    /// Saturate with an explicit configuration.
    ///
    /// Each pass backchains every rule against the current atom set. A
    /// fired match resolves its skolem variables, grounds the rule's
    /// antecedents into the set at the next level, and records a
    /// signature. The loop ends when a pass fires nothing, or at the
    /// configured level bound.
    pub fn close_with(&mut self, rules: &[Rule], config: &ClosureConfig) -> Result<ClosureResult> {
        let mut level = 0;
        loop {
            debug!("closing atom set at level {}", level);
            let mut augmented = false;
            for rule in rules {
                let mut bindings = Bindings::new();
                let mut grounded: Vec<Term> = Vec::new();
                {
                    let ProofGraph {
                        atoms,
                        rule_sigs,
                        var_uid,
                        next_sig_id,
                        ..
                    } = self;
                    rule.backchain(&*atoms, &mut bindings, level, &mut |bindings| {
                        let mark = bindings.mark();

                        // Resolve skolem variables: one fresh id per
                        // context tag per match, scoped to the match.
                        let mut ids: HashMap<&str, u64> = HashMap::new();
                        for term in &rule.antecedents {
                            for arg in &term.args {
                                if let Symbol::Variable(var) = arg {
                                    if let Some((base, context)) = var.skolem_parts() {
                                        let id = *ids.entry(context).or_insert_with(|| {
                                            *var_uid += 1;
                                            *var_uid
                                        });
                                        bindings.bind(
                                            var.clone(),
                                            Constant::new(format!("{}{}", base, id)),
                                        );
                                    }
                                }
                            }
                        }

                        let mut antecedents = Vec::with_capacity(rule.antecedents.len());
                        for term in &rule.antecedents {
                            let (instance, ground) = term.substitute(bindings);
                            if !ground {
                                return Err(AbductionError::NonGroundAtom {
                                    rule: rule.to_string(),
                                    atom: term.to_string(),
                                });
                            }
                            grounded.push(instance.clone());
                            antecedents.push(instance);
                        }
                        let consequents = rule
                            .consequents
                            .iter()
                            .map(|consequent| {
                                let (instance, _) = consequent.term.substitute(bindings);
                                RuleConsequent {
                                    term: instance,
                                    exclusive: consequent.exclusive,
                                }
                            })
                            .collect();

                        *next_sig_id += 1;
                        rule_sigs.push(RuleSignature::new(*next_sig_id, antecedents, consequents));
                        augmented = true;
                        bindings.undo_to(mark);
                        Ok(())
                    })?;
                }
                // Atoms are queued during the rule's backchain run and
                // inserted afterwards; they carry the next level, so no
                // match they enable could fire before the next pass.
                for term in grounded {
                    self.atoms.add(term, level + 1);
                }
            }
            level += 1;
            if !augmented {
                return Ok(ClosureResult::Saturated { levels: level });
            }
            if config.max_level != 0 && level >= config.max_level {
                return Ok(ClosureResult::LevelLimit { levels: level });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleConsequent;

    fn rule(antecedents: &[Term], consequents: &[Term]) -> Rule {
        Rule::new(
            antecedents.to_vec(),
            consequents
                .iter()
                .cloned()
                .map(RuleConsequent::plain)
                .collect(),
        )
    }

    #[test]
    fn test_close_without_rules() {
        let mut graph = ProofGraph::new();
        graph.add_observation(Term::new("p", &["x"]));

        let result = graph.close(&[]).unwrap();
        assert_eq!(result, ClosureResult::Saturated { levels: 1 });
        assert_eq!(graph.atoms.len(), 1);
        assert!(graph.rule_sigs.is_empty());
    }

    #[test]
    fn test_one_step_closure() {
        let mut graph = ProofGraph::new();
        graph.add_observation(Term::new("p", &["a"]));

        let rules = [rule(&[Term::new("q", &["$x"])], &[Term::new("p", &["$x"])])];
        graph.close(&rules).unwrap();

        assert!(graph.atoms.contains("p(a)"));
        assert!(graph.atoms.contains("q(a)"));
        assert_eq!(graph.atoms.level_of("q(a)"), Some(1));
        assert_eq!(graph.rule_sigs.len(), 1);

        let sig = &graph.rule_sigs[0];
        assert_eq!(sig.id, "r1");
        assert_eq!(sig.to_string(), "r1: q(a) -> p(a)");
        assert!(sig.antecedents.iter().all(Term::is_ground));
    }

    #[test]
    fn test_chained_closure_levels() {
        let mut graph = ProofGraph::new();
        graph.add_observation(Term::new("p", &["a"]));

        let rules = [
            rule(&[Term::new("q", &["$x"])], &[Term::new("p", &["$x"])]),
            rule(&[Term::new("r", &["$x"])], &[Term::new("q", &["$x"])]),
        ];
        let result = graph.close(&rules).unwrap();

        assert_eq!(result, ClosureResult::Saturated { levels: 3 });
        assert_eq!(graph.atoms.level_of("q(a)"), Some(1));
        assert_eq!(graph.atoms.level_of("r(a)"), Some(2));
        assert_eq!(graph.rule_sigs.len(), 2);
        // Each match fires exactly once across passes.
        assert_eq!(graph.rule_sigs[0].to_string(), "r1: q(a) -> p(a)");
        assert_eq!(graph.rule_sigs[1].to_string(), "r2: r(a) -> q(a)");
    }

    #[test]
    fn test_skolem_ids_shared_within_match() {
        let mut graph = ProofGraph::new();
        graph.add_observation(Term::new("obj", &["a"]));

        let rules = [rule(
            &[Term::new("has", &["$x", "$y#c"]), Term::new("kind", &["$y#c"])],
            &[Term::new("obj", &["$x"])],
        )];
        graph.close(&rules).unwrap();

        // Both antecedents see the same fresh id for context c.
        assert!(graph.atoms.contains("has(a,y1)"));
        assert!(graph.atoms.contains("kind(y1)"));
        assert_eq!(graph.rule_sigs.len(), 1);
        assert!(graph.rule_sigs[0].antecedents.iter().all(Term::is_ground));
    }

    #[test]
    fn test_skolem_ids_fresh_across_matches() {
        let mut graph = ProofGraph::new();
        graph.add_observation(Term::new("obj", &["a"]));
        graph.add_observation(Term::new("obj", &["b"]));

        let rules = [rule(
            &[Term::new("has", &["$x", "$y#c"])],
            &[Term::new("obj", &["$x"])],
        )];
        graph.close(&rules).unwrap();

        assert!(graph.atoms.contains("has(a,y1)"));
        assert!(graph.atoms.contains("has(b,y2)"));
    }

    #[test]
    fn test_distinct_contexts_get_distinct_ids() {
        let mut graph = ProofGraph::new();
        graph.add_observation(Term::new("obj", &["a"]));

        let rules = [rule(
            &[Term::new("has", &["$x", "$y#c", "$z#d"])],
            &[Term::new("obj", &["$x"])],
        )];
        graph.close(&rules).unwrap();

        // One id per context tag within the match.
        let ante = graph.rule_sigs[0].antecedents[0].to_string();
        assert!(ante == "has(a,y1,z2)" || ante == "has(a,y2,z1)", "{}", ante);
    }

    #[test]
    fn test_non_ground_antecedent_is_fatal() {
        let mut graph = ProofGraph::new();
        graph.add_observation(Term::new("p", &["a"]));

        // $y occurs in no consequent and carries no skolem tag.
        let rules = [rule(&[Term::new("q", &["$y"])], &[Term::new("p", &["$x"])])];
        let err = graph.close(&rules).unwrap_err();
        assert!(matches!(err, AbductionError::NonGroundAtom { .. }));
    }

    #[test]
    fn test_level_limit() {
        // p(s(…)) grows forever without a bound: f($x) -> p($x) with a
        // skolem antecedent keeps inventing new atoms.
        let mut graph = ProofGraph::new();
        graph.add_observation(Term::new("p", &["a"]));

        let rules = [rule(
            &[Term::new("p", &["$y#c"])],
            &[Term::new("p", &["$x"])],
        )];
        let config = ClosureConfig { max_level: 4 };
        let result = graph.close_with(&rules, &config).unwrap();
        assert_eq!(result, ClosureResult::LevelLimit { levels: 4 });
        assert!(graph.rule_sigs.len() >= 4);
    }

    #[test]
    fn test_monotonic_growth_across_closure() {
        let mut graph = ProofGraph::new();
        graph.add_observation(Term::new("p", &["a"]));
        let atoms_before = graph.atoms.len();

        let rules = [rule(&[Term::new("q", &["$x"])], &[Term::new("p", &["$x"])])];
        graph.close(&rules).unwrap();

        assert!(graph.atoms.len() >= atoms_before);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut graph = ProofGraph::new();
        graph.add_observation(Term::new("p", &["a"]));
        let rules = [rule(&[Term::new("q", &["$x"])], &[Term::new("p", &["$x"])])];
        graph.close(&rules).unwrap();

        let json = serde_json::to_string(&graph).unwrap();
        let parsed: ProofGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.rule_sigs, graph.rule_sigs);
        assert_eq!(parsed.atoms.len(), graph.atoms.len());
    }
}
