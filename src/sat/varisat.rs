//! Default oracle backed by the varisat CDCL solver.

use super::SatOracle;
use varisat::{ExtendFormula, Lit, Solver};

/// One-shot varisat backend.
///
/// A fresh solver is built per call and dropped on every exit path; the
/// driver's blocking clauses arrive as ordinary clauses on the next call.
#[derive(Debug, Clone, Copy, Default)]
pub struct VarisatOracle;

impl VarisatOracle {
    pub fn new() -> Self {
        VarisatOracle
    }
}

impl SatOracle for VarisatOracle {
    fn solve(&mut self, clauses: &[Vec<i32>]) -> Option<Vec<bool>> {
        let mut solver = Solver::new();
        let mut num_vars = 0usize;
        for clause in clauses {
            let literals: Vec<Lit> = clause
                .iter()
                .map(|&lit| {
                    num_vars = num_vars.max(lit.unsigned_abs() as usize);
                    Lit::from_dimacs(lit as isize)
                })
                .collect();
            solver.add_clause(&literals);
        }
        if !solver.solve().unwrap_or(false) {
            return None;
        }
        let model = solver.model()?;
        let mut assignment = vec![false; num_vars];
        for lit in model {
            let index = lit.var().index();
            if lit.is_positive() && index < assignment.len() {
                assignment[index] = true;
            }
        }
        Some(assignment)
    }
}
