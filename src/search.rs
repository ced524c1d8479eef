//! Depth-first case splitting over the boolean structure of the assertions.
//!
//! The live assertions are walked left to right with an explicit agenda.
//! Literals and boolean references are appended to a scoped trail of
//! predicates, conjunctions are unfolded in place, and every disjunction or
//! biconditional is a choice point:
//!
//! ```text
//! a ∨ b    →  try a, then b
//! v ↔ f    →  try (v ∧ f), then (¬v ∧ ¬f)
//! ```
//!
//! Each alternative runs inside its own trail scope, so a failed branch leaves
//! nothing behind. Before splitting, the trail collected so far is checked by
//! the Simplex core and the whole subtree is skipped if it is already
//! infeasible. The first leaf whose trail is feasible wins, and its witness
//! is the model.

use log::debug;

use crate::formula::Formula;
use crate::rational::Rational;
use crate::simplex::{Feasibility, Tableau};
use crate::solver::Stats;
use crate::stack::ScopedStack;
use crate::term::Predicate;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SearchResult {
    /// Witness for every solver variable, by index.
    Sat(Vec<Rational>),
    Unsat,
    /// No witness found, and some branch was abandoned at the pivot limit.
    Unknown,
}

pub struct Search<'s> {
    num_vars: usize,
    pivot_limit: Option<usize>,
    trail: ScopedStack<Predicate>,
    stats: &'s mut Stats,
    incomplete: bool,
}

impl<'s> Search<'s> {
    pub fn new(num_vars: usize, pivot_limit: Option<usize>, stats: &'s mut Stats) -> Self {
        Self {
            num_vars,
            pivot_limit,
            trail: ScopedStack::new(),
            stats,
            incomplete: false,
        }
    }

    /// Decides the conjunction of `assertions`.
    pub fn run(mut self, assertions: &[Formula]) -> SearchResult {
        // The agenda is a stack: the next formula to resolve is on top.
        let agenda: Vec<&Formula> = assertions.iter().rev().collect();
        match self.solve(agenda, 0) {
            Some(model) => SearchResult::Sat(model),
            None if self.incomplete => SearchResult::Unknown,
            None => SearchResult::Unsat,
        }
    }

    fn solve<'f>(&mut self, mut agenda: Vec<&'f Formula>, depth: usize) -> Option<Vec<Rational>> {
        while let Some(formula) = agenda.pop() {
            match formula {
                Formula::Literal(p) => self.trail.add(p.clone()),
                Formula::Boolean(var) => self.trail.add(Predicate::truth(*var, true)),
                Formula::And(a, b) => {
                    agenda.push(b);
                    agenda.push(a);
                }
                Formula::Or(a, b) => return self.branch(&agenda, [&**a, &**b], depth),
                Formula::Iff(var, f) => {
                    let positive = Formula::and(Formula::boolean(*var), f.as_ref().clone());
                    let negative = Formula::and(Formula::not(&Formula::boolean(*var)), Formula::not(f));
                    return self.branch(&agenda, [&positive, &negative], depth);
                }
            }
        }
        self.leaf()
    }

    fn branch<'f>(
        &mut self,
        agenda: &[&'f Formula],
        alternatives: [&'f Formula; 2],
        depth: usize,
    ) -> Option<Vec<Rational>> {
        if !self.is_feasible() {
            debug!("branch: trail of {} predicates already fails, pruning", self.trail.len());
            return None;
        }

        self.stats.max_depth = self.stats.max_depth.max(depth + 1);
        for (i, alternative) in alternatives.into_iter().enumerate() {
            self.stats.branches += 1;
            debug!("branch: depth {}, alternative {}: {}", depth, i, alternative);

            self.trail.push();
            let mut next = agenda.to_vec();
            next.push(alternative);
            let result = self.solve(next, depth + 1);
            let popped = self.trail.pop();
            debug_assert!(popped.is_ok());

            if result.is_some() {
                return result;
            }
        }
        None
    }

    fn tableau(&self) -> Tableau {
        Tableau::new(self.num_vars, self.trail.as_slice()).with_pivot_limit(self.pivot_limit)
    }

    fn record(&mut self, tableau: &Tableau, feasibility: Feasibility) {
        self.stats.simplex_runs += 1;
        self.stats.pivots += tableau.pivots();
        if feasibility == Feasibility::Unknown {
            self.incomplete = true;
        }
    }

    fn is_feasible(&mut self) -> bool {
        let mut tableau = self.tableau();
        let feasibility = tableau.check();
        self.record(&tableau, feasibility);
        feasibility == Feasibility::Feasible
    }

    fn leaf(&mut self) -> Option<Vec<Rational>> {
        let mut tableau = self.tableau();
        let feasibility = tableau.check();
        debug!("leaf: {} predicates, {:?}", self.trail.len(), feasibility);
        let model = match feasibility {
            Feasibility::Feasible => Some(tableau.witness()),
            Feasibility::Infeasible | Feasibility::Unknown => None,
        };
        self.record(&tableau, feasibility);
        model
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::term::Term;
    use crate::types::Var;

    fn q(s: &str) -> Rational {
        s.parse().unwrap()
    }

    fn run(num_vars: usize, assertions: &[Formula]) -> (SearchResult, Stats) {
        let mut stats = Stats::default();
        let result = Search::new(num_vars, None, &mut stats).run(assertions);
        (result, stats)
    }

    #[test]
    fn test_no_assertions() {
        let (result, stats) = run(2, &[]);
        assert_eq!(result, SearchResult::Sat(vec![q("0"), q("0")]));
        assert_eq!(stats.simplex_runs, 1);
        assert_eq!(stats.branches, 0);
    }

    #[test]
    fn test_left_branch_preferred() {
        let x = Var::new(0);
        let f = Formula::or(
            Formula::lit(Term::var(x).le(1).unwrap()),
            Formula::lit(Term::var(x).le(2).unwrap()),
        );
        let (result, stats) = run(1, &[f]);
        assert_eq!(result, SearchResult::Sat(vec![q("1")]));
        assert_eq!(stats.branches, 1);
        assert_eq!(stats.max_depth, 1);
    }

    #[test]
    fn test_falls_back_to_right_branch() {
        let x = Var::new(0);
        let f = Formula::or(
            Formula::lit(Term::var(x).ge(5).unwrap()),
            Formula::lit(Term::var(x).le(2).unwrap()),
        );
        let g = Formula::lit(Term::var(x).le(3).unwrap());
        let (result, stats) = run(1, &[f, g]);
        assert_eq!(result, SearchResult::Sat(vec![q("2")]));
        assert_eq!(stats.branches, 2);
    }

    #[test]
    fn test_all_branches_fail() {
        let x = Var::new(0);
        let f = Formula::or(
            Formula::lit(Term::var(x).ge(5).unwrap()),
            Formula::lit(Term::var(x).le(2).unwrap()),
        );
        let g = Formula::lit(Term::var(x).equals(3).unwrap());
        let (result, _) = run(1, &[g, f]);
        assert_eq!(result, SearchResult::Unsat);
    }

    #[test]
    fn test_prunes_before_splitting() {
        let x = Var::new(0);
        let bad = Formula::and(
            Formula::lit(Term::var(x).le(0).unwrap()),
            Formula::lit(Term::var(x).ge(1).unwrap()),
        );
        let split = Formula::or(
            Formula::lit(Term::var(x).le(1).unwrap()),
            Formula::lit(Term::var(x).le(2).unwrap()),
        );
        let (result, stats) = run(1, &[bad, split]);
        assert_eq!(result, SearchResult::Unsat);
        assert_eq!(stats.branches, 0);
        assert_eq!(stats.simplex_runs, 1);
    }

    #[test]
    fn test_biconditional_false_side() {
        let x = Var::new(0);
        let w = Var::new(1);
        let f = Formula::iff(w, Formula::lit(Term::var(x).lt(0).unwrap()));
        let g = Formula::lit(Term::var(x).ge(3).unwrap());
        let (result, _) = run(2, &[f, g]);
        let SearchResult::Sat(model) = result else {
            panic!("expected a model");
        };
        assert_eq!(model[1], q("0"));
        assert!(model[0] >= q("3"));
    }

    #[test]
    fn test_negated_equality_splits() {
        let x = Var::new(0);
        let w = Var::new(1);
        // w <-> (x = 1), with w forced false and x pinned between 0 and 2.
        let f = Formula::iff(w, Formula::lit(Term::var(x).equals(1).unwrap()));
        let rest = [
            Formula::lit(Term::var(w).equals(0).unwrap()),
            Formula::lit(Term::var(x).ge(0).unwrap()),
            Formula::lit(Term::var(x).le(2).unwrap()),
        ];
        let mut assertions = vec![f.clone()];
        assertions.extend(rest);
        let (result, _) = run(2, &assertions);
        let SearchResult::Sat(model) = result else {
            panic!("expected a model");
        };
        assert!(assertions.iter().all(|a| a.holds(&model)));
        assert_ne!(model[0], q("1"));
    }

    #[test]
    fn test_unknown_at_pivot_limit() {
        let x = Var::new(0);
        let f = Formula::lit(Term::var(x).ge(5).unwrap());
        let mut stats = Stats::default();
        let result = Search::new(1, Some(0), &mut stats).run(&[f]);
        assert_eq!(result, SearchResult::Unknown);
    }
}
