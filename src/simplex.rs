//! Feasibility of a conjunction of predicates, by Bland's-rule Simplex.
//!
//! # Tableau
//!
//! Every predicate `Σ aᵢ·xᵢ + c REL 0` gets its own slack variable
//! `s = Σ aᵢ·xᵢ`, and the relation becomes a bound on that slack:
//!
//! ```text
//! ≤  →  s ≤ -c          <  →  s ≤ -c - δ
//! ≥  →  s ≥ -c          >  →  s ≥ -c + δ
//! =  →  -c ≤ s ≤ -c
//! ```
//!
//! Original variables are non-negative. Values and bounds are
//! [`DeltaRational`]s, so strict bounds need no special casing.
//!
//! Each row expresses one basic variable as a combination of non-basic ones.
//! Non-basic variables always sit within their bounds; only basic ones may
//! violate them.
//!
//! # Column order
//!
//! Columns are ranked for Bland's rule: original variables first, in the
//! order they are first mentioned by the predicates (unmentioned ones last),
//! then slacks, newest predicate first.
//!
//! # Check
//!
//! The lowest-ranked basic variable violating a bound is repaired by pivoting
//! it with the lowest-ranked non-basic variable of its row that can move in
//! the needed direction. If there is none, the row proves infeasibility.
//!
//! # Witness
//!
//! A feasible tableau admits many witnesses. [`Tableau::witness`] picks one
//! deterministically: starting from the feasible assignment, it raises the
//! sum of all original variables with Bland's rule until no column improves
//! it, or until the lowest-ranked improving column is unbounded. Finally `δ`
//! is resolved to a concrete positive rational.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use log::{debug, trace};

use crate::delta::DeltaRational;
use crate::rational::Rational;
use crate::term::Predicate;
use crate::types::{Relation, Var};

/// Outcome of a feasibility check.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Feasibility {
    Feasible,
    Infeasible,
    /// The pivot limit ran out first.
    Unknown,
}

/// Outcome of raising the objective.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Optimum {
    Bounded,
    Unbounded,
    Interrupted,
}

/// What a tableau column stands for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Column {
    Var(Var),
    /// Slack of the predicate at this position.
    Slack(usize),
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Column::Var(var) => write!(f, "{}", var),
            Column::Slack(i) => write!(f, "s{}", i),
        }
    }
}

#[derive(Debug, Clone)]
struct Row {
    basic: usize,
    coeffs: BTreeMap<usize, Rational>,
}

#[derive(Debug, Clone)]
struct Leaving {
    row: usize,
    basic: usize,
    step: DeltaRational,
    target: DeltaRational,
}

#[derive(Debug, Clone)]
pub struct Tableau {
    num_vars: usize,
    columns: Vec<Column>,
    /// Column of every original variable, by [`Var::index`].
    column_of: Vec<usize>,
    rows: Vec<Row>,
    row_of: Vec<Option<usize>>,
    lower: Vec<Option<DeltaRational>>,
    upper: Vec<Option<DeltaRational>>,
    values: Vec<DeltaRational>,
    pivots: usize,
    pivot_limit: Option<usize>,
}

impl Tableau {
    /// Builds the tableau for `num_vars` original variables and one slack per
    /// predicate. Every variable starts at zero.
    pub fn new(num_vars: usize, predicates: &[Predicate]) -> Self {
        let total = num_vars + predicates.len();

        let mut order = Vec::with_capacity(num_vars);
        let mut seen = vec![false; num_vars];
        let mentioned = predicates.iter().flat_map(|p| p.term().variables()).map(Var::index);
        for index in mentioned.chain(0..num_vars) {
            assert!(index < num_vars, "Predicate mentions unknown variable v{}", index);
            if !seen[index] {
                seen[index] = true;
                order.push(index);
            }
        }

        let mut column_of = vec![0; num_vars];
        for (column, &index) in order.iter().enumerate() {
            column_of[index] = column;
        }
        let columns = order
            .iter()
            .map(|&index| Column::Var(Var::new(index as u32)))
            .chain((0..predicates.len()).rev().map(Column::Slack))
            .collect();

        let mut lower = vec![None; total];
        for bound in &mut lower[..num_vars] {
            *bound = Some(DeltaRational::zero());
        }

        let mut tableau = Self {
            num_vars,
            columns,
            column_of,
            rows: Vec::with_capacity(predicates.len()),
            row_of: vec![None; total],
            lower,
            upper: vec![None; total],
            values: vec![DeltaRational::zero(); total],
            pivots: 0,
            pivot_limit: None,
        };

        for (i, predicate) in predicates.iter().enumerate() {
            let slack = total - 1 - i;
            let coeffs = predicate
                .term()
                .coefficients()
                .map(|(var, coeff)| (tableau.column_of[var.index()], coeff.clone()))
                .collect();
            tableau.row_of[slack] = Some(tableau.rows.len());
            tableau.rows.push(Row { basic: slack, coeffs });

            let bound = -predicate.term().constant_part();
            match predicate.relation() {
                Relation::Le => tableau.upper[slack] = Some(DeltaRational::exact(bound)),
                Relation::Lt => tableau.upper[slack] = Some(DeltaRational::below(bound)),
                Relation::Ge => tableau.lower[slack] = Some(DeltaRational::exact(bound)),
                Relation::Gt => tableau.lower[slack] = Some(DeltaRational::above(bound)),
                Relation::Eq => {
                    tableau.lower[slack] = Some(DeltaRational::exact(bound.clone()));
                    tableau.upper[slack] = Some(DeltaRational::exact(bound));
                }
            }
            debug!("row {}: s{} := {}", i, i, predicate);
        }

        tableau
    }

    pub fn with_pivot_limit(mut self, pivot_limit: Option<usize>) -> Self {
        self.pivot_limit = pivot_limit;
        self
    }

    /// Number of pivots performed so far.
    pub fn pivots(&self) -> usize {
        self.pivots
    }

    fn limit_reached(&self) -> bool {
        self.pivot_limit.is_some_and(|limit| self.pivots >= limit)
    }

    fn can_increase(&self, col: usize) -> bool {
        self.upper[col].as_ref().map_or(true, |u| &self.values[col] < u)
    }

    fn can_decrease(&self, col: usize) -> bool {
        self.lower[col].as_ref().map_or(true, |l| &self.values[col] > l)
    }

    /// Can `col` move in the direction that moves a row with coefficient
    /// `coeff` up (`raise`) or down?
    fn can_push(&self, col: usize, coeff: &Rational, raise: bool) -> bool {
        if coeff.is_positive() == raise {
            self.can_increase(col)
        } else {
            self.can_decrease(col)
        }
    }

    /// Lowest-ranked basic variable outside its bounds, with its row and the
    /// violated bound.
    fn violated_basic(&self) -> Option<(usize, DeltaRational)> {
        (0..self.values.len()).find_map(|col| {
            let row = self.row_of[col]?;
            let value = &self.values[col];
            if let Some(l) = self.lower[col].as_ref().filter(|l| value < *l) {
                return Some((row, l.clone()));
            }
            if let Some(u) = self.upper[col].as_ref().filter(|u| value > *u) {
                return Some((row, u.clone()));
            }
            None
        })
    }

    /// Searches for an assignment satisfying every bound.
    pub fn check(&mut self) -> Feasibility {
        loop {
            let Some((row, target)) = self.violated_basic() else {
                debug!("check: feasible after {} pivots", self.pivots);
                return Feasibility::Feasible;
            };
            if self.limit_reached() {
                debug!("check: pivot limit reached");
                return Feasibility::Unknown;
            }

            let basic = self.rows[row].basic;
            let raise = self.values[basic] < target;
            debug!(
                "check: {} = {} violates {} bound {}",
                self.columns[basic],
                self.values[basic],
                if raise { "lower" } else { "upper" },
                target
            );

            let entering = self.rows[row]
                .coeffs
                .iter()
                .find(|&(&col, coeff)| self.can_push(col, coeff, raise))
                .map(|(&col, _)| col);
            match entering {
                Some(entering) => self.pivot_and_update(row, entering, target),
                None => {
                    debug!("check: row of {} admits no repair, infeasible", self.columns[basic]);
                    return Feasibility::Infeasible;
                }
            }
        }
    }

    /// Shifts non-basic `col` by `delta`, dragging the basic variables along.
    fn update(&mut self, col: usize, delta: &DeltaRational) {
        debug_assert!(self.row_of[col].is_none());
        self.values[col] = &self.values[col] + delta;
        for row in &self.rows {
            if let Some(coeff) = row.coeffs.get(&col) {
                self.values[row.basic] = &self.values[row.basic] + &delta.scale(coeff);
            }
        }
        trace!("update: {} += {}", self.columns[col], delta);
    }

    /// Moves the basic variable of `row` to `target` by adjusting `entering`,
    /// then swaps the two.
    fn pivot_and_update(&mut self, row: usize, entering: usize, target: DeltaRational) {
        let basic = self.rows[row].basic;
        let coeff = self.rows[row].coeffs[&entering].clone();
        let theta = (&target - &self.values[basic]).scale(&coeff.inverse());

        self.values[basic] = target;
        self.values[entering] = &self.values[entering] + &theta;
        for (i, other) in self.rows.iter().enumerate() {
            if i == row {
                continue;
            }
            if let Some(c) = other.coeffs.get(&entering) {
                self.values[other.basic] = &self.values[other.basic] + &theta.scale(c);
            }
        }

        self.pivot(row, entering);
    }

    /// Makes `entering` basic in `row`, and substitutes it out of every other
    /// row.
    fn pivot(&mut self, row: usize, entering: usize) {
        let leaving = self.rows[row].basic;
        debug!("pivot: {} enters, {} leaves", self.columns[entering], self.columns[leaving]);

        let coeff = self.rows[row]
            .coeffs
            .remove(&entering)
            .filter(|c| !c.is_zero());
        let Some(coeff) = coeff else {
            panic!(
                "Pivot on {} absent from the row of {}",
                self.columns[entering], self.columns[leaving]
            );
        };
        let inv = coeff.inverse();

        // entering = inv·leaving - Σ (aₖ·inv)·xₖ
        let mut coeffs: BTreeMap<usize, Rational> = self.rows[row]
            .coeffs
            .iter()
            .map(|(&col, a)| (col, -(a * &inv)))
            .collect();
        coeffs.insert(leaving, inv);

        for (i, other) in self.rows.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let Some(c) = other.coeffs.remove(&entering) else {
                continue;
            };
            for (&col, a) in &coeffs {
                add_term(&mut other.coeffs, col, &(&c * a));
            }
        }

        self.rows[row] = Row {
            basic: entering,
            coeffs,
        };
        self.row_of[leaving] = None;
        self.row_of[entering] = Some(row);
        self.pivots += 1;
    }

    /// The sum of all original variables, over the non-basic columns.
    fn objective(&self) -> BTreeMap<usize, Rational> {
        let mut costs = BTreeMap::new();
        for col in 0..self.num_vars {
            match self.row_of[col] {
                None => add_term(&mut costs, col, &Rational::one()),
                Some(row) => {
                    for (&j, c) in &self.rows[row].coeffs {
                        add_term(&mut costs, j, c);
                    }
                }
            }
        }
        costs
    }

    /// Raises the objective, keeping the tableau feasible.
    fn improve(&mut self) -> Optimum {
        loop {
            let objective = self.objective();
            let candidate = objective.iter().find_map(|(&col, cost)| {
                let raise = cost.is_positive();
                let movable = if raise {
                    self.can_increase(col)
                } else {
                    self.can_decrease(col)
                };
                movable.then_some((col, raise))
            });
            let Some((entering, raise)) = candidate else {
                return Optimum::Bounded;
            };
            if self.limit_reached() {
                return Optimum::Interrupted;
            }

            let value = &self.values[entering];
            let own_gap = if raise {
                self.upper[entering].as_ref().map(|u| u - value)
            } else {
                self.lower[entering].as_ref().map(|l| value - l)
            };

            match (own_gap, self.leaving(entering, raise)) {
                (None, None) => {
                    trace!("improve: {} is unbounded", self.columns[entering]);
                    return Optimum::Unbounded;
                }
                (Some(gap), Some(leaving)) if leaving.step < gap => {
                    self.pivot_and_update(leaving.row, entering, leaving.target);
                }
                (None, Some(leaving)) => {
                    self.pivot_and_update(leaving.row, entering, leaving.target);
                }
                (Some(gap), _) => {
                    let delta = if raise {
                        gap
                    } else {
                        &DeltaRational::zero() - &gap
                    };
                    self.update(entering, &delta);
                }
            }
        }
    }

    /// Ratio test: the basic variable that first hits a bound when `entering`
    /// moves up (`raise`) or down. Ties go to the lowest rank.
    fn leaving(&self, entering: usize, raise: bool) -> Option<Leaving> {
        let mut best: Option<Leaving> = None;
        for (row, r) in self.rows.iter().enumerate() {
            let Some(c) = r.coeffs.get(&entering) else {
                continue;
            };
            let basic = r.basic;
            let rising = c.is_positive() == raise;
            let value = &self.values[basic];
            let (gap, target) = if rising {
                match &self.upper[basic] {
                    Some(u) => (u - value, u.clone()),
                    None => continue,
                }
            } else {
                match &self.lower[basic] {
                    Some(l) => (value - l, l.clone()),
                    None => continue,
                }
            };
            let step = gap.scale(&c.abs().inverse());
            let better = match &best {
                None => true,
                Some(b) => step < b.step || (step == b.step && basic < b.basic),
            };
            if better {
                best = Some(Leaving {
                    row,
                    basic,
                    step,
                    target,
                });
            }
        }
        best
    }

    /// Canonical witness for the original variables, by [`Var::index`].
    ///
    /// Must be called on a feasible tableau. The sum of the original variables
    /// is raised first; if the lowest-ranked improving column can grow
    /// forever, the current assignment is kept as is. Then `δ` is resolved to
    /// the largest value not above `1` that keeps every bound satisfied.
    pub fn witness(&mut self) -> Vec<Rational> {
        let optimum = self.improve();
        let delta = self.resolve_delta();
        debug!("witness: {:?} after {} pivots, δ = {}", optimum, self.pivots, delta);
        self.column_of
            .iter()
            .map(|&col| self.values[col].resolve(&delta))
            .collect()
    }

    fn resolve_delta(&self) -> Rational {
        let mut delta = Rational::one();
        for (col, value) in self.values.iter().enumerate() {
            let limits = [
                self.lower[col].as_ref().and_then(|l| l.max_delta_below(value)),
                self.upper[col].as_ref().and_then(|u| value.max_delta_below(u)),
            ];
            for limit in limits.into_iter().flatten() {
                if limit < delta {
                    delta = limit;
                }
            }
        }
        delta
    }
}

/// Adds `coeff·x[col]` to a sparse combination, dropping zero entries.
fn add_term(coeffs: &mut BTreeMap<usize, Rational>, col: usize, coeff: &Rational) {
    let sum = match coeffs.get(&col) {
        Some(old) => old + coeff,
        None => coeff.clone(),
    };
    if sum.is_zero() {
        coeffs.remove(&col);
    } else {
        coeffs.insert(col, sum);
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::term::Term;

    fn q(s: &str) -> Rational {
        s.parse().unwrap()
    }

    fn vars(n: u32) -> Vec<Var> {
        (0..n).map(Var::new).collect()
    }

    fn solve(num_vars: usize, predicates: &[Predicate]) -> Option<Vec<String>> {
        let mut tableau = Tableau::new(num_vars, predicates);
        match tableau.check() {
            Feasibility::Feasible => Some(tableau.witness().iter().map(|v| v.to_string()).collect()),
            Feasibility::Infeasible => None,
            Feasibility::Unknown => panic!("unexpected pivot limit"),
        }
    }

    fn strings(values: &[&str]) -> Option<Vec<String>> {
        Some(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_single_upper_bound() {
        let v = vars(1);
        let p = Term::scaled(v[0], 2).le(10).unwrap();
        assert_eq!(solve(1, &[p]), strings(&["5"]));
    }

    #[test]
    fn test_parallel_bounds() {
        let v = vars(1);
        let ps = [Term::scaled(v[0], 2).le(10).unwrap(), Term::scaled(v[0], 4).le(20).unwrap()];
        assert_eq!(solve(1, &ps), strings(&["5"]));
    }

    #[test]
    fn test_conflicting_bounds() {
        let v = vars(1);
        let ps = [Term::var(v[0]).le(3).unwrap(), Term::var(v[0]).ge(5).unwrap()];
        assert_eq!(solve(1, &ps), None);
    }

    #[test]
    fn test_variables_are_non_negative() {
        let v = vars(2);
        assert_eq!(solve(1, &[Term::var(v[0]).le(-1).unwrap()]), None);
        assert_eq!(solve(2, &[Term::var(v[0]).plus(v[1]).lt(0).unwrap()]), None);
    }

    #[test]
    fn test_unbounded_stays_at_bound() {
        let v = vars(1);
        let p = Term::var(v[0]).ge(2).unwrap();
        assert_eq!(solve(1, &[p]), strings(&["2"]));
    }

    #[test]
    fn test_first_mentioned_variable_raised_first() {
        let v = vars(2);
        let (x, y) = (v[0], v[1]);
        let ps = [
            Term::var(y).le(3).unwrap(),
            Term::var(x).le(10).unwrap(),
            Term::constant(4).ge(Term::var(x).plus(y)).unwrap(),
        ];
        assert_eq!(solve(2, &ps), strings(&["1", "3"]));
    }

    #[test]
    fn test_raising_sum_leaves_lower_bound() {
        let v = vars(2);
        let (x, y) = (v[0], v[1]);
        let ps = [
            Term::var(y).ge(1).unwrap(),
            Term::var(x).le(10).unwrap(),
            Term::scaled(x, 2).plus(y).le(2).unwrap(),
        ];
        assert_eq!(solve(2, &ps), strings(&["0", "2"]));
    }

    #[test]
    fn test_fractional_vertex() {
        let v = vars(2);
        let (x, y) = (v[0], v[1]);
        let ps = [
            Term::scaled(y, 2).le(3).unwrap(),
            Term::scaled(x, 16).le(10).unwrap(),
            Term::constant(4).ge(Term::var(x).plus(y)).unwrap(),
        ];
        assert_eq!(solve(2, &ps), strings(&["5/8", "3/2"]));
    }

    #[test]
    fn test_newest_bound_repaired_first() {
        let v = vars(2);
        let (z, w) = (v[0], v[1]);
        let ps = [
            Term::var(z).plus(w).equals(28).unwrap(),
            Term::var(z).ge(2).unwrap(),
        ];
        assert_eq!(solve(2, &ps), strings(&["2", "26"]));
    }

    #[test]
    fn test_strict_bound_resolved() {
        let v = vars(2);
        let (x, y) = (v[0], v[1]);
        let ps = [Term::var(x).lt(y).unwrap(), Term::var(y).equals(5).unwrap()];
        assert_eq!(solve(2, &ps), strings(&["4", "5"]));
    }

    #[test]
    fn test_strict_chain() {
        let v = vars(3);
        let (x, y, z) = (v[0], v[1], v[2]);
        let ps = [
            Term::var(x).lt(y).unwrap(),
            Term::var(y).lt(z).unwrap(),
            Term::var(z).equals(2).unwrap(),
        ];
        assert_eq!(solve(3, &ps), strings(&["0", "1", "2"]));

        let ps = [
            Term::var(x).lt(y).unwrap(),
            Term::var(y).lt(z).unwrap(),
            Term::var(z).equals(0).unwrap(),
        ];
        assert_eq!(solve(3, &ps), None);
    }

    #[test]
    fn test_strict_contradiction() {
        let v = vars(2);
        let (x, y) = (v[0], v[1]);
        let ps = [Term::var(x).lt(y).unwrap(), Term::var(x).gt(y).unwrap()];
        assert_eq!(solve(2, &ps), None);
    }

    #[test]
    fn test_narrow_strict_interval_shrinks_delta() {
        let v = vars(1);
        let x = v[0];
        // 0 < x < 1/3: x is raised to 1/3 - δ, and δ must stay below 1/3.
        let ps = [Term::var(x).gt(0).unwrap(), Term::var(x).lt(q("1/3")).unwrap()];
        let witness = solve(1, &ps).unwrap();
        let value = q(&witness[0]);
        assert!(value > Rational::zero() && value < q("1/3"), "x = {}", value);
    }

    #[test]
    fn test_unbounded_direction_stops() {
        let v = vars(2);
        let (x, y) = (v[0], v[1]);
        let ps = [
            Term::var(x).plus(y).ge(2).unwrap(),
            Term::var(x).le(10).unwrap(),
        ];
        let mut tableau = Tableau::new(2, &ps);
        assert_eq!(tableau.check(), Feasibility::Feasible);
        assert_eq!(tableau.values[tableau.column_of[x.index()]], DeltaRational::exact(q("2")));
        assert_eq!(tableau.pivots(), 1);
        // x is pushed to its bound; raising y never stops and is skipped.
        assert_eq!(tableau.witness(), vec![q("10"), q("0")]);
    }

    #[test]
    fn test_column_names_match_variables() {
        let v = vars(2);
        let ps = [Term::var(v[1]).le(1).unwrap(), Term::var(v[0]).ge(1).unwrap()];
        let tableau = Tableau::new(2, &ps);
        let names: Vec<String> = tableau.columns.iter().map(|c| c.to_string()).collect();
        assert_eq!(names, ["v1", "v0", "s1", "s0"]);
        assert_eq!(Column::Var(v[1]).to_string(), v[1].to_string());
    }

    #[test]
    fn test_pivot_limit() {
        let v = vars(1);
        let p = Term::var(v[0]).ge(5).unwrap();
        let mut tableau = Tableau::new(1, &[p]).with_pivot_limit(Some(0));
        assert_eq!(tableau.check(), Feasibility::Unknown);
    }
}
