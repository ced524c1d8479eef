//! Boolean structure over linear predicates.
//!
//! A [`Formula`] is a plain tree: building one has no side effects and does
//! not touch any solver. The boolean search in [`crate::search`] walks it
//! depth-first, left to right.
//!
//! A boolean reference `b` denotes the literal `b = 1`; its negation is the
//! literal `b = 0`. The search only ever assigns these two values to a
//! referenced variable, so [`Formula::not`] is an exact complement on every
//! witness it reports.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use crate::rational::Rational;
use crate::term::Predicate;
use crate::types::Var;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Formula {
    Literal(Predicate),
    Boolean(Var),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    /// `var ↔ formula`
    Iff(Var, Box<Formula>),
}

impl Formula {
    pub fn lit(predicate: Predicate) -> Self {
        Formula::Literal(predicate)
    }

    pub fn boolean(var: Var) -> Self {
        Formula::Boolean(var)
    }

    pub fn and(lhs: Self, rhs: Self) -> Self {
        Formula::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Self, rhs: Self) -> Self {
        Formula::Or(Box::new(lhs), Box::new(rhs))
    }

    pub fn iff(var: Var, formula: Self) -> Self {
        Formula::Iff(var, Box::new(formula))
    }

    /// Left-nested conjunction of `items`, or `None` if there are none.
    pub fn all(items: impl IntoIterator<Item = Formula>) -> Option<Self> {
        items.into_iter().reduce(Formula::and)
    }

    /// Left-nested disjunction of `items`, or `None` if there are none.
    pub fn any(items: impl IntoIterator<Item = Formula>) -> Option<Self> {
        items.into_iter().reduce(Formula::or)
    }

    /// Negation, pushed down to the literals.
    pub fn not(formula: &Formula) -> Self {
        match formula {
            Formula::Literal(p) => p.negated(),
            Formula::Boolean(var) => Formula::Literal(Predicate::truth(*var, false)),
            Formula::And(a, b) => Formula::or(Formula::not(a), Formula::not(b)),
            Formula::Or(a, b) => Formula::and(Formula::not(a), Formula::not(b)),
            Formula::Iff(var, f) => Formula::iff(*var, Formula::not(f)),
        }
    }

    /// Exact truth value under `values`, indexed by [`Var::index`].
    pub fn holds(&self, values: &[Rational]) -> bool {
        match self {
            Formula::Literal(p) => p.holds(values),
            Formula::Boolean(var) => is_true(values, *var),
            Formula::And(a, b) => a.holds(values) && b.holds(values),
            Formula::Or(a, b) => a.holds(values) || b.holds(values),
            Formula::Iff(var, f) => is_true(values, *var) == f.holds(values),
        }
    }

    /// All variables the formula mentions.
    pub fn variables(&self) -> BTreeSet<Var> {
        let mut vars = BTreeSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut BTreeSet<Var>) {
        match self {
            Formula::Literal(p) => vars.extend(p.term().variables()),
            Formula::Boolean(var) => {
                vars.insert(*var);
            }
            Formula::And(a, b) | Formula::Or(a, b) => {
                a.collect_variables(vars);
                b.collect_variables(vars);
            }
            Formula::Iff(var, f) => {
                vars.insert(*var);
                f.collect_variables(vars);
            }
        }
    }
}

fn is_true(values: &[Rational], var: Var) -> bool {
    values.get(var.index()).is_some_and(Rational::is_one)
}

impl From<Predicate> for Formula {
    fn from(predicate: Predicate) -> Self {
        Formula::Literal(predicate)
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Formula::Literal(p) => write!(f, "{}", p),
            Formula::Boolean(var) => write!(f, "{}", var),
            Formula::And(a, b) => write!(f, "({} && {})", a, b),
            Formula::Or(a, b) => write!(f, "({} || {})", a, b),
            Formula::Iff(var, g) => write!(f, "({} <-> {})", var, g),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Term;

    fn q(s: &str) -> Rational {
        s.parse().unwrap()
    }

    #[test]
    fn test_holds() {
        let x = Var::new(0);
        let y = Var::new(1);
        let w = Var::new(2);

        let lt = Formula::lit(Term::var(x).lt(y).unwrap());
        let gt = Formula::lit(Term::var(x).gt(y).unwrap());
        let f = Formula::and(Formula::iff(w, lt.clone()), Formula::or(Formula::boolean(w), gt.clone()));

        assert!(f.holds(&[q("1"), q("2"), q("1")]));
        assert!(f.holds(&[q("3"), q("2"), q("0")]));
        assert!(!f.holds(&[q("2"), q("2"), q("0")]));
        assert!(!f.holds(&[q("1"), q("2"), q("0")]));
        assert!(!Formula::and(lt, gt).holds(&[q("1"), q("2"), q("1")]));
    }

    #[test]
    fn test_not_complements() {
        let x = Var::new(0);
        let y = Var::new(1);
        let w = Var::new(2);

        let f = Formula::or(
            Formula::and(
                Formula::lit(Term::var(x).le(3).unwrap()),
                Formula::lit(Term::var(y).equals(Term::var(x)).unwrap()),
            ),
            Formula::iff(w, Formula::lit(Term::var(x).gt(1).unwrap())),
        );
        let not_f = Formula::not(&f);

        for xv in ["0", "1", "3", "4"] {
            for yv in ["0", "3", "4"] {
                for wv in ["0", "1"] {
                    let values = [q(xv), q(yv), q(wv)];
                    assert_ne!(f.holds(&values), not_f.holds(&values), "x={} y={} w={}", xv, yv, wv);
                }
            }
        }
    }

    #[test]
    fn test_all_any() {
        let x = Var::new(0);
        assert_eq!(Formula::all(std::iter::empty()), None);
        let items = (1..=3).map(|k| Formula::lit(Term::var(x).ge(k).unwrap()));
        let f = Formula::all(items).unwrap();
        assert_eq!(f.to_string(), "((v0 - 1 >= 0 && v0 - 2 >= 0) && v0 - 3 >= 0)");
        let g = Formula::any([Formula::boolean(x)]).unwrap();
        assert_eq!(g, Formula::boolean(x));
    }

    #[test]
    fn test_variables() {
        let x = Var::new(0);
        let y = Var::new(3);
        let w = Var::new(5);
        let f = Formula::iff(w, Formula::lit(Term::var(y).minus(x).lt(0).unwrap()));
        assert_eq!(f.variables().into_iter().collect::<Vec<_>>(), vec![x, y, w]);
    }
}
