//! Linear terms and the single-sided predicates built from them.
//!
//! A [`Term`] is `Σ cᵢ·xᵢ + c₀` with exact rational coefficients; zero
//! coefficients are never stored. A [`Predicate`] compares a term against
//! zero, so `lhs ≤ rhs` is stored as `lhs - rhs ≤ 0`.
//!
//! Terms are built explicitly instead of through operator overloading, so the
//! grouping of an expression is exactly the nesting of the builder calls:
//!
//! ```
//! use boolean_lp::solver::Solver;
//! use boolean_lp::term::Term;
//! use boolean_lp::types::Sort;
//!
//! let mut solver = Solver::new();
//! let x = solver.new_variable("x", Sort::Int);
//! let y = solver.new_variable("y", Sort::Int);
//!
//! // x = y + 10
//! let p = Term::var(x).equals(Term::var(y).plus(10)).unwrap();
//! assert_eq!(p.to_string(), "v0 - v1 - 10 = 0");
//! ```

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::error::{Result, SolverError};
use crate::formula::Formula;
use crate::rational::Rational;
use crate::types::{Relation, Var};

#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Term {
    coeffs: BTreeMap<Var, Rational>,
    constant: Rational,
}

impl Term {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn constant(value: impl Into<Rational>) -> Self {
        Self {
            coeffs: BTreeMap::new(),
            constant: value.into(),
        }
    }

    pub fn var(var: Var) -> Self {
        Self::scaled(var, Rational::one())
    }

    /// `coeff · var`
    pub fn scaled(var: Var, coeff: impl Into<Rational>) -> Self {
        let mut term = Self::zero();
        term.add_monomial(var, &coeff.into());
        term
    }

    fn add_monomial(&mut self, var: Var, coeff: &Rational) {
        if coeff.is_zero() {
            return;
        }
        let sum = match self.coeffs.get(&var) {
            Some(old) => old + coeff,
            None => coeff.clone(),
        };
        if sum.is_zero() {
            self.coeffs.remove(&var);
        } else {
            self.coeffs.insert(var, sum);
        }
    }

    pub fn plus(mut self, rhs: impl Into<Term>) -> Self {
        let rhs = rhs.into();
        for (var, coeff) in &rhs.coeffs {
            self.add_monomial(*var, coeff);
        }
        self.constant = &self.constant + &rhs.constant;
        self
    }

    pub fn minus(self, rhs: impl Into<Term>) -> Self {
        self.plus(rhs.into().negated())
    }

    pub fn times(self, factor: impl Into<Rational>) -> Self {
        let factor = factor.into();
        if factor.is_zero() {
            return Self::zero();
        }
        Self {
            coeffs: self
                .coeffs
                .into_iter()
                .map(|(var, coeff)| (var, &coeff * &factor))
                .collect(),
            constant: &self.constant * &factor,
        }
    }

    pub fn negated(self) -> Self {
        self.times(-1)
    }

    pub fn coefficient(&self, var: Var) -> Option<&Rational> {
        self.coeffs.get(&var)
    }

    pub fn constant_part(&self) -> &Rational {
        &self.constant
    }

    /// Non-zero coefficients, by increasing variable index.
    pub fn coefficients(&self) -> impl Iterator<Item = (Var, &Rational)> + '_ {
        self.coeffs.iter().map(|(var, coeff)| (*var, coeff))
    }

    pub fn variables(&self) -> impl Iterator<Item = Var> + '_ {
        self.coeffs.keys().copied()
    }

    pub fn is_constant(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Evaluates the term under `values`, indexed by [`Var::index`].
    ///
    /// Variables beyond the end of `values` read as zero.
    pub fn evaluate(&self, values: &[Rational]) -> Rational {
        self.coeffs
            .iter()
            .filter_map(|(var, coeff)| values.get(var.index()).map(|value| coeff * value))
            .fold(self.constant.clone(), |acc, x| &acc + &x)
    }

    fn compare(self, rhs: impl Into<Term>, relation: Relation) -> Result<Predicate> {
        Predicate::new(self.minus(rhs), relation)
    }

    /// `self ≤ rhs`
    pub fn le(self, rhs: impl Into<Term>) -> Result<Predicate> {
        self.compare(rhs, Relation::Le)
    }

    /// `self < rhs`
    pub fn lt(self, rhs: impl Into<Term>) -> Result<Predicate> {
        self.compare(rhs, Relation::Lt)
    }

    /// `self ≥ rhs`
    pub fn ge(self, rhs: impl Into<Term>) -> Result<Predicate> {
        self.compare(rhs, Relation::Ge)
    }

    /// `self > rhs`
    pub fn gt(self, rhs: impl Into<Term>) -> Result<Predicate> {
        self.compare(rhs, Relation::Gt)
    }

    /// `self = rhs`
    pub fn equals(self, rhs: impl Into<Term>) -> Result<Predicate> {
        self.compare(rhs, Relation::Eq)
    }
}

impl From<Var> for Term {
    fn from(var: Var) -> Self {
        Term::var(var)
    }
}

impl From<Rational> for Term {
    fn from(value: Rational) -> Self {
        Term::constant(value)
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::constant(value)
    }
}

impl From<i32> for Term {
    fn from(value: i32) -> Self {
        Term::constant(value)
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (var, coeff) in &self.coeffs {
            let sign = if coeff.is_negative() { "-" } else { "+" };
            if first {
                if coeff.is_negative() {
                    write!(f, "-")?;
                }
            } else {
                write!(f, " {} ", sign)?;
            }
            let abs = coeff.abs();
            if abs.is_one() {
                write!(f, "{}", var)?;
            } else {
                write!(f, "{}*{}", abs, var)?;
            }
            first = false;
        }
        if first {
            write!(f, "{}", self.constant)
        } else if self.constant.is_negative() {
            write!(f, " - {}", self.constant.abs())
        } else if self.constant.is_positive() {
            write!(f, " + {}", self.constant)
        } else {
            Ok(())
        }
    }
}

/// `term REL 0` over a term with at least one variable.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Predicate {
    term: Term,
    relation: Relation,
}

impl Predicate {
    /// Fails with [`SolverError::EmptyTerm`] if `term` has no variables.
    pub fn new(term: Term, relation: Relation) -> Result<Self> {
        if term.is_constant() {
            return Err(SolverError::EmptyTerm);
        }
        Ok(Self { term, relation })
    }

    /// `var = 1` for `true`, `var = 0` for `false`.
    pub(crate) fn truth(var: Var, value: bool) -> Self {
        let term = if value {
            Term::var(var).minus(1)
        } else {
            Term::var(var)
        };
        Self {
            term,
            relation: Relation::Eq,
        }
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// Exact truth value under `values`, indexed by [`Var::index`].
    pub fn holds(&self, values: &[Rational]) -> bool {
        let value = self.term.evaluate(values);
        match self.relation {
            Relation::Le => !value.is_positive(),
            Relation::Lt => value.is_negative(),
            Relation::Ge => !value.is_negative(),
            Relation::Gt => value.is_positive(),
            Relation::Eq => value.is_zero(),
        }
    }

    /// Logical negation; `=` negates into the disjunction of `<` and `>`.
    pub fn negated(&self) -> Formula {
        let with = |relation| Formula::lit(Predicate {
            term: self.term.clone(),
            relation,
        });
        match self.relation.complement() {
            Some(relation) => with(relation),
            None => Formula::or(with(Relation::Lt), with(Relation::Gt)),
        }
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} 0", self.term, self.relation)
    }
}
