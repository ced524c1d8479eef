//! Handles and small enums shared by the constraint model.
//!
//! [`Var`] is the opaque variable handle handed out by
//! [`Solver::new_variable`][crate::solver::Solver::new_variable],
//! [`Sort`] is the declared value domain, and [`Relation`] is the comparison
//! of a [`Predicate`][crate::term::Predicate] against zero.
use std::fmt;

/// A variable handle (0-indexed, in creation order).
///
/// Handles are cheap to copy and never own anything. Two calls to
/// `new_variable` with the same name still yield distinct handles.
///
/// # Invariants
///
/// - The index is the position of the variable in its solver's variable table
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    pub(crate) fn new(index: u32) -> Self {
        Var(index)
    }

    /// Returns the raw variable index as a `u32`.
    pub fn id(self) -> u32 {
        self.0
    }

    /// Returns the raw variable index as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<Var> for u32 {
    fn from(var: Var) -> Self {
        var.0
    }
}

/// Declared domain of a variable.
///
/// Every sort is interpreted over the non-negative rationals: integrality
/// is not enforced, and a `Bool` variable is a rational that boolean
/// references read as true when it equals `1`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Sort {
    Int,
    Real,
    Bool,
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sort::Int => write!(f, "Int"),
            Sort::Real => write!(f, "Real"),
            Sort::Bool => write!(f, "Bool"),
        }
    }
}

/// Comparison of a term against zero.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Relation {
    /// `term ≤ 0`
    Le,
    /// `term < 0`
    Lt,
    /// `term ≥ 0`
    Ge,
    /// `term > 0`
    Gt,
    /// `term = 0`
    Eq,
}

impl Relation {
    /// Complementary relation, if it is a single relation.
    ///
    /// `Eq` has no single complement: its negation is the disjunction of
    /// `Lt` and `Gt`.
    pub fn complement(self) -> Option<Self> {
        match self {
            Relation::Le => Some(Relation::Gt),
            Relation::Lt => Some(Relation::Ge),
            Relation::Ge => Some(Relation::Lt),
            Relation::Gt => Some(Relation::Le),
            Relation::Eq => None,
        }
    }

    pub fn is_strict(self) -> bool {
        matches!(self, Relation::Lt | Relation::Gt)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Relation::Le => "<=",
            Relation::Lt => "<",
            Relation::Ge => ">=",
            Relation::Gt => ">",
            Relation::Eq => "=",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_creation() {
        let v0 = Var::new(0);
        let v1 = Var::new(1);
        assert_eq!(v0.id(), 0);
        assert_eq!(v1.index(), 1);
        assert!(v0 < v1);
        assert_eq!(v1.to_string(), "v1");
    }

    #[test]
    fn test_relation_complement() {
        assert_eq!(Relation::Le.complement(), Some(Relation::Gt));
        assert_eq!(Relation::Lt.complement(), Some(Relation::Ge));
        assert_eq!(Relation::Ge.complement(), Some(Relation::Lt));
        assert_eq!(Relation::Gt.complement(), Some(Relation::Le));
        assert_eq!(Relation::Eq.complement(), None);
    }

    #[test]
    fn test_relation_strictness() {
        assert!(Relation::Lt.is_strict());
        assert!(Relation::Gt.is_strict());
        assert!(!Relation::Le.is_strict());
        assert!(!Relation::Eq.is_strict());
        assert_eq!(Relation::Ge.to_string(), ">=");
    }
}
