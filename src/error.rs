use thiserror::Error;

/// Errors reported by the solver for a single failing call.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum SolverError {
    /// Rational division (or construction) with a zero denominator.
    #[error("division by zero")]
    DivisionByZero,

    /// `pop()` without a matching `push()`.
    #[error("cannot pop the base scope")]
    StackUnderflow,

    /// A predicate whose term has no variables.
    #[error("predicate over a term without variables")]
    EmptyTerm,

    /// A variable handle that was not created by this solver.
    #[error("unknown variable v{index} (solver has {count} variables)")]
    UnknownVariable { index: u32, count: usize },

    /// Text that does not parse as a rational number.
    #[error("invalid rational literal `{0}`")]
    InvalidRational(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;
