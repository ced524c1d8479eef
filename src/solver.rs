//! The incremental solver facade.
//!
//! A [`Solver`] owns the variable table and the stack of assertion scopes.
//! Assertions are only stored when added; all the work happens in
//! [`Solver::check`], which rebuilds the Simplex tableau from the live
//! assertions on every call. Popping a scope therefore restores exactly the
//! state before the matching push.
//!
//! # Example
//!
//! ```
//! use boolean_lp::formula::Formula;
//! use boolean_lp::solver::{CheckResult, Solver};
//! use boolean_lp::term::Term;
//! use boolean_lp::types::Sort;
//!
//! let mut solver = Solver::new();
//! let x = solver.new_variable("x", Sort::Int);
//! let y = solver.new_variable("y", Sort::Int);
//!
//! solver.add_assertion(Term::var(x).plus(y).le(20).unwrap()).unwrap();
//! let (result, model) = solver.check(&[x, y]).unwrap();
//! assert_eq!(result, CheckResult::Satisfiable);
//! assert_eq!(model, ["20", "0"]);
//!
//! solver.push();
//! solver.add_assertion(Formula::and(
//!     Formula::lit(Term::var(x).le(5).unwrap()),
//!     Formula::lit(Term::var(y).le(5).unwrap()),
//! )).unwrap();
//! let (_, model) = solver.check(&[x, y]).unwrap();
//! assert_eq!(model, ["5", "5"]);
//!
//! solver.pop().unwrap();
//! assert!(solver.pop().is_err());
//! ```

use std::fmt::{Display, Formatter};

use log::debug;

use crate::error::{Result, SolverError};
use crate::formula::Formula;
use crate::rational::Rational;
use crate::search::{Search, SearchResult};
use crate::stack::ScopedStack;
use crate::types::{Sort, Var};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CheckResult {
    Satisfiable,
    Unsatisfiable,
    /// Only produced when a pivot limit is configured and runs out.
    Unknown,
}

impl Display for CheckResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckResult::Satisfiable => write!(f, "SATISFIABLE"),
            CheckResult::Unsatisfiable => write!(f, "UNSATISFIABLE"),
            CheckResult::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SolverConfig {
    /// Maximum number of pivots per Simplex run; `None` for no limit.
    pub pivot_limit: Option<usize>,
}

/// Counters accumulated over the lifetime of a solver.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Stats {
    /// Calls to [`Solver::check`].
    pub checks: usize,
    /// Tableaux built and checked.
    pub simplex_runs: usize,
    /// Pivots over all Simplex runs.
    pub pivots: usize,
    /// Branches entered at choice points.
    pub branches: usize,
    /// Deepest nesting of choice points reached.
    pub max_depth: usize,
}

#[derive(Debug, Clone)]
struct Variable {
    name: String,
    sort: Sort,
}

#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
    variables: Vec<Variable>,
    assertions: ScopedStack<Formula>,
    stats: Stats,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Declares a fresh variable. Repeated names never alias.
    pub fn new_variable(&mut self, name: impl Into<String>, sort: Sort) -> Var {
        let var = Var::new(self.variables.len() as u32);
        let name = name.into();
        debug!("new_variable: {} = {} : {}", var, name, sort);
        self.variables.push(Variable { name, sort });
        var
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// All declared variables, in creation order.
    pub fn variables(&self) -> impl Iterator<Item = Var> {
        (0..self.variables.len() as u32).map(Var::new)
    }

    fn variable(&self, var: Var) -> Result<&Variable> {
        self.variables
            .get(var.index())
            .ok_or(SolverError::UnknownVariable {
                index: var.id(),
                count: self.variables.len(),
            })
    }

    pub fn name(&self, var: Var) -> Result<&str> {
        Ok(&self.variable(var)?.name)
    }

    pub fn sort(&self, var: Var) -> Result<Sort> {
        Ok(self.variable(var)?.sort)
    }

    /// Adds `formula` to the innermost scope. Nothing is checked until
    /// [`Solver::check`].
    pub fn add_assertion(&mut self, formula: impl Into<Formula>) -> Result<()> {
        let formula = formula.into();
        for var in formula.variables() {
            self.variable(var)?;
        }
        debug!("add_assertion: {}", formula);
        self.assertions.add(formula);
        Ok(())
    }

    /// Opens a nested scope.
    pub fn push(&mut self) {
        self.assertions.push();
    }

    /// Closes the innermost scope, discarding its assertions.
    ///
    /// Fails with [`SolverError::StackUnderflow`] if only the base scope is
    /// open.
    pub fn pop(&mut self) -> Result<()> {
        self.assertions.pop()
    }

    /// Number of scopes opened above the base scope.
    pub fn depth(&self) -> usize {
        self.assertions.depth()
    }

    /// All live assertions, outermost scope first.
    pub fn assertions(&self) -> &[Formula] {
        self.assertions.as_slice()
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = Stats::default();
    }

    /// Decides the live assertions and reports the values of `requested`, in
    /// order, as exact rationals. The model is empty unless satisfiable.
    pub fn check_values(&mut self, requested: &[Var]) -> Result<(CheckResult, Vec<Rational>)> {
        for &var in requested {
            self.variable(var)?;
        }

        self.stats.checks += 1;
        debug!(
            "check: {} assertions in {} scopes, {} variables",
            self.assertions.len(),
            self.assertions.depth() + 1,
            self.variables.len()
        );

        let search = Search::new(self.variables.len(), self.config.pivot_limit, &mut self.stats);
        let result = search.run(self.assertions.as_slice());
        let outcome = match result {
            SearchResult::Sat(values) => {
                let model = requested.iter().map(|var| values[var.index()].clone()).collect();
                (CheckResult::Satisfiable, model)
            }
            SearchResult::Unsat => (CheckResult::Unsatisfiable, Vec::new()),
            SearchResult::Unknown => (CheckResult::Unknown, Vec::new()),
        };
        debug!("check: {}", outcome.0);
        Ok(outcome)
    }

    /// Like [`Solver::check_values`], with the model rendered as text
    /// (`"p/q"`, or `"p"` for integers).
    pub fn check(&mut self, requested: &[Var]) -> Result<(CheckResult, Vec<String>)> {
        let (result, values) = self.check_values(requested)?;
        Ok((result, values.iter().map(Rational::to_string).collect()))
    }
}
