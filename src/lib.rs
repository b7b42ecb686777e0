//! probSAT: stochastic local search for CNF satisfiability.
//!
//! Each try starts from a uniformly random assignment. Every flip picks an
//! unsatisfied clause at random and flips one of its variables, chosen with
//! probability proportional to `make^cm / (break + eps)^cb`. The search stops
//! when every clause is satisfied or when `max_tries × max_flips` flips have
//! been spent. It cannot prove a formula unsatisfiable.

#[cfg(test)]
mod arbitrary;
mod assignment;
pub mod batch;
pub mod config;
pub mod error;
mod evaluate;
pub mod formula;
mod literal;
mod occurrences;
pub mod select;
mod sign;
mod solver;
pub mod tracker;
pub mod weights;

pub use assignment::Assignment;
pub use config::{RunPlan, SolverConfig, Strategy};
pub use error::{Error, FormatError, Result};
pub use formula::{Clause, Formula};
pub use literal::Literal;
pub use sign::Sign;
pub use solver::{solve_seeded, SearchResult, Solver, Status};
pub use tracker::{Counters, MakeBreak, Recompute, Tracker};
pub use weights::Weights;

pub type Variable = usize;
pub type ClauseIdx = usize;

pub trait Evaluate {
    fn evaluate(&self, assignment: &Assignment) -> bool;
}
