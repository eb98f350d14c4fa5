use crate::domain::linear::{LinearExpr, Relation, VariableHandle};
use crate::models::SolverDirection;

/// Terminal outcome of one solve attempt
#[derive(Debug, Clone, PartialEq)]
pub enum BackendStatus {
    /// The returned values provably optimize the objective
    Optimal,
    /// The returned values satisfy every constraint but optimality was not proven
    Feasible,
    /// No assignment satisfies every constraint
    Infeasible,
    /// The backend itself failed
    Error(String),
}

impl BackendStatus {
    /// Whether `value_of` may be queried after this status
    pub fn has_solution(&self) -> bool {
        matches!(self, BackendStatus::Optimal | BackendStatus::Feasible)
    }
}

/// Common interface for 0/1 integer-linear-programming backends.
///
/// A backend accumulates variables and constraints, then blocks in `solve`
/// until it reaches a terminal status. Registration takes `&mut self`:
/// model mutation is never concurrent.
pub trait SolverBackend: Send {
    /// Register a new 0/1 decision variable
    fn create_binary_variable(&mut self) -> VariableHandle;

    /// Register `expression <relation> bound`
    fn add_linear_constraint(&mut self, expression: LinearExpr, relation: Relation, bound: f64);

    /// Set the single objective, replacing any earlier one
    fn set_objective(&mut self, expression: LinearExpr, direction: SolverDirection);

    /// Solve the accumulated model
    fn solve(&mut self) -> BackendStatus;

    /// Solved value of a variable. `None` before a successful solve or for
    /// an unknown handle.
    fn value_of(&self, variable: VariableHandle) -> Option<f64>;

    /// Get the solver name for logging/debugging
    fn name(&self) -> &str;
}
