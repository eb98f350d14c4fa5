use std::collections::HashMap;

use crate::convert::{to_glpk_polyhedron, to_le_rows, variable_ids};
use crate::domain::linear::{LinearExpr, LinearModel, Relation, VariableHandle};
use crate::domain::solver::{BackendStatus, SolverBackend};
use crate::models::SolverDirection;

use glpk_rust::solve_ilps as glpk_solve_ilps;

const NO_TERMINAL_OUTPUT: bool = false;

/// GLPK solver implementation
#[derive(Default)]
pub struct GlpkSolver {
    model: LinearModel,
    solution: Option<Vec<f64>>,
}

impl GlpkSolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SolverBackend for GlpkSolver {
    fn create_binary_variable(&mut self) -> VariableHandle {
        self.model.create_binary_variable()
    }

    fn add_linear_constraint(&mut self, expression: LinearExpr, relation: Relation, bound: f64) {
        self.model.add_linear_constraint(expression, relation, bound);
    }

    fn set_objective(&mut self, expression: LinearExpr, direction: SolverDirection) {
        self.model.set_objective(expression, direction);
    }

    fn solve(&mut self) -> BackendStatus {
        self.solution = None;

        let le = match to_le_rows(&self.model) {
            Ok(le) => le,
            Err(details) => return BackendStatus::Error(details),
        };
        if le.trivially_infeasible {
            return BackendStatus::Infeasible;
        }

        // Keep owned IDs alive while GLPK borrows &str from them
        let ids = variable_ids(self.model.num_variables());
        let mut polyhedron = to_glpk_polyhedron(&le, &ids);

        let objective: HashMap<&str, f64> = ids
            .iter()
            .zip(self.model.objective_coefficients())
            .filter(|(_, coefficient)| *coefficient != 0.0)
            .map(|(id, coefficient)| (id.as_str(), coefficient))
            .collect();

        let maximize = self.model.direction() == SolverDirection::Maximize;

        // Call the GLPK library solver
        let mut lib_solutions =
            glpk_solve_ilps(&mut polyhedron, vec![objective], maximize, NO_TERMINAL_OUTPUT);

        let solution = match lib_solutions.pop() {
            Some(solution) => solution,
            None => return BackendStatus::Error("GLPK returned no solution".to_string()),
        };
        if let Some(error) = solution.error {
            return BackendStatus::Error(error);
        }

        let status: BackendStatus = solution.status.into();
        if status.has_solution() {
            self.solution = Some(
                ids.iter()
                    .map(|id| solution.solution.get(id.as_str()).copied().unwrap_or(0) as f64)
                    .collect(),
            );
        }
        status
    }

    fn value_of(&self, variable: VariableHandle) -> Option<f64> {
        self.solution.as_ref()?.get(variable.index()).copied()
    }

    fn name(&self) -> &str {
        "GLPK"
    }
}
