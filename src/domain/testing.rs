use crate::domain::linear::{LinearExpr, LinearModel, Relation, VariableHandle};
use crate::domain::solver::{BackendStatus, SolverBackend};
use crate::models::{Pathway, PlacementInput, RegionCategory, School, SolverDirection, Student};

/// Records the registered model and answers `solve` with a fixed status and values
pub(crate) struct ScriptedBackend {
    pub model: LinearModel,
    pub status: BackendStatus,
    pub values: Vec<f64>,
    pub solve_calls: usize,
    solved: bool,
}

impl ScriptedBackend {
    pub fn optimal(values: Vec<f64>) -> Self {
        Self::with_status(BackendStatus::Optimal, values)
    }

    pub fn with_status(status: BackendStatus, values: Vec<f64>) -> Self {
        ScriptedBackend {
            model: LinearModel::new(),
            status,
            values,
            solve_calls: 0,
            solved: false,
        }
    }
}

impl SolverBackend for ScriptedBackend {
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
        self.solve_calls += 1;
        self.solved = self.status.has_solution();
        self.status.clone()
    }

    fn value_of(&self, variable: VariableHandle) -> Option<f64> {
        if !self.solved {
            return None;
        }
        self.values.get(variable.index()).copied()
    }

    fn name(&self) -> &str {
        "Scripted"
    }
}

/// 3 students, a metro and a rural school with 2 places per year, one pathway with 3 places.
/// Every student ranks the metro school first in both years.
pub(crate) fn sample_input() -> PlacementInput {
    PlacementInput {
        schools: vec![
            School::with_capacity("metro", 2, RegionCategory::Metro),
            School::with_capacity("rural", 2, RegionCategory::Rural),
        ],
        pathways: vec![Pathway::new("arts", 3)],
        students: (0..3)
            .map(|i| Student {
                id: format!("s{}", i),
                year4_ranks: vec![1, 2],
                year5_ranks: vec![1, 2],
                pathway_ranks: vec![1],
                year4_scale: 1,
                year5_scale: 1,
                pathway_scale: 1,
            })
            .collect(),
    }
}
