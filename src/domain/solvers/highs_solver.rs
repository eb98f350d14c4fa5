use crate::domain::linear::{LinearExpr, LinearModel, Relation, VariableHandle};
use crate::domain::solver::{BackendStatus, SolverBackend};
use crate::models::SolverDirection;

use ::highs::{ColProblem, HighsModelStatus, Sense};

const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// HiGHS solver implementation
#[derive(Default)]
pub struct HighsSolver {
    model: LinearModel,
    solution: Option<Vec<f64>>,
}

impl HighsSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert HiGHS status to a backend status. A stopped search counts as
    /// feasible only when it left a point satisfying every row.
    fn convert_status(model_status: HighsModelStatus, has_incumbent: bool) -> BackendStatus {
        match model_status {
            HighsModelStatus::Optimal => BackendStatus::Optimal,
            HighsModelStatus::ReachedTimeLimit | HighsModelStatus::ReachedIterationLimit
                if has_incumbent =>
            {
                BackendStatus::Feasible
            }
            stopped @ (HighsModelStatus::ReachedTimeLimit
            | HighsModelStatus::ReachedIterationLimit) => BackendStatus::Error(format!(
                "HiGHS stopped with status {:?} before finding a feasible assignment",
                stopped
            )),
            HighsModelStatus::Infeasible => BackendStatus::Infeasible,
            other => BackendStatus::Error(format!("HiGHS finished with status {:?}", other)),
        }
    }
}

/// Whether `values` is a binary point satisfying every constraint of `model`
fn is_feasible_point(model: &LinearModel, values: &[f64]) -> bool {
    if values.len() != model.num_variables() {
        return false;
    }
    let binary = values
        .iter()
        .all(|v| v.abs() <= FEASIBILITY_TOLERANCE || (v - 1.0).abs() <= FEASIBILITY_TOLERANCE);
    binary
        && model.constraints().iter().all(|c| {
            let lhs = c.expression.evaluate(|variable| values[variable.index()]);
            c.relation.holds(lhs, c.bound, FEASIBILITY_TOLERANCE)
        })
}

impl SolverBackend for HighsSolver {
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

        let mut problem = ColProblem::new();

        // First, add all constraint rows
        let mut rows = Vec::with_capacity(self.model.constraints().len());
        for constraint in self.model.constraints() {
            let bound = constraint.bound;
            let row = match constraint.relation {
                Relation::Equal => problem.add_row(bound..=bound),
                Relation::LessOrEqual => problem.add_row(..=bound),
                Relation::GreaterOrEqual => problem.add_row(bound..),
            };
            rows.push(row);
        }

        // Build sparse matrix data: for each column, collect its row entries
        let n_cols = self.model.num_variables();
        let mut col_data: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n_cols];
        for (row_idx, constraint) in self.model.constraints().iter().enumerate() {
            for &(variable, coefficient) in constraint.expression.terms() {
                col_data[variable.index()].push((row_idx, coefficient));
            }
        }

        let objective = self.model.objective_coefficients();
        for (col_idx, entries) in col_data.iter().enumerate() {
            let row_factors: Vec<_> = entries
                .iter()
                .map(|(row_idx, val)| (rows[*row_idx], *val))
                .collect();
            problem.add_integer_column(objective[col_idx], 0.0..=1.0, &row_factors);
        }

        let sense = match self.model.direction() {
            SolverDirection::Maximize => Sense::Maximise,
            SolverDirection::Minimize => Sense::Minimise,
        };

        let mut model = problem.optimise(sense);
        model.set_option("output_flag", false);
        let solved = model.solve();

        let values = solved.get_solution().columns().to_vec();
        let status = Self::convert_status(solved.status(), is_feasible_point(&self.model, &values));
        if status.has_solution() {
            self.solution = Some(values);
        }
        status
    }

    fn value_of(&self, variable: VariableHandle) -> Option<f64> {
        self.solution.as_ref()?.get(variable.index()).copied()
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}
