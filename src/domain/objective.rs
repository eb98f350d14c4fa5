use crate::domain::linear::LinearExpr;
use crate::domain::model::PlacementModel;
use crate::domain::normalize::PlacementCosts;
use crate::domain::solver::SolverBackend;
use crate::models::{Dimension, SolverDirection};

/// One scalarized cost expression over all three variable families.
/// Cross-dimension trade-offs are left to the solver.
pub fn compose_objective(model: &PlacementModel, costs: &PlacementCosts) -> LinearExpr {
    let size = model.year4.len() + model.year5.len() + model.pathway.len();
    let mut objective = LinearExpr::with_capacity(size);

    for dimension in Dimension::ALL {
        let grid = model.grid(dimension);
        let matrix = costs.dimension(dimension);
        for student in 0..grid.students() {
            objective.extend(
                grid.row(student)
                    .iter()
                    .copied()
                    .zip(matrix.row(student).iter().copied()),
            );
        }
    }

    objective
}

pub fn apply_objective(backend: &mut dyn SolverBackend, model: &PlacementModel, costs: &PlacementCosts) {
    backend.set_objective(compose_objective(model, costs), SolverDirection::Minimize);
}

/// Cost of a chosen `(year4, year5, pathway)` slot triple per student
pub fn assignment_cost(costs: &PlacementCosts, choices: &[[usize; 3]]) -> f64 {
    choices
        .iter()
        .enumerate()
        .map(|(student, picked)| {
            Dimension::ALL
                .iter()
                .zip(picked.iter())
                .map(|(&dimension, &slot)| costs.dimension(dimension).get(student, slot))
                .sum::<f64>()
        })
        .sum()
}
