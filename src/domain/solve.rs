use crate::domain::linear::VariableHandle;
use crate::domain::model::{build_model, PlacementModel, VariableGrid};
use crate::domain::normalize::{normalize, NormalizerConfig};
use crate::domain::objective::{apply_objective, assignment_cost};
use crate::domain::solver::{BackendStatus, SolverBackend};
use crate::domain::validate::check_feasibility;
use crate::error::{PlacementError, Result};
use crate::models::{Dimension, PlacementInput, PlacementOutcome, PlacementStatus, StudentAssignment};

/// Distance from 0 or 1 within which a solved value counts as integral
pub const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Validate, model, and solve one placement run on the given backend.
///
/// Infeasibility and backend failures yield `NoFeasibleAssignment`; no
/// partial assignment is ever returned.
pub fn solve_placements(
    backend: &mut dyn SolverBackend,
    input: &PlacementInput,
    config: &NormalizerConfig,
) -> Result<PlacementOutcome> {
    check_feasibility(input)?;
    let costs = normalize(&input.students, config)?;

    if input.students.is_empty() {
        log::debug!("Empty cohort, nothing to solve");
        return Ok(PlacementOutcome {
            status: PlacementStatus::Optimal,
            objective: 0.0,
            assignments: Vec::new(),
        });
    }

    let model = build_model(backend, input);
    apply_objective(backend, &model, &costs);

    log::info!(
        "Solving placements for {} students, {} schools, {} pathways with {}",
        input.students.len(),
        input.schools.len(),
        input.pathways.len(),
        backend.name()
    );

    let status = match backend.solve() {
        BackendStatus::Optimal => PlacementStatus::Optimal,
        BackendStatus::Feasible => {
            log::warn!(
                "{} found a feasible assignment but could not prove it optimal",
                backend.name()
            );
            PlacementStatus::FeasibleApproximate
        }
        BackendStatus::Infeasible => {
            log::info!("{} proved the model infeasible", backend.name());
            return Err(PlacementError::NoFeasibleAssignment(
                "No possible assignment satisfies every constraint".to_string(),
            ));
        }
        BackendStatus::Error(details) => {
            log::error!("{} failed: {}", backend.name(), details);
            return Err(PlacementError::NoFeasibleAssignment(format!(
                "{} failed: {}",
                backend.name(),
                details
            )));
        }
    };

    let choices = extract_choices(&*backend, &model)?;
    verify_choices(input, &choices)?;

    let assignments = choices
        .iter()
        .zip(&input.students)
        .map(|(picked, student)| StudentAssignment {
            student_id: student.id.clone(),
            year4_school_id: input.slot_id(Dimension::Year4, picked[0]).to_string(),
            year5_school_id: input.slot_id(Dimension::Year5, picked[1]).to_string(),
            pathway_id: input.slot_id(Dimension::Pathway, picked[2]).to_string(),
        })
        .collect();

    let objective = assignment_cost(&costs, &choices);
    log::info!("Placement solve finished: {} (objective {:.3})", status, objective);

    Ok(PlacementOutcome {
        status,
        objective,
        assignments,
    })
}

/// Chosen slot index per student for Year 4, Year 5 and pathway
pub fn extract_choices(backend: &dyn SolverBackend, model: &PlacementModel) -> Result<Vec<[usize; 3]>> {
    (0..model.year4.students())
        .map(|student| {
            Ok([
                extract_choice(backend, &model.year4, student, Dimension::Year4)?,
                extract_choice(backend, &model.year5, student, Dimension::Year5)?,
                extract_choice(backend, &model.pathway, student, Dimension::Pathway)?,
            ])
        })
        .collect()
}

fn extract_choice(
    backend: &dyn SolverBackend,
    grid: &VariableGrid,
    student: usize,
    dimension: Dimension,
) -> Result<usize> {
    let mut chosen = None;
    for (slot, &variable) in grid.row(student).iter().enumerate() {
        if solved_bit(backend, variable)? {
            if chosen.is_some() {
                return Err(PlacementError::ModelExtraction(format!(
                    "Student {} has more than one {} slot selected",
                    student, dimension
                )));
            }
            chosen = Some(slot);
        }
    }
    chosen.ok_or_else(|| {
        PlacementError::ModelExtraction(format!(
            "Student {} has no {} slot selected",
            student, dimension
        ))
    })
}

fn solved_bit(backend: &dyn SolverBackend, variable: VariableHandle) -> Result<bool> {
    let value = backend.value_of(variable).ok_or_else(|| {
        PlacementError::ModelExtraction(format!(
            "{} returned no value for variable {}",
            backend.name(),
            variable.index()
        ))
    })?;
    if (value - 1.0).abs() <= INTEGRALITY_TOLERANCE {
        Ok(true)
    } else if value.abs() <= INTEGRALITY_TOLERANCE {
        Ok(false)
    } else {
        Err(PlacementError::ModelExtraction(format!(
            "Variable {} has non-binary value {}",
            variable.index(),
            value
        )))
    }
}

/// Re-check capacity and metro coverage on extracted choices
pub fn verify_choices(input: &PlacementInput, choices: &[[usize; 3]]) -> Result<()> {
    for (d, dimension) in Dimension::ALL.into_iter().enumerate() {
        let mut load = vec![0u32; input.slot_count(dimension)];
        for picked in choices {
            load[picked[d]] += 1;
        }
        for (slot, &count) in load.iter().enumerate() {
            let capacity = input.slot_capacity(dimension, slot);
            if count > capacity {
                return Err(PlacementError::ModelExtraction(format!(
                    "{} slot {} holds {} students but has capacity {}",
                    dimension,
                    input.slot_id(dimension, slot),
                    count,
                    capacity
                )));
            }
        }
    }

    for (picked, student) in choices.iter().zip(&input.students) {
        let metro = input.schools[picked[0]].region.is_metro() || input.schools[picked[1]].region.is_metro();
        if !metro {
            return Err(PlacementError::ModelExtraction(format!(
                "Student {} has no metro school in either year",
                student.id
            )));
        }
    }

    Ok(())
}
