use crate::domain::linear::{LinearExpr, Relation, VariableHandle};
use crate::domain::solver::SolverBackend;
use crate::models::{Dimension, PlacementInput};

/// Dense student x slot arena of variable handles for one dimension
#[derive(Debug, Clone, PartialEq)]
pub struct VariableGrid {
    slots: usize,
    handles: Vec<VariableHandle>,
}

impl VariableGrid {
    fn register(backend: &mut dyn SolverBackend, students: usize, slots: usize) -> Self {
        let handles = (0..students * slots)
            .map(|_| backend.create_binary_variable())
            .collect();
        VariableGrid { slots, handles }
    }

    pub fn get(&self, student: usize, slot: usize) -> VariableHandle {
        self.handles[student * self.slots + slot]
    }

    /// All of one student's variables, in slot order
    pub fn row(&self, student: usize) -> &[VariableHandle] {
        &self.handles[student * self.slots..(student + 1) * self.slots]
    }

    /// Every student's variable for one slot, in student order
    pub fn column(&self, slot: usize) -> impl Iterator<Item = VariableHandle> + '_ {
        self.handles.iter().skip(slot).step_by(self.slots.max(1)).copied()
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn students(&self) -> usize {
        if self.slots == 0 {
            0
        } else {
            self.handles.len() / self.slots
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Decision variables of a registered placement model, one family per dimension
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementModel {
    pub year4: VariableGrid,
    pub year5: VariableGrid,
    pub pathway: VariableGrid,
}

impl PlacementModel {
    pub fn grid(&self, dimension: Dimension) -> &VariableGrid {
        match dimension {
            Dimension::Year4 => &self.year4,
            Dimension::Year5 => &self.year5,
            Dimension::Pathway => &self.pathway,
        }
    }
}

/// Register variables and constraints for a validated input.
///
/// Emits, in order: exactly-one rows per student and dimension plus the
/// metro-coverage row per student, then capacity rows per school year and
/// per pathway.
pub fn build_model(backend: &mut dyn SolverBackend, input: &PlacementInput) -> PlacementModel {
    let students = input.students.len();
    let model = PlacementModel {
        year4: VariableGrid::register(backend, students, input.schools.len()),
        year5: VariableGrid::register(backend, students, input.schools.len()),
        pathway: VariableGrid::register(backend, students, input.pathways.len()),
    };

    let metro: Vec<usize> = input
        .schools
        .iter()
        .enumerate()
        .filter(|(_, school)| school.region.is_metro())
        .map(|(j, _)| j)
        .collect();

    for student in 0..students {
        for dimension in Dimension::ALL {
            let row = model.grid(dimension).row(student);
            backend.add_linear_constraint(LinearExpr::sum(row.iter().copied()), Relation::Equal, 1.0);
        }

        let coverage = LinearExpr::sum(
            metro
                .iter()
                .flat_map(|&j| [model.year4.get(student, j), model.year5.get(student, j)]),
        );
        backend.add_linear_constraint(coverage, Relation::GreaterOrEqual, 1.0);
    }

    for dimension in Dimension::ALL {
        let grid = model.grid(dimension);
        for slot in 0..grid.slots() {
            backend.add_linear_constraint(
                LinearExpr::sum(grid.column(slot)),
                Relation::LessOrEqual,
                input.slot_capacity(dimension, slot) as f64,
            );
        }
    }

    log::debug!(
        "Registered {} variables for {} students with {}",
        model.year4.len() + model.year5.len() + model.pathway.len(),
        students,
        backend.name()
    );

    model
}
