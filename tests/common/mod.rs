#![allow(dead_code)]

use school_placements::domain::linear::{
    LinearConstraint, LinearExpr, LinearModel, Relation, VariableHandle,
};
use school_placements::domain::normalize::{cost_coefficient, NormalizerConfig};
use school_placements::models::SolverDirection;
use school_placements::{
    BackendStatus, Dimension, Pathway, PlacementInput, PlacementOutcome, RegionCategory, School,
    SolverBackend, Student,
};

const EPS: f64 = 1e-9;

/// Depth-first search over every 0/1 assignment, pruning rows that can no
/// longer hold and branches that cannot beat the incumbent. Only meant for
/// the handful of variables used in tests.
#[derive(Default)]
pub struct ExhaustiveBackend {
    model: LinearModel,
    solution: Option<Vec<f64>>,
    pub solve_calls: usize,
}

impl ExhaustiveBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_variables(&self) -> usize {
        self.model.num_variables()
    }

    pub fn num_constraints(&self) -> usize {
        self.model.constraints().len()
    }
}

struct Search<'a> {
    constraints: &'a [LinearConstraint],
    incidence: Vec<Vec<(usize, f64)>>,
    costs: Vec<f64>,
    /// Most negative cost still reachable from variable i onwards
    suffix_gain: Vec<f64>,
    lhs: Vec<f64>,
    rem_min: Vec<f64>,
    rem_max: Vec<f64>,
    current: Vec<f64>,
    cost: f64,
    best: Option<(f64, Vec<f64>)>,
}

impl Search<'_> {
    fn row_possible(&self, row: usize) -> bool {
        let c = &self.constraints[row];
        let low = self.lhs[row] + self.rem_min[row];
        let high = self.lhs[row] + self.rem_max[row];
        match c.relation {
            Relation::Equal => low <= c.bound + EPS && high + EPS >= c.bound,
            Relation::LessOrEqual => low <= c.bound + EPS,
            Relation::GreaterOrEqual => high + EPS >= c.bound,
        }
    }

    fn dfs(&mut self, i: usize) {
        if let Some((best, _)) = &self.best {
            if self.cost + self.suffix_gain[i] >= *best - EPS {
                return;
            }
        }
        if i == self.costs.len() {
            self.best = Some((self.cost, self.current.clone()));
            return;
        }

        for value in [0.0, 1.0] {
            for &(row, coef) in &self.incidence[i] {
                self.lhs[row] += coef * value;
                self.rem_min[row] -= coef.min(0.0);
                self.rem_max[row] -= coef.max(0.0);
            }
            self.current[i] = value;
            self.cost += self.costs[i] * value;

            if self.incidence[i].iter().all(|&(row, _)| self.row_possible(row)) {
                self.dfs(i + 1);
            }

            self.cost -= self.costs[i] * value;
            self.current[i] = 0.0;
            for &(row, coef) in &self.incidence[i] {
                self.lhs[row] -= coef * value;
                self.rem_min[row] += coef.min(0.0);
                self.rem_max[row] += coef.max(0.0);
            }
        }
    }
}

impl SolverBackend for ExhaustiveBackend {
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
        self.solution = None;

        let n = self.model.num_variables();
        let constraints = self.model.constraints();
        let sign = match self.model.direction() {
            SolverDirection::Minimize => 1.0,
            SolverDirection::Maximize => -1.0,
        };
        let costs: Vec<f64> = self
            .model
            .objective_coefficients()
            .into_iter()
            .map(|c| c * sign)
            .collect();

        let mut incidence = vec![Vec::new(); n];
        let mut rem_min = vec![0.0; constraints.len()];
        let mut rem_max = vec![0.0; constraints.len()];
        for (row, constraint) in constraints.iter().enumerate() {
            for &(variable, coef) in constraint.expression.terms() {
                incidence[variable.index()].push((row, coef));
                rem_min[row] += coef.min(0.0);
                rem_max[row] += coef.max(0.0);
            }
        }

        let mut suffix_gain = vec![0.0; n + 1];
        for i in (0..n).rev() {
            suffix_gain[i] = suffix_gain[i + 1] + costs[i].min(0.0);
        }

        let mut search = Search {
            constraints,
            incidence,
            costs,
            suffix_gain,
            lhs: vec![0.0; constraints.len()],
            rem_min,
            rem_max,
            current: vec![0.0; n],
            cost: 0.0,
            best: None,
        };

        // rows without variables are never revisited during the search
        let rows_possible = (0..constraints.len()).all(|row| search.row_possible(row));
        if rows_possible {
            search.dfs(0);
        }

        match search.best {
            Some((_, values)) => {
                self.solution = Some(values);
                BackendStatus::Optimal
            }
            None => BackendStatus::Infeasible,
        }
    }

    fn value_of(&self, variable: VariableHandle) -> Option<f64> {
        self.solution.as_ref()?.get(variable.index()).copied()
    }

    fn name(&self) -> &str {
        "Exhaustive"
    }
}

pub fn student(id: &str, year4: Vec<u32>, year5: Vec<u32>, pathway: Vec<u32>) -> Student {
    Student {
        id: id.to_string(),
        year4_ranks: year4,
        year5_ranks: year5,
        pathway_ranks: pathway,
        year4_scale: 1,
        year5_scale: 1,
        pathway_scale: 1,
    }
}

/// 3 students, a metro and a rural school with 2 places per year, one pathway
/// with 3 places; everyone ranks the metro school first in both years.
pub fn scenario_a() -> PlacementInput {
    PlacementInput {
        schools: vec![
            School::with_capacity("metro", 2, RegionCategory::Metro),
            School::with_capacity("rural", 2, RegionCategory::Rural),
        ],
        pathways: vec![Pathway::new("arts", 3)],
        students: (1..=3)
            .map(|i| student(&format!("student{}", i), vec![1, 2], vec![1, 2], vec![1]))
            .collect(),
    }
}

/// Panics unless every student has one slot per dimension, no slot is over
/// capacity, and every student has a metro school in some year.
pub fn assert_valid(input: &PlacementInput, outcome: &PlacementOutcome) {
    assert_eq!(outcome.assignments.len(), input.students.len());

    let index = |dimension: Dimension, id: &str| -> usize {
        (0..input.slot_count(dimension))
            .find(|&slot| input.slot_id(dimension, slot) == id)
            .unwrap_or_else(|| panic!("unknown {} slot {}", dimension, id))
    };

    let mut load = [
        vec![0u32; input.schools.len()],
        vec![0u32; input.schools.len()],
        vec![0u32; input.pathways.len()],
    ];
    for (assignment, student) in outcome.assignments.iter().zip(&input.students) {
        assert_eq!(assignment.student_id, student.id);
        let y4 = index(Dimension::Year4, &assignment.year4_school_id);
        let y5 = index(Dimension::Year5, &assignment.year5_school_id);
        let p = index(Dimension::Pathway, &assignment.pathway_id);
        load[0][y4] += 1;
        load[1][y5] += 1;
        load[2][p] += 1;
        assert!(
            input.schools[y4].region.is_metro() || input.schools[y5].region.is_metro(),
            "student {} has no metro year",
            student.id
        );
    }

    for (d, dimension) in Dimension::ALL.into_iter().enumerate() {
        for (slot, &count) in load[d].iter().enumerate() {
            assert!(count <= input.slot_capacity(dimension, slot));
        }
    }
}

/// Optimal objective found by enumerating every per-student slot triple,
/// independent of the linear model. `None` when no valid assignment exists.
pub fn brute_force_optimum(input: &PlacementInput, config: &NormalizerConfig) -> Option<f64> {
    let cost = |s: &Student, dimension: Dimension, slot: usize| -> f64 {
        let factor = match config.rural_scaling {
            Some(r) if r.dimension == dimension => r.factor,
            _ => 1.0,
        };
        cost_coefficient(s.ranks(dimension)[slot], s.scale(dimension), &config.scaling).unwrap() * factor
    };

    fn walk(
        input: &PlacementInput,
        student: usize,
        load: &mut [Vec<u32>; 3],
        total: f64,
        best: &mut Option<f64>,
        cost: &dyn Fn(&Student, Dimension, usize) -> f64,
    ) {
        if student == input.students.len() {
            if best.map_or(true, |b| total < b) {
                *best = Some(total);
            }
            return;
        }
        let s = &input.students[student];
        for y4 in 0..input.schools.len() {
            for y5 in 0..input.schools.len() {
                if !input.schools[y4].region.is_metro() && !input.schools[y5].region.is_metro() {
                    continue;
                }
                for p in 0..input.pathways.len() {
                    if load[0][y4] >= input.schools[y4].year4_capacity
                        || load[1][y5] >= input.schools[y5].year5_capacity
                        || load[2][p] >= input.pathways[p].capacity
                    {
                        continue;
                    }
                    load[0][y4] += 1;
                    load[1][y5] += 1;
                    load[2][p] += 1;
                    let here = cost(s, Dimension::Year4, y4)
                        + cost(s, Dimension::Year5, y5)
                        + cost(s, Dimension::Pathway, p);
                    walk(input, student + 1, load, total + here, best, cost);
                    load[0][y4] -= 1;
                    load[1][y5] -= 1;
                    load[2][p] -= 1;
                }
            }
        }
    }

    let mut load = [
        vec![0u32; input.schools.len()],
        vec![0u32; input.schools.len()],
        vec![0u32; input.pathways.len()],
    ];
    let mut best = None;
    walk(input, 0, &mut load, 0.0, &mut best, &cost);
    best
}
