use crate::models::SolverDirection;

/// Opaque handle to a decision variable registered with a backend.
/// Handles are dense: the n-th registered variable has index n.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableHandle(pub(crate) usize);

impl VariableHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Linear combination of variables, stored as sparse `(variable, coefficient)` terms
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VariableHandle, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        LinearExpr {
            terms: Vec::with_capacity(capacity),
        }
    }

    pub fn add_term(&mut self, variable: VariableHandle, coefficient: f64) {
        self.terms.push((variable, coefficient));
    }

    pub fn terms(&self) -> &[(VariableHandle, f64)] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Sum of `coefficient * value(variable)` over every term
    pub fn evaluate(&self, mut value: impl FnMut(VariableHandle) -> f64) -> f64 {
        self.terms
            .iter()
            .map(|&(variable, coefficient)| coefficient * value(variable))
            .sum()
    }

    /// Unit-coefficient sum of the given variables
    pub fn sum(variables: impl IntoIterator<Item = VariableHandle>) -> Self {
        variables.into_iter().map(|v| (v, 1.0)).collect()
    }
}

impl FromIterator<(VariableHandle, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VariableHandle, f64)>>(iter: I) -> Self {
        LinearExpr {
            terms: iter.into_iter().collect(),
        }
    }
}

impl Extend<(VariableHandle, f64)> for LinearExpr {
    fn extend<I: IntoIterator<Item = (VariableHandle, f64)>>(&mut self, iter: I) {
        self.terms.extend(iter);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Equal,
    LessOrEqual,
    GreaterOrEqual,
}

impl Relation {
    /// Whether `lhs <relation> rhs` holds within `tolerance`
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Relation::Equal => (lhs - rhs).abs() <= tolerance,
            Relation::LessOrEqual => lhs <= rhs + tolerance,
            Relation::GreaterOrEqual => lhs + tolerance >= rhs,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub expression: LinearExpr,
    pub relation: Relation,
    pub bound: f64,
}

/// Accumulating registry of binary variables, constraints, and one objective.
///
/// Backends embed a `LinearModel` and translate it into their native form
/// when asked to solve. Registration takes `&mut self`, so there is only ever
/// a single writer.
#[derive(Debug, Clone, Default)]
pub struct LinearModel {
    num_variables: usize,
    constraints: Vec<LinearConstraint>,
    objective: Option<(LinearExpr, SolverDirection)>,
}

impl LinearModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_binary_variable(&mut self) -> VariableHandle {
        let handle = VariableHandle(self.num_variables);
        self.num_variables += 1;
        handle
    }

    pub fn add_linear_constraint(&mut self, expression: LinearExpr, relation: Relation, bound: f64) {
        self.constraints.push(LinearConstraint {
            expression,
            relation,
            bound,
        });
    }

    /// Replaces any previously set objective
    pub fn set_objective(&mut self, expression: LinearExpr, direction: SolverDirection) {
        self.objective = Some((expression, direction));
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> Option<(&LinearExpr, SolverDirection)> {
        self.objective.as_ref().map(|(expr, direction)| (expr, *direction))
    }

    /// Dense objective coefficients, one per variable (zero where absent)
    pub fn objective_coefficients(&self) -> Vec<f64> {
        let mut coefficients = vec![0.0; self.num_variables];
        if let Some((expr, _)) = &self.objective {
            for &(variable, coefficient) in expr.terms() {
                coefficients[variable.index()] += coefficient;
            }
        }
        coefficients
    }

    pub fn direction(&self) -> SolverDirection {
        self.objective
            .as_ref()
            .map(|(_, direction)| *direction)
            .unwrap_or(SolverDirection::Minimize)
    }
}
