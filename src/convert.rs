use crate::domain::linear::{LinearModel, Relation};

#[cfg(feature = "glpk-solver")]
use glpk_rust::{
    Bound, IntegerSparseMatrix as GlpkMatrix, SparseLEIntegerPolyhedron as GlpkPoly,
    Status as GlpkStatus, Variable as GlpkVar,
};

#[cfg(feature = "glpk-solver")]
use crate::domain::solver::BackendStatus;

/// Integer `A x <= b` rows in coordinate format
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeRows {
    pub rows: Vec<i32>,
    pub cols: Vec<i32>,
    pub vals: Vec<i32>,
    pub b: Vec<i32>,
    /// An empty constraint that can never hold was dropped
    pub trivially_infeasible: bool,
}

impl LeRows {
    pub fn nrows(&self) -> usize {
        self.b.len()
    }

    fn push_row(&mut self, entries: &[(i32, i32)], rhs: i32, negate: bool) {
        let row = self.b.len() as i32;
        let sign = if negate { -1 } else { 1 };
        for &(col, val) in entries {
            self.rows.push(row);
            self.cols.push(col);
            self.vals.push(sign * val);
        }
        self.b.push(sign * rhs);
    }
}

/// Flatten a model's constraints into `<=` rows: `>=` rows are negated and
/// `=` rows become a `<=` row plus a negated one. Constraint coefficients and
/// bounds must be integral.
pub fn to_le_rows(model: &LinearModel) -> Result<LeRows, String> {
    let mut out = LeRows::default();

    for (index, constraint) in model.constraints().iter().enumerate() {
        if constraint.expression.is_empty() {
            if !constraint.relation.holds(0.0, constraint.bound, 0.0) {
                out.trivially_infeasible = true;
            }
            continue;
        }

        let entries = constraint
            .expression
            .terms()
            .iter()
            .map(|&(variable, coefficient)| Ok((variable.index() as i32, to_integer(coefficient)?)))
            .collect::<Result<Vec<(i32, i32)>, String>>()
            .map_err(|e| format!("constraint {}: {}", index, e))?;
        let rhs = to_integer(constraint.bound).map_err(|e| format!("constraint {}: {}", index, e))?;

        match constraint.relation {
            Relation::LessOrEqual => out.push_row(&entries, rhs, false),
            Relation::GreaterOrEqual => out.push_row(&entries, rhs, true),
            Relation::Equal => {
                out.push_row(&entries, rhs, false);
                out.push_row(&entries, rhs, true);
            }
        }
    }

    Ok(out)
}

fn to_integer(value: f64) -> Result<i32, String> {
    if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return Err(format!("coefficient {} is not a 32-bit integer", value));
    }
    Ok(value as i32)
}

/// Column ids handed to GLPK, one per variable
pub fn variable_ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("x{}", i)).collect()
}

/// Build a borrowed GLPK LE polyhedron of binary variables.
#[cfg(feature = "glpk-solver")]
pub fn to_glpk_polyhedron<'a>(le: &LeRows, ids: &'a [String]) -> GlpkPoly<'a> {
    let a = GlpkMatrix {
        rows: le.rows.clone(),
        cols: le.cols.clone(),
        vals: le.vals.clone(),
    };
    let b: Vec<Bound> = le.b.iter().map(|&v| (0, v)).collect();

    let variables: Vec<GlpkVar<'a>> = ids
        .iter()
        .map(|id| GlpkVar {
            id: id.as_str(),
            bound: (0, 1),
        })
        .collect();

    GlpkPoly {
        a,
        b,
        variables,
        double_bound: false,
    }
}

#[cfg(feature = "glpk-solver")]
impl From<GlpkStatus> for BackendStatus {
    fn from(s: GlpkStatus) -> Self {
        match s {
            GlpkStatus::Optimal => BackendStatus::Optimal,
            GlpkStatus::Feasible => BackendStatus::Feasible,
            GlpkStatus::Infeasible | GlpkStatus::NoFeasible | GlpkStatus::EmptySpace => {
                BackendStatus::Infeasible
            }
            GlpkStatus::Undefined => BackendStatus::Error("GLPK status undefined".to_string()),
            GlpkStatus::Unbounded => BackendStatus::Error("GLPK reported an unbounded model".to_string()),
            GlpkStatus::SimplexFailed => BackendStatus::Error("GLPK simplex failed".to_string()),
            GlpkStatus::MIPFailed => BackendStatus::Error("GLPK MIP search failed".to_string()),
        }
    }
}
