use crate::domain::solver::SolverBackend;

#[cfg(feature = "glpk-solver")]
use crate::domain::solvers::GlpkSolver;

#[cfg(feature = "highs-solver")]
use crate::domain::solvers::HighsSolver;

/// Available solver backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverType {
    #[cfg(feature = "glpk-solver")]
    Glpk,
    #[cfg(feature = "highs-solver")]
    Highs,
}

impl SolverType {
    /// Parse solver type from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            #[cfg(feature = "glpk-solver")]
            "glpk" => Some(SolverType::Glpk),
            #[cfg(feature = "highs-solver")]
            "highs" => Some(SolverType::Highs),
            _ => None,
        }
    }

    /// Names accepted by `from_str` in this build
    pub fn available() -> Vec<&'static str> {
        vec![
            #[cfg(feature = "glpk-solver")]
            "glpk",
            #[cfg(feature = "highs-solver")]
            "highs",
        ]
    }
}

/// Create a solver instance based on the specified type
pub fn create_solver(solver_type: SolverType) -> Box<dyn SolverBackend> {
    match solver_type {
        #[cfg(feature = "glpk-solver")]
        SolverType::Glpk => Box::new(GlpkSolver::new()),
        #[cfg(feature = "highs-solver")]
        SolverType::Highs => Box::new(HighsSolver::new()),
    }
}
