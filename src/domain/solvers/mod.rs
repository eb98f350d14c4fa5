#[cfg(feature = "glpk-solver")]
pub mod glpk_solver;

#[cfg(feature = "highs-solver")]
pub mod highs_solver;

#[cfg(feature = "glpk-solver")]
pub use glpk_solver::GlpkSolver;

#[cfg(feature = "highs-solver")]
pub use highs_solver::HighsSolver;
