//! # School placements
//!
//! Assigns a cohort of students to a Year 4 school, a Year 5 school and a
//! pathway by minimizing their summed, scaled preference ranks as a 0/1
//! integer linear program, subject to capacities and the rule that every
//! student spends at least one school year at a metro school.
//!
//! The model is built against the [`SolverBackend`](domain::solver::SolverBackend)
//! trait, so any ILP backend can be plugged in. GLPK is the default.
//!
//! ```no_run
//! use school_placements::domain::normalize::NormalizerConfig;
//! use school_placements::domain::solve::solve_placements;
//! use school_placements::domain::solver_factory::{create_solver, SolverType};
//! use school_placements::loader::load_input;
//!
//! let input = load_input("schools.csv", "pathways.csv", "students.csv")?;
//! let mut backend = create_solver(SolverType::Glpk);
//! let outcome = solve_placements(backend.as_mut(), &input, &NormalizerConfig::default())?;
//! println!("{} students placed", outcome.assignments.len());
//! # Ok::<(), school_placements::error::PlacementError>(())
//! ```

pub mod cache;
pub mod config;
pub mod convert;
pub mod domain;
pub mod error;
pub mod loader;
pub mod models;
pub mod report;
pub mod server;

pub use domain::normalize::{NormalizerConfig, RuralScaling, ScalingTable};
pub use domain::solve::solve_placements;
pub use domain::solver::{BackendStatus, SolverBackend};
pub use error::{PlacementError, Result};
pub use models::{
    Dimension, Pathway, PlacementInput, PlacementOutcome, PlacementStatus, RegionCategory, School,
    Student, StudentAssignment,
};
