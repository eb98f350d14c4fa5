use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::normalize::RuralScaling;

// ---------- Input records: owned & serde-friendly ----------

/// Region category of a school. At least one of a student's two school
/// years must be spent at a `Metro` school.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegionCategory {
    Metro,
    Rural,
}

impl RegionCategory {
    /// Parse `M`/`Metro` or `R`/`Rural` (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "m" | "metro" => Some(RegionCategory::Metro),
            "r" | "rural" => Some(RegionCategory::Rural),
            _ => None,
        }
    }

    pub fn is_metro(self) -> bool {
        self == RegionCategory::Metro
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct School {
    pub id: String,
    pub year4_capacity: u32,
    pub year5_capacity: u32,
    pub region: RegionCategory,
}

impl School {
    /// A school offering the same number of places in both years
    pub fn with_capacity(id: impl Into<String>, capacity: u32, region: RegionCategory) -> Self {
        School {
            id: id.into(),
            year4_capacity: capacity,
            year5_capacity: capacity,
            region,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Pathway {
    pub id: String,
    pub capacity: u32,
}

impl Pathway {
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        Pathway {
            id: id.into(),
            capacity,
        }
    }
}

/// One student's ranked preferences. Rank lists correspond positionally to
/// the school and pathway lists of the same [`PlacementInput`]; lower ranks
/// are preferred. Scale indicators are 1-based indexes into the scaling table.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Student {
    pub id: String,
    pub year4_ranks: Vec<u32>,
    pub year5_ranks: Vec<u32>,
    pub pathway_ranks: Vec<u32>,
    pub year4_scale: u32,
    pub year5_scale: u32,
    pub pathway_scale: u32,
}

impl Student {
    pub fn ranks(&self, dimension: Dimension) -> &[u32] {
        match dimension {
            Dimension::Year4 => &self.year4_ranks,
            Dimension::Year5 => &self.year5_ranks,
            Dimension::Pathway => &self.pathway_ranks,
        }
    }

    pub fn scale(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Year4 => self.year4_scale,
            Dimension::Year5 => self.year5_scale,
            Dimension::Pathway => self.pathway_scale,
        }
    }
}

/// The three independent placement axes
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Year4,
    Year5,
    Pathway,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Year4, Dimension::Year5, Dimension::Pathway];

    /// Parse dimension name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "year4" | "y4" => Some(Dimension::Year4),
            "year5" | "y5" => Some(Dimension::Year5),
            "pathway" | "path" => Some(Dimension::Pathway),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Year4 => write!(f, "year4"),
            Dimension::Year5 => write!(f, "year5"),
            Dimension::Pathway => write!(f, "pathway"),
        }
    }
}

/// Everything one solve consumes. Immutable for the duration of the solve.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PlacementInput {
    pub schools: Vec<School>,
    pub pathways: Vec<Pathway>,
    pub students: Vec<Student>,
}

impl PlacementInput {
    /// Number of slots in a dimension
    pub fn slot_count(&self, dimension: Dimension) -> usize {
        match dimension {
            Dimension::Year4 | Dimension::Year5 => self.schools.len(),
            Dimension::Pathway => self.pathways.len(),
        }
    }

    pub fn slot_capacity(&self, dimension: Dimension, slot: usize) -> u32 {
        match dimension {
            Dimension::Year4 => self.schools[slot].year4_capacity,
            Dimension::Year5 => self.schools[slot].year5_capacity,
            Dimension::Pathway => self.pathways[slot].capacity,
        }
    }

    pub fn slot_id(&self, dimension: Dimension, slot: usize) -> &str {
        match dimension {
            Dimension::Year4 | Dimension::Year5 => &self.schools[slot].id,
            Dimension::Pathway => &self.pathways[slot].id,
        }
    }
}

// ---------- Output contract ----------

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStatus {
    Optimal,
    FeasibleApproximate,
}

impl fmt::Display for PlacementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementStatus::Optimal => write!(f, "optimal"),
            PlacementStatus::FeasibleApproximate => write!(f, "feasible_approximate"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StudentAssignment {
    pub student_id: String,
    pub year4_school_id: String,
    pub year5_school_id: String,
    pub pathway_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlacementOutcome {
    pub status: PlacementStatus,
    /// Total weighted cost of the assignment
    pub objective: f64,
    pub assignments: Vec<StudentAssignment>,
}

// ---------- API (wire) types ----------

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
#[serde(rename_all = "lowercase")]
pub enum SolverDirection {
    Maximize,
    Minimize,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PlacementRequest {
    #[serde(flatten)]
    pub input: PlacementInput,
    /// Backend name; the server default is used when absent
    #[serde(default)]
    pub solver: Option<String>,
    #[serde(default)]
    pub scaling: Option<Vec<f64>>,
    #[serde(default)]
    pub rural_scaling: Option<RuralScaling>,
}

pub type PlacementResponse = PlacementOutcome;
