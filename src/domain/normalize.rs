use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};
use crate::models::{Dimension, Student};

/// Multipliers selected by a student's 1-based scale indicator
pub const DEFAULT_SCALING: [f64; 3] = [1.0, 1.2, 1.5];

/// Ordered multiplier table converting raw ranks into comparable costs
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingTable {
    multipliers: Vec<f64>,
}

impl ScalingTable {
    pub fn new(multipliers: Vec<f64>) -> Result<Self> {
        if multipliers.is_empty() {
            return Err(PlacementError::Configuration(
                "Scaling table must have at least one entry".to_string(),
            ));
        }
        if let Some(bad) = multipliers.iter().find(|m| !m.is_finite() || **m <= 0.0) {
            return Err(PlacementError::Configuration(format!(
                "Scaling table entries must be finite and positive, got {}",
                bad
            )));
        }
        Ok(ScalingTable { multipliers })
    }

    /// Parse a comma separated list such as `1,1.2,1.5`
    pub fn parse(s: &str) -> Result<Self> {
        let multipliers = s
            .split(',')
            .map(|part| {
                part.trim().parse::<f64>().map_err(|_| {
                    PlacementError::Configuration(format!("Invalid scaling entry '{}'", part.trim()))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        Self::new(multipliers)
    }

    /// Multiplier for a 1-based scale indicator
    pub fn multiplier(&self, indicator: u32) -> Result<f64> {
        indicator
            .checked_sub(1)
            .and_then(|i| self.multipliers.get(i as usize))
            .copied()
            .ok_or_else(|| {
                PlacementError::Configuration(format!(
                    "Scale indicator {} is outside 1..={}",
                    indicator,
                    self.multipliers.len()
                ))
            })
    }

    pub fn len(&self) -> usize {
        self.multipliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.multipliers.is_empty()
    }

    pub fn multipliers(&self) -> &[f64] {
        &self.multipliers
    }
}

impl Default for ScalingTable {
    fn default() -> Self {
        ScalingTable {
            multipliers: DEFAULT_SCALING.to_vec(),
        }
    }
}

/// Uniform multiplier for one dimension's coefficients, used to rebalance
/// its weight in the combined objective.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct RuralScaling {
    pub dimension: Dimension,
    pub factor: f64,
}

impl RuralScaling {
    pub fn new(dimension: Dimension, factor: f64) -> Result<Self> {
        let scaling = RuralScaling { dimension, factor };
        scaling.validate()?;
        Ok(scaling)
    }

    /// Parse `<dimension>:<factor>`, e.g. `year5:0.8`
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || {
            PlacementError::Configuration(format!(
                "Invalid rural scaling '{}', expected <dimension>:<factor>",
                s
            ))
        };
        let (dimension, factor) = s.split_once(':').ok_or_else(invalid)?;
        let dimension = Dimension::from_str(dimension).ok_or_else(invalid)?;
        let factor = factor.trim().parse::<f64>().map_err(|_| invalid())?;
        Self::new(dimension, factor)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.factor.is_finite() || self.factor <= 0.0 {
            return Err(PlacementError::Configuration(format!(
                "Rural scaling factor must be finite and positive, got {}",
                self.factor
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizerConfig {
    pub scaling: ScalingTable,
    pub rural_scaling: Option<RuralScaling>,
}

impl NormalizerConfig {
    fn dimension_factor(&self, dimension: Dimension) -> f64 {
        match self.rural_scaling {
            Some(rural) if rural.dimension == dimension => rural.factor,
            _ => 1.0,
        }
    }
}

/// Dense student x slot matrix of cost coefficients for one dimension
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    slots: usize,
    costs: Vec<f64>,
}

impl CostMatrix {
    pub fn get(&self, student: usize, slot: usize) -> f64 {
        self.costs[student * self.slots + slot]
    }

    pub fn row(&self, student: usize) -> &[f64] {
        &self.costs[student * self.slots..(student + 1) * self.slots]
    }

    pub fn slots(&self) -> usize {
        self.slots
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementCosts {
    pub year4: CostMatrix,
    pub year5: CostMatrix,
    pub pathway: CostMatrix,
}

impl PlacementCosts {
    pub fn dimension(&self, dimension: Dimension) -> &CostMatrix {
        match dimension {
            Dimension::Year4 => &self.year4,
            Dimension::Year5 => &self.year5,
            Dimension::Pathway => &self.pathway,
        }
    }
}

/// `rank * scaling[indicator - 1]`
pub fn cost_coefficient(rank: u32, indicator: u32, scaling: &ScalingTable) -> Result<f64> {
    Ok(rank as f64 * scaling.multiplier(indicator)?)
}

/// Convert every student's raw ranks into scaled cost coefficients.
///
/// Rank lists are assumed to have passed the feasibility pre-check.
pub fn normalize(students: &[Student], config: &NormalizerConfig) -> Result<PlacementCosts> {
    if let Some(rural) = &config.rural_scaling {
        rural.validate()?;
    }

    let matrix = |dimension: Dimension| -> Result<CostMatrix> {
        let slots = students.first().map(|s| s.ranks(dimension).len()).unwrap_or(0);
        let factor = config.dimension_factor(dimension);
        let mut costs = Vec::with_capacity(students.len() * slots);
        for student in students {
            let indicator = student.scale(dimension);
            let multiplier = config.scaling.multiplier(indicator).map_err(|_| {
                PlacementError::Configuration(format!(
                    "Student {} has {} scale indicator {} outside 1..={}",
                    student.id,
                    dimension,
                    indicator,
                    config.scaling.len()
                ))
            })?;
            costs.extend(
                student
                    .ranks(dimension)
                    .iter()
                    .map(|&rank| rank as f64 * multiplier * factor),
            );
        }
        Ok(CostMatrix { slots, costs })
    };

    Ok(PlacementCosts {
        year4: matrix(Dimension::Year4)?,
        year5: matrix(Dimension::Year5)?,
        pathway: matrix(Dimension::Pathway)?,
    })
}
