use std::collections::HashSet;

use crate::error::{PlacementError, Result};
use crate::models::{Dimension, PlacementInput};

/// Cheap deterministic guard run before any variable is created.
///
/// Rejects cohorts larger than the total capacity of a dimension, rank lists
/// whose lengths do not match the configured schools and pathways, zero ranks,
/// and duplicate identifiers.
pub fn check_feasibility(input: &PlacementInput) -> Result<()> {
    check_capacity(input)?;
    check_records(input)
}

pub fn check_capacity(input: &PlacementInput) -> Result<()> {
    let cohort = input.students.len() as u64;

    for dimension in Dimension::ALL {
        let total: u64 = (0..input.slot_count(dimension))
            .map(|slot| input.slot_capacity(dimension, slot) as u64)
            .sum();
        if cohort > total {
            let kind = match dimension {
                Dimension::Pathway => "pathway",
                _ => "school",
            };
            return Err(PlacementError::Capacity(format!(
                "There are more students ({}) than {} {} spots available ({})",
                cohort, dimension, kind, total
            )));
        }
    }

    Ok(())
}

pub fn check_records(input: &PlacementInput) -> Result<()> {
    check_unique("school", input.schools.iter().map(|s| s.id.as_str()))?;
    check_unique("pathway", input.pathways.iter().map(|p| p.id.as_str()))?;
    check_unique("student", input.students.iter().map(|s| s.id.as_str()))?;

    for student in &input.students {
        for dimension in Dimension::ALL {
            let ranks = student.ranks(dimension);
            let expected = input.slot_count(dimension);
            if ranks.len() != expected {
                return Err(PlacementError::MalformedRecord(format!(
                    "Student {} has {} {} ranks, expected one for each of the {} options",
                    student.id,
                    ranks.len(),
                    dimension,
                    expected
                )));
            }
            if ranks.contains(&0) {
                return Err(PlacementError::MalformedRecord(format!(
                    "Student {} has a {} rank of 0, ranks must be positive",
                    student.id, dimension
                )));
            }
        }
    }

    Ok(())
}

fn check_unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(PlacementError::MalformedRecord(format!("Empty {} id", kind)));
        }
        if !seen.insert(id) {
            return Err(PlacementError::MalformedRecord(format!(
                "Duplicate {} id '{}'",
                kind, id
            )));
        }
    }
    Ok(())
}
