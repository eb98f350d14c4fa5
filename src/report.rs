//! Console and CSV presentation of a placement outcome.

use std::io::Write;
use std::path::Path;

use crate::error::{PlacementError, Result};
use crate::models::{PlacementOutcome, PlacementStatus};

/// Print one block per student, followed by the overall status
pub fn print_outcome<W: Write>(out: &mut W, outcome: &PlacementOutcome) -> Result<()> {
    for assignment in &outcome.assignments {
        writeln!(out, "{} assigned to {} in Year 4", assignment.student_id, assignment.year4_school_id)?;
        writeln!(out, "{} assigned to {} in Year 5", assignment.student_id, assignment.year5_school_id)?;
        writeln!(out, "{} assigned to the pathway {}\n", assignment.student_id, assignment.pathway_id)?;
    }

    writeln!(out, "Status: {} (total cost {:.2})", outcome.status, outcome.objective)?;
    if outcome.status == PlacementStatus::FeasibleApproximate {
        writeln!(out, "Warning: the solver could not prove this assignment is the best possible")?;
    }
    Ok(())
}

/// Write `student,year4_school,year5_school,pathway` rows
pub fn write_csv<W: Write>(writer: W, outcome: &PlacementOutcome) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let csv_error = |e: csv::Error| PlacementError::Io(e.to_string());

    csv.write_record(["student", "year4_school", "year5_school", "pathway"])
        .map_err(csv_error)?;
    for assignment in &outcome.assignments {
        csv.write_record([
            assignment.student_id.as_str(),
            assignment.year4_school_id.as_str(),
            assignment.year5_school_id.as_str(),
            assignment.pathway_id.as_str(),
        ])
        .map_err(csv_error)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn save_csv(path: impl AsRef<Path>, outcome: &PlacementOutcome) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .map_err(|e| PlacementError::Io(format!("{}: {}", path.display(), e)))?;
    write_csv(file, outcome)?;
    log::info!("Wrote {} assignments to {}", outcome.assignments.len(), path.display());
    Ok(())
}
