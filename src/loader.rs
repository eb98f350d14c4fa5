//! Headerless CSV loading for schools, pathways, and students.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{PlacementError, Result};
use crate::models::{Pathway, PlacementInput, RegionCategory, School, Student};

/// Load and type all three files of one placement run
pub fn load_input(
    schools_path: impl AsRef<Path>,
    pathways_path: impl AsRef<Path>,
    students_path: impl AsRef<Path>,
) -> Result<PlacementInput> {
    let schools = read_schools(open(schools_path.as_ref())?)?;
    let pathways = read_pathways(open(pathways_path.as_ref())?)?;
    let students = read_students(open(students_path.as_ref())?, schools.len(), pathways.len())?;

    log::info!(
        "Loaded {} schools, {} pathways, {} students",
        schools.len(),
        pathways.len(),
        students.len()
    );

    Ok(PlacementInput {
        schools,
        pathways,
        students,
    })
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| PlacementError::Io(format!("{}: {}", path.display(), e)))
}

fn records<R: Read>(reader: R) -> impl Iterator<Item = Result<(usize, StringRecord)>> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_records()
        .enumerate()
        .map(|(i, record)| {
            record
                .map(|r| (i + 1, r))
                .map_err(|e| PlacementError::Io(e.to_string()))
        })
}

fn field<'r>(record: &'r StringRecord, index: usize, line: usize) -> Result<&'r str> {
    record.get(index).ok_or_else(|| {
        PlacementError::MalformedRecord(format!("line {}: missing column {}", line, index + 1))
    })
}

fn id_field(record: &StringRecord, line: usize) -> Result<String> {
    let id = field(record, 0, line)?;
    if id.is_empty() {
        return Err(PlacementError::MalformedRecord(format!("line {}: empty id", line)));
    }
    Ok(id.to_string())
}

fn integer_field(record: &StringRecord, index: usize, line: usize) -> Result<u32> {
    let raw = field(record, index, line)?;
    raw.parse::<u32>().map_err(|_| {
        PlacementError::MalformedRecord(format!(
            "line {}: column {} must be a non-negative integer, got '{}'",
            line,
            index + 1,
            raw
        ))
    })
}

/// Rows `id,capacity,region` (same capacity both years) or
/// `id,year4_capacity,year5_capacity,region`
pub fn read_schools<R: Read>(reader: R) -> Result<Vec<School>> {
    records(reader)
        .map(|record| {
            let (line, record) = record?;
            let (year4_capacity, year5_capacity, region_index) = match record.len() {
                3 => {
                    let capacity = integer_field(&record, 1, line)?;
                    (capacity, capacity, 2)
                }
                4 => (
                    integer_field(&record, 1, line)?,
                    integer_field(&record, 2, line)?,
                    3,
                ),
                n => {
                    return Err(PlacementError::MalformedRecord(format!(
                        "line {}: school rows need 3 or 4 columns, got {}",
                        line, n
                    )))
                }
            };
            let raw_region = field(&record, region_index, line)?;
            let region = RegionCategory::from_str(raw_region).ok_or_else(|| {
                PlacementError::MalformedRecord(format!(
                    "line {}: unknown region '{}', expected M or R",
                    line, raw_region
                ))
            })?;
            Ok(School {
                id: id_field(&record, line)?,
                year4_capacity,
                year5_capacity,
                region,
            })
        })
        .collect()
}

/// Rows `id,capacity`
pub fn read_pathways<R: Read>(reader: R) -> Result<Vec<Pathway>> {
    records(reader)
        .map(|record| {
            let (line, record) = record?;
            if record.len() != 2 {
                return Err(PlacementError::MalformedRecord(format!(
                    "line {}: pathway rows need 2 columns, got {}",
                    line,
                    record.len()
                )));
            }
            Ok(Pathway {
                id: id_field(&record, line)?,
                capacity: integer_field(&record, 1, line)?,
            })
        })
        .collect()
}

/// Rows `id, S year-4 ranks, S year-5 ranks, P pathway ranks, year4_scale,
/// year5_scale, pathway_scale`
pub fn read_students<R: Read>(reader: R, schools: usize, pathways: usize) -> Result<Vec<Student>> {
    let expected = 1 + 2 * schools + pathways + 3;
    records(reader)
        .map(|record| {
            let (line, record) = record?;
            if record.len() != expected {
                return Err(PlacementError::MalformedRecord(format!(
                    "line {}: students need a ranking for all {} schools (twice) and {} pathways \
                     plus 3 scales ({} columns), got {}",
                    line,
                    schools,
                    pathways,
                    expected,
                    record.len()
                )));
            }
            let ints = |range: std::ops::Range<usize>| -> Result<Vec<u32>> {
                range.map(|i| integer_field(&record, i, line)).collect()
            };
            let year4_end = 1 + schools;
            let year5_end = year4_end + schools;
            let pathway_end = year5_end + pathways;
            Ok(Student {
                id: id_field(&record, line)?,
                year4_ranks: ints(1..year4_end)?,
                year5_ranks: ints(year4_end..year5_end)?,
                pathway_ranks: ints(year5_end..pathway_end)?,
                year4_scale: integer_field(&record, pathway_end, line)?,
                year5_scale: integer_field(&record, pathway_end + 1, line)?,
                pathway_scale: integer_field(&record, pathway_end + 2, line)?,
            })
        })
        .collect()
}
