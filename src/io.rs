//! CSV loading and result/report writing.
//!
//! Attractions and matrices use `;`-separated CSV; result and history files
//! are ordinary comma-separated CSV so they open anywhere. Parse failures
//! are fatal `InputError`s surfaced to the CLI with a single diagnostic.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::archive::Archive;
use crate::error::InputError;
use crate::hypervolume;
use crate::metrics::{self, GenerationStats};
use crate::model::{Attraction, Objectives, TransportMode};
use crate::ranking::Point;
use crate::transport::{TransportContext, TransportMatrices};

/// File names expected inside the matrices directory.
pub const MATRIX_FILES: [&str; 4] = [
    "car_distance.csv",
    "walk_distance.csv",
    "car_time.csv",
    "walk_time.csv",
];

#[derive(Debug, Deserialize)]
struct AttractionRow {
    name: String,
    neighborhood: String,
    lat: f64,
    lon: f64,
    visit_minutes: f64,
    cost: f64,
    opening_hhmm: String,
    closing_hhmm: String,
}

/// Parse a 24-hour `HH:MM` string into minutes of day.
fn parse_hhmm(text: &str, line: usize) -> Result<f64, InputError> {
    let mut parts = text.trim().split(':');
    let (Some(hours), Some(minutes), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(InputError::Field {
            line,
            message: format!("expected HH:MM, got {text:?}"),
        });
    };
    let hours: u32 = hours.parse().map_err(|_| InputError::Field {
        line,
        message: format!("bad hour in {text:?}"),
    })?;
    let minutes: u32 = minutes.parse().map_err(|_| InputError::Field {
        line,
        message: format!("bad minute in {text:?}"),
    })?;
    if hours > 23 || minutes > 59 {
        return Err(InputError::Field {
            line,
            message: format!("time out of range: {text:?}"),
        });
    }
    Ok((hours * 60 + minutes) as f64)
}

/// Load the attraction catalog from a `;`-separated CSV file.
pub fn load_attractions(path: &Path) -> Result<Vec<Attraction>, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut attractions = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for (index, row) in reader.deserialize::<AttractionRow>().enumerate() {
        let row = row?;
        let line = index + 2; // header is line 1
        if !seen.insert(row.name.clone()) {
            return Err(InputError::Field {
                line,
                message: format!("duplicate attraction name {:?}", row.name),
            });
        }
        if row.visit_minutes < 0.0 || row.cost < 0.0 {
            return Err(InputError::Field {
                line,
                message: "visit duration and cost must be non-negative".to_string(),
            });
        }
        let opening_minute = parse_hhmm(&row.opening_hhmm, line)?;
        let closing_minute = parse_hhmm(&row.closing_hhmm, line)?;
        if closing_minute < opening_minute {
            return Err(InputError::Field {
                line,
                message: "closing time precedes opening time".to_string(),
            });
        }
        attractions.push(Attraction {
            name: row.name,
            neighborhood: row.neighborhood,
            latitude: row.lat,
            longitude: row.lon,
            visit_minutes: row.visit_minutes,
            cost: row.cost,
            opening_minute,
            closing_minute,
        });
    }
    Ok(attractions)
}

/// Load one named matrix and reorder it to the catalog's attraction order.
fn load_matrix(path: &Path, names: &[String]) -> Result<Vec<Vec<f64>>, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = reader.records();
    let header = rows.next().ok_or_else(|| {
        InputError::MatrixMismatch(format!("{}: empty file", path.display()))
    })??;
    // First header cell is the corner label (often blank).
    let header_names: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
    if header_names.len() != names.len() {
        return Err(InputError::MatrixMismatch(format!(
            "{}: {} columns for {} attractions",
            path.display(),
            header_names.len(),
            names.len()
        )));
    }
    let mut position = std::collections::HashMap::new();
    for (column, name) in header_names.iter().enumerate() {
        if position.insert(name.clone(), column).is_some() {
            return Err(InputError::MatrixMismatch(format!(
                "{}: duplicate column {name:?}",
                path.display()
            )));
        }
    }
    for name in names {
        if !position.contains_key(name) {
            return Err(InputError::MatrixMismatch(format!(
                "{}: missing attraction {name:?}",
                path.display()
            )));
        }
    }

    let n = names.len();
    let mut raw = vec![vec![0.0; n]; n];
    let mut seen_rows = 0usize;
    for record in rows {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line() as usize);
        let mut fields = record.iter();
        let row_name = fields.next().unwrap_or_default();
        let &row_index = position.get(row_name).ok_or_else(|| {
            InputError::MatrixMismatch(format!(
                "{}: row {row_name:?} not in header",
                path.display()
            ))
        })?;
        let values: Vec<&str> = fields.collect();
        if values.len() != n {
            return Err(InputError::MatrixMismatch(format!(
                "{}: row {row_name:?} has {} cells, expected {n}",
                path.display(),
                values.len()
            )));
        }
        for (column, value) in values.iter().enumerate() {
            let parsed: f64 = value.parse().map_err(|_| InputError::Field {
                line,
                message: format!("bad numeric cell {value:?}"),
            })?;
            if parsed < 0.0 {
                return Err(InputError::MatrixMismatch(format!(
                    "{}: negative entry at ({row_name}, {})",
                    path.display(),
                    header_names[column]
                )));
            }
            raw[row_index][column] = parsed;
        }
        seen_rows += 1;
    }
    if seen_rows != n {
        return Err(InputError::MatrixMismatch(format!(
            "{}: {seen_rows} rows for {n} attractions",
            path.display()
        )));
    }

    // Reorder both axes to catalog order.
    let mut matrix = vec![vec![0.0; n]; n];
    for (i, from) in names.iter().enumerate() {
        for (j, to) in names.iter().enumerate() {
            matrix[i][j] = raw[position[from]][position[to]];
        }
    }
    for (i, row) in matrix.iter().enumerate() {
        if row[i] != 0.0 {
            return Err(InputError::MatrixMismatch(format!(
                "{}: non-zero self entry for {:?}",
                path.display(),
                names[i]
            )));
        }
    }
    Ok(matrix)
}

/// Load all four matrices from a directory and build the transport context.
pub fn load_transport_context(
    dir: &Path,
    attractions: &[Attraction],
) -> Result<TransportContext, InputError> {
    let names: Vec<String> = attractions.iter().map(|a| a.name.clone()).collect();
    let [car_distance, walk_distance, car_time, walk_time] = MATRIX_FILES;
    let matrices = TransportMatrices {
        car_distance: load_matrix(&dir.join(car_distance), &names)?,
        walk_distance: load_matrix(&dir.join(walk_distance), &names)?,
        car_time: load_matrix(&dir.join(car_time), &names)?,
        walk_time: load_matrix(&dir.join(walk_time), &names)?,
    };
    Ok(TransportContext::new(names, matrices))
}

#[derive(Debug, Serialize, Deserialize)]
struct SolutionRow {
    solution_id: usize,
    cost: f64,
    time: f64,
    num_attractions: usize,
    num_neighborhoods: usize,
    sequence: String,
    transport_modes: String,
}

/// A solution read back from a result CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionRecord {
    pub objectives: Objectives,
    pub sequence: Vec<String>,
    pub modes: Vec<TransportMode>,
}

/// Write the final non-dominated set, one row per solution in archive order.
pub fn write_solutions(
    path: &Path,
    archive: &Archive,
    attractions: &[Attraction],
) -> Result<(), InputError> {
    let mut writer = csv::Writer::from_path(path)?;
    for (solution_id, solution) in archive.members().iter().enumerate() {
        let sequence = solution
            .itinerary
            .stops
            .iter()
            .map(|&stop| attractions[stop].name.as_str())
            .collect::<Vec<_>>()
            .join("|");
        let transport_modes = solution
            .itinerary
            .modes
            .iter()
            .map(|mode| mode.as_str())
            .collect::<Vec<_>>()
            .join("|");
        writer.serialize(SolutionRow {
            solution_id,
            cost: solution.objectives.cost,
            time: solution.objectives.time,
            num_attractions: solution.objectives.attractions,
            num_neighborhoods: solution.objectives.neighborhoods,
            sequence,
            transport_modes,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a result CSV back into solution records.
pub fn read_solutions(path: &Path) -> Result<Vec<SolutionRecord>, InputError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<SolutionRow>().enumerate() {
        let row = row?;
        let line = index + 2;
        let sequence: Vec<String> = if row.sequence.is_empty() {
            Vec::new()
        } else {
            row.sequence.split('|').map(str::to_string).collect()
        };
        let modes = if row.transport_modes.is_empty() {
            Vec::new()
        } else {
            row.transport_modes
                .split('|')
                .map(|label| {
                    label.parse::<TransportMode>().map_err(|message| {
                        InputError::Field { line, message }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?
        };
        if modes.len() != sequence.len().saturating_sub(1) {
            return Err(InputError::Field {
                line,
                message: format!(
                    "{} modes for {} stops",
                    modes.len(),
                    sequence.len()
                ),
            });
        }
        records.push(SolutionRecord {
            objectives: Objectives {
                cost: row.cost,
                time: row.time,
                attractions: row.num_attractions,
                neighborhoods: row.num_neighborhoods,
            },
            sequence,
            modes,
        });
    }
    Ok(records)
}

/// Write the per-generation (or per-improvement) history.
pub fn write_history(path: &Path, history: &[GenerationStats]) -> Result<(), InputError> {
    #[derive(Serialize)]
    struct HistoryRow {
        generation: usize,
        front_size: usize,
        hypervolume: f64,
        spread: f64,
        attractions_in_best: usize,
        neighborhoods_in_best: usize,
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in history {
        writer.serialize(HistoryRow {
            generation: row.generation,
            front_size: row.front_size,
            hypervolume: row.hypervolume,
            spread: row.spread,
            attractions_in_best: row.attractions_in_best,
            neighborhoods_in_best: row.neighborhoods_in_best,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Plain-text hypervolume report: raw value against nadir + 1 and the
/// normalized value over the ideal/nadir box.
pub fn hypervolume_report(points: &[Point]) -> String {
    let vectors: Vec<Vec<f64>> = points.iter().map(|p| p.to_vec()).collect();
    match hypervolume::ideal_and_nadir(&vectors) {
        Some((ideal, nadir)) => {
            let reference: Vec<f64> = nadir.iter().map(|v| v + 1.0).collect();
            let raw = hypervolume::hypervolume(&vectors, &reference);
            let box_volume: f64 = reference
                .iter()
                .zip(&ideal)
                .map(|(hi, lo)| hi - lo)
                .product();
            let normalized = if box_volume > 0.0 {
                raw / box_volume
            } else {
                0.0
            };
            format!(
                "solutions: {}\nideal: {ideal:?}\nnadir: {nadir:?}\nreference: {reference:?}\n\
                 hypervolume: {raw:.6}\nnormalized hypervolume: {normalized:.6}\n",
                points.len()
            )
        }
        None => "solutions: 0\nhypervolume: 0\nnormalized hypervolume: 0\n".to_string(),
    }
}

/// Plain-text binary coverage report in both directions.
pub fn coverage_report(a: &[Point], b: &[Point]) -> String {
    format!(
        "|A| = {}, |B| = {}\nC(A,B) = {:.4}\nC(B,A) = {:.4}\n",
        a.len(),
        b.len(),
        metrics::coverage(a, b),
        metrics::coverage(b, a)
    )
}
