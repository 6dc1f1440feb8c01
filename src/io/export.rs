//! CSV export of the monthly production estimate and JSON snapshot files.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use crate::calc::{CalculationResult, MONTH_NAMES};
use crate::session::ProjectSnapshot;

/// Column header for the monthly production CSV.
const HEADER: [&str; 2] = ["month", "production_kwh"];

/// Exports the monthly production estimate to a CSV file at the given path.
///
/// Writes a header row followed by one row per month, January first.
/// Produces deterministic output for identical inputs.
///
/// # Arguments
///
/// * `result` - Sizing result to export
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_monthly_csv(result: &CalculationResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_monthly_csv(result, buf)
}

/// Writes the monthly production estimate as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_monthly_csv(result: &CalculationResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER)?;

    for (month, kwh) in MONTH_NAMES.iter().zip(&result.monthly_production) {
        wtr.write_record([month.to_string(), format!("{kwh:.2}")])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes a snapshot as pretty-printed JSON.
///
/// # Errors
///
/// Returns an `io::Error` if the file cannot be written.
pub fn write_snapshot_json(snapshot: &ProjectSnapshot, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut buf = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut buf, snapshot)?;
    buf.flush()
}

/// Reads a snapshot from a JSON file.
///
/// # Errors
///
/// Returns an `io::Error` if the file cannot be read or is not a snapshot.
pub fn read_snapshot_json(path: &Path) -> io::Result<ProjectSnapshot> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
