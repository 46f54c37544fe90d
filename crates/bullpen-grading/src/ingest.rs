// Pitch-tracking CSV ingest.
//
// Reads TrackMan-style session exports: one row per pitch with the pitcher,
// tagged pitch type and plate location in feet. Extra columns are ignored.
// A missing or unreadable location cell degrades that pitch to "no location"
// (it still counts and scores 0). Only structural problems fail the file.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::GradingError;
use crate::pitch::{feet_to_inches, PitchRecord};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{path} has no '{column}' column")]
    MissingColumn { path: String, column: &'static str },

    #[error("{path} row {row}: {source}")]
    InvalidRow {
        path: String,
        row: usize,
        source: GradingError,
    },
}

/// Columns every session file must carry. `Flag` is optional.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    "Pitcher",
    "TaggedPitchType",
    "PlateLocHeight",
    "PlateLocSide",
];

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPitchRow {
    Pitcher: String,
    #[serde(default)]
    TaggedPitchType: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    PlateLocHeight: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    PlateLocSide: Option<f64>,
    #[serde(default)]
    Flag: Option<String>,
}

fn is_finish_flag(flag: Option<&str>) -> bool {
    flag.is_some_and(|f| f.eq_ignore_ascii_case("y"))
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Everything read from one session file.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// In file order.
    pub records: Vec<PitchRecord>,
    /// Rows kept without a usable height or side.
    pub missing_location: usize,
    /// Rows the CSV reader could not decode at all.
    pub malformed_rows: usize,
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Read pitch records from any reader. `label` names the source in errors
/// and log lines.
pub fn load_pitches_from_reader<R: Read>(rdr: R, label: &str) -> Result<IngestReport, IngestError> {
    let csv_err = |source| IngestError::Csv {
        path: label.to_string(),
        source,
    };

    // Cells too, not just headers: " 3.0" must parse as a height.
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let headers = reader.headers().map_err(csv_err)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(IngestError::MissingColumn {
                path: label.to_string(),
                column,
            });
        }
    }

    let mut report = IngestReport::default();
    for (idx, result) in reader.deserialize::<RawPitchRow>().enumerate() {
        // 1-based data row; the header is not counted.
        let row = idx + 1;
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("{}: skipping malformed row {}: {}", label, row, e);
                report.malformed_rows += 1;
                continue;
            }
        };

        let record = PitchRecord::new(
            raw.Pitcher,
            raw.TaggedPitchType,
            raw.PlateLocHeight.map(feet_to_inches),
            raw.PlateLocSide.map(feet_to_inches),
            is_finish_flag(raw.Flag.as_deref()),
        )
        .map_err(|source| IngestError::InvalidRow {
            path: label.to_string(),
            row,
            source,
        })?;

        if !record.has_location() {
            warn!(
                "{}: row {} ({}) has no usable plate location, scoring 0",
                label, row, record.pitcher
            );
            report.missing_location += 1;
        }
        report.records.push(record);
    }

    info!(
        "read {} pitches from {} ({} without location, {} malformed)",
        report.records.len(),
        label,
        report.missing_location,
        report.malformed_rows
    );
    Ok(report)
}

/// Read pitch records from a CSV file on disk.
pub fn load_pitches(path: &Path) -> Result<IngestReport, IngestError> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_pitches_from_reader(file, &path.display().to_string())
}
