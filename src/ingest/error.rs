use std::path::PathBuf;

use thiserror::Error;

use crate::database::DatabaseError;

/// Fatal ingestion errors. Any of these aborts the whole run and rolls back
/// its transaction; duplicate identifiers are never errors.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {origin}: {source}")]
    Csv {
        origin: String,
        #[source]
        source: csv::Error,
    },

    #[error("{origin} line {line}: census_tract {value:?} does not normalize to 11 digits")]
    InvalidTractId { origin: String, line: u64, value: String },

    #[error("{origin} line {line}: {field} value {value:?} is not a number")]
    InvalidScore {
        origin: String,
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("{origin} line {line}: {field} value {value} is outside [0, 100]")]
    ScoreOutOfRange {
        origin: String,
        line: u64,
        field: &'static str,
        value: f64,
    },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}
