use std::fs::File;
use std::io;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::error::IngestError;

/// One CSV row as text. Scores stay unparsed until the row survives dedup.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTractRow {
    pub census_tract: String,
    pub inclusion_score: String,
    pub growth_score: String,
    pub economy_score: String,
    pub community_score: String,
}

/// A raw row plus where it came from, for error reporting.
#[derive(Debug, Clone)]
pub struct SourceRow {
    pub origin: String,
    pub line: u64,
    pub raw: RawTractRow,
}

/// Load a CSV file. A file that does not exist contributes no rows.
pub fn load_file(path: &Path) -> Result<Vec<SourceRow>, IngestError> {
    if !path.exists() {
        debug!("Source {} not present, skipping", path.display());
        return Ok(Vec::new());
    }

    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    load_reader(&path.display().to_string(), file)
}

/// Load CSV rows from any reader. Empty input and header-only input both
/// yield no rows; columns beyond the five known ones are ignored.
pub fn load_reader<R: io::Read>(origin: &str, reader: R) -> Result<Vec<SourceRow>, IngestError> {
    let csv_error = |source| IngestError::Csv {
        origin: origin.to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_error)?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let raw: RawTractRow = record.deserialize(Some(&headers)).map_err(csv_error)?;

        rows.push(SourceRow {
            origin: origin.to_string(),
            line,
            raw,
        });
    }

    debug!("Loaded {} rows from {}", rows.len(), origin);
    Ok(rows)
}
