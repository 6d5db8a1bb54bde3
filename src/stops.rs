//! Static stop reference table.
//!
//! An immutable `stop_id -> stop_name` mapping loaded once at startup and
//! passed into the response assembler. No ambient global state: handlers
//! receive a shared reference through router state.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct StopDirectory {
    names: HashMap<String, String>,
}

impl StopDirectory {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StopsError> {
        let file = std::fs::File::open(path.as_ref())
            .map_err(|e| StopsError::ReadError(e.to_string()))?;
        Self::from_reader(file)
    }

    /// Parse a `stop_id,stop_name` CSV. Extra columns are ignored; rows
    /// without a stop id are skipped.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, StopsError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers()?.clone();

        let idx_id = headers
            .iter()
            .position(|h| h == "stop_id")
            .ok_or_else(|| StopsError::ParseError("missing stop_id column".into()))?;
        let idx_name = headers
            .iter()
            .position(|h| h == "stop_name")
            .ok_or_else(|| StopsError::ParseError("missing stop_name column".into()))?;

        let mut names = HashMap::new();
        let mut skipped = 0usize;
        for result in rdr.records() {
            let record = result?;
            let stop_id = record.get(idx_id).unwrap_or("").trim();
            if stop_id.is_empty() {
                skipped += 1;
                continue;
            }
            let stop_name = record.get(idx_name).unwrap_or("").trim();
            names.insert(stop_id.to_string(), stop_name.to_string());
        }
        if skipped > 0 {
            warn!(skipped, "Skipped stop records with empty stop_id");
        }
        info!(stops = names.len(), "Loaded stop directory");
        Ok(Self { names })
    }

    /// Display name for a stop, if the reference table knows it.
    pub fn name(&self, stop_id: &str) -> Option<&str> {
        self.names
            .get(stop_id)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum StopsError {
    #[error("Failed to read stops file: {0}")]
    ReadError(String),
    #[error("Failed to parse stops file: {0}")]
    ParseError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}
