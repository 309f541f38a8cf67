// File: streamwatch-core/src/state.rs

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use streamwatch_common::models::StatusMap;
use streamwatch_common::traits::StateStore;

use crate::Error;

pub const DEFAULT_STATE_FILE: &str = "stream_state.json";

/// Status map persisted as one JSON object: `{"<Platform>_<id>": bool, ...}`.
///
/// Writes go to a temp file in the same directory which is then renamed over
/// the target, so a crash mid-write leaves the previous file intact. There is
/// no locking; only one pass may run against a file at a time.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// Accepts any JSON object, keeping boolean entries and dropping the rest.
pub fn parse_status_map(bytes: &[u8]) -> Result<StatusMap, Error> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Value::Object(entries) = value else {
        return Err(Error::State("state file is not a JSON object".into()));
    };

    let mut statuses = StatusMap::new();
    for (key, v) in entries {
        match v {
            Value::Bool(live) => statuses.insert_raw(key, live),
            other => warn!("Ignoring non-boolean state entry '{}': {}", key, other),
        }
    }
    Ok(statuses)
}

impl StateStore for JsonStateStore {
    fn load(&self) -> StatusMap {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No state file at {}, starting with empty state", self.path.display());
                return StatusMap::new();
            }
            Err(e) => {
                warn!("Could not read state file {}: {}; starting with empty state", self.path.display(), e);
                return StatusMap::new();
            }
        };

        match parse_status_map(&bytes) {
            Ok(statuses) => {
                debug!("Loaded {} state entries from {}", statuses.len(), self.path.display());
                statuses
            }
            Err(e) => {
                warn!("State file {} is malformed ({}); starting with empty state", self.path.display(), e);
                StatusMap::new()
            }
        }
    }

    fn save(&self, statuses: &StatusMap) -> Result<(), Error> {
        let bytes = serde_json::to_vec(statuses)?;

        let mut tmp = NamedTempFile::new_in(self.parent_dir())?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| Error::State(format!("replacing {}: {}", self.path.display(), e.error)))?;

        debug!("Saved {} state entries to {}", statuses.len(), self.path.display());
        Ok(())
    }
}
