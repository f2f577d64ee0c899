//! The append-only JSON record store.
//!
//! Every update reads the whole file, appends, and writes the whole file
//! back. Only one writer is supported at a time.

use crate::error::Result;
use crate::model::GpsRecord;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub const DEFAULT_STORE_PATH: &str = "addresses.json";

pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Every element of the stored array as raw JSON, or an empty list when
    /// the file is missing, blank or not a JSON array.
    ///
    /// Elements are kept exactly as found, including ones that are not
    /// geolocation records, so a rewrite never loses them.
    pub fn load_raw(&self) -> Vec<Value> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                if self.exists() {
                    warn!("Could not read record store {}: {}", self.path.display(), e);
                }
                return Vec::new();
            }
        };

        if content.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(elements)) => elements,
            Ok(_) => {
                warn!(
                    "Record store {} is not a JSON array, starting from empty",
                    self.path.display()
                );
                Vec::new()
            }
            Err(e) => {
                warn!(
                    "Record store {} is not valid JSON, starting from empty: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// The stored elements that read as geolocation records, in store order.
    /// Anything else in the array is skipped here but left in the file.
    pub fn load_or_empty(&self) -> Vec<GpsRecord> {
        self.load_raw()
            .into_iter()
            .filter_map(|element| match serde_json::from_value(element) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!("Skipping foreign element in {}: {}", self.path.display(), e);
                    None
                }
            })
            .collect()
    }

    /// Append the persistable part of `batch` and rewrite the store.
    /// Returns how many records were appended.
    pub fn append(&self, batch: &[GpsRecord]) -> Result<usize> {
        let mut elements = self.load_raw();
        let before = elements.len();
        for record in persistable(batch) {
            elements.push(serde_json::to_value(record)?);
        }
        let appended = elements.len() - before;

        self.write(&elements)?;
        debug!(
            "Appended {} record(s) to {} ({} total)",
            appended,
            self.path.display(),
            elements.len()
        );
        Ok(appended)
    }

    /// Replace the store with `records`.
    pub fn save(&self, records: &[GpsRecord]) -> Result<()> {
        self.write(records)
    }

    // The data goes to a temporary file next to the store first and is then
    // renamed over it, so a failed write leaves the old store in place.
    fn write<T: Serialize + ?Sized>(&self, contents: &T) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let temp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, contents)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path)?;
        Ok(())
    }
}

/// Records worth keeping: everything except the absent record. Records whose
/// conversion failed are kept.
pub fn persistable(batch: &[GpsRecord]) -> impl Iterator<Item = &GpsRecord> {
    batch.iter().filter(|record| !record.is_absent())
}
