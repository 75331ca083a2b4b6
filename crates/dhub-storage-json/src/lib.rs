use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use dhub_core::{
    storage::{LedgerStorage, StoredLedger},
    CoreError,
};
use dhub_domain::DonationRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const RECORDS_SCHEMA_VERSION: u32 = 1;
const RECORDS_FILE: &str = "donations.json";
const SEQUENCE_FILE: &str = "receipt_sequence.json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed JSON persistence: one file for records, one for the receipt counter.
#[derive(Debug, Clone)]
pub struct JsonLedgerStorage {
    records_path: PathBuf,
    sequence_path: PathBuf,
}

impl JsonLedgerStorage {
    /// Stores both files under `data_dir`, creating it when missing.
    pub fn new(data_dir: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&data_dir)?;
        Ok(Self::with_paths(
            data_dir.join(RECORDS_FILE),
            data_dir.join(SEQUENCE_FILE),
        ))
    }

    pub fn with_paths(records_path: PathBuf, sequence_path: PathBuf) -> Self {
        Self {
            records_path,
            sequence_path,
        }
    }

    pub fn records_path(&self) -> &Path {
        &self.records_path
    }

    pub fn sequence_path(&self) -> &Path {
        &self.sequence_path
    }

    fn load_records(&self) -> Result<Vec<DonationRecord>, CoreError> {
        if !self.records_path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.records_path)?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str::<RecordsFile>(&data).map_err(serde_error)? {
            RecordsFile::Versioned(file) => {
                if file.schema_version > RECORDS_SCHEMA_VERSION {
                    return Err(CoreError::Persistence(format!(
                        "donation file schema v{} is newer than supported v{}",
                        file.schema_version, RECORDS_SCHEMA_VERSION
                    )));
                }
                Ok(file.records)
            }
            RecordsFile::Legacy(records) => {
                debug!(count = records.len(), "loaded legacy donation array");
                Ok(records)
            }
        }
    }

    fn load_sequence(&self) -> Result<u64, CoreError> {
        if !self.sequence_path.exists() {
            return Ok(0);
        }
        let data = fs::read_to_string(&self.sequence_path)?;
        let trimmed = data.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        // A bare integer is accepted alongside the JSON object form.
        if let Ok(value) = trimmed.parse::<u64>() {
            return Ok(value);
        }
        let file: SequenceFile = serde_json::from_str(trimmed).map_err(serde_error)?;
        Ok(file.last_sequence)
    }
}

impl LedgerStorage for JsonLedgerStorage {
    fn load(&self) -> Result<StoredLedger, CoreError> {
        let records = self.load_records()?;
        let last_sequence = self.load_sequence()?;
        debug!(
            path = %self.records_path.display(),
            records = records.len(),
            last_sequence,
            "json ledger loaded"
        );
        Ok(StoredLedger {
            records,
            last_sequence,
        })
    }

    fn save_records(&self, records: &[DonationRecord]) -> Result<(), CoreError> {
        let file = VersionedRecords {
            schema_version: RECORDS_SCHEMA_VERSION,
            records: records.to_vec(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(serde_error)?;
        replace_file(&self.records_path, &json)
    }

    fn save_sequence(&self, last_sequence: u64) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(&SequenceFile { last_sequence })
            .map_err(serde_error)?;
        replace_file(&self.sequence_path, &json)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct VersionedRecords {
    schema_version: u32,
    records: Vec<DonationRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordsFile {
    Versioned(VersionedRecords),
    Legacy(Vec<DonationRecord>),
}

#[derive(Debug, Serialize, Deserialize)]
struct SequenceFile {
    last_sequence: u64,
}

/// Writes to a sibling temp file, then renames it over `path`.
fn replace_file(path: &Path, data: &str) -> Result<(), CoreError> {
    let tmp = tmp_path(path);
    let result = write_atomic(&tmp, data).and_then(|()| Ok(fs::rename(&tmp, path)?));
    if result.is_err() && tmp.is_file() {
        if let Err(err) = fs::remove_file(&tmp) {
            warn!(path = %tmp.display(), error = %err, "could not remove temp file");
        }
    }
    result
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}

fn serde_error(err: serde_json::Error) -> CoreError {
    CoreError::Serde(err.to_string())
}
