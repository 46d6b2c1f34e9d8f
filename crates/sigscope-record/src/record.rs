use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sigscope_types::{SignatureHash, TaskKey};

use crate::error::{RecordError, RecordResult};

/// On-disk record format version this library reads and writes.
pub const FORMAT_VERSION: u32 = 1;

/// One dependency edge recorded in a signature: the dependent task and the
/// signature hash it had when this record was produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDep {
    pub task: TaskKey,
    pub hash: SignatureHash,
}

/// A stored fingerprint of one build task's inputs.
///
/// Records are produced by the signature generator of the build
/// orchestration ecosystem; sigscope only ever reads them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigRecord {
    pub format: u32,
    pub task: TaskKey,
    pub hash: SignatureHash,
    /// Variable name -> value at signing time. `None` means the variable
    /// was unset but still in the dependency set.
    #[serde(default)]
    pub variables: BTreeMap<String, Option<String>>,
    /// Input file path -> content checksum.
    #[serde(default)]
    pub file_checksums: BTreeMap<String, String>,
    /// Dependent tasks in graph order.
    #[serde(default)]
    pub deps: Vec<TaskDep>,
}

impl SigRecord {
    /// Load a record from a JSON file.
    ///
    /// Unreadable files and parse failures both surface as
    /// [`RecordError::Malformed`] naming the path.
    pub fn load(path: &Path) -> RecordResult<Self> {
        let data = fs::read_to_string(path).map_err(|e| RecordError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let record: SigRecord =
            serde_json::from_str(&data).map_err(|e| RecordError::Malformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if record.format != FORMAT_VERSION {
            return Err(RecordError::UnsupportedFormat {
                path: path.to_path_buf(),
                found: record.format,
                supported: FORMAT_VERSION,
            });
        }
        Ok(record)
    }

    /// Write a record as pretty-printed JSON. Used by the signature
    /// generator and by test fixtures; sigscope itself never persists state.
    pub fn write(&self, path: &Path) -> RecordResult<()> {
        let data = serde_json::to_string_pretty(self).map_err(|e| RecordError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        fs::write(path, data)?;
        Ok(())
    }
}
