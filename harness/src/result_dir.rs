//! Result directory persistence: write/read/verify a run on disk.
//!
//! # Directory layout
//!
//! ```text
//! <dir>/
//!   task.json     canonical JSON of the grounded task
//!   result.json   canonical JSON of the PlanningResultV1
//!   plans.json    canonical JSON of the {"plans": [...]} wrapper
//!   digest.txt    result digest string ("sha256:...")
//! ```
//!
//! The directory path is never part of any hash surface.
//!
//! # Fail-closed semantics
//!
//! - Missing file → error
//! - Extra file → error
//! - Non-canonical JSON → error
//! - Digest or plan-list mismatch → error

use std::collections::BTreeSet;
use std::path::Path;

use kplan_kernel::proof::canon::{canonical_bytes_of, canonical_json_bytes, CanonError};
use kplan_kernel::proof::hash::ContentHash;
use kplan_kernel::task::GroundTask;
use kplan_search::PlanningResultV1;
use serde::de::DeserializeOwned;

use crate::runner::RunReport;

pub const TASK_FILENAME: &str = "task.json";
pub const RESULT_FILENAME: &str = "result.json";
pub const PLANS_FILENAME: &str = "plans.json";
pub const DIGEST_FILENAME: &str = "digest.txt";

const ALL_FILENAMES: &[&str] = &[TASK_FILENAME, RESULT_FILENAME, PLANS_FILENAME, DIGEST_FILENAME];

/// Prefix of in-flight files, skipped when listing a directory.
const TEMP_PREFIX: &str = ".tmp_";

/// Error writing a result directory.
#[derive(Debug, thiserror::Error)]
pub enum ResultDirWriteError {
    #[error("I/O error: {detail}")]
    Io { detail: String },
    #[error("canonical JSON error: {0}")]
    Canon(#[from] CanonError),
}

/// Error reading a result directory or a task file.
#[derive(Debug, thiserror::Error)]
pub enum ResultDirReadError {
    #[error("I/O error: {detail}")]
    Io { detail: String },
    #[error("missing file: {filename}")]
    MissingFile { filename: String },
    #[error("undeclared extra file: {name}")]
    ExtraFile { name: String },
    #[error("{filename} does not parse: {detail}")]
    Parse { filename: String, detail: String },
    #[error("{filename} is not canonical JSON")]
    NotCanonical { filename: String },
    #[error("digest mismatch: stored={stored}, recomputed={recomputed}")]
    DigestMismatch { stored: String, recomputed: String },
    #[error("plans.json disagrees with result.json")]
    PlansMismatch,
    #[error("canonical JSON error: {0}")]
    Canon(#[from] CanonError),
}

/// A run read back from disk.
#[derive(Debug, Clone)]
pub struct StoredRun {
    pub task: GroundTask,
    pub result: PlanningResultV1,
    pub result_digest: ContentHash,
}

/// Write a run report to `dir`, creating it if needed.
///
/// # Errors
///
/// Returns [`ResultDirWriteError`] on I/O failure or canonical JSON error.
pub fn write_result_dir(report: &RunReport, dir: &Path) -> Result<(), ResultDirWriteError> {
    std::fs::create_dir_all(dir).map_err(|e| ResultDirWriteError::Io {
        detail: format!("create_dir_all: {e}"),
    })?;

    write_atomic(&dir.join(TASK_FILENAME), &canonical_bytes_of(&report.task)?)?;
    write_atomic(&dir.join(RESULT_FILENAME), &report.result.to_canonical_json_bytes()?)?;
    write_atomic(&dir.join(PLANS_FILENAME), &canonical_json_bytes(&report.result.plans_json())?)?;
    write_atomic(&dir.join(DIGEST_FILENAME), report.result_digest.as_str().as_bytes())?;
    Ok(())
}

/// Read and verify a result directory.
///
/// # Errors
///
/// Returns [`ResultDirReadError`] on any validation failure.
pub fn read_result_dir(dir: &Path) -> Result<StoredRun, ResultDirReadError> {
    let task_bytes = read_required(dir, TASK_FILENAME)?;
    let result_bytes = read_required(dir, RESULT_FILENAME)?;
    let plans_bytes = read_required(dir, PLANS_FILENAME)?;
    let digest_bytes = read_required(dir, DIGEST_FILENAME)?;

    for name in list_files(dir)? {
        if !ALL_FILENAMES.contains(&name.as_str()) {
            return Err(ResultDirReadError::ExtraFile { name });
        }
    }

    let task: GroundTask = parse_canonical(TASK_FILENAME, &task_bytes)?;
    let result: PlanningResultV1 = parse_canonical(RESULT_FILENAME, &result_bytes)?;

    if canonical_json_bytes(&result.plans_json())? != plans_bytes {
        return Err(ResultDirReadError::PlansMismatch);
    }

    let recomputed = result.digest()?;
    let stored = String::from_utf8_lossy(&digest_bytes).trim().to_string();
    if recomputed.as_str() != stored {
        return Err(ResultDirReadError::DigestMismatch {
            stored,
            recomputed: recomputed.as_str().to_string(),
        });
    }

    Ok(StoredRun {
        task,
        result,
        result_digest: recomputed,
    })
}

/// Load a grounded task from a JSON file. Any formatting is accepted; the
/// task itself is validated on load.
///
/// # Errors
///
/// Returns [`ResultDirReadError`] if the file is missing or the task does not
/// parse or validate.
pub fn read_task_file(path: &Path) -> Result<GroundTask, ResultDirReadError> {
    let filename = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|_| ResultDirReadError::MissingFile {
        filename: filename.clone(),
    })?;
    serde_json::from_slice(&bytes).map_err(|e| ResultDirReadError::Parse {
        filename,
        detail: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn parse_canonical<T: DeserializeOwned + serde::Serialize>(
    filename: &str,
    bytes: &[u8],
) -> Result<T, ResultDirReadError> {
    let value: T = serde_json::from_slice(bytes).map_err(|e| ResultDirReadError::Parse {
        filename: filename.to_string(),
        detail: e.to_string(),
    })?;
    if canonical_bytes_of(&value)? != bytes {
        return Err(ResultDirReadError::NotCanonical {
            filename: filename.to_string(),
        });
    }
    Ok(value)
}

/// Write bytes to a path via temp file + rename.
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), ResultDirWriteError> {
    let dir = path.parent().ok_or_else(|| ResultDirWriteError::Io {
        detail: "no parent directory".into(),
    })?;
    let temp_name = format!(
        "{TEMP_PREFIX}{}",
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    let temp_path = dir.join(temp_name);

    std::fs::write(&temp_path, content).map_err(|e| ResultDirWriteError::Io {
        detail: format!("write {}: {e}", temp_path.display()),
    })?;
    std::fs::rename(&temp_path, path).map_err(|e| ResultDirWriteError::Io {
        detail: format!("rename {} -> {}: {e}", temp_path.display(), path.display()),
    })?;
    Ok(())
}

fn read_required(dir: &Path, filename: &str) -> Result<Vec<u8>, ResultDirReadError> {
    std::fs::read(dir.join(filename)).map_err(|_| ResultDirReadError::MissingFile {
        filename: filename.to_string(),
    })
}

/// Regular files in `dir`, by name, without in-flight temp files.
fn list_files(dir: &Path) -> Result<BTreeSet<String>, ResultDirReadError> {
    let io = |what: &str, e: std::io::Error| ResultDirReadError::Io {
        detail: format!("{what}: {e}"),
    };
    let mut files = BTreeSet::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io("read_dir", e))? {
        let entry = entry.map_err(|e| io("dir entry", e))?;
        if !entry.file_type().map_err(|e| io("file_type", e))?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if !name.starts_with(TEMP_PREFIX) {
                files.insert(name.to_string());
            }
        }
    }
    Ok(files)
}
