// File-level conversion helpers.
//
// Provides `convert_file()`, which runs parse -> encode -> write for one
// pchtxt file and classifies the result, plus `discover()` for finding
// inputs and `convert_all()` for batches. Optionally computes a SHA-256 of
// each written container (feature-gated behind `file-io`).

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

#[cfg(feature = "file-io")]
use sha2::Digest;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::ips32::{self, EncodeError, PatchRecord};
use crate::pchtxt::{self, PCHTXT_EXTENSION, ParsedFile};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics for a container written by `convert_file()`.
#[derive(Debug, Clone)]
pub struct ConvertStats {
    /// Number of patch records in the container.
    pub records: usize,
    /// Container size in bytes.
    pub container_size: u64,
    /// SHA-256 of the container (if `file-io` feature is enabled).
    pub sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a file produced no container.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The input could not be read.
    #[error("{0}")]
    Read(String),
    /// Parsing succeeded but no binary identifier was found.
    #[error("Missing Game ID")]
    MissingId,
    #[error("Save Failed: {0}")]
    Encode(#[from] EncodeError),
    #[error("Save Failed: {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of converting one file.
#[derive(Debug)]
pub enum FileOutcome {
    /// A new container was written.
    Created { output: PathBuf, stats: ConvertStats },
    /// The destination already existed and was left untouched.
    Skipped { output: PathBuf },
    /// No container was written.
    Failed { reason: ConvertError },
}

impl FileOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Per-file record handed to the presentation layer.
#[derive(Debug)]
pub struct FileReport {
    pub input: PathBuf,
    pub binary_id: Option<String>,
    /// Title if present, otherwise the binary id.
    pub label: Option<String>,
    pub records: usize,
    pub outcome: FileOutcome,
}

/// Created/skipped/failed counters for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Created { .. } => self.created += 1,
            FileOutcome::Skipped { .. } => self.skipped += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.skipped + self.failed
    }

    pub fn from_reports<'a>(reports: impl IntoIterator<Item = &'a FileReport>) -> Self {
        let mut summary = Self::default();
        for report in reports {
            summary.record(&report.outcome);
        }
        summary
    }
}

// ---------------------------------------------------------------------------
// Default buffer size
// ---------------------------------------------------------------------------

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Destination for `parsed`: `<binary_id>.ips` next to the input.
pub fn output_path(input: &Path, parsed: &ParsedFile) -> Option<PathBuf> {
    let name = parsed.output_file_name()?;
    Some(match input.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    })
}

fn is_pchtxt(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| {
            name.to_ascii_lowercase()
                .ends_with(&format!(".{PCHTXT_EXTENSION}"))
        })
}

/// Recursively find pchtxt files under `root`, sorted by path.
///
/// Unreadable directory entries are logged and skipped.
pub fn discover(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_pchtxt(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

// ---------------------------------------------------------------------------
// write_container
// ---------------------------------------------------------------------------

/// Encode `records` and write them to a new file at `dest`.
///
/// The container is built in memory first, so an encode failure leaves no
/// file behind. `dest` is opened with create-new semantics: an existing file
/// surfaces as `io::ErrorKind::AlreadyExists` and is never truncated. A
/// partially written file is removed.
pub fn write_container(dest: &Path, records: &[PatchRecord]) -> Result<ConvertStats, ConvertError> {
    let bytes = ips32::encode_records(records)?;

    let write_err = |source: io::Error| ConvertError::Write {
        path: dest.to_path_buf(),
        source,
    };

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
        .map_err(write_err)?;

    let mut writer = BufWriter::with_capacity(BUF_SIZE, file);
    if let Err(e) = writer.write_all(&bytes).and_then(|()| writer.flush()) {
        drop(writer);
        if let Err(rm) = fs::remove_file(dest) {
            warn!("could not remove partial {}: {rm}", dest.display());
        }
        return Err(write_err(e));
    }

    #[cfg(feature = "file-io")]
    let sha256 = Some(sha2::Sha256::digest(&bytes).into());
    #[cfg(not(feature = "file-io"))]
    let sha256: Option<[u8; 32]> = None;

    Ok(ConvertStats {
        records: records.len(),
        container_size: bytes.len() as u64,
        sha256,
    })
}

// ---------------------------------------------------------------------------
// convert_file
// ---------------------------------------------------------------------------

/// Parse `input`, then write its container unless one already exists.
///
/// Never panics and never returns early on a bad file: every failure is
/// folded into the returned `FileReport`.
pub fn convert_file(input: &Path) -> FileReport {
    let parsed = pchtxt::parse_file(input);
    let outcome = classify_and_write(input, &parsed);

    match &outcome {
        FileOutcome::Created { output, stats } => info!(
            "{}: wrote {} ({} records, {} bytes)",
            input.display(),
            output.display(),
            stats.records,
            stats.container_size
        ),
        FileOutcome::Skipped { output } => {
            info!("{}: {} exists, skipped", input.display(), output.display())
        }
        FileOutcome::Failed { reason } => debug!("{}: {reason}", input.display()),
    }

    FileReport {
        input: input.to_path_buf(),
        label: parsed.label().map(str::to_string),
        records: parsed.records.len(),
        binary_id: parsed.binary_id,
        outcome,
    }
}

fn classify_and_write(input: &Path, parsed: &ParsedFile) -> FileOutcome {
    if let Some(msg) = &parsed.error {
        return FileOutcome::Failed {
            reason: ConvertError::Read(msg.clone()),
        };
    }
    let Some(output) = output_path(input, parsed) else {
        return FileOutcome::Failed {
            reason: ConvertError::MissingId,
        };
    };
    if output.exists() {
        return FileOutcome::Skipped { output };
    }

    match write_container(&output, &parsed.records) {
        Ok(stats) => FileOutcome::Created { output, stats },
        Err(ConvertError::Write { source, .. })
            if source.kind() == io::ErrorKind::AlreadyExists =>
        {
            FileOutcome::Skipped { output }
        }
        Err(reason) => FileOutcome::Failed { reason },
    }
}

/// Convert every path, returning reports in input order.
///
/// With the `parallel` feature the files are converted on the rayon pool;
/// the order of the returned reports is unchanged.
pub fn convert_all(inputs: &[PathBuf]) -> Vec<FileReport> {
    #[cfg(feature = "parallel")]
    {
        inputs.par_iter().map(|p| convert_file(p)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        inputs.iter().map(|p| convert_file(p)).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
