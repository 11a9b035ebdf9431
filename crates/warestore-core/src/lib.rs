pub mod date;
pub mod exif;
pub mod source;
pub mod writer;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use rayon::prelude::*;
use thiserror::Error;

use crate::source::SourceFile;
use crate::writer::RestoreTarget;

pub use crate::writer::OUTPUT_DIR_NAME;

/// Timestamp format for the per-file console lines.
const PRINT_FORMAT: &str = "%d.%m.%Y %H:%M:%S %z";

/// The only run-fatal failures: the input directory itself is unusable.
/// Everything below directory level is reported per file and never aborts
/// the run.
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("Invalid path provided: {} was not found", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("Invalid path provided: {} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("Could not list directory {}", .path.display())]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What to restore and where, for one run over one directory.
#[derive(Debug, Clone)]
pub struct RestoreOptions {
    /// Directory holding the exported files (scanned one level deep).
    pub directory: PathBuf,
    /// Rewrite the EXIF capture dates of each target.
    pub set_exif_date: bool,
    /// Overwrite the modified time of each target.
    pub set_modified_time: bool,
    /// Mutate the originals instead of writing copies into `restored/`.
    pub in_place: bool,
}

/// Why a file was skipped before any operation ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Name does not carry the `IMG-<date>-WA` marker pair.
    PatternMismatch,
    /// The token between the markers is not a valid `YYYYMMDD` date.
    BadDateToken(String),
}

/// One operation of the per-file pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Copy,
    ExifDate,
    ModifiedTime,
}

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Skipped(SkipReason),
    NothingToProcess,
    Partial { failed: Vec<Step> },
    Applied,
}

/// Per-file record of a run.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub file_name: String,
    pub outcome: Outcome,
    /// The timestamp that was (or would have been) restored.
    pub restored: Option<DateTime<Local>>,
}

/// Everything a run did, one entry per listed file, in listing order.
#[derive(Debug, Default)]
pub struct RestoreReport {
    pub files: Vec<FileReport>,
}

impl RestoreReport {
    pub fn total(&self) -> usize {
        self.files.len()
    }

    pub fn applied(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Applied))
    }

    pub fn partial(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Partial { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    pub fn untouched(&self) -> usize {
        self.count(|o| matches!(o, Outcome::NothingToProcess))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }
}

/// Process every file of `options.directory`, one level deep. Files are
/// independent of each other, so they run in parallel; the report keeps
/// listing order. The only error is an unusable input path.
pub fn restore_directory(options: &RestoreOptions) -> Result<RestoreReport, RestoreError> {
    let sources = source::list_directory(&options.directory)?;
    let out_dir = options.directory.join(writer::OUTPUT_DIR_NAME);

    let files = sources
        .par_iter()
        .map(|src| process_file(src, options, &out_dir))
        .collect();

    Ok(RestoreReport { files })
}

fn process_file(source: &SourceFile, options: &RestoreOptions, out_dir: &Path) -> FileReport {
    let report = |outcome, restored| FileReport {
        file_name: source.file_name.clone(),
        outcome,
        restored,
    };

    let Some(token) = date::filename::date_token(&source.file_name) else {
        eprintln!("Could not find date in file name: {}", source.file_name);
        return report(Outcome::Skipped(SkipReason::PatternMismatch), None);
    };

    let Some(restored) = date::resolve(token, source.modified) else {
        eprintln!("Could not parse date {token} - not an 8-digit YYYYMMDD date");
        return report(
            Outcome::Skipped(SkipReason::BadDateToken(token.to_string())),
            None,
        );
    };

    if !options.set_exif_date && !options.set_modified_time {
        println!("Processing {}: nothing to process", source.file_name);
        return report(Outcome::NothingToProcess, Some(restored));
    }

    let target = if options.in_place {
        RestoreTarget::in_place(&source.path)
    } else {
        match RestoreTarget::copy_into(&source.path, out_dir) {
            Ok(target) => target,
            Err(e) => {
                eprintln!("Could not copy {}: {e:#}", source.file_name);
                return report(
                    Outcome::Partial {
                        failed: vec![Step::Copy],
                    },
                    Some(restored),
                );
            }
        }
    };

    let mut line = format!("Processing {}:", source.file_name);
    let mut failed = Vec::new();
    let shown = restored.format(PRINT_FORMAT);

    if options.set_exif_date {
        match exif::write_capture_dates(target.path(), restored) {
            Ok(()) => line.push_str(&format!(" [EXIF capture dates -> {shown}]")),
            Err(e) => {
                eprintln!(
                    "Could not overwrite EXIF capture dates of {}: {e:#}",
                    source.file_name
                );
                failed.push(Step::ExifDate);
            }
        }
    }

    // mtime goes last: the EXIF rewrite replaces file content, resetting it
    if options.set_modified_time {
        match writer::set_modified_time(target.path(), restored) {
            Ok(()) => line.push_str(&format!(" [modified time -> {shown}]")),
            Err(e) => {
                eprintln!(
                    "Could not overwrite modified time of {}: {e:#}",
                    source.file_name
                );
                failed.push(Step::ModifiedTime);
            }
        }
    }

    println!("{line}");

    let outcome = if failed.is_empty() {
        Outcome::Applied
    } else {
        Outcome::Partial { failed }
    };
    report(outcome, Some(restored))
}
