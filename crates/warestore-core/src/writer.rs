use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use chrono::{DateTime, Local};
use filetime::FileTime;

/// Name of the output subdirectory created inside the input directory.
pub const OUTPUT_DIR_NAME: &str = "restored";

/// The one path the restore steps are allowed to mutate. Built either by
/// copying the source into the output directory or, in in-place mode, by
/// claiming the source itself.
#[derive(Debug)]
pub struct RestoreTarget {
    path: PathBuf,
}

impl RestoreTarget {
    /// Copy `source` into `out_dir` (created on first use) and hand out the
    /// copy as the mutation target. The source stays untouched.
    pub fn copy_into(source: &Path, out_dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
        let file_name = source
            .file_name()
            .ok_or_else(|| anyhow!("{} has no file name", source.display()))?;
        let path = out_dir.join(file_name);
        fs::copy(source, &path)
            .with_context(|| format!("copying {} to {}", source.display(), path.display()))?;
        Ok(Self { path })
    }

    /// Legacy mode: mutate the source file directly.
    pub fn in_place(source: &Path) -> Self {
        Self {
            path: source.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Set the filesystem modified time of `path` to `restored`.
pub fn set_modified_time(path: &Path, restored: DateTime<Local>) -> anyhow::Result<()> {
    let mtime = FileTime::from_unix_time(restored.timestamp(), restored.timestamp_subsec_nanos());
    filetime::set_file_mtime(path, mtime)
        .with_context(|| format!("setting modified time of {}", path.display()))
}
