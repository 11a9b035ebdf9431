use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::debug;

use crate::RestoreError;

/// A file found in the input directory. Read-only: restore steps only ever
/// mutate the `RestoreTarget` derived from it.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub file_name: String,
    /// Modified time at listing, if the filesystem let us read it.
    pub modified: Option<DateTime<Local>>,
}

/// List the files of `dir` (one level deep, directories ignored), sorted by
/// file name. An unusable input path is the only fatal error of a run.
pub fn list_directory(dir: &Path) -> Result<Vec<SourceFile>, RestoreError> {
    if !dir.exists() {
        return Err(RestoreError::DirectoryNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(RestoreError::NotADirectory(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir).map_err(|source| RestoreError::List {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| RestoreError::List {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let modified: Option<DateTime<Local>> = entry
            .metadata()
            .ok()
            .and_then(|meta| meta.modified().ok())
            .map(|mtime| mtime.into());
        files.push(SourceFile {
            path,
            file_name,
            modified,
        });
    }
    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    debug!("{} file(s) in {}", files.len(), dir.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_files_sorted_and_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.jpg"), b"b").unwrap();
        fs::write(dir.path().join("a.jpg"), b"a").unwrap();
        fs::create_dir(dir.path().join("restored")).unwrap();

        let files = list_directory(dir.path()).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["a.jpg", "b.jpg"]);
        assert!(files.iter().all(|f| f.modified.is_some()));
    }

    #[test]
    fn test_missing_and_non_directory_paths() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("nope");
        assert!(matches!(
            list_directory(&missing),
            Err(RestoreError::DirectoryNotFound(_))
        ));

        let file = dir.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            list_directory(&file),
            Err(RestoreError::NotADirectory(_))
        ));
    }
}
