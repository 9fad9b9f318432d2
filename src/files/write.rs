use super::{base_name, missing_as, resolve, FileRecord, FileRepository};
use crate::{
    errors::{FsError, FsResult},
    security::ensure_valid,
};
use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::info;

impl FileRepository {
    /// Writes `content` to a new file. Never replaces an existing one: the
    /// open itself fails if the name is taken.
    pub fn create_file(&self, filename: &str, content: &[u8]) -> FsResult<FileRecord> {
        ensure_valid(filename)?;
        let current = self.workdir.lock();
        let path = resolve(&current, filename);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                return Err(FsError::AlreadyExists { path: filename.to_string() })
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let parent = path.parent().unwrap_or(current.as_path());
                return Err(FsError::DirectoryNotFound { path: parent.display().to_string() });
            }
            Err(err) => return Err(err.into()),
        };
        let written = file
            .write_all(content)
            .and_then(|_| file.flush())
            .and_then(|_| file.metadata());
        drop(file);
        let meta = discard_on_error(&path, written)?;
        let mut record = FileRecord::from_metadata(base_name(&path), &meta)?.with_content(content);
        record.modified_at = None;
        info!(path = %path.display(), size = record.size, "file created");
        Ok(record)
    }

    /// Removes a regular file and returns where it was.
    pub fn delete_file(&self, filename: &str) -> FsResult<PathBuf> {
        ensure_valid(filename)?;
        let current = self.workdir.lock();
        let path = resolve(&current, filename);
        let not_found = || FsError::FileNotFound { path: filename.to_string() };
        let meta = fs::metadata(&path).map_err(|e| missing_as(e, not_found))?;
        if !meta.is_file() {
            return Err(FsError::NotAFile { path: filename.to_string() });
        }
        fs::remove_file(&path).map_err(|e| missing_as(e, not_found))?;
        info!(path = %path.display(), "file deleted");
        Ok(path)
    }
}

/// Removes a half-written file so the name is free for the next create.
pub(crate) fn discard_on_error<T>(path: &Path, result: io::Result<T>) -> io::Result<T> {
    if result.is_err() {
        if let Err(err) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %err, "cannot remove partial file");
        }
    }
    result
}
