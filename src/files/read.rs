use super::{base_name, missing_as, resolve, FileRecord, FileRepository};
use crate::{
    errors::{FsError, FsResult},
    security::ensure_valid,
};
use std::{fs, io};

impl FileRepository {
    /// Immediate entries of the working directory, without content, in
    /// enumeration order.
    pub fn list_files(&self) -> FsResult<Vec<FileRecord>> {
        let current = self.workdir.lock();
        let mut files = Vec::new();
        for entry in fs::read_dir(&*current)? {
            let entry = entry?;
            let meta = match fs::metadata(entry.path()) {
                Ok(meta) => meta,
                // removed after enumeration, or a dangling link
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => return Err(err.into()),
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            files.push(FileRecord::from_metadata(name, &meta)?);
        }
        Ok(files)
    }

    pub fn file_data(&self, filename: &str, verbose: bool) -> FsResult<FileRecord> {
        ensure_valid(filename)?;
        let current = self.workdir.lock();
        let path = resolve(&current, filename);
        let not_found = || FsError::FileNotFound { path: filename.to_string() };
        let meta = fs::metadata(&path).map_err(|e| missing_as(e, not_found))?;
        let record = FileRecord::from_metadata(base_name(&path), &meta)?;
        if !verbose {
            return Ok(record);
        }
        if meta.is_dir() {
            return Err(FsError::NotAFile { path: filename.to_string() });
        }
        let bytes = fs::read(&path).map_err(|e| missing_as(e, not_found))?;
        Ok(record.with_content(&bytes))
    }
}
