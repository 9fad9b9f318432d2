pub mod read;
pub mod record;
pub mod workdir;
pub mod write;

pub use record::FileRecord;
pub use workdir::WorkingDir;

use crate::{
    errors::{FsError, FsResult},
    security::ensure_valid,
};
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::info;
use workdir::resolve;

/// File operations against the shared working directory. Every operation
/// validates its path argument before touching the filesystem and holds the
/// working-directory lock until it is done.
#[derive(Debug, Clone)]
pub struct FileRepository {
    workdir: Arc<WorkingDir>,
}

impl FileRepository {
    pub fn new(workdir: Arc<WorkingDir>) -> Self {
        Self { workdir }
    }

    pub fn workdir(&self) -> &Arc<WorkingDir> {
        &self.workdir
    }

    /// Switches the working directory, creating it first when `autocreate`
    /// is set. Returns the new canonical directory.
    pub fn change_dir(&self, path: &str, autocreate: bool) -> FsResult<PathBuf> {
        ensure_valid(path)?;
        let mut current = self.workdir.lock();
        let target = resolve(&current, path);
        match fs::metadata(&target) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(FsError::DirectoryNotFound { path: path.to_string() }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if !autocreate {
                    return Err(FsError::DirectoryNotFound { path: path.to_string() });
                }
                fs::create_dir_all(&target)?;
                info!(dir = %target.display(), "created directory");
            }
            Err(err) => return Err(err.into()),
        }
        let canonical = dunce::canonicalize(&target)?;
        *current = canonical.clone();
        Ok(canonical)
    }
}

fn missing_as(err: io::Error, on_missing: impl FnOnce() -> FsError) -> FsError {
    if err.kind() == io::ErrorKind::NotFound {
        on_missing()
    } else {
        FsError::Unexpected(err)
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
