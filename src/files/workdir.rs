use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// The single directory every file operation resolves against.
///
/// Shared by all requests. Holders of the guard see a stable directory for
/// as long as they keep it, which is how an operation keeps a concurrent
/// change of directory from landing halfway through.
#[derive(Debug)]
pub struct WorkingDir {
    current: Mutex<PathBuf>,
}

impl WorkingDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { current: Mutex::new(dir.into()) }
    }

    /// Starts in the directory the process was launched from.
    pub fn from_process() -> std::io::Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::new(dunce::canonicalize(cwd)?))
    }

    pub fn lock(&self) -> MutexGuard<'_, PathBuf> {
        // a poisoned guard still holds a complete path
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self) -> PathBuf {
        self.lock().clone()
    }
}

pub fn resolve(base: &Path, pathname: &str) -> PathBuf {
    let candidate = Path::new(pathname);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}
