use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("Invalid path name: {path}")]
    InvalidPath { path: String },
    #[error("There is no such directory \"{path}\"")]
    DirectoryNotFound { path: String },
    #[error("There is no such file \"{path}\"")]
    FileNotFound { path: String },
    #[error("File {path} already exists")]
    AlreadyExists { path: String },
    #[error("The given path \"{path}\" is not a file")]
    NotAFile { path: String },
    #[error("unexpected I/O failure: {0}")]
    Unexpected(#[from] std::io::Error),
}

impl FsError {
    pub fn invalid_path(path: impl Into<String>) -> Self {
        FsError::InvalidPath { path: path.into() }
    }

    pub fn code(&self) -> &'static str {
        match self {
            FsError::InvalidPath { .. } => "InvalidPath",
            FsError::DirectoryNotFound { .. } => "DirectoryNotFound",
            FsError::FileNotFound { .. } => "FileNotFound",
            FsError::AlreadyExists { .. } => "AlreadyExists",
            FsError::NotAFile { .. } => "NotAFile",
            FsError::Unexpected(_) => "Unexpected",
        }
    }

    /// Unexpected failures are logged server-side and never shown to clients.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FsError::Unexpected(_))
    }
}

pub type FsResult<T> = Result<T, FsError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ChangeDir,
    ListFiles,
    GetFile,
    CreateFile,
    DeleteFile,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::ChangeDir => "change_dir",
            Operation::ListFiles => "list_files",
            Operation::GetFile => "get_file",
            Operation::CreateFile => "create_file",
            Operation::DeleteFile => "delete_file",
        }
    }

    /// Phrase used in client-facing error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Operation::ChangeDir => "changing directory",
            Operation::ListFiles => "collecting files data",
            Operation::GetFile => "getting file data",
            Operation::CreateFile => "creating file",
            Operation::DeleteFile => "deleting file",
        }
    }
}
