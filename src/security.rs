//! Path-name validation.
//!
//! A candidate is checked syntactically against the host platform's rules and
//! then each component is probed (read-only) beneath a directory that always
//! exists, so the OS itself reports names that are too long or malformed.

use crate::errors::{FsError, FsResult};
use std::io;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

#[cfg(windows)]
const RESERVED_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>'];
#[cfg(not(windows))]
const RESERVED_CHARS: &[char] = &['/'];

// ERROR_INVALID_NAME
#[cfg(windows)]
const INVALID_NAME_CODES: &[i32] = &[123];
// ENAMETOOLONG, ERANGE
#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly"
))]
const INVALID_NAME_CODES: &[i32] = &[63, 34];
#[cfg(not(any(
    windows,
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly"
)))]
const INVALID_NAME_CODES: &[i32] = &[36, 34];

/// Returns true when `pathname` is safe and well-formed for this platform.
pub fn pathname_is_valid(pathname: &str) -> bool {
    if pathname.trim().is_empty() {
        return false;
    }
    // Must run before the drive prefix is stripped.
    if has_traversal(pathname) {
        return false;
    }
    if pathname.contains('\0') {
        return false;
    }
    let root = probe_root();
    strip_drive(pathname)
        .split(MAIN_SEPARATOR)
        .filter(|component| !component.is_empty())
        .all(|component| component_is_valid(&root, component))
}

pub fn ensure_valid(pathname: &str) -> FsResult<()> {
    if pathname_is_valid(pathname) {
        Ok(())
    } else {
        tracing::debug!(path = pathname, "path rejected");
        Err(FsError::invalid_path(pathname))
    }
}

/// `..` directly followed by either separator, anywhere in the string.
fn has_traversal(pathname: &str) -> bool {
    pathname.contains("../") || pathname.contains("..\\")
}

fn strip_drive(pathname: &str) -> &str {
    let bytes = pathname.as_bytes();
    if cfg!(windows) && bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        &pathname[2..]
    } else {
        pathname
    }
}

fn probe_root() -> PathBuf {
    if cfg!(windows) {
        let drive = std::env::var("HOMEDRIVE").unwrap_or_else(|_| "C:".to_string());
        PathBuf::from(format!("{}{}", drive.trim_end_matches(MAIN_SEPARATOR), MAIN_SEPARATOR))
    } else {
        PathBuf::from("/")
    }
}

pub(crate) fn component_is_valid(root: &Path, component: &str) -> bool {
    if component.contains(RESERVED_CHARS) {
        return false;
    }
    match std::fs::symlink_metadata(root.join(component)) {
        Ok(_) => true,
        // not found, permission denied and the like say nothing about syntax
        Err(err) => !is_invalid_name(&err),
    }
}

pub(crate) fn is_invalid_name(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::InvalidInput {
        return true;
    }
    err.raw_os_error()
        .map(|code| INVALID_NAME_CODES.contains(&code))
        .unwrap_or(false)
}
