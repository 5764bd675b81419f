//! I/O error messages with actionable hints.
//!
//! `describe_io_error` renders "<op> '<path>': <error> — <hint> [os code: N]" and
//! backs the Display impl of `HoloError::Io`, so every filesystem failure in a
//! report row reads the same way.

use std::io;
use std::path::Path;

#[cfg(unix)]
use libc;

fn hint_for(e: &io::Error) -> Option<&'static str> {
    #[cfg(unix)]
    if let Some(code) = e.raw_os_error() {
        let hint = match code {
            libc::EACCES | libc::EPERM => Some("permission denied; check ownership and write permissions."),
            libc::ENOENT => Some("path not found; verify it exists."),
            libc::EEXIST => Some("already exists; pass --clobber or remove the target."),
            libc::EISDIR => Some("is a directory; expected a regular file."),
            libc::ENOTDIR => Some("a path component is not a directory."),
            libc::ENOSPC => Some("insufficient space on the storage device."),
            libc::EROFS => Some("read-only filesystem; cannot write here."),
            libc::EXDEV => Some("cross-filesystem; rename not possible."),
            libc::ELOOP => Some("too many symbolic link levels; possible symlink cycle."),
            libc::ENAMETOOLONG => Some("filename or path too long; the storage root adds to every path."),
            libc::EMFILE => Some("process file descriptor limit reached."),
            _ => None,
        };
        if hint.is_some() {
            return hint;
        }
    }
    #[cfg(windows)]
    if let Some(code) = e.raw_os_error() {
        let hint = match code {
            5 => Some("access denied; check permissions."),
            2 | 3 => Some("path not found; verify it exists."),
            80 | 183 => Some("already exists; pass --clobber or remove the target."),
            112 => Some("insufficient disk space."),
            206 => Some("filename or path too long (MAX_PATH exceeded)."),
            _ => None,
        };
        if hint.is_some() {
            return hint;
        }
    }
    match e.kind() {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions."),
        io::ErrorKind::NotFound => Some("path not found; verify it exists."),
        io::ErrorKind::AlreadyExists => Some("already exists; pass --clobber or remove the target."),
        _ => None,
    }
}

/// Format a human-friendly message with op/path plus platform-aware hints.
pub fn describe_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    if let Some(hint) = hint_for(e) {
        msg.push_str(" — ");
        msg.push_str(hint);
    }
    if let Some(code) = e.raw_os_error() {
        msg.push_str(&format!(" [os code: {}]", code));
    }
    msg
}
