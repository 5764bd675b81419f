//! Path resolution that tolerates nonexistent paths.
//! - Existing paths are fully canonicalized (symlinks, `.` and `..` resolved).
//! - Anything canonicalization refuses falls back to a lexical normalization
//!   of the absolute form, so planning can name destinations that don't exist yet.
//!   The part of that form which does exist is still canonicalized.

use std::path::{Component, Path, PathBuf};
use tracing::trace;

/// Return the fully resolved path even if it does not exist.
///
/// When canonicalization fails, the absolute form is normalized lexically and
/// its deepest existing ancestor is canonicalized, so a symlinked ancestor is
/// still resolved and only the missing tail stays lexical.
pub fn resolve(path: &Path) -> PathBuf {
    match dunce::canonicalize(path) {
        Ok(p) => p,
        Err(e) => {
            trace!(path = %path.display(), error = %e, "canonicalize failed; normalizing lexically");
            let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
            canonicalize_existing_prefix(normalize_lexically(&absolute))
        }
    }
}

/// Canonicalize the deepest ancestor that exists and re-append the rest, so
/// a second resolve() of the result returns the same path.
fn canonicalize_existing_prefix(normalized: PathBuf) -> PathBuf {
    let mut tail = Vec::new();
    let mut cur = normalized.as_path();
    loop {
        if let Ok(real) = dunce::canonicalize(cur) {
            return tail.iter().rev().fold(real, |acc, name| acc.join(name));
        }
        let (Some(parent), Some(name)) = (cur.parent(), cur.file_name()) else {
            break;
        };
        tail.push(name.to_os_string());
        cur = parent;
    }
    normalized
}

/// Collapse `.` and `..` without touching the filesystem.
/// `..` at the root stays at the root, as in POSIX.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::Prefix(_) | Component::RootDir => out.push(comp.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                );
                if !at_root {
                    out.pop();
                }
            }
            Component::Normal(name) => out.push(name),
        }
    }
    out
}

/// Strip the root (and any drive prefix) so the path can be joined under another root.
pub(crate) fn strip_root(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}
