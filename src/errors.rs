//! Typed error definitions for holographer.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::fs_ops::PathKind;

#[derive(Debug, Error)]
pub enum HoloError {
    /// A precondition was violated (bad algorithm name, clobber refusal, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// No copy strategy exists for this kind of entry.
    #[error("no copy strategy for path kind '{0}'")]
    UnimplementedKind(PathKind),

    /// Filesystem error with the operation and path that produced it.
    #[error("{}", crate::fs_ops::describe_io_error(op, path, source))]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("operation interrupted by user")]
    Interrupted,
}

impl HoloError {
    /// Shorthand for building a `Validation` error from anything displayable.
    pub fn validation(msg: impl Into<String>) -> Self {
        HoloError::Validation(msg.into())
    }

    /// Stable numeric code for structured logging.
    pub fn code(&self) -> u16 {
        match self {
            HoloError::Validation(_) => 10,
            HoloError::UnimplementedKind(_) => 20,
            HoloError::Io { .. } => 30,
            HoloError::Interrupted => 40,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, HoloError::Validation(_))
    }
}

/// Adapter for `.map_err(...)`: wrap an io::Error with operation and path context.
pub fn io_err(op: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> HoloError {
    let path = path.into();
    move |source| HoloError::Io { op, path, source }
}

pub type Result<T, E = HoloError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let errs = [
            HoloError::validation("x"),
            HoloError::UnimplementedKind(PathKind::Nonexistent),
            io_err("open", "/x")(io::Error::from(io::ErrorKind::NotFound)),
            HoloError::Interrupted,
        ];
        let mut codes: Vec<u16> = errs.iter().map(HoloError::code).collect();
        codes.dedup();
        assert_eq!(codes.len(), 4);
    }

    #[test]
    fn unimplemented_kind_names_the_kind() {
        let msg = HoloError::UnimplementedKind(PathKind::Nonexistent).to_string();
        assert!(msg.contains("nonexistent"), "msg was: {msg}");
    }

    #[test]
    fn io_error_mentions_op_and_path() {
        let e = io_err("open source", "/no/such/file")(io::Error::from(io::ErrorKind::NotFound));
        let msg = e.to_string();
        assert!(msg.contains("open source"));
        assert!(msg.contains("/no/such/file"));
    }
}
