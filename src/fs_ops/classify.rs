//! Path classification.
//! Checks run in a fixed priority order and follow symlinks, so a link to a
//! regular file is a `File`; only links whose target is neither file nor
//! directory land in `Symlink`, and broken links are `Nonexistent`.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Filesystem kind of a path, as seen through symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathKind {
    Nonexistent,
    Dir,
    File,
    Symlink,
    Other,
}

impl PathKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathKind::Nonexistent => "nonexistent",
            PathKind::Dir => "dir",
            PathKind::File => "file",
            PathKind::Symlink => "symlink",
            PathKind::Other => "other",
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nonexistent" => Ok(PathKind::Nonexistent),
            "dir" => Ok(PathKind::Dir),
            "file" => Ok(PathKind::File),
            "symlink" => Ok(PathKind::Symlink),
            "other" => Ok(PathKind::Other),
            _ => Err(format!("invalid path kind: '{s}'")),
        }
    }
}

/// Return which kind of path we have: nonexistent → dir → file → symlink → other.
pub fn classify(path: &Path) -> PathKind {
    if !path.exists() {
        PathKind::Nonexistent
    } else if path.is_dir() {
        PathKind::Dir
    } else if path.is_file() {
        PathKind::File
    } else if path.is_symlink() {
        PathKind::Symlink
    } else {
        PathKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn basic_kinds() {
        let td = tempdir().unwrap();
        let f = td.path().join("f");
        fs::write(&f, "x").unwrap();
        assert_eq!(classify(td.path()), PathKind::Dir);
        assert_eq!(classify(&f), PathKind::File);
        assert_eq!(classify(&td.path().join("nope")), PathKind::Nonexistent);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_follow_their_target() {
        use std::os::unix::fs::symlink;
        let td = tempdir().unwrap();
        let target = td.path().join("target.txt");
        fs::write(&target, "x").unwrap();
        let to_file = td.path().join("to_file");
        let to_dir = td.path().join("to_dir");
        let broken = td.path().join("broken");
        symlink(&target, &to_file).unwrap();
        symlink(td.path(), &to_dir).unwrap();
        symlink(td.path().join("gone"), &broken).unwrap();

        assert_eq!(classify(&to_file), PathKind::File);
        assert_eq!(classify(&to_dir), PathKind::Dir);
        assert_eq!(classify(&broken), PathKind::Nonexistent);
    }

    #[cfg(unix)]
    #[test]
    fn fifo_is_other() {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;
        let td = tempdir().unwrap();
        let fifo = td.path().join("pipe");
        let c = CString::new(fifo.as_os_str().as_bytes()).unwrap();
        let rc = unsafe { libc::mkfifo(c.as_ptr(), 0o600) };
        assert_eq!(rc, 0);
        assert_eq!(classify(&fifo), PathKind::Other);
    }

    #[test]
    fn display_roundtrips_with_fromstr() {
        for k in [PathKind::Nonexistent, PathKind::Dir, PathKind::File, PathKind::Symlink, PathKind::Other] {
            assert_eq!(k.to_string().parse::<PathKind>().unwrap(), k);
        }
        assert!("socket".parse::<PathKind>().is_err());
    }
}
