//! Hidden temp-sibling naming and directory fsync.

use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Hidden sibling of `target` that nothing else will pick:
/// ".holo.<tag>.<name>.<pid>.<nanos>.<seq>".
pub(crate) fn unique_sibling(target: &Path, tag: &str) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut name = OsString::from(format!(".holo.{tag}."));
    name.push(target.file_name().unwrap_or_else(|| "entry".as_ref()));
    name.push(format!(".{pid}.{nanos}.{seq}"));
    target.parent().unwrap_or_else(|| Path::new(".")).join(name)
}

#[cfg(unix)]
pub(crate) fn fsync_dir(dir: &Path) -> io::Result<()> {
    let f = File::open(dir)?;
    f.sync_all()
}

#[cfg(windows)]
pub(crate) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn siblings_are_unique_and_hidden() {
        let target = Path::new("/store/a.txt");
        let set: HashSet<_> = (0..32).map(|_| unique_sibling(target, "tmp")).collect();
        assert_eq!(set.len(), 32);
        for p in set {
            assert_eq!(p.parent(), Some(Path::new("/store")));
            let name = p.file_name().unwrap().to_string_lossy().into_owned();
            assert!(name.starts_with(".holo.tmp.a.txt."), "name was {name}");
        }
    }
}
