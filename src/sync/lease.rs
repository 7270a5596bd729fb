use crate::error::SyncError;
use log::debug;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, PoisonError};

/// Mirror directories with a run in progress, across the whole process.
static ACTIVE_MIRRORS: LazyLock<Mutex<HashSet<PathBuf>>> =
    LazyLock::new(|| Mutex::new(HashSet::new()));

/// Exclusive claim on one mirror directory, released on drop.
#[derive(Debug)]
pub(crate) struct MirrorLease {
    key: PathBuf,
}

impl MirrorLease {
    /// Claim `dir`, failing with [`SyncError::AlreadyRunning`] when any
    /// other run in this process holds it.
    pub(crate) fn acquire(dir: &Path) -> Result<Self, SyncError> {
        let key = lease_key(dir);
        let mut active = ACTIVE_MIRRORS
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !active.insert(key.clone()) {
            return Err(SyncError::AlreadyRunning);
        }
        debug!("Acquired mirror {}", key.display());
        Ok(Self { key })
    }
}

impl Drop for MirrorLease {
    fn drop(&mut self) {
        ACTIVE_MIRRORS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
        debug!("Released mirror {}", self.key.display());
    }
}

/// Canonical form of `dir`. A directory that does not exist yet is keyed by
/// its canonical parent, so the key stays the same once it is cloned.
fn lease_key(dir: &Path) -> PathBuf {
    if let Ok(key) = std::fs::canonicalize(dir) {
        return key;
    }
    let absolute = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
    if let (Some(parent), Some(name)) = (absolute.parent(), absolute.file_name()) {
        if let Ok(parent) = std::fs::canonicalize(parent) {
            return parent.join(name);
        }
    }
    absolute
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_claim_on_same_dir_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let lease = MirrorLease::acquire(tmp.path()).unwrap();

        let again = MirrorLease::acquire(&tmp.path().join("."));
        assert!(matches!(again, Err(SyncError::AlreadyRunning)));

        drop(lease);
        assert!(MirrorLease::acquire(tmp.path()).is_ok());
    }

    #[test]
    fn test_distinct_dirs_do_not_conflict() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let _a = MirrorLease::acquire(a.path()).unwrap();
        assert!(MirrorLease::acquire(b.path()).is_ok());
    }

    #[test]
    fn test_key_is_stable_once_dir_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("not-cloned-yet");
        let _lease = MirrorLease::acquire(&missing).unwrap();

        std::fs::create_dir(&missing).unwrap();
        assert!(matches!(
            MirrorLease::acquire(&missing),
            Err(SyncError::AlreadyRunning)
        ));
    }
}
