use crate::StoreError;
use fs2::FileExt;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Exclusive advisory lock on a configuration directory, released on drop.
///
/// The lock is taken on the directory handle itself, so holding it leaves
/// no file behind. Serializes the check-then-write sequence of network
/// creation across processes. Readers do not take it.
pub struct DirLock {
    handle: File,
}

impl DirLock {
    pub fn acquire(dir: &Path) -> Result<Self, StoreError> {
        let handle = open_dir(dir)?;
        handle
            .lock_exclusive()
            .map_err(|e| StoreError::LockFailed(format!("{}: {e}", dir.display())))?;
        debug!("acquired lock on {}", dir.display());
        Ok(Self { handle })
    }

    /// `Ok(None)` only when another holder has the lock.
    pub fn try_acquire(dir: &Path) -> Result<Option<Self>, StoreError> {
        let handle = open_dir(dir)?;
        match handle.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { handle })),
            Err(e) if is_contended(&e) => Ok(None),
            Err(e) => Err(StoreError::LockFailed(format!("{}: {e}", dir.display()))),
        }
    }
}

fn is_contended(e: &std::io::Error) -> bool {
    e.kind() == std::io::ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

fn open_dir(dir: &Path) -> Result<File, StoreError> {
    File::open(dir)
        .map_err(|e| StoreError::LockFailed(format!("cannot open {}: {e}", dir.display())))
}

impl Drop for DirLock {
    fn drop(&mut self) {
        let _ = self.handle.unlock();
    }
}
