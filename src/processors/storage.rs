// webpify/src/processors/storage.rs
use std::path::Path;

/// Filesystem operations used to dispose of the original upload.
pub trait Storage {
    /// Best effort; failures are not reported.
    fn delete(&self, path: &Path);

    /// Returns `false` when the move could not be performed.
    fn move_file(&self, from: &Path, to: &Path) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for LocalStorage {
    fn delete(&self, path: &Path) {
        if let Err(e) = std::fs::remove_file(path) {
            log::warn!("Failed to delete {}: {}", path.display(), e);
        }
    }

    fn move_file(&self, from: &Path, to: &Path) -> bool {
        match std::fs::rename(from, to) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to move {} to {}: {}", from.display(), to.display(), e);
                false
            }
        }
    }
}
