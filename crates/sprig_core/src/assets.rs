//! Load-and-cache by path.
//!
//! Assets are keyed by their resolved path (`root.join(path)`), so the same
//! file requested through different relative spellings under one root still
//! maps to one entry. Handles are `Arc`s and stay valid for as long as the
//! caller holds them, even after `clear`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct AssetCache<T> {
    root: PathBuf,
    entries: HashMap<PathBuf, Arc<T>>,
}

impl<T> AssetCache<T> {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        normalize(&self.root.join(path))
    }

    /// Return the cached asset for `path`, running `loader` on the resolved
    /// path only the first time it is requested.
    pub fn load<F>(&mut self, path: &str, loader: F) -> Result<Arc<T>, String>
    where
        F: FnOnce(&Path) -> Result<T, String>,
    {
        let resolved = self.resolve(path);
        if let Some(asset) = self.entries.get(&resolved) {
            return Ok(Arc::clone(asset));
        }

        let asset = Arc::new(loader(&resolved)?);
        log::debug!("Loaded asset '{}'", resolved.display());
        self.entries.insert(resolved, Arc::clone(&asset));
        Ok(asset)
    }

    pub fn get(&self, path: &str) -> Option<Arc<T>> {
        self.entries.get(&self.resolve(path)).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Lexically collapse `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
