//! Round-robin volume selection
//!
//! Each read consults exactly one volume; the selector hands them out in
//! configured order, cycling indefinitely. The cursor is the only shared
//! mutable state on the read path.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Cycles through the configured volume list in order.
pub struct VolumeRotation {
    volumes: Arc<Vec<PathBuf>>,
    cursor: AtomicUsize,
}

impl VolumeRotation {
    /// The volume list must be non-empty; `CacheConfig` enforces that
    /// before a rotation is ever constructed.
    pub(crate) fn new(volumes: Arc<Vec<PathBuf>>) -> Self {
        debug_assert!(!volumes.is_empty());
        Self {
            volumes,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Next volume in rotation: volume `i % N` on the `i`-th call.
    ///
    /// Safe under concurrent callers; exact interleaving across threads is
    /// not guaranteed. At `usize` wrap-around the cycle may skip ahead once.
    pub fn next_volume(&self) -> &Path {
        let i = self.cursor.fetch_add(1, Ordering::Relaxed);
        &self.volumes[i % self.volumes.len()]
    }

    /// The configured volumes, in rotation order
    pub fn volumes(&self) -> &[PathBuf] {
        &self.volumes
    }
}
