//! Cache facade - Wraps a deterministic function with the disk cache
//!
//! Reads consult one volume per call, chosen by rotation. A miss invokes
//! the wrapped function on the calling thread, returns its result, and
//! fans a copy out to every configured volume in the background.

use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{CacheConfig, ConfigError};
use crate::rotation::VolumeRotation;
use crate::store::{self, StoreError};
use crate::writer::WritePool;

/// Disk-backed memoization of a deterministic `Fn(&str) -> V`.
///
/// The wrapped function must be deterministic and side-effect free: whether
/// it runs on a given call depends on cache state. Its panics (and, for a
/// `Result`-valued `V`, its error values) reach the caller unchanged; cache
/// failures never do.
pub struct DiskMemo<F, V> {
    func: F,
    volumes: Arc<Vec<PathBuf>>,
    rotation: VolumeRotation,
    writer: WritePool,
    _entry: PhantomData<fn() -> V>,
}

impl<F, V> DiskMemo<F, V>
where
    F: Fn(&str) -> V,
    V: Serialize + DeserializeOwned + Clone + Send + 'static,
{
    /// Wrap `func` with the cache described by `config`
    pub fn new(config: CacheConfig, func: F) -> Result<Self, ConfigError> {
        let (volumes, writers) = config.into_parts();
        let volumes = Arc::new(volumes);
        Ok(Self {
            func,
            rotation: VolumeRotation::new(Arc::clone(&volumes)),
            writer: WritePool::new(writers)?,
            volumes,
            _entry: PhantomData,
        })
    }

    /// Look up `key`, invoking the wrapped function on a miss.
    pub fn get(&self, key: &str) -> V {
        let volume = self.rotation.next_volume();
        if store::exists(volume, key) {
            // Presence is decided by the load result, never by inspecting
            // the value: empty or zero entries are hits like any other.
            match store::load(volume, key) {
                Ok(value) => {
                    tracing::debug!(volume = %volume.display(), key, "cache hit");
                    return value;
                }
                Err(StoreError::NotFound { .. }) => {}
                Err(err) => tracing::warn!("treating unreadable entry as a miss: {err}"),
            }
        }

        tracing::debug!(key, "cache miss; computing");
        let value = (self.func)(key);
        self.schedule_save(key, value.clone());
        value
    }

    /// Block until all scheduled background saves have completed.
    ///
    /// `get` never waits on persistence; this is for orderly shutdown and
    /// for callers that need the on-disk state settled.
    pub fn sync(&self) {
        self.writer.wait_idle();
    }

    /// The configured volumes, in rotation order
    pub fn volumes(&self) -> &[PathBuf] {
        &self.volumes
    }

    fn schedule_save(&self, key: &str, value: V) {
        let volumes = Arc::clone(&self.volumes);
        let key = key.to_owned();
        self.writer.submit(Box::new(move || {
            for volume in volumes.iter() {
                if let Err(err) = store::save(volume, &key, &value) {
                    tracing::warn!("cache write skipped: {err}");
                }
            }
        }));
    }
}

/// Wrap `func` and return a closure with the same shape.
pub fn memoize<F, V>(config: CacheConfig, func: F) -> Result<impl Fn(&str) -> V, ConfigError>
where
    F: Fn(&str) -> V,
    V: Serialize + DeserializeOwned + Clone + Send + 'static,
{
    let memo = DiskMemo::new(config, func)?;
    Ok(move |key: &str| memo.get(key))
}
