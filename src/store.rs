//! Entry store - Read/write one serialized entry per (volume, key)
//!
//! Every operation takes its volume explicitly; deciding which volume to
//! consult is the facade's job. Entries are stored as
//! `<volume>/<derived-key>.json`, flat, one file per key.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::keys;

/// Extension for entry files
pub const ENTRY_EXT: &str = "json";

/// Errors from entry store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// No entry at the locator. A normal outcome, not a fault.
    #[error("no cache entry at {}", .path.display())]
    NotFound { path: PathBuf },

    /// Bytes are present but cannot be read back into a value.
    #[error("corrupt cache entry at {}", .path.display())]
    CorruptEntry {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The entry could not be persisted.
    #[error("failed to write cache entry at {}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Locator for (volume, key)
pub fn entry_path(volume: &Path, key: &str) -> PathBuf {
    volume.join(format!("{}.{}", keys::derive(key), ENTRY_EXT))
}

/// Check whether a readable entry is present for (volume, key)
pub fn exists(volume: &Path, key: &str) -> bool {
    entry_path(volume, key).is_file()
}

/// Load and deserialize the entry for (volume, key)
pub fn load<V: DeserializeOwned>(volume: &Path, key: &str) -> Result<V, StoreError> {
    let path = entry_path(volume, key);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound { path });
        }
        Err(err) => {
            return Err(StoreError::CorruptEntry {
                path,
                source: Box::new(err),
            });
        }
    };
    serde_json::from_slice(&bytes).map_err(|err| StoreError::CorruptEntry {
        path,
        source: Box::new(err),
    })
}

/// Serialize and write the entry for (volume, key), overwriting any
/// previous entry. Creates the volume directory if it does not exist yet.
pub fn save<V: Serialize>(volume: &Path, key: &str, value: &V) -> Result<(), StoreError> {
    let path = entry_path(volume, key);
    fs::create_dir_all(volume).map_err(|err| write_failure(&path, err))?;
    let bytes = serde_json::to_vec(value).map_err(|err| write_failure(&path, err))?;
    fs::write(&path, bytes).map_err(|err| write_failure(&path, err))?;
    Ok(())
}

fn write_failure(path: &Path, err: impl std::error::Error + Send + Sync + 'static) -> StoreError {
    StoreError::WriteFailure {
        path: path.to_path_buf(),
        source: Box::new(err),
    }
}
