//! Cache configuration
//!
//! The volume list is ordered, non-empty and fixed for the life of the
//! cache. Validation happens here, at startup, so the read path never has
//! to handle an empty list.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Default number of background writer threads
pub const DEFAULT_WRITERS: usize = 2;

/// Configuration errors detected at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The volume list was empty
    #[error("at least one cache volume is required")]
    NoVolumes,

    /// A background writer thread could not be started
    #[error("failed to start background writer")]
    WriterSpawn(#[from] io::Error),
}

/// Ordered volume list plus writer-pool sizing
#[derive(Debug, Clone)]
pub struct CacheConfig {
    volumes: Vec<PathBuf>,
    writers: usize,
}

impl CacheConfig {
    /// Build a config from an ordered list of volume directories
    pub fn new<I, P>(volumes: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let volumes: Vec<PathBuf> = volumes.into_iter().map(Into::into).collect();
        if volumes.is_empty() {
            return Err(ConfigError::NoVolumes);
        }
        Ok(Self {
            volumes,
            writers: DEFAULT_WRITERS,
        })
    }

    /// Set the number of background writer threads (minimum 1)
    pub fn writers(mut self, workers: usize) -> Self {
        self.writers = workers.max(1);
        self
    }

    /// The configured volumes, in rotation order
    pub fn volumes(&self) -> &[PathBuf] {
        &self.volumes
    }

    pub(crate) fn into_parts(self) -> (Vec<PathBuf>, usize) {
        (self.volumes, self.writers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_volume_list_is_rejected() {
        let err = CacheConfig::new(Vec::<PathBuf>::new()).unwrap_err();
        assert!(matches!(err, ConfigError::NoVolumes));
    }

    #[test]
    fn test_volume_order_is_preserved() {
        let config = CacheConfig::new(["/mnt/a", "/mnt/b", "/mnt/c"]).unwrap();
        let volumes: Vec<_> = config
            .volumes()
            .iter()
            .map(|v| v.to_string_lossy().to_string())
            .collect();
        assert_eq!(volumes, vec!["/mnt/a", "/mnt/b", "/mnt/c"]);
    }

    #[test]
    fn test_writers_floor_is_one() {
        let config = CacheConfig::new(["/mnt/a"]).unwrap().writers(0);
        let (_, writers) = config.into_parts();
        assert_eq!(writers, 1);
    }
}
