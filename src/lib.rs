//! stripecache - Disk-backed memoization striped across multiple volumes
//!
//! stripecache provides:
//! - A wrapper for expensive, deterministic string-keyed functions
//! - Content-addressed entry files spread round-robin across volumes
//! - Reads served from a single rotating volume per call
//! - Writes fanned out to every volume off the calling thread
//!
//! The cache is advisory: any internal failure degrades to recomputing the
//! value, never to an error visible from the wrapped function's caller.

pub mod config;
pub mod keys;
pub mod memo;
pub mod rotation;
pub mod store;

mod writer;

pub use config::{CacheConfig, ConfigError};
pub use memo::{memoize, DiskMemo};
pub use store::StoreError;
