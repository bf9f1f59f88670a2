//! Unified error types for the core crate.

/// Errors raised while persisting the resolution cache.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem operation on the cache file failed.
    #[error("CACHE_IO: {0}")]
    CacheIo(String),

    /// Cache contents could not be serialized.
    #[error("CACHE_ENCODE: {0}")]
    CacheEncode(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::CacheIo(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::CacheEncode(err.to_string())
    }
}
