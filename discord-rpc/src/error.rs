//! Unified error types for the discord-rpc bindings.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the discord-rpc bindings.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The shared library could not be opened or is missing an entry point.
    #[error("discord-rpc library: {0}")]
    Library(#[from] libloading::Error),

    /// Filesystem failure while reading or writing presence data.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// An argument passed to the bindings was invalid.
    #[error("{0}")]
    InvalidArgument(String),

    /// A session is already installed in this process.
    #[error("discord-rpc is already initialized in this process")]
    AlreadyInitialized,

    /// A presence field exceeds the size the native library accepts.
    #[error("{field} is {len} bytes, limit is {max}")]
    FieldTooLong {
        /// Name of the offending presence field.
        field: &'static str,
        /// Encoded length in bytes.
        len: usize,
        /// Maximum accepted length in bytes.
        max: usize,
    },
}
