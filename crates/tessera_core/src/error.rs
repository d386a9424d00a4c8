//! # Storage Error Types
//!
//! All errors that can occur while building or mutating entity stores.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the storage engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Two stores with different component type sets were merged.
    #[error("archetype mismatch: expected type set {expected:#018x}, found {found:#018x}")]
    ArchetypeMismatch {
        /// Type-set hash of the receiving store.
        expected: u64,
        /// Type-set hash of the donor store.
        found: u64,
    },

    /// A row index was not below the entity count.
    #[error("row {index} out of range for {len} entities")]
    IndexOutOfRange {
        /// The requested row.
        index: usize,
        /// Number of rows present.
        len: usize,
    },

    /// A column operation received a blob of another concrete type.
    #[error("column blob is not a `{expected}` array")]
    TypeMismatch {
        /// Type name the column was bound to.
        expected: &'static str,
    },

    /// Columns handed to the builder disagree on their length.
    #[error("column `{component}` holds {found} rows, expected {expected}")]
    ColumnLengthMismatch {
        /// Offending component type.
        component: &'static str,
        /// Row count of the columns added before it.
        expected: usize,
        /// Row count of the offending column.
        found: usize,
    },

    /// The same component type was added twice to one store.
    #[error("component `{0}` added twice")]
    DuplicateComponent(&'static str),

    /// The configured entity limit would be exceeded.
    #[error("entity limit {limit} exceeded: {requested} rows requested")]
    CapacityExceeded {
        /// Configured `max_entities`.
        limit: usize,
        /// Row count the operation would produce.
        requested: usize,
    },

    /// Column memory for the requested rows could not be reserved.
    #[error("cannot reserve {requested} more `{component}` rows")]
    AllocationFailed {
        /// Component type of the column.
        component: &'static str,
        /// Rows the reservation asked for.
        requested: usize,
    },

    /// A shared store was asked to merge with itself.
    #[error("a store cannot be merged into itself")]
    SelfMerge,
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while loading a [`StoreConfig`](crate::StoreConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The config text is not valid TOML for this schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config asks to reserve more rows than a store may hold.
    #[error("initial_capacity {initial_capacity} exceeds max_entities {max_entities}")]
    CapacityAboveLimit {
        /// Configured `initial_capacity`.
        initial_capacity: usize,
        /// Configured `max_entities`.
        max_entities: usize,
    },
}
