//! Skypatch Pack -- namespaced resource-pack plumbing shared by converters.
//!
//! This crate provides the pieces every resource-pack converter consumes
//! without caring about a particular conversion: resource identifiers, a
//! store abstraction over unpacked packs, the legacy `.properties` loader
//! and the day-time tick helpers.
//!
//! # Modules
//!
//! - [`identifier`]: [`ResourceId`](identifier::ResourceId), the
//!   `namespace:path` value type used as a key everywhere.
//! - [`store`]: the [`ResourceStore`](store::ResourceStore) trait plus an
//!   in-memory and a directory-backed implementation.
//! - [`properties`]: ordered key-value documents parsed from the legacy
//!   properties text format.
//! - [`ticks`]: conversion between clock times and day ticks.
//!
//! # Quick Start
//!
//! ```
//! use skypatch_pack::prelude::*;
//!
//! let mut store = MemoryStore::new();
//! let id = ResourceId::new("minecraft", "optifine/sky/world0/sky1.properties");
//! store.insert(ResourceKind::Assets, id.clone(), b"startFadeIn=18:00".to_vec());
//!
//! let bytes = store.read(ResourceKind::Assets, &id).unwrap();
//! let doc = PropertiesDocument::parse(&bytes).unwrap();
//! assert_eq!(doc.get("startFadeIn"), Some("18:00"));
//! ```

#![deny(unsafe_code)]

pub mod identifier;
pub mod properties;
pub mod store;
pub mod ticks;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced when writing to a [`ResourceStore`](store::ResourceStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying filesystem rejected the write.
    #[error("failed to write resource {id}: {source}")]
    Io {
        /// The resource that could not be written.
        id: identifier::ResourceId,
        /// The I/O error reported by the filesystem.
        source: std::io::Error,
    },

    /// The resource path contains a `..` segment or an absolute component
    /// and would land outside the store root.
    #[error("resource path of {id} escapes the store root")]
    InvalidPath {
        /// The offending resource.
        id: identifier::ResourceId,
    },
}

/// Errors produced while parsing a legacy properties document.
#[derive(Debug, thiserror::Error)]
pub enum PropertiesError {
    /// A `\uXXXX` escape was truncated, not hexadecimal, or an unpaired
    /// surrogate.
    #[error("malformed \\uXXXX escape on line {line}")]
    MalformedUnicode {
        /// The 1-based line on which the offending entry starts.
        line: usize,
    },
}

/// Errors produced when parsing a textual resource identifier.
#[derive(Debug, thiserror::Error)]
pub enum IdentifierError {
    /// Either side of the `namespace:path` pair is empty.
    #[error("invalid resource identifier '{0}': namespace and path must be non-empty")]
    Empty(String),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::identifier::ResourceId;
    pub use crate::properties::PropertiesDocument;
    pub use crate::store::{DirectoryStore, MemoryStore, ResourceKind, ResourceStore};
    pub use crate::ticks::{normalize_tick_time, parse_tick_time, TICKS_PER_DAY};
    pub use crate::{IdentifierError, PropertiesError, StoreError};
}
