//! Skypatch Sky -- converts legacy custom-sky definitions to skybox manifests.
//!
//! A legacy pack describes each sky layer with a `.properties` document under
//! `assets/<ns>/optifine/sky/<world>/` plus a cubemap atlas texture. This
//! crate turns every such layer into the fabricskyboxes format: one JSON
//! manifest and six face textures under `assets/fabricskyboxes/sky/`.
//!
//! # Pipeline
//!
//! For every candidate document the [`SkyConverter`](converter::SkyConverter)
//! runs:
//!
//! 1. [`locator`] -- match the path, derive dimension and logical name, drop
//!    anything outside the primary world.
//! 2. [`manifest`] -- map the document to the output schema (fade window,
//!    axis, weather, biomes, ...), or decide there is nothing to convert.
//! 3. [`atlas`] -- decode the referenced atlas and cut it into six faces.
//! 4. [`cache`] -- stage the manifest and any face not produced yet.
//!
//! Failures are entry-scoped: they land in a [`FailureReport`] and the run
//! moves on. Nothing is written until [`Converter::close`] flushes the cache.
//!
//! # Example
//!
//! ```
//! use skypatch_pack::prelude::*;
//! use skypatch_sky::prelude::*;
//!
//! let input = MemoryStore::new();
//! let mut output = MemoryStore::new();
//!
//! let mut converter = SkyConverter::new(SkyConfig::default());
//! let report = converter.convert(&input);
//! assert!(report.is_empty());
//! assert_eq!(converter.close(&mut output).unwrap(), 0);
//! ```

#![deny(unsafe_code)]

pub mod atlas;
pub mod cache;
pub mod config;
pub mod converter;
pub mod locator;
pub mod manifest;
pub mod report;

use skypatch_pack::identifier::ResourceId;
use skypatch_pack::PropertiesError;

pub use report::{ErrorKind, FailureReport};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A failure converting one sky entry.
///
/// Every variant names the resource it is charged to, which is the key the
/// error is filed under in the [`FailureReport`].
#[derive(Debug, thiserror::Error)]
pub enum SkyError {
    /// A properties document or texture does not exist in the input store.
    #[error("resource {id} is not available")]
    StreamUnavailable {
        /// The missing resource.
        id: ResourceId,
    },

    /// The properties document could not be parsed.
    #[error("failed to read properties document {id}: {source}")]
    DocumentRead {
        /// The properties document.
        id: ResourceId,
        /// The parser error.
        source: PropertiesError,
    },

    /// The atlas texture could not be decoded.
    #[error("failed to decode sky texture {id}: {source}")]
    ImageDecode {
        /// The atlas texture.
        id: ResourceId,
        /// The codec error.
        source: image::ImageError,
    },

    /// A face cut from the atlas could not be encoded, typically because the
    /// atlas is too small for the fixed face layout.
    #[error("failed to encode {face} face of sky texture {id}: {source}")]
    ImageEncode {
        /// The atlas texture the face was cut from.
        id: ResourceId,
        /// The face being encoded.
        face: atlas::CubeFace,
        /// The codec error.
        source: image::ImageError,
    },

    /// The document could not be mapped to the output schema.
    #[error("failed to map sky properties {id}: {source}")]
    Mapping {
        /// The properties document.
        id: ResourceId,
        /// What was wrong with it.
        source: MappingError,
    },
}

impl SkyError {
    /// The resource this failure is charged to.
    pub fn resource(&self) -> &ResourceId {
        match self {
            SkyError::StreamUnavailable { id }
            | SkyError::DocumentRead { id, .. }
            | SkyError::ImageDecode { id, .. }
            | SkyError::ImageEncode { id, .. }
            | SkyError::Mapping { id, .. } => id,
        }
    }

    /// The flat category of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SkyError::StreamUnavailable { .. } => ErrorKind::StreamUnavailable,
            SkyError::DocumentRead { .. } => ErrorKind::DocumentRead,
            SkyError::ImageDecode { .. } => ErrorKind::ImageDecode,
            SkyError::ImageEncode { .. } => ErrorKind::ImageEncode,
            SkyError::Mapping { .. } => ErrorKind::Mapping,
        }
    }
}

/// Reasons a properties document cannot be mapped to a skybox manifest.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// One of the mandatory fade properties is absent.
    #[error("missing required property '{0}'")]
    MissingField(&'static str),

    /// A fade property is neither a `HH:MM` clock time nor a tick count.
    #[error("property '{key}' has unrecognised time '{value}'")]
    InvalidTickTime {
        /// The property name.
        key: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The fade-out start cannot be derived because the raw fade ticks are
    /// too far apart to subtract.
    #[error("fade window ticks are out of range")]
    FadeOverflow,

    /// `axis` is not exactly three numbers, or a component leaves the
    /// finite range once scaled to degrees.
    #[error("axis must be three finite numbers, got '{0}'")]
    InvalidAxis(String),

    /// A numeric property is not a finite number.
    #[error("property '{key}' is not a finite number: '{value}'")]
    InvalidFloat {
        /// The property name.
        key: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The `source` property does not name a resource.
    #[error("texture source '{0}' does not name a resource")]
    InvalidSource(String),

    /// The manifest could not be serialized.
    #[error("failed to serialize manifest: {0}")]
    Encode(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::atlas::{CubeFace, FaceTextures};
    pub use crate::cache::OutputCache;
    pub use crate::config::SkyConfig;
    pub use crate::converter::{Converter, SkyConverter};
    pub use crate::locator::SkyEntry;
    pub use crate::manifest::{FadeWindow, SkyboxManifest, TokenList};
    pub use crate::report::{ErrorKind, FailureReport};
    pub use crate::{MappingError, SkyError};
}
