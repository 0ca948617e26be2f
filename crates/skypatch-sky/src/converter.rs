//! The sky conversion driver.
//!
//! [`SkyConverter`] walks every sky definition of an input store, converts
//! each one independently and stages the results in its [`OutputCache`].
//! Failures are collected into the returned [`FailureReport`]; the outputs of
//! successful entries are written only when the converter is closed.
//!
//! # Example
//!
//! ```no_run
//! use skypatch_pack::prelude::*;
//! use skypatch_sky::prelude::*;
//!
//! let input = DirectoryStore::new("packs/legacy");
//! let mut output = DirectoryStore::new("packs/converted");
//!
//! let mut converter = SkyConverter::new(SkyConfig::default());
//! let report = converter.convert(&input);
//! for (id, error) in report.iter() {
//!     eprintln!("{id}: {error}");
//! }
//! converter.close(&mut output).expect("output pack is writable");
//! ```

use skypatch_pack::identifier::{ResourceId, DEFAULT_NAMESPACE};
use skypatch_pack::properties::PropertiesDocument;
use skypatch_pack::store::{ResourceKind, ResourceStore};
use skypatch_pack::StoreError;

use crate::atlas::slice_atlas;
use crate::cache::OutputCache;
use crate::config::SkyConfig;
use crate::locator::{discover, SkyEntry};
use crate::manifest::{manifest_id, map_properties};
use crate::{FailureReport, MappingError, SkyError};

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

/// A resource-pack converter.
///
/// A converter reads what it understands from an input store during
/// [`convert`](Self::convert), stages its output, and writes the staged
/// output during [`close`](Self::close). One instance can be reused for
/// several runs.
pub trait Converter {
    /// Human-readable converter name.
    fn name(&self) -> &str;

    /// Convert everything this converter understands in `input`.
    ///
    /// Never fails as a whole: per-resource failures are returned.
    fn convert(&mut self, input: &dyn ResourceStore) -> FailureReport;

    /// Write all staged output to `output` and reset for another run.
    ///
    /// Returns the number of resources written.
    fn close(&mut self, output: &mut dyn ResourceStore) -> Result<usize, StoreError>;
}

// ---------------------------------------------------------------------------
// Texture sources
// ---------------------------------------------------------------------------

/// Resolve the atlas texture for `entry`.
///
/// `source` is the document's `source` property:
///
/// - `./file.png` -- relative to the entry's own world directory;
/// - `assets/<ns>/<path>` -- an explicit namespace and path;
/// - `<ns>/<path>` -- the first segment is the namespace (a source without
///   any `/` falls back to the default namespace);
/// - absent -- `<world>/<name>.png` next to the definition.
pub fn resolve_texture(
    source: Option<&str>,
    entry: &SkyEntry,
    config: &SkyConfig,
) -> Result<ResourceId, MappingError> {
    let own_directory = |file: &str| {
        ResourceId::new(
            entry.source.namespace(),
            format!("{}/{}/{}", config.source_parent, entry.dimension, file),
        )
    };

    let Some(source) = source.map(str::trim) else {
        return Ok(own_directory(&format!("{}.png", entry.name)));
    };
    let invalid = || MappingError::InvalidSource(source.to_owned());

    if let Some(file) = source.strip_prefix("./") {
        if file.is_empty() {
            return Err(invalid());
        }
        return Ok(own_directory(file));
    }

    let (namespace, path) = match source.strip_prefix("assets/") {
        Some(rest) => rest.split_once('/').ok_or_else(invalid)?,
        None => source.split_once('/').unwrap_or((DEFAULT_NAMESPACE, source)),
    };
    if namespace.is_empty() || path.is_empty() {
        return Err(invalid());
    }
    Ok(ResourceId::new(namespace, path))
}

// ---------------------------------------------------------------------------
// SkyConverter
// ---------------------------------------------------------------------------

/// Converts legacy custom skies to fabricskyboxes manifests and faces.
#[derive(Debug)]
pub struct SkyConverter {
    config: SkyConfig,
    cache: OutputCache,
}

impl SkyConverter {
    /// Create a converter with an empty cache.
    pub fn new(config: SkyConfig) -> Self {
        Self {
            config,
            cache: OutputCache::new(),
        }
    }

    /// The naming contract in use.
    pub fn config(&self) -> &SkyConfig {
        &self.config
    }

    /// Artifacts staged so far.
    pub fn cache(&self) -> &OutputCache {
        &self.cache
    }

    /// Convert a single entry.
    ///
    /// Returns the manifest identifier, or `None` if the document carries
    /// nothing to convert or a sky of the same name is already staged.
    /// Every fallible step runs before anything is staged, so a failed entry
    /// leaves the cache as it was.
    pub fn convert_entry(
        &mut self,
        input: &dyn ResourceStore,
        entry: &SkyEntry,
    ) -> Result<Option<ResourceId>, SkyError> {
        let source = &entry.source;
        let bytes = read(input, source)?;
        let doc = PropertiesDocument::parse(&bytes).map_err(|e| SkyError::DocumentRead {
            id: source.clone(),
            source: e,
        })?;

        let mapping_error = |e| SkyError::Mapping {
            id: source.clone(),
            source: e,
        };
        let Some(sky) = map_properties(&doc, &entry.dimension, &self.config).map_err(mapping_error)?
        else {
            tracing::debug!(resource = %source, entries = doc.len(), "no sky directives -- skipping");
            return Ok(None);
        };

        let id = manifest_id(&entry.name, &self.config);
        if self.cache.contains(&id) {
            tracing::debug!(manifest = %id, resource = %source, "manifest already produced -- keeping the first");
            return Ok(None);
        }

        let texture = resolve_texture(doc.get("source"), entry, &self.config).map_err(mapping_error)?;
        let texture_bytes = read(input, &texture)?;
        let atlas = image::load_from_memory(&texture_bytes).map_err(|e| SkyError::ImageDecode {
            id: texture.clone(),
            source: e,
        })?;
        let sliced = slice_atlas(&atlas, &texture, &self.cache, &self.config)?;
        drop(atlas);

        let manifest = sky.into_manifest(sliced.textures);
        let json = manifest.to_json().map_err(mapping_error)?;

        for (face, bytes) in sliced.encoded {
            self.cache.insert(face, bytes);
        }
        self.cache.insert(id.clone(), json);
        Ok(Some(id))
    }
}

fn read(input: &dyn ResourceStore, id: &ResourceId) -> Result<Vec<u8>, SkyError> {
    input
        .read(ResourceKind::Assets, id)
        .ok_or_else(|| SkyError::StreamUnavailable { id: id.clone() })
}

impl Converter for SkyConverter {
    fn name(&self) -> &str {
        "Sky"
    }

    fn convert(&mut self, input: &dyn ResourceStore) -> FailureReport {
        let mut report = FailureReport::new();
        let mut converted = 0usize;

        for entry in discover(input, &self.config) {
            match self.convert_entry(input, &entry) {
                Ok(Some(manifest)) => {
                    converted += 1;
                    tracing::info!(resource = %entry.source, manifest = %manifest, "converted sky");
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(
                        resource = %entry.source,
                        kind = ?error.kind(),
                        error = %error,
                        "sky conversion failed -- skipping entry"
                    );
                    report.record(error);
                }
            }
        }

        tracing::info!(
            converter = self.name(),
            converted,
            failed = report.len(),
            staged = self.cache.len(),
            "conversion finished"
        );
        report
    }

    fn close(&mut self, output: &mut dyn ResourceStore) -> Result<usize, StoreError> {
        self.cache.flush(output)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> SkyEntry {
        SkyEntry {
            source: ResourceId::new("ns", "optifine/sky/world0/sky1.properties"),
            dimension: "world0".to_owned(),
            name: "sky1".to_owned(),
        }
    }

    fn resolve(source: Option<&str>) -> Result<String, MappingError> {
        resolve_texture(source, &entry(), &SkyConfig::default()).map(|id| id.to_string())
    }

    #[test]
    fn default_texture_sits_next_to_definition() {
        assert_eq!(resolve(None).unwrap(), "ns:optifine/sky/world0/sky1.png");
    }

    #[test]
    fn relative_source() {
        assert_eq!(
            resolve(Some("./foo.png")).unwrap(),
            "ns:optifine/sky/world0/foo.png"
        );
        assert_eq!(
            resolve(Some("./sub/foo.png")).unwrap(),
            "ns:optifine/sky/world0/sub/foo.png"
        );
    }

    #[test]
    fn assets_prefixed_source() {
        assert_eq!(resolve(Some("assets/other/bar.png")).unwrap(), "other:bar.png");
        assert_eq!(
            resolve(Some("assets/minecraft/textures/sky/night.png")).unwrap(),
            "minecraft:textures/sky/night.png"
        );
    }

    #[test]
    fn namespace_prefixed_source() {
        assert_eq!(
            resolve(Some("other/textures/sky.png")).unwrap(),
            "other:textures/sky.png"
        );
        assert_eq!(resolve(Some("sky.png")).unwrap(), "minecraft:sky.png");
    }

    #[test]
    fn malformed_sources_are_rejected() {
        for bad in ["./", "assets/other", "assets/other/", "/sky.png", "other/"] {
            assert!(
                matches!(resolve(Some(bad)), Err(MappingError::InvalidSource(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn converter_is_named_sky() {
        assert_eq!(SkyConverter::new(SkyConfig::default()).name(), "Sky");
    }
}
