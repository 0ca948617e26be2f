//! Discovery of legacy sky definitions.
//!
//! A definition lives at `<ns>:optifine/sky/<world>/<name>.properties`.
//! Anything else under the sky directory (textures, stray files, nested
//! folders) is skipped without complaint, and so are worlds other than the
//! primary one: only the overworld is converted for now.

use std::sync::LazyLock;

use regex::Regex;
use skypatch_pack::identifier::ResourceId;
use skypatch_pack::store::{ResourceKind, ResourceStore};

use crate::config::SkyConfig;

/// Extension of legacy sky definitions.
pub const PROPERTIES_EXTENSION: &str = ".properties";

/// `<world>/<name>.properties`, relative to the sky directory.
static SKY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<world>[A-Za-z0-9_]+)/(?<name>[A-Za-z0-9_]+)\.properties$")
        .expect("sky path pattern is valid")
});

// ---------------------------------------------------------------------------
// SkyEntry
// ---------------------------------------------------------------------------

/// One legacy sky definition selected for conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkyEntry {
    /// The `.properties` document.
    pub source: ResourceId,
    /// The world directory, e.g. `"world0"`.
    pub dimension: String,
    /// The logical sky name, e.g. `"sky1"`.
    pub name: String,
}

/// Match one resource against the sky naming pattern.
///
/// Returns `None` for non-definitions and for worlds other than
/// [`SkyConfig::primary_world`].
pub fn locate(id: &ResourceId, config: &SkyConfig) -> Option<SkyEntry> {
    if !id.path().ends_with(PROPERTIES_EXTENSION) {
        return None;
    }

    let relative = id
        .path()
        .strip_prefix(config.source_parent.as_str())
        .and_then(|rest| rest.strip_prefix('/'));
    let Some(captures) = relative.and_then(|rest| SKY_PATTERN.captures(rest)) else {
        tracing::debug!(resource = %id, "not a sky definition -- skipping");
        return None;
    };

    let dimension = &captures["world"];
    if dimension != config.primary_world {
        tracing::debug!(
            resource = %id,
            dimension,
            "only the primary world is converted -- skipping"
        );
        return None;
    }

    Some(SkyEntry {
        source: id.clone(),
        dimension: dimension.to_owned(),
        name: captures["name"].to_owned(),
    })
}

/// Every convertible sky definition in `store`, namespace by namespace.
pub fn discover(store: &dyn ResourceStore, config: &SkyConfig) -> Vec<SkyEntry> {
    let mut entries = Vec::new();
    for namespace in store.namespaces(ResourceKind::Assets) {
        let parent = ResourceId::new(namespace, config.source_parent.as_str());
        entries.extend(
            store
                .search(ResourceKind::Assets, &parent)
                .filter_map(|id| locate(&id, config)),
        );
    }
    entries
}

#[cfg(test)]
mod tests {
    use skypatch_pack::store::MemoryStore;

    use super::*;

    fn id(path: &str) -> ResourceId {
        ResourceId::new("minecraft", path)
    }

    #[test]
    fn matches_primary_world_definition() {
        let entry = locate(&id("optifine/sky/world0/sky1.properties"), &SkyConfig::default()).unwrap();
        assert_eq!(entry.dimension, "world0");
        assert_eq!(entry.name, "sky1");
        assert_eq!(entry.source, id("optifine/sky/world0/sky1.properties"));
    }

    #[test]
    fn skips_other_worlds() {
        let config = SkyConfig::default();
        assert_eq!(locate(&id("optifine/sky/world-1/sky1.properties"), &config), None);
        assert_eq!(locate(&id("optifine/sky/world1/sky1.properties"), &config), None);
    }

    #[test]
    fn skips_non_matching_paths() {
        let config = SkyConfig::default();
        for path in [
            "optifine/sky/world0/sky1.png",
            "optifine/sky/world0/nested/sky1.properties",
            "optifine/sky/sky1.properties",
            "optifine/sky/world0/my-sky.properties",
            "optifine/sky/world0/.properties",
            "optifine/skybox/world0/sky1.properties",
        ] {
            assert_eq!(locate(&id(path), &config), None, "{path}");
        }
    }

    #[test]
    fn honours_configured_layout() {
        let config = SkyConfig {
            source_parent: "mcpatcher/sky".to_owned(),
            primary_world: "overworld".to_owned(),
            ..SkyConfig::default()
        };
        assert!(locate(&id("mcpatcher/sky/overworld/sky0.properties"), &config).is_some());
        assert!(locate(&id("optifine/sky/world0/sky0.properties"), &config).is_none());
    }

    #[test]
    fn discover_walks_every_namespace() {
        let mut store = MemoryStore::new();
        for (ns, path) in [
            ("minecraft", "optifine/sky/world0/sky1.properties"),
            ("minecraft", "optifine/sky/world0/sky1.png"),
            ("minecraft", "optifine/sky/world1/sky1.properties"),
            ("custom", "optifine/sky/world0/aurora.properties"),
            ("custom", "textures/misc/aurora.properties"),
        ] {
            store.insert(ResourceKind::Assets, ResourceId::new(ns, path), Vec::new());
        }

        let entries = discover(&store, &SkyConfig::default());
        let names: Vec<String> = entries
            .iter()
            .map(|entry| format!("{}:{}", entry.source.namespace(), entry.name))
            .collect();
        assert_eq!(names, ["custom:aurora", "minecraft:sky1"]);
    }
}
