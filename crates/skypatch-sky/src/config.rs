//! Converter configuration.

use serde::{Deserialize, Serialize};

/// Naming contract of the sky converter.
///
/// The defaults match the layout legacy packs and the fabricskyboxes mod
/// expect; they only need changing for packs that deviate from it. Missing
/// fields in a serialized config take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    /// Directory (inside each namespace) holding the legacy sky definitions.
    pub source_parent: String,
    /// World directory name eligible for conversion.
    pub primary_world: String,
    /// Namespace all output is written to.
    pub output_namespace: String,
    /// Directory (inside the output namespace) for manifests and faces.
    pub output_parent: String,
    /// Dimension identifier the primary world maps to.
    pub overworld_dimension: String,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            source_parent: "optifine/sky".to_owned(),
            primary_world: "world0".to_owned(),
            output_namespace: "fabricskyboxes".to_owned(),
            output_parent: "sky".to_owned(),
            overworld_dimension: "minecraft:overworld".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: SkyConfig = serde_json::from_str(r#"{ "primary_world": "overworld" }"#).unwrap();
        assert_eq!(config.primary_world, "overworld");
        assert_eq!(config.source_parent, "optifine/sky");
        assert_eq!(config.output_namespace, "fabricskyboxes");
    }

    #[test]
    fn empty_json_is_default() {
        let config: SkyConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SkyConfig::default());
    }
}
