//! Mapping legacy sky properties to skybox manifests.
//!
//! [`map_properties`] reads a legacy document and produces a
//! [`SkyProperties`]: everything a manifest needs except the face textures.
//! Once the atlas has been sliced, [`SkyProperties::into_manifest`] attaches
//! the six face references and yields the serializable [`SkyboxManifest`].
//!
//! # Property mapping
//!
//! | legacy         | manifest                  | notes |
//! |----------------|---------------------------|-------|
//! | `startFadeIn`  | `startFadeIn`             | required |
//! | `endFadeIn`    | `endFadeIn`               | required |
//! | `endFadeOut`   | `endFadeOut`              | required |
//! | `startFadeOut` | `startFadeOut`            | derived when absent, see [`derive_start_fade_out`] |
//! | `rotate`       | `shouldRotate`            | `true` (any case) or false |
//! | `speed`        | `transitionSpeed`         | float |
//! | `axis`         | `axis`                    | three floats, each scaled by 180; default `[0, 0, 180]` |
//! | `weather`      | `weather`                 | one token as a string, several as an array |
//! | `biomes`       | `biomes`                  | as `weather` |
//! | (world dir)    | `dimensions`              | primary world becomes the overworld id |
//!
//! A document with at most one entry carries no real directives and maps to
//! nothing.

use serde::{Deserialize, Serialize};
use skypatch_pack::identifier::ResourceId;
use skypatch_pack::properties::PropertiesDocument;
use skypatch_pack::ticks::{normalize_tick_time, parse_tick_time};

use crate::atlas::FaceTextures;
use crate::config::SkyConfig;
use crate::MappingError;

/// Value of the manifest `type` field.
pub const SKYBOX_TYPE: &str = "square-textured";

/// Axis used when a document does not set one: facing south.
pub const DEFAULT_AXIS: [f32; 3] = [0.0, 0.0, 180.0];

/// Legacy axis components are fractions of a half turn.
const AXIS_SCALE: f32 = 180.0;

// ---------------------------------------------------------------------------
// TokenList
// ---------------------------------------------------------------------------

/// A whitespace-separated legacy list as written to the manifest.
///
/// A single token is emitted as a bare string and several as an array;
/// consumers of the format rely on that distinction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenList {
    /// Exactly one token.
    One(String),
    /// Two or more tokens.
    Many(Vec<String>),
}

impl TokenList {
    /// Split `value` on whitespace. Returns `None` when it holds no tokens.
    pub fn from_tokens(value: &str) -> Option<Self> {
        let mut tokens: Vec<String> = value.split_whitespace().map(str::to_owned).collect();
        match tokens.len() {
            0 => None,
            1 => tokens.pop().map(TokenList::One),
            _ => Some(TokenList::Many(tokens)),
        }
    }
}

// ---------------------------------------------------------------------------
// FadeWindow
// ---------------------------------------------------------------------------

/// The four fade offsets of a sky layer, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FadeWindow {
    /// Tick at which the layer starts fading in.
    pub start_fade_in: i64,
    /// Tick at which the layer is fully visible.
    pub end_fade_in: i64,
    /// Tick at which the layer starts fading out.
    pub start_fade_out: i64,
    /// Tick at which the layer is fully hidden.
    pub end_fade_out: i64,
}

impl FadeWindow {
    /// Read the fade window from a legacy document.
    ///
    /// The result holds raw tick counts; call [`normalized`](Self::normalized)
    /// before writing it out.
    pub fn from_document(doc: &PropertiesDocument) -> Result<Self, MappingError> {
        let start_fade_in = required_ticks(doc, "startFadeIn")?;
        let end_fade_in = required_ticks(doc, "endFadeIn")?;
        let end_fade_out = required_ticks(doc, "endFadeOut")?;
        let start_fade_out = match doc.get("startFadeOut") {
            Some(value) => ticks(value, "startFadeOut")?,
            None => derive_start_fade_out(start_fade_in, end_fade_in, end_fade_out)
                .ok_or(MappingError::FadeOverflow)?,
        };

        Ok(Self {
            start_fade_in,
            end_fade_in,
            start_fade_out,
            end_fade_out,
        })
    }

    /// Every offset wrapped into a single day.
    pub fn normalized(self) -> Self {
        Self {
            start_fade_in: normalize_tick_time(self.start_fade_in),
            end_fade_in: normalize_tick_time(self.end_fade_in),
            start_fade_out: normalize_tick_time(self.start_fade_out),
            end_fade_out: normalize_tick_time(self.end_fade_out),
        }
    }
}

/// Fade-out start for documents that omit it.
///
/// The fade-out mirrors the fade-in duration and ends at `end_fade_out`. If
/// that start would land inside the fade-in itself, the layer instead snaps
/// out at `end_fade_out`.
///
/// Returns `None` when the raw tick counts are so far apart that the
/// arithmetic overflows.
///
/// ```
/// use skypatch_sky::manifest::derive_start_fade_out;
///
/// assert_eq!(derive_start_fade_out(0, 10, 100), Some(90));
/// assert_eq!(derive_start_fade_out(0, 100, 110), Some(110));
/// assert_eq!(derive_start_fade_out(i64::MIN, i64::MAX, 0), None);
/// ```
pub fn derive_start_fade_out(start_fade_in: i64, end_fade_in: i64, end_fade_out: i64) -> Option<i64> {
    let duration = end_fade_in.checked_sub(start_fade_in)?;
    let derived = end_fade_out.checked_sub(duration)?;
    if (start_fade_in..=end_fade_in).contains(&derived) {
        Some(end_fade_out)
    } else {
        Some(derived)
    }
}

fn required_ticks(doc: &PropertiesDocument, key: &'static str) -> Result<i64, MappingError> {
    let value = doc.get(key).ok_or(MappingError::MissingField(key))?;
    ticks(value, key)
}

fn ticks(value: &str, key: &'static str) -> Result<i64, MappingError> {
    parse_tick_time(value).ok_or_else(|| MappingError::InvalidTickTime {
        key,
        value: value.to_owned(),
    })
}

fn finite_float(value: &str, key: &'static str) -> Result<f32, MappingError> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| MappingError::InvalidFloat {
            key,
            value: value.to_owned(),
        })
}

fn parse_axis(value: &str) -> Result<[f32; 3], MappingError> {
    let invalid = || MappingError::InvalidAxis(value.to_owned());
    let components = value
        .split_whitespace()
        .map(|token| {
            finite_float(token, "axis")
                .ok()
                .map(|v| v * AXIS_SCALE)
                .filter(|scaled| scaled.is_finite())
        })
        .collect::<Option<Vec<f32>>>()
        .ok_or_else(invalid)?;
    <[f32; 3]>::try_from(components).map_err(|_| invalid())
}

/// Dimension identifier for a legacy world directory.
///
/// The primary world becomes [`SkyConfig::overworld_dimension`]; any other
/// world name is passed through unchanged.
pub fn map_dimension(dimension: &str, config: &SkyConfig) -> String {
    if dimension == config.primary_world {
        config.overworld_dimension.clone()
    } else {
        dimension.to_owned()
    }
}

// ---------------------------------------------------------------------------
// SkyProperties
// ---------------------------------------------------------------------------

/// A mapped sky layer still waiting for its face textures.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyProperties {
    /// Fade window, already normalized.
    pub fade: FadeWindow,
    /// `rotate`, if present.
    pub should_rotate: Option<bool>,
    /// Rotation axis in degrees.
    pub axis: [f32; 3],
    /// `speed`, if present.
    pub transition_speed: Option<f32>,
    /// `weather`, if present and non-blank.
    pub weather: Option<TokenList>,
    /// `biomes`, if present and non-blank.
    pub biomes: Option<TokenList>,
    /// Target dimension identifier.
    pub dimensions: String,
}

impl SkyProperties {
    /// Attach the face references and build the manifest.
    pub fn into_manifest(self, textures: FaceTextures) -> SkyboxManifest {
        SkyboxManifest {
            kind: SKYBOX_TYPE.to_owned(),
            decorations: true,
            should_blend: false,
            textures,
            fade: self.fade,
            should_rotate: self.should_rotate,
            axis: self.axis,
            transition_speed: self.transition_speed,
            weather: self.weather,
            biomes: self.biomes,
            dimensions: self.dimensions,
        }
    }
}

/// Map a legacy document for `dimension` to the output schema.
///
/// Returns `Ok(None)` for documents with at most one entry.
pub fn map_properties(
    doc: &PropertiesDocument,
    dimension: &str,
    config: &SkyConfig,
) -> Result<Option<SkyProperties>, MappingError> {
    if doc.len() <= 1 {
        return Ok(None);
    }

    let fade = FadeWindow::from_document(doc)?.normalized();
    let should_rotate = doc
        .get("rotate")
        .map(|value| value.trim().eq_ignore_ascii_case("true"));
    let axis = doc
        .get("axis")
        .map(parse_axis)
        .transpose()?
        .unwrap_or(DEFAULT_AXIS);
    let transition_speed = doc
        .get("speed")
        .map(|value| finite_float(value, "speed"))
        .transpose()?;

    Ok(Some(SkyProperties {
        fade,
        should_rotate,
        axis,
        transition_speed,
        weather: doc.get("weather").and_then(TokenList::from_tokens),
        biomes: doc.get("biomes").and_then(TokenList::from_tokens),
        dimensions: map_dimension(dimension, config),
    }))
}

// ---------------------------------------------------------------------------
// SkyboxManifest
// ---------------------------------------------------------------------------

/// A fabricskyboxes manifest.
///
/// Field order matches the serialized JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyboxManifest {
    /// Always [`SKYBOX_TYPE`].
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether sun, moon and stars are drawn over the layer.
    pub decorations: bool,
    /// Whether the layer blends with the layers below.
    #[serde(rename = "shouldBlend")]
    pub should_blend: bool,
    /// The six face textures.
    #[serde(flatten)]
    pub textures: FaceTextures,
    /// Normalized fade window.
    #[serde(flatten)]
    pub fade: FadeWindow,
    /// Whether the layer rotates with the sky.
    #[serde(rename = "shouldRotate", default, skip_serializing_if = "Option::is_none")]
    pub should_rotate: Option<bool>,
    /// Rotation axis in degrees.
    pub axis: [f32; 3],
    /// Fade speed between layers.
    #[serde(rename = "transitionSpeed", default, skip_serializing_if = "Option::is_none")]
    pub transition_speed: Option<f32>,
    /// Weather conditions the layer is shown in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<TokenList>,
    /// Biomes the layer is shown in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biomes: Option<TokenList>,
    /// Dimension identifier the layer is shown in.
    pub dimensions: String,
}

impl SkyboxManifest {
    /// Pretty-printed JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>, MappingError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

/// Output identifier of the manifest for the sky `name`.
pub fn manifest_id(name: &str, config: &SkyConfig) -> ResourceId {
    ResourceId::new(
        config.output_namespace.as_str(),
        format!("{}/{}.json", config.output_parent, name),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
