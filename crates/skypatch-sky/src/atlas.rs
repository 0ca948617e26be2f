//! Cutting legacy cubemap atlases into face textures.
//!
//! Legacy skies pack all six faces into one image, three faces wide and two
//! high. With `scale = height / 2` the faces sit at these fixed offsets
//! (left, top), each `scale x scale`:
//!
//! | face   | left      | top   |
//! |--------|-----------|-------|
//! | bottom | 0         | 0     |
//! | top    | scale     | 0     |
//! | west   | 2 * scale | 0     |
//! | north  | 0         | scale |
//! | east   | scale     | scale |
//! | south  | 2 * scale | scale |
//!
//! The table is an external contract and is reproduced exactly. The atlas
//! width is not checked: faces that fall outside a too-narrow atlas are
//! clamped by the crop to empty images and then fail to encode.

use std::fmt;
use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use skypatch_pack::identifier::ResourceId;

use crate::cache::OutputCache;
use crate::config::SkyConfig;
use crate::SkyError;

// ---------------------------------------------------------------------------
// CubeFace
// ---------------------------------------------------------------------------

/// One face of the sky cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    /// Up.
    Top,
    /// Down.
    Bottom,
    /// -Z.
    North,
    /// +Z.
    South,
    /// +X.
    East,
    /// -X.
    West,
}

impl CubeFace {
    /// All faces, in manifest order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Top,
        CubeFace::Bottom,
        CubeFace::North,
        CubeFace::South,
        CubeFace::East,
        CubeFace::West,
    ];

    /// Lower-case face name used in file names and manifest keys.
    pub fn name(self) -> &'static str {
        match self {
            CubeFace::Top => "top",
            CubeFace::Bottom => "bottom",
            CubeFace::North => "north",
            CubeFace::South => "south",
            CubeFace::East => "east",
            CubeFace::West => "west",
        }
    }

    /// Where this face sits in an atlas whose faces are `scale` pixels wide.
    pub fn region(self, scale: u32) -> FaceRegion {
        let (column, row) = match self {
            CubeFace::Top => (1, 0),
            CubeFace::Bottom => (0, 0),
            CubeFace::North => (0, 1),
            CubeFace::South => (2, 1),
            CubeFace::East => (1, 1),
            CubeFace::West => (2, 0),
        };
        FaceRegion {
            x: column * scale,
            y: row * scale,
            size: scale,
        }
    }
}

impl fmt::Display for CubeFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A square region of an atlas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRegion {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width and height.
    pub size: u32,
}

/// Face edge length for an atlas of the given height.
pub fn atlas_scale(height: u32) -> u32 {
    height / 2
}

// ---------------------------------------------------------------------------
// FaceTextures
// ---------------------------------------------------------------------------

/// The six face references of a skybox manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceTextures {
    /// Top face texture.
    #[serde(rename = "texture_top")]
    pub top: ResourceId,
    /// Bottom face texture.
    #[serde(rename = "texture_bottom")]
    pub bottom: ResourceId,
    /// North face texture.
    #[serde(rename = "texture_north")]
    pub north: ResourceId,
    /// South face texture.
    #[serde(rename = "texture_south")]
    pub south: ResourceId,
    /// East face texture.
    #[serde(rename = "texture_east")]
    pub east: ResourceId,
    /// West face texture.
    #[serde(rename = "texture_west")]
    pub west: ResourceId,
}

impl FaceTextures {
    /// Face references for the atlas `texture_name`, named after the output
    /// contract `<ns>:<parent>/<texture_name>_<face>.png`.
    pub fn for_texture(texture_name: &str, config: &SkyConfig) -> Self {
        let id = |face| face_texture_id(texture_name, face, config);
        Self {
            top: id(CubeFace::Top),
            bottom: id(CubeFace::Bottom),
            north: id(CubeFace::North),
            south: id(CubeFace::South),
            east: id(CubeFace::East),
            west: id(CubeFace::West),
        }
    }

    /// The reference for one face.
    pub fn get(&self, face: CubeFace) -> &ResourceId {
        match face {
            CubeFace::Top => &self.top,
            CubeFace::Bottom => &self.bottom,
            CubeFace::North => &self.north,
            CubeFace::South => &self.south,
            CubeFace::East => &self.east,
            CubeFace::West => &self.west,
        }
    }

    /// `(face, reference)` pairs in manifest order.
    pub fn iter(&self) -> impl Iterator<Item = (CubeFace, &ResourceId)> {
        CubeFace::ALL.into_iter().map(move |face| (face, self.get(face)))
    }
}

/// Output identifier of one face texture.
pub fn face_texture_id(texture_name: &str, face: CubeFace, config: &SkyConfig) -> ResourceId {
    ResourceId::new(
        config.output_namespace.as_str(),
        format!("{}/{}_{}.png", config.output_parent, texture_name, face),
    )
}

// ---------------------------------------------------------------------------
// Slicing
// ---------------------------------------------------------------------------

/// The result of slicing one atlas.
#[derive(Debug)]
pub struct SlicedAtlas {
    /// References for the manifest; always all six faces.
    pub textures: FaceTextures,
    /// Encoded PNGs for the faces that were not already cached.
    pub encoded: Vec<(ResourceId, Vec<u8>)>,
}

/// Cut `atlas` (loaded from `texture`) into six faces.
///
/// Faces whose output identifier is already in `cache` are neither cropped
/// nor encoded again; their references are still returned. Nothing is
/// inserted here, so a failure leaves the cache untouched.
pub fn slice_atlas(
    atlas: &DynamicImage,
    texture: &ResourceId,
    cache: &OutputCache,
    config: &SkyConfig,
) -> Result<SlicedAtlas, SkyError> {
    let textures = FaceTextures::for_texture(texture.file_stem(), config);
    let scale = atlas_scale(atlas.height());

    let mut encoded = Vec::new();
    for (face, id) in textures.iter() {
        if cache.contains(id) {
            tracing::debug!(face = %id, "face texture already produced -- reusing");
            continue;
        }
        let region = face.region(scale);
        let image = atlas.crop_imm(region.x, region.y, region.size, region.size);
        let bytes = encode_png(&image).map_err(|source| SkyError::ImageEncode {
            id: texture.clone(),
            face,
            source,
        })?;
        encoded.push((id.clone(), bytes));
    }

    Ok(SlicedAtlas { textures, encoded })
}

/// Encode an image as PNG.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
