//! Data-driven level parameters + loader.

use std::path::Path;

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::LevelError;

/// Where the level config lives on disk.
#[derive(Resource, Clone)]
pub struct LevelSettings {
    pub config_path: String,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            config_path: "assets/levels/default.level.ron".to_string(),
        }
    }
}

/// Appearance of the floor. Never read by the layout or mesh code, only handed to the renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelMaterialDef {
    /// Linear RGBA.
    #[serde(default = "default_base_color")]
    pub base_color: [f32; 4],
    /// Optional texture, relative to the asset folder.
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default = "default_roughness")]
    pub perceptual_roughness: f32,
}

fn default_base_color() -> [f32; 4] {
    [0.55, 0.52, 0.47, 1.0]
}
fn default_roughness() -> f32 {
    0.9
}

impl Default for LevelMaterialDef {
    fn default() -> Self {
        Self {
            base_color: default_base_color(),
            texture: None,
            perceptual_roughness: default_roughness(),
        }
    }
}

/// Generation parameters. `width` is the growth axis (X), `depth` the cross axis (Z).
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub width: u32,
    pub depth: u32,
    pub room_count: u32,
    /// `None` draws a fresh seed per run.
    pub seed: Option<u64>,
    pub material: LevelMaterialDef,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: 32,
            depth: 16,
            room_count: 6,
            seed: None,
            material: LevelMaterialDef::default(),
        }
    }
}

impl LevelConfig {
    pub fn from_ron_str(src: &str) -> Result<Self, LevelError> {
        ron::from_str(src).map_err(|e| LevelError::Ron(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let src = std::fs::read_to_string(path)?;
        Self::from_ron_str(&src)
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        validate_dimensions(self.width, self.depth, self.room_count)
    }

    /// The configured seed, or a freshly drawn one.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }
}

/// Boundary check shared by the config and the layout builder.
pub fn validate_dimensions(width: u32, depth: u32, room_count: u32) -> Result<(), LevelError> {
    if width < 2 || depth < 2 {
        return Err(LevelError::DimensionTooSmall { width, depth });
    }
    // Each room needs at least one row past the 2-row seed block.
    let max = width - 2;
    if room_count > max {
        return Err(LevelError::TooManyRooms { room_count, width, max });
    }
    let vertices = (width as u64 + 1) * (depth as u64 + 1);
    if vertices > u32::MAX as u64 {
        return Err(LevelError::GridTooLarge { width, depth });
    }
    Ok(())
}
