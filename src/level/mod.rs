// src/level/mod.rs
//! Procedural level: randomized room layout -> floor mesh.

mod components;
mod config;
mod error;
mod meta_map;
mod mesh;
mod plugin;
mod systems;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use components::{LevelAssets, LevelFloor, LevelLayout};
pub use config::{LevelConfig, LevelMaterialDef, LevelSettings};
pub use error::LevelError;
pub use meta_map::{LayoutStats, MetaMap, MetaMapBuilder, OccupancyGrid, RoomSpan};
pub use mesh::{build_level_mesh, LevelMesh, MeshSink, FLOOR_TANGENT};
pub use plugin::{LevelPlugin, LevelStartupSet};

/// Output of one generation run.
#[derive(Clone, Debug)]
pub struct LevelData {
    pub map: MetaMap,
    pub mesh: LevelMesh,
}

/// Deterministic entry point: same config + seed, same level.
pub fn generate(config: &LevelConfig, seed: u64) -> Result<LevelData, LevelError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_with_rng(config, &mut rng)
}

/// Validate, lay out the grid, then build the floor buffers.
pub fn generate_with_rng<R: Rng + ?Sized>(
    config: &LevelConfig,
    rng: &mut R,
) -> Result<LevelData, LevelError> {
    let map = MetaMapBuilder::from_config(config)?.build(rng);
    let mesh = build_level_mesh(&map.grid, map.quad_upper_bound);
    Ok(LevelData { map, mesh })
}
