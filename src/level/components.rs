// src/level/components.rs
use bevy::prelude::*;

use super::meta_map::{LayoutStats, OccupancyGrid};

/// Marker for the generated floor entity.
#[derive(Component)]
pub struct LevelFloor;

/// The finished layout, kept around for floor/walkability queries.
#[derive(Resource, Clone, Debug)]
pub struct LevelLayout {
    pub grid: OccupancyGrid,
    pub stats: LayoutStats,
    pub seed: u64,
}

impl LevelLayout {
    /// True if world XZ lies on a floor cell. The floor spans `[0, width) × [0, depth)`, one unit per cell.
    pub fn is_floor(&self, world_x: f32, world_z: f32) -> bool {
        self.grid
            .get_checked(world_x.floor() as i64, world_z.floor() as i64)
            .unwrap_or(false)
    }

    /// World-space extents (X, Z) of the whole grid.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.grid.width() as f32, self.grid.depth() as f32)
    }

    pub fn center(&self) -> Vec3 {
        let size = self.size();
        Vec3::new(size.x * 0.5, 0.0, size.y * 0.5)
    }
}

/// Floor material built from the config, cloned onto the level entity.
#[derive(Resource)]
pub struct LevelAssets {
    pub material: Handle<StandardMaterial>,
}
