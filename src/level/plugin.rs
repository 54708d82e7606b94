use bevy::prelude::*;

use crate::level::config::LevelSettings;
use crate::level::systems::{generate_level, load_level_config, prepare_level_material};

/// Startup ordering: config + material first, then the one-shot generation.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum LevelStartupSet {
    Load,     // config + material
    Generate, // layout, mesh, spawn
}

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app
            .configure_sets(
                Startup,
                (
                    LevelStartupSet::Load,
                    LevelStartupSet::Generate.after(LevelStartupSet::Load),
                ),
            )
            .init_resource::<LevelSettings>()
            .add_systems(
                Startup,
                (load_level_config, prepare_level_material)
                    .chain()
                    .in_set(LevelStartupSet::Load),
            )
            .add_systems(Startup, generate_level.in_set(LevelStartupSet::Generate));
    }
}
