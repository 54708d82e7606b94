use bevy::prelude::*;

use super::components::{LevelAssets, LevelFloor, LevelLayout};
use super::config::{LevelConfig, LevelSettings};
use super::error::LevelError;
use super::generate;

/// 1) Read the level config once at startup (unless one was inserted up front).
pub fn load_level_config(
    mut commands: Commands,
    settings: Res<LevelSettings>,
    existing: Option<Res<LevelConfig>>,
) {
    if existing.is_some() {
        return;
    }

    let config = match LevelConfig::load(&settings.config_path) {
        Ok(cfg) => {
            info!("Level: loaded config from '{}'", settings.config_path);
            cfg
        }
        Err(LevelError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Level: no config at '{}', using defaults", settings.config_path);
            LevelConfig::default()
        }
        Err(e) => {
            error!("Level: failed to read '{}': {e}; using defaults", settings.config_path);
            LevelConfig::default()
        }
    };
    commands.insert_resource(config);
}

/// 2) Turn the config's material description into a `StandardMaterial`.
pub fn prepare_level_material(
    mut commands: Commands,
    config: Res<LevelConfig>,
    asset_server: Option<Res<AssetServer>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let def = &config.material;
    let [r, g, b, a] = def.base_color;

    let texture = match (&def.texture, asset_server) {
        (Some(path), Some(server)) => Some(server.load::<Image>(path.clone())),
        (Some(path), None) => {
            warn!("Level: no AssetServer, ignoring floor texture '{path}'");
            None
        }
        (None, _) => None,
    };

    let material = materials.add(StandardMaterial {
        base_color: Color::linear_rgba(r, g, b, a),
        base_color_texture: texture,
        perceptual_roughness: def.perceptual_roughness,
        ..default()
    });
    commands.insert_resource(LevelAssets { material });
}

/// 3) Lay out the grid, build the floor mesh and spawn it.
pub fn generate_level(
    mut commands: Commands,
    config: Res<LevelConfig>,
    assets: Res<LevelAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let seed = config.resolve_seed();
    let level = match generate(&config, seed) {
        Ok(level) => level,
        Err(e) => {
            error!("Level: generation aborted: {e}");
            return;
        }
    };

    let stats = level.map.stats;
    info!(
        "Level: seed={} grid={}x{} rooms placed={} skipped={} quads={} (bound {}) indices={}",
        seed,
        config.width,
        config.depth,
        stats.rooms_placed,
        stats.rooms_skipped,
        level.mesh.quad_count(),
        level.map.quad_upper_bound,
        level.mesh.indices.len(),
    );

    let mesh_handle = meshes.add(level.mesh.into_bevy_mesh());
    commands.spawn((
        LevelFloor,
        Mesh3d(mesh_handle),
        MeshMaterial3d(assets.material.clone()),
        Transform::default(),
        Visibility::Visible,
        Name::new("Level"),
    ));

    commands.insert_resource(LevelLayout { grid: level.map.grid, stats, seed });
}
