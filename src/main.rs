use bevy::prelude::*;

use levelgen::level::{LevelPlugin, LevelStartupSet};
use levelgen::setup;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        // reads the level config, lays out rooms, spawns the floor mesh
        .add_plugins(LevelPlugin)
        // camera + light, framed on the finished level
        .add_systems(Startup, setup::setup.after(LevelStartupSet::Generate))
        .run();
}
