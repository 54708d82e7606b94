use bevy::prelude::*;

use crate::level::LevelLayout;

#[derive(Component)]
pub struct MainCamera;

/// Light + a camera looking down at the generated level.
pub fn setup(
    mut commands: Commands,
    layout: Option<Res<LevelLayout>>,
) {
    // Frame the level if it exists, else the origin
    let (focus, extent) = match layout {
        Some(layout) => (layout.center(), layout.size().max_element()),
        None => (Vec3::ZERO, 10.0),
    };

    // 1) Light
    commands.spawn((
        PointLight {
            shadows_enabled: true,
            range: extent * 4.0,
            intensity: 4_000_000.0,
            ..default()
        },
        Transform::from_translation(focus + Vec3::new(0.0, extent, 0.0)),
    ));

    // 2) Camera
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(focus + Vec3::new(-extent * 0.25, extent * 0.9, -extent * 0.6))
            .looking_at(focus, Vec3::Y),
        MainCamera,
    ));
}
