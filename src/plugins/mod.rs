//! Feature plugins.

use bevy::prelude::*;

use crate::level;

pub mod core;
pub mod hazards;
pub mod physics;
pub mod pickups;
pub mod player;
pub mod respawn;
pub mod session;
pub mod world;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    world::plugin(app);
    player::plugin(app);
    hazards::plugin(app);
    respawn::plugin(app);
    pickups::plugin(app);
    session::plugin(app);
    level::spawn::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    app.add_systems(Startup, spawn_camera);
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("Camera"),
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: 1.0 / 48.0,
            ..OrthographicProjection::default_2d()
        }),
    ));
}
