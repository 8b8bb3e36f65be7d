//! Collision layers.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    /// Solid geometry: platforms, walls, doors, moving platforms.
    Ground,
    Player,
    Hazard,
    /// Non-solid contact volumes: pickups, checkpoints, zones.
    Trigger,
}

/// Layers for anything the player can stand on or cling to.
#[inline]
pub fn ground_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Ground, [Layer::Player])
}

#[inline]
pub fn player_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Player, [Layer::Ground, Layer::Hazard, Layer::Trigger])
}

#[inline]
pub fn hazard_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Hazard, [Layer::Player])
}

#[inline]
pub fn trigger_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Trigger, [Layer::Player])
}
