//! Level instantiation.
//!
//! Every object is classified before anything is spawned, so a bad document leaves
//! the world untouched. Spawned entities are scoped to `AppState::InGame`.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use super::{LevelData, LevelError, ObjectSpec, ZoneKind};
use crate::common::layers::ground_layers;
use crate::common::state::AppState;
use crate::plugins::hazards::{hazard_bundle, Hazard};
use crate::plugins::pickups::{key_door_bundle, pickup_bundle, KeyDoor, Pickup};
use crate::plugins::respawn::checkpoint_bundle;
use crate::plugins::world::membership::{Belonging, WorldMember};
use crate::plugins::world::phase::PhaseMotion;
use crate::plugins::world::state::WorldKind;
use crate::plugins::world::{lock_zone_bundle, WorldLockZone};

/// Level to build when the game enters `InGame`.
#[derive(Resource, Debug, Clone)]
pub struct LevelSource(pub LevelData);

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(AppState::InGame), spawn_level_source);
}

fn spawn_level_source(mut commands: Commands, source: Option<Res<LevelSource>>) {
    let Some(source) = source else {
        return;
    };
    match spawn_level(&mut commands, &source.0) {
        Ok(count) => info!(
            "level '{}' built: {} rooms, {count} entities",
            source.0.meta.name,
            source.0.rooms.len()
        ),
        Err(err) => warn!("level '{}' not built: {err}", source.0.meta.name),
    }
}

/// Spawn every object of `level`. Returns how many entities were spawned.
pub fn spawn_level(commands: &mut Commands, level: &LevelData) -> Result<usize, LevelError> {
    let mut planned = Vec::with_capacity(level.object_count());
    for room in &level.rooms {
        let origin = Vec2::from(room.origin);
        for object in &room.objects {
            planned.push((object.classify()?, object.world_position(origin), object.extent(), origin));
        }
    }

    let mut count = 0;
    for (spec, position, size, origin) in planned {
        if let Some(e) = spawn_object(commands, spec, position, size, origin) {
            commands.entity(e).insert(DespawnOnExit(AppState::InGame));
            count += 1;
        }
    }
    Ok(count)
}

fn platform_bundle(belonging: Belonging, position: Vec2, size: Vec2) -> impl Bundle {
    (
        Name::new(format!("Platform({belonging:?})")),
        WorldMember::new(belonging, ground_layers()),
        Transform::from_translation(position.extend(0.0)),
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
        ground_layers(),
    )
}

fn moving_platform_bundle(motion: PhaseMotion, size: Vec2) -> impl Bundle {
    let start = motion.evaluate(0.0, WorldKind::A);
    (
        Name::new("MovingPlatform"),
        WorldMember::new(Belonging::Both, ground_layers()),
        Transform::from_translation(start.extend(0.0)),
        RigidBody::Kinematic,
        Collider::rectangle(size.x, size.y),
        ground_layers(),
        motion,
    )
}

fn spawn_object(
    commands: &mut Commands,
    spec: ObjectSpec,
    position: Vec2,
    size: Vec2,
    room_origin: Vec2,
) -> Option<Entity> {
    let e = match spec {
        ObjectSpec::Platform { belonging } => commands.spawn(platform_bundle(belonging, position, size)).id(),
        ObjectSpec::Hazard { kind, belonging } => {
            commands.spawn(hazard_bundle(Hazard::new(kind), belonging, position, size)).id()
        }
        ObjectSpec::Checkpoint => commands.spawn(checkpoint_bundle(position, size)).id(),
        ObjectSpec::Pickup(kind) => commands.spawn(pickup_bundle(Pickup::new(kind), position, size)).id(),
        ObjectSpec::Door { required_key } => {
            commands.spawn(key_door_bundle(KeyDoor::new(required_key), position, size)).id()
        }
        ObjectSpec::Zone(ZoneKind::WorldLock) => {
            commands.spawn(lock_zone_bundle(WorldLockZone::default(), position, size)).id()
        }
        ObjectSpec::Zone(ZoneKind::OneWayDropBtoA) => {
            commands.spawn(platform_bundle(Belonging::WorldB, position, size)).id()
        }
        ObjectSpec::Zone(ZoneKind::WallMarker) => return None,
        ObjectSpec::MovingPlatform(motion) => {
            commands.spawn(moving_platform_bundle(motion.with_origin(room_origin), size)).id()
        }
    };
    Some(e)
}
