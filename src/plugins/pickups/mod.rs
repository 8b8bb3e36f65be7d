//! Pickups and key doors.
//!
//! A pickup fires once: the first player contact applies its effect, then the pickup
//! is either despawned or hidden and made non-collidable. Doors poll `GameState` and
//! open for good the first time the key is held.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::contact::split_player_contact;
use crate::common::despawn::PendingDespawn;
use crate::common::layers::{ground_layers, trigger_layers};
use crate::common::state::AppState;
use crate::plugins::player::motion::PlayerMotion;
use crate::plugins::player::Player;
use crate::plugins::session::{GameState, KeyCollect};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickupKind {
    Score { points: u32 },
    /// Cooldown cleared and air dash restored.
    DashReset,
    Key { id: String },
}

/// What a collected pickup actually did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickupEffect {
    Scored { total: u32 },
    DashReset,
    /// No motion state to reset.
    NoEffect,
    Key(KeyCollect),
}

#[derive(Component, Debug, Clone)]
pub struct Pickup {
    pub kind: PickupKind,
    pub destroy_on_pickup: bool,
    collected: bool,
}

impl Pickup {
    pub fn new(kind: PickupKind) -> Self {
        Self { kind, destroy_on_pickup: true, collected: false }
    }

    /// Hide instead of despawning once collected.
    pub fn persistent(kind: PickupKind) -> Self {
        Self { destroy_on_pickup: false, ..Self::new(kind) }
    }

    #[inline]
    pub fn is_collected(&self) -> bool {
        self.collected
    }
}

#[derive(Message, Debug, Clone, PartialEq)]
pub struct PickupCollected {
    pub pickup: Entity,
    pub kind: PickupKind,
    pub effect: PickupEffect,
}

/// Solid until its key is held, then open forever.
#[derive(Component, Debug, Clone)]
pub struct KeyDoor {
    pub required_key: String,
    open: bool,
}

impl KeyDoor {
    pub fn new(required_key: impl Into<String>) -> Self {
        Self { required_key: required_key.into(), open: false }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }
}

#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct DoorOpened {
    pub door: Entity,
    pub key: String,
}

pub fn pickup_bundle(pickup: Pickup, position: Vec2, size: Vec2) -> impl Bundle {
    (
        Name::new("Pickup"),
        pickup,
        Transform::from_translation(position.extend(0.0)),
        Visibility::default(),
        Collider::rectangle(size.x, size.y),
        Sensor,
        trigger_layers(),
    )
}

/// Doors are deliberately not world members: membership would restore their layers.
pub fn key_door_bundle(door: KeyDoor, position: Vec2, size: Vec2) -> impl Bundle {
    (
        Name::new(format!("KeyDoor({})", door.required_key)),
        door,
        Transform::from_translation(position.extend(0.0)),
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
        ground_layers(),
    )
}

pub fn plugin(app: &mut App) {
    app.add_message::<PickupCollected>()
        .add_message::<DoorOpened>()
        .add_systems(
            FixedPostUpdate,
            collect_pickups
                .after(CollisionEventSystems)
                .run_if(in_state(AppState::InGame)),
        )
        .add_systems(
            FixedUpdate,
            open_key_doors.run_if(in_state(AppState::InGame)),
        );
}

/// Apply one pickup's effect.
pub fn apply_pickup(kind: &PickupKind, game: &mut GameState, motion: Option<&mut PlayerMotion>) -> PickupEffect {
    match kind {
        PickupKind::Score { points } => {
            game.add_score(*points);
            PickupEffect::Scored { total: game.score() }
        }
        PickupKind::DashReset => match motion {
            Some(motion) => {
                motion.reset_dash();
                PickupEffect::DashReset
            }
            None => PickupEffect::NoEffect,
        },
        PickupKind::Key { id } => PickupEffect::Key(game.collect_key(id)),
    }
}

pub fn collect_pickups(
    mut started: MessageReader<CollisionStart>,
    mut q_player: Query<Option<&mut PlayerMotion>, With<Player>>,
    mut q_pickups: Query<(&mut Pickup, &mut CollisionLayers, &mut Visibility)>,
    mut game: ResMut<GameState>,
    mut collected: MessageWriter<PickupCollected>,
    mut commands: Commands,
) {
    for ev in started.read() {
        let Some((player, other)) = split_player_contact(ev, |e| q_player.contains(e)) else {
            continue;
        };
        let Ok((mut pickup, mut layers, mut visibility)) = q_pickups.get_mut(other.collider) else {
            continue;
        };
        if pickup.collected {
            continue;
        }
        pickup.collected = true;

        let motion = q_player.get_mut(player.collider).ok().flatten();
        let effect = apply_pickup(&pickup.kind, &mut game, motion.map(Mut::into_inner));
        info!("picked up {:?}: {effect:?}", pickup.kind);

        if pickup.destroy_on_pickup {
            commands.entity(other.collider).insert(PendingDespawn::now());
        } else {
            *layers = CollisionLayers::NONE;
            *visibility = Visibility::Hidden;
        }

        collected.write(PickupCollected { pickup: other.collider, kind: pickup.kind.clone(), effect });
    }
}

pub fn open_key_doors(
    game: Res<GameState>,
    mut q_doors: Query<(Entity, &mut KeyDoor, &mut CollisionLayers)>,
    mut opened: MessageWriter<DoorOpened>,
) {
    for (e, mut door, mut layers) in &mut q_doors {
        if door.open || !game.has_key(&door.required_key) {
            continue;
        }
        door.open = true;
        *layers = CollisionLayers::NONE;
        info!("door {e:?} opened with key '{}'", door.required_key);
        opened.write(DoorOpened { door: e, key: door.required_key.clone() });
    }
}

#[cfg(test)]
mod tests;
