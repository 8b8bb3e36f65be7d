//! World plugin: the A/B world switch and everything that reacts to it.
//!
//! ```text
//! switch_world / force_switch ──trigger──> WorldSwitched
//!                                           ├─ sync_world_members  (collision + visibility)
//!                                           └─ player::apply_world_rules (gravity + speed)
//! FixedUpdate:     init_world_members -> drive_phase_platforms -> (player sensing)
//! FixedPostUpdate: world_lock_zones (after avian collision events)
//! ```
//!
//! Moving platforms need no observer: they read `WorldState` every tick.

pub mod membership;
pub mod phase;
pub mod rules;
pub mod state;

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::contact::split_player_contact;
use crate::common::layers::trigger_layers;
use crate::common::state::AppState;
use crate::plugins::player::{Player, PlayerSet};

use self::state::{WorldCommandsExt, WorldKind, WorldState};

/// While the player is inside, world switching is locked.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct WorldLockZone {
    /// Switch to this world on entry, bypassing the lock.
    pub forced_world: Option<WorldKind>,
}

pub fn plugin(app: &mut App) {
    app.add_observer(membership::sync_world_members);

    app.add_systems(
        FixedUpdate,
        (
            membership::init_world_members,
            phase::report_stationary_platforms,
            phase::drive_phase_platforms,
        )
            .chain()
            .before(PlayerSet::Sense)
            .run_if(in_state(AppState::InGame)),
    );

    app.add_systems(
        FixedPostUpdate,
        world_lock_zones
            .after(CollisionEventSystems)
            .run_if(in_state(AppState::InGame)),
    );
}

/// Components for a lock zone sensor of the given size.
pub fn lock_zone_bundle(zone: WorldLockZone, position: Vec2, size: Vec2) -> impl Bundle {
    (
        Name::new("WorldLockZone"),
        zone,
        Transform::from_translation(position.extend(0.0)),
        Collider::rectangle(size.x, size.y),
        Sensor,
        trigger_layers(),
    )
}

pub fn world_lock_zones(
    mut started: MessageReader<CollisionStart>,
    mut ended: MessageReader<CollisionEnd>,
    q_player: Query<(), With<Player>>,
    q_zones: Query<&WorldLockZone>,
    mut state: ResMut<WorldState>,
    mut commands: Commands,
) {
    for ev in started.read() {
        let Some((_, other)) = split_player_contact(ev, |e| q_player.contains(e)) else {
            continue;
        };
        let Ok(zone) = q_zones.get(other.collider) else {
            continue;
        };

        state.set_lock(true);
        info!("world switching locked by zone {:?}", other.collider);
        if let Some(world) = zone.forced_world {
            commands.force_switch(world);
        }
    }

    for ev in ended.read() {
        let Some((_, other)) = split_player_contact(ev, |e| q_player.contains(e)) else {
            continue;
        };
        if q_zones.contains(other.collider) {
            state.set_lock(false);
            info!("world switching unlocked");
        }
    }
}
