//! Hazards: trigger volumes that kill the player on contact.
//!
//! No debounce lives here. Overlapping hazards may all report in the same tick; the
//! respawn controller keeps only the first death.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::prelude::*;
use serde::Deserialize;

use crate::common::contact::split_player_contact;
use crate::common::despawn::PendingDespawn;
use crate::common::layers::hazard_layers;
use crate::common::state::AppState;
use crate::plugins::player::Player;
use crate::plugins::respawn::{report_death, DeathReason, PlayerDied, RespawnController};
use crate::plugins::world::membership::{Belonging, WorldMember};

/// Consumed hazards linger this long after firing.
pub const CONSUMED_HAZARD_GRACE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum HazardKind {
    Spike,
    Pit,
    Laser,
    Saw,
    Thorn,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Hazard {
    pub kind: HazardKind,
    /// Despawn shortly after the first kill.
    pub destroy_on_contact: bool,
}

impl Hazard {
    pub fn new(kind: HazardKind) -> Self {
        Self { kind, destroy_on_contact: false }
    }

    pub fn consumed(kind: HazardKind) -> Self {
        Self { kind, destroy_on_contact: true }
    }
}

pub fn hazard_bundle(hazard: Hazard, belonging: Belonging, position: Vec2, size: Vec2) -> impl Bundle {
    (
        Name::new(format!("Hazard({:?})", hazard.kind)),
        hazard,
        WorldMember::new(belonging, hazard_layers()),
        Transform::from_translation(position.extend(0.0)),
        Collider::rectangle(size.x, size.y),
        Sensor,
        hazard_layers(),
    )
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedPostUpdate,
        hazard_contacts
            .after(CollisionEventSystems)
            .run_if(in_state(AppState::InGame)),
    );
}

pub fn hazard_contacts(
    mut started: MessageReader<CollisionStart>,
    q_player: Query<&Position, With<Player>>,
    q_hazards: Query<(&Hazard, Has<PendingDespawn>)>,
    mut controller: ResMut<RespawnController>,
    mut died: MessageWriter<PlayerDied>,
    mut commands: Commands,
) {
    for ev in started.read() {
        let Some((player, other)) = split_player_contact(ev, |e| q_player.contains(e)) else {
            continue;
        };
        let Ok((hazard, consumed)) = q_hazards.get(other.collider) else {
            continue;
        };
        if consumed {
            continue;
        }

        let position = q_player.get(player.collider).map(|p| p.0).unwrap_or_default();
        report_death(&mut controller, &mut died, DeathReason::Hazard(hazard.kind), position);

        if hazard.destroy_on_contact {
            debug!("hazard {:?} consumed", other.collider);
            commands
                .entity(other.collider)
                .insert(PendingDespawn::after(CONSUMED_HAZARD_GRACE));
        }
    }
}

#[cfg(test)]
mod tests;
