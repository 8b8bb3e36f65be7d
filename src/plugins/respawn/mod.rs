//! Death and respawn.
//!
//! `RespawnController` is a two-state machine, `Alive -> Respawning -> Alive`:
//! - a death signal while already respawning is dropped (first one wins)
//! - the delay is a countdown ticked on the fixed schedule, so the respawn always
//!   lands on a later tick than the death
//! - the respawn point is the last checkpoint if one was touched, else the default
//!   spawn. The active world is never touched.
//!
//! Death sources: hazards (`plugins::hazards`), leaving the bounds region, and falling
//! below `fall_out_min_y` when no region is configured.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::contact::split_player_contact;
use crate::common::layers::trigger_layers;
use crate::common::state::AppState;
use crate::common::tunables::Tunables;
use crate::plugins::hazards::HazardKind;
use crate::plugins::player::motion::PlayerMotion;
use crate::plugins::player::{Player, PlayerInput, PlayerSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathReason {
    Hazard(HazardKind),
    OutOfBounds,
    FellOut,
}

/// A death was accepted (duplicates are not reported).
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct PlayerDied {
    pub reason: DeathReason,
    pub position: Vec2,
}

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct PlayerRespawned {
    pub position: Vec2,
}

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct CheckpointActivated {
    pub checkpoint: Entity,
    pub position: Vec2,
}

/// Respawn right away, skipping the death delay.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespawnRequest {
    /// At the current respawn point.
    Now,
    /// Forget the checkpoint and go back to the default spawn.
    ResetToDefault,
}

#[derive(Resource, Debug, Clone)]
pub struct RespawnController {
    default_spawn: Vec2,
    last_checkpoint: Vec2,
    has_checkpoint: bool,
    respawn_delay: f32,
    /// `Some` while respawning: seconds left.
    countdown: Option<f32>,
    out_of_bounds: Option<Rect>,
    fall_out_min_y: f32,
}

impl RespawnController {
    pub fn from_tunables(tunables: &Tunables) -> Self {
        let r = &tunables.respawn;
        let default_spawn = Vec2::from(r.default_spawn);
        Self {
            default_spawn,
            last_checkpoint: default_spawn,
            has_checkpoint: false,
            respawn_delay: r.respawn_delay,
            countdown: None,
            out_of_bounds: r.out_of_bounds.as_ref().map(|b| b.rect()),
            fall_out_min_y: r.fall_out_min_y,
        }
    }

    #[inline]
    pub fn is_respawning(&self) -> bool {
        self.countdown.is_some()
    }

    #[inline]
    pub fn has_checkpoint(&self) -> bool {
        self.has_checkpoint
    }

    #[inline]
    pub fn default_spawn(&self) -> Vec2 {
        self.default_spawn
    }

    #[inline]
    pub fn respawn_point(&self) -> Vec2 {
        if self.has_checkpoint { self.last_checkpoint } else { self.default_spawn }
    }

    /// Enter `Respawning`. Returns false if a respawn is already pending.
    pub fn trigger_death(&mut self) -> bool {
        if self.is_respawning() {
            return false;
        }
        self.countdown = Some(self.respawn_delay);
        true
    }

    /// Count the delay down. Returns true on the tick the respawn is due.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(left) = self.countdown.as_mut() else {
            return false;
        };
        *left -= dt;
        *left <= 0.0
    }

    /// Leave `Respawning` and return where the player goes.
    pub fn finish_respawn(&mut self) -> Vec2 {
        self.countdown = None;
        self.respawn_point()
    }

    pub fn set_checkpoint(&mut self, position: Vec2) {
        self.last_checkpoint = position;
        self.has_checkpoint = true;
    }

    /// Forget the checkpoint. The caller respawns the player right after.
    pub fn reset_to_default_spawn(&mut self) -> Vec2 {
        self.last_checkpoint = self.default_spawn;
        self.has_checkpoint = false;
        self.finish_respawn()
    }

    /// Why `position` counts as a death, if it does. The region test is inclusive.
    pub fn out_of_bounds_reason(&self, position: Vec2) -> Option<DeathReason> {
        match self.out_of_bounds {
            Some(region) if !region.contains(position) => Some(DeathReason::OutOfBounds),
            Some(_) => None,
            None if position.y < self.fall_out_min_y => Some(DeathReason::FellOut),
            None => None,
        }
    }
}

/// Try to kill the player; reports and logs only an accepted death.
pub fn report_death(
    controller: &mut RespawnController,
    died: &mut MessageWriter<PlayerDied>,
    reason: DeathReason,
    position: Vec2,
) -> bool {
    if !controller.trigger_death() {
        debug!("death ({reason:?}) ignored: already respawning");
        return false;
    }
    info!(
        "player died: reason={reason:?} pos={position} checkpoint={:?} has_checkpoint={}",
        controller.last_checkpoint, controller.has_checkpoint
    );
    died.write(PlayerDied { reason, position });
    true
}

/// Checkpoint sensor. Only the first touch counts until `reset`.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Checkpoint {
    activated: bool,
}

impl Checkpoint {
    #[inline]
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn reset(&mut self) {
        self.activated = false;
    }
}

pub fn checkpoint_bundle(position: Vec2, size: Vec2) -> impl Bundle {
    (
        Name::new("Checkpoint"),
        Checkpoint::default(),
        Transform::from_translation(position.extend(0.0)),
        Collider::rectangle(size.x, size.y),
        Sensor,
        trigger_layers(),
    )
}

pub fn plugin(app: &mut App) {
    app.add_message::<PlayerDied>()
        .add_message::<PlayerRespawned>()
        .add_message::<CheckpointActivated>()
        .add_message::<RespawnRequest>()
        .add_systems(
            FixedUpdate,
            // Counting down before detection keeps a fresh death's countdown
            // untouched until the next tick.
            (tick_respawn, detect_out_of_bounds, process_respawn_requests)
                .chain()
                .after(PlayerSet::Actions)
                .run_if(in_state(AppState::InGame)),
        )
        .add_systems(
            FixedPostUpdate,
            activate_checkpoints
                .after(CollisionEventSystems)
                .run_if(in_state(AppState::InGame)),
        );
}

pub fn detect_out_of_bounds(
    mut controller: ResMut<RespawnController>,
    mut died: MessageWriter<PlayerDied>,
    q_player: Query<&Position, With<Player>>,
) {
    if controller.is_respawning() {
        return;
    }
    let Ok(pos) = q_player.single() else {
        return;
    };
    if let Some(reason) = controller.out_of_bounds_reason(pos.0) {
        report_death(&mut controller, &mut died, reason, pos.0);
    }
}

type RespawnTargets = (
    &'static mut Position,
    &'static mut Transform,
    &'static mut LinearVelocity,
    Option<&'static mut AngularVelocity>,
    Option<&'static mut PlayerMotion>,
);

/// Teleport, stop, and clear transient motion state. World state is left alone.
fn place_player(
    pos: &mut Position,
    transform: &mut Transform,
    linear: &mut LinearVelocity,
    angular: Option<&mut AngularVelocity>,
    motion: Option<&mut PlayerMotion>,
    at: Vec2,
) {
    pos.0 = at;
    transform.translation = at.extend(transform.translation.z);
    linear.0 = Vec2::ZERO;
    if let Some(angular) = angular {
        angular.0 = 0.0;
    }
    if let Some(motion) = motion {
        motion.reset_for_respawn();
    }
}

pub fn tick_respawn(
    time: Res<Time<Fixed>>,
    mut controller: ResMut<RespawnController>,
    mut respawned: MessageWriter<PlayerRespawned>,
    mut q_player: Query<RespawnTargets, With<Player>>,
) {
    if !controller.tick(time.delta_secs()) {
        return;
    }
    let at = controller.finish_respawn();
    let Ok((mut pos, mut transform, mut linear, angular, motion)) = q_player.single_mut() else {
        warn!("respawn due but there is no player");
        return;
    };
    place_player(
        &mut pos,
        &mut transform,
        &mut linear,
        angular.map(Mut::into_inner),
        motion.map(Mut::into_inner),
        at,
    );
    info!("player respawned at {at}");
    respawned.write(PlayerRespawned { position: at });
}

pub fn process_respawn_requests(
    mut input: ResMut<PlayerInput>,
    mut requests: MessageReader<RespawnRequest>,
    mut controller: ResMut<RespawnController>,
    mut respawned: MessageWriter<PlayerRespawned>,
    mut q_player: Query<RespawnTargets, With<Player>>,
) {
    let mut request = input.take_respawn().then_some(RespawnRequest::Now);
    for r in requests.read() {
        // A reset outranks a plain respawn.
        if request != Some(RespawnRequest::ResetToDefault) {
            request = Some(*r);
        }
    }
    let Some(request) = request else {
        return;
    };

    let at = match request {
        RespawnRequest::Now => controller.finish_respawn(),
        RespawnRequest::ResetToDefault => controller.reset_to_default_spawn(),
    };
    let Ok((mut pos, mut transform, mut linear, angular, motion)) = q_player.single_mut() else {
        return;
    };
    place_player(
        &mut pos,
        &mut transform,
        &mut linear,
        angular.map(Mut::into_inner),
        motion.map(Mut::into_inner),
        at,
    );
    info!("player respawned at {at} ({request:?})");
    respawned.write(PlayerRespawned { position: at });
}

pub fn activate_checkpoints(
    mut started: MessageReader<CollisionStart>,
    q_player: Query<(), With<Player>>,
    mut q_checkpoints: Query<(&mut Checkpoint, &Transform)>,
    mut controller: ResMut<RespawnController>,
    mut activated: MessageWriter<CheckpointActivated>,
) {
    for ev in started.read() {
        let Some((_, other)) = split_player_contact(ev, |e| q_player.contains(e)) else {
            continue;
        };
        let Ok((mut checkpoint, transform)) = q_checkpoints.get_mut(other.collider) else {
            continue;
        };
        if checkpoint.activated {
            continue;
        }
        checkpoint.activated = true;

        let position = transform.translation.truncate();
        controller.set_checkpoint(position);
        info!("checkpoint {:?} set at {position}", other.collider);
        activated.write(CheckpointActivated { checkpoint: other.collider, position });
    }
}
