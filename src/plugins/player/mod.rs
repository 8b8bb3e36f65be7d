//! Player plugin.
//!
//! Pipeline:
//! - Update: sample keyboard, latch actions into the `PlayerInput` resource
//! - FixedUpdate, chained:
//!   - `PlayerSet::Sense`: ground probe + wall rays -> `Senses`
//!   - `PlayerSet::Step`: `PlayerMotion::step` writes `LinearVelocity`
//!   - `PlayerSet::Actions`: consume latched jump / dash / world switch
//!
//! Latching matters because Update can run several frames between fixed ticks (or
//! several ticks per frame): a press is held until a fixed tick consumes it.
//!
//! World rules (gravity scale and speed multiplier) follow the active world through the
//! `WorldSwitched` observer, and are applied once at spawn.

pub mod motion;
pub mod sensing;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::player_layers;
use crate::common::state::AppState;
use crate::common::tunables::Tunables;
use crate::plugins::world::state::{WorldCommandsExt, WorldState, WorldSwitched};

use self::motion::PlayerMotion;
use self::sensing::{AvianProbe, BodyBounds, GroundProbe, Senses};

#[derive(Component)]
pub struct Player;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSet {
    Sense,
    Step,
    Actions,
}

/// Sampled axis plus latched one-shot actions.
#[derive(Resource, Default, Debug, Clone)]
pub struct PlayerInput {
    pub move_axis: f32,
    pub jump: bool,
    pub dash: bool,
    pub switch_world: bool,
    pub respawn: bool,
    pub pause: bool,
}

impl PlayerInput {
    #[inline]
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump)
    }

    #[inline]
    pub fn take_dash(&mut self) -> bool {
        std::mem::take(&mut self.dash)
    }

    #[inline]
    pub fn take_switch_world(&mut self) -> bool {
        std::mem::take(&mut self.switch_world)
    }

    #[inline]
    pub fn take_respawn(&mut self) -> bool {
        std::mem::take(&mut self.respawn)
    }

    #[inline]
    pub fn take_pause(&mut self) -> bool {
        std::mem::take(&mut self.pause)
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<PlayerInput>()
        .add_observer(apply_world_rules)
        .add_systems(OnEnter(AppState::InGame), spawn)
        .add_systems(Update, gather_input)
        .configure_sets(
            FixedUpdate,
            (PlayerSet::Sense, PlayerSet::Step, PlayerSet::Actions)
                .chain()
                .run_if(in_state(AppState::InGame)),
        )
        .add_systems(
            FixedUpdate,
            (
                sense_player.in_set(PlayerSet::Sense),
                step_player_motion.in_set(PlayerSet::Step),
                resolve_player_actions.in_set(PlayerSet::Actions),
            ),
        );
}

pub fn spawn(mut commands: Commands, tunables: Res<Tunables>, world: Res<WorldState>) {
    let size = Vec2::from(tunables.player_size);
    let spawn_at = Vec2::from(tunables.respawn.default_spawn);
    let rule = tunables.worlds.for_world(world.current());

    let mut motion = PlayerMotion::default();
    motion.set_speed_multiplier(rule.speed_multiplier);

    commands.spawn((
        Name::new("Player"),
        Player,
        motion,
        Senses::default(),
        GroundProbe { radius: tunables.motion.ground_check_radius },
        Sprite {
            color: Color::srgb(0.2, 0.75, 0.9),
            custom_size: Some(size),
            ..default()
        },
        Transform::from_translation(spawn_at.extend(1.0)),
        (
            RigidBody::Dynamic,
            Collider::rectangle(size.x, size.y),
            LockedAxes::ROTATION_LOCKED,
            GravityScale(rule.gravity_multiplier),
            Friction::ZERO,
            player_layers(),
            CollisionEventsEnabled,
            LinearVelocity::ZERO,
            TranslationInterpolation,
        ),
        DespawnOnExit(AppState::InGame),
    ));
}

pub fn gather_input(keys: Option<Res<ButtonInput<KeyCode>>>, mut input: ResMut<PlayerInput>) {
    let Some(keys) = keys else {
        return;
    };

    let mut axis = 0.0;
    if keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        axis -= 1.0;
    }
    if keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        axis += 1.0;
    }
    input.move_axis = axis;

    input.jump |= keys.any_just_pressed([KeyCode::Space, KeyCode::KeyW, KeyCode::ArrowUp]);
    input.dash |= keys.just_pressed(KeyCode::ShiftLeft);
    input.switch_world |= keys.any_just_pressed([KeyCode::KeyQ, KeyCode::Tab]);
    input.respawn |= keys.just_pressed(KeyCode::KeyR);
    input.pause |= keys.just_pressed(KeyCode::Escape);
}

pub fn sense_player(
    spatial: SpatialQuery,
    tunables: Res<Tunables>,
    q_sensors: Query<(), With<Sensor>>,
    mut q_player: Query<
        (Entity, &Position, Option<&ColliderAabb>, Option<&GroundProbe>, &mut Senses),
        With<Player>,
    >,
) {
    let is_trigger = |e: Entity| q_sensors.contains(e);
    let fallback_size = Vec2::from(tunables.player_size);

    for (entity, pos, aabb, ground, mut senses) in &mut q_player {
        let bounds = aabb
            .map(BodyBounds::from)
            .unwrap_or_else(|| BodyBounds::from_center_size(pos.0, fallback_size));
        let probe = AvianProbe::new(&spatial, entity, &is_trigger);
        *senses = sensing::sense(&probe, &bounds, ground, &tunables.motion, pos.0);
    }
}

pub fn step_player_motion(
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut warned_missing_body: Local<bool>,
    mut q_player: Query<(&mut PlayerMotion, &Senses, Option<&mut LinearVelocity>), With<Player>>,
) {
    let dt = time.delta_secs();
    for (mut motion, senses, velocity) in &mut q_player {
        motion.set_move_input(input.move_axis);

        let Some(mut velocity) = velocity else {
            if !*warned_missing_body {
                *warned_missing_body = true;
                warn!("player has no LinearVelocity; locomotion disabled");
            }
            continue;
        };

        let mut v = velocity.0;
        motion.step(&tunables.motion, senses, dt, &mut v);
        if v != velocity.0 {
            velocity.0 = v;
        }
    }
}

pub fn resolve_player_actions(
    tunables: Res<Tunables>,
    mut input: ResMut<PlayerInput>,
    mut q_player: Query<(&mut PlayerMotion, &mut LinearVelocity), With<Player>>,
    mut commands: Commands,
) {
    let jump = input.take_jump();
    let dash = input.take_dash();

    if input.take_switch_world() {
        commands.switch_world();
    }

    for (mut motion, mut velocity) in &mut q_player {
        if jump && motion.jump(&tunables.motion, &mut velocity.0) {
            debug!("jump -> {:?}", motion.state());
        }
        if dash && motion.dash(&tunables.motion, &mut velocity.0) {
            debug!("dash, velocity {:?}", velocity.0);
        }
    }
}

/// Observer: the player's gravity and speed follow the active world.
pub fn apply_world_rules(
    switched: On<WorldSwitched>,
    tunables: Res<Tunables>,
    mut q_player: Query<(&mut PlayerMotion, &mut GravityScale), With<Player>>,
) {
    let rule = tunables.worlds.for_world(switched.event().current);
    for (mut motion, mut gravity) in &mut q_player {
        motion.set_speed_multiplier(rule.speed_multiplier);
        gravity.0 = rule.gravity_multiplier;
    }
    debug!(
        "world rules '{}': gravity x{}, speed x{}",
        rule.name, rule.gravity_multiplier, rule.speed_multiplier
    );
}
