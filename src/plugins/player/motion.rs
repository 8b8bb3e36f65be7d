//! Player locomotion state machine.
//!
//! `PlayerMotion` owns every discrete flag and countdown of the character. It never
//! touches the ECS: each fixed tick the plugin hands it the sensed surroundings
//! ([`Senses`]) and the body's velocity, and it writes the velocity back.
//!
//! Per tick, in order:
//! 1. ground: `grounded` from the probe (missing probe => airborne, logged once)
//! 2. wall cling transitions (dash/ground exit, candidate, lock checks, enter, ratchet)
//! 3. landing reset (`air_dash_used`, wall lock)
//! 4. countdowns: wall lock, dash cooldown, dash duration
//! 5. velocity: climb/slide while clinging, else run; dashing keeps its velocity
//! 6. derived display state
//!
//! `jump` and `dash` are actions resolved after the tick; they refresh the display
//! state themselves.
//!
//! Invariants held structurally:
//! - `dashing` and clinging are never both true: `dash` releases the wall, and the
//!   cling transition exits while dashing.
//! - `climb_distance` only grows while clinging and resets on every (re)grab.
//! - Releasing a wall locks it for `wall_lock_duration`, unless a different wall is
//!   touched first or the player lands.

use bevy::prelude::*;

use super::sensing::Senses;
use crate::common::tunables::MotionTunables;

/// Display-only state, derived last each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    Running,
    Jumping,
    Falling,
    Dashing,
    Climbing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Which side an axis value points at, if it clears the deadzone.
#[inline]
pub fn axis_side(axis: f32, deadzone: f32) -> Option<Side> {
    if axis > deadzone {
        Some(Side::Right)
    } else if axis < -deadzone {
        Some(Side::Left)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WallGrip {
    wall: Entity,
    side: Side,
}

#[derive(Component, Debug, Clone)]
pub struct PlayerMotion {
    move_input: f32,
    facing: f32,
    speed_multiplier: f32,

    grounded: bool,
    was_grounded: bool,
    missing_probe_logged: bool,

    dashing: bool,
    dash_timer: f32,
    dash_cooldown_timer: f32,
    air_dash_used: bool,

    grip: Option<WallGrip>,
    attach_y: f32,
    last_cling_y: f32,
    climb_distance: f32,
    current_slide_speed: f32,
    locked_wall: Option<Entity>,
    wall_lock_timer: f32,

    state: PlayerState,
}

impl Default for PlayerMotion {
    fn default() -> Self {
        Self {
            move_input: 0.0,
            facing: 1.0,
            speed_multiplier: 1.0,
            grounded: false,
            was_grounded: false,
            missing_probe_logged: false,
            dashing: false,
            dash_timer: 0.0,
            dash_cooldown_timer: 0.0,
            air_dash_used: false,
            grip: None,
            attach_y: 0.0,
            last_cling_y: 0.0,
            climb_distance: 0.0,
            current_slide_speed: 0.0,
            locked_wall: None,
            wall_lock_timer: 0.0,
            state: PlayerState::Idle,
        }
    }
}

impl PlayerMotion {
    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    pub fn set_move_input(&mut self, axis: f32) {
        self.move_input = axis.clamp(-1.0, 1.0);
    }

    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.speed_multiplier = multiplier;
    }

    // ------------------------------------------------------------------
    // Fixed tick
    // ------------------------------------------------------------------

    pub fn step(&mut self, params: &MotionTunables, senses: &Senses, dt: f32, velocity: &mut Vec2) {
        self.sense_ground(senses);
        self.update_wall_state(params, senses);

        if self.is_wall_clinging() {
            self.grounded = false;
        }

        if self.grounded && !self.was_grounded {
            self.air_dash_used = false;
            self.clear_wall_lock();
        }

        self.tick_timers(dt);

        if !self.dashing {
            if self.is_wall_clinging() {
                self.apply_climb(params, dt, velocity);
            } else {
                velocity.x = self.move_input * params.move_speed * self.speed_multiplier;
            }
            if let Some(side) = axis_side(self.move_input, params.input_deadzone) {
                self.facing = side.sign();
            }
        }

        self.refresh_state(*velocity, params.input_deadzone);
    }

    fn sense_ground(&mut self, senses: &Senses) {
        self.was_grounded = self.grounded;
        self.grounded = match senses.grounded {
            Some(grounded) => grounded,
            None => {
                if !self.missing_probe_logged {
                    self.missing_probe_logged = true;
                    warn!("player has no ground probe; treating it as permanently airborne");
                }
                false
            }
        };
    }

    fn update_wall_state(&mut self, params: &MotionTunables, senses: &Senses) {
        let y = senses.position.y;

        if self.dashing || self.grounded {
            self.release_wall(params, y);
            return;
        }

        // Touching any wall other than the locked one lifts the lock immediately.
        if let Some(locked) = self.locked_wall {
            if [senses.wall_left, senses.wall_right].into_iter().flatten().any(|w| w != locked) {
                self.clear_wall_lock();
            }
        }

        // Grabbing requires pressing into the wall.
        let candidate = match axis_side(self.move_input, params.input_deadzone) {
            Some(Side::Right) => senses.wall_right.map(|wall| WallGrip { wall, side: Side::Right }),
            Some(Side::Left) => senses.wall_left.map(|wall| WallGrip { wall, side: Side::Left }),
            None => None,
        };
        let Some(candidate) = candidate else {
            self.release_wall(params, y);
            return;
        };

        if self.is_locked(candidate.wall) {
            self.release_wall(params, y);
            return;
        }

        if self.grip != Some(candidate) {
            self.enter_cling(params, candidate, y);
        }

        // Ratchet: only upward displacement counts.
        if y > self.last_cling_y {
            self.climb_distance =
                (self.climb_distance + (y - self.last_cling_y)).clamp(0.0, params.max_climb_distance);
        }
        self.last_cling_y = y;
    }

    fn enter_cling(&mut self, params: &MotionTunables, grip: WallGrip, y: f32) {
        self.grip = Some(grip);
        self.attach_y = y;
        self.last_cling_y = y;
        self.climb_distance = 0.0;
        self.current_slide_speed = params.slide_speed_start;
    }

    /// Leave the wall, locking it if we were on one.
    fn release_wall(&mut self, params: &MotionTunables, y: f32) {
        if let Some(grip) = self.grip.take() {
            self.locked_wall = Some(grip.wall);
            self.wall_lock_timer = params.wall_lock_duration;
        }
        self.last_cling_y = y;
    }

    fn clear_wall_lock(&mut self) {
        self.locked_wall = None;
        self.wall_lock_timer = 0.0;
    }

    #[inline]
    fn is_locked(&self, wall: Entity) -> bool {
        self.locked_wall == Some(wall)
    }

    fn tick_timers(&mut self, dt: f32) {
        if self.locked_wall.is_some() {
            self.wall_lock_timer -= dt;
            if self.wall_lock_timer <= 0.0 {
                self.clear_wall_lock();
            }
        }

        if self.dash_cooldown_timer > 0.0 {
            self.dash_cooldown_timer = (self.dash_cooldown_timer - dt).max(0.0);
        }

        if self.dashing {
            self.dash_timer -= dt;
            if self.dash_timer <= 0.0 {
                self.dash_timer = 0.0;
                self.dashing = false;
            }
        }
    }

    fn apply_climb(&mut self, params: &MotionTunables, dt: f32, velocity: &mut Vec2) {
        let max = params.max_climb_distance.max(0.01);
        let epsilon = params.climb_distance_epsilon.clamp(0.0, max);
        if self.climb_distance >= max - epsilon {
            self.climb_distance = max;
        }

        let ratio = (self.climb_distance / max).clamp(0.0, 1.0);
        let climb_speed = params.climb_speed_start.lerp(0.0, ratio);

        if climb_speed > 0.0 {
            self.current_slide_speed = params.slide_speed_start;
            *velocity = Vec2::new(0.0, climb_speed);
        } else {
            let accel = (params.slide_speed_max - params.slide_speed_start) * dt;
            self.current_slide_speed = move_towards(self.current_slide_speed, params.slide_speed_max, accel);
            *velocity = Vec2::new(0.0, -self.current_slide_speed);
        }
    }

    /// Priority: Dashing > Climbing > Jumping/Falling (airborne) > Running > Idle.
    pub fn refresh_state(&mut self, velocity: Vec2, deadzone: f32) {
        self.state = if self.dashing {
            PlayerState::Dashing
        } else if self.is_wall_clinging() {
            PlayerState::Climbing
        } else if !self.grounded {
            if velocity.y > 0.0 { PlayerState::Jumping } else { PlayerState::Falling }
        } else if axis_side(self.move_input, deadzone).is_some() {
            PlayerState::Running
        } else {
            PlayerState::Idle
        };
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Wall jump while clinging, else ground jump. Returns whether a jump happened.
    pub fn jump(&mut self, params: &MotionTunables, velocity: &mut Vec2) -> bool {
        if self.dashing {
            return false;
        }

        if let Some(grip) = self.grip {
            if self.is_locked(grip.wall) {
                return false;
            }
            let scale = (1.0 - self.climb_distance / params.max_climb_distance.max(0.01)).clamp(0.0, 1.0);
            if scale <= 0.0 {
                // Climb budget spent: the slide is the only way off.
                return false;
            }
            *velocity = Vec2::new(
                -grip.side.sign() * params.wall_jump_horizontal_speed,
                params.jump_force * params.wall_jump_vertical_multiplier * scale,
            );
            self.release_wall(params, self.last_cling_y);
            self.refresh_state(*velocity, params.input_deadzone);
            return true;
        }

        if self.grounded {
            velocity.y = params.jump_force;
            self.grounded = false;
            self.refresh_state(*velocity, params.input_deadzone);
            return true;
        }

        false
    }

    /// Horizontal dash along the input direction (or facing). Returns whether it fired.
    pub fn dash(&mut self, params: &MotionTunables, velocity: &mut Vec2) -> bool {
        if self.dash_cooldown_timer > 0.0 {
            return false;
        }
        if !self.grounded && self.air_dash_used {
            return false;
        }

        let direction = axis_side(self.move_input, params.input_deadzone).map_or(self.facing, Side::sign);
        *velocity = Vec2::new(direction, 0.0) * params.dash_speed * self.speed_multiplier;

        self.release_wall(params, self.last_cling_y);
        self.dashing = true;
        self.dash_timer = params.dash_duration;
        self.dash_cooldown_timer = params.dash_cooldown;
        if !self.grounded {
            self.air_dash_used = true;
        }

        self.refresh_state(*velocity, params.input_deadzone);
        true
    }

    /// Dash-reset pickup: cooldown gone, air dash restored.
    pub fn reset_dash(&mut self) {
        self.dash_cooldown_timer = 0.0;
        self.air_dash_used = false;
    }

    /// Clear transient state after a respawn. Multipliers and facing survive.
    pub fn reset_for_respawn(&mut self) {
        *self = Self {
            move_input: self.move_input,
            facing: self.facing,
            speed_multiplier: self.speed_multiplier,
            missing_probe_logged: self.missing_probe_logged,
            ..Self::default()
        };
    }

    // ------------------------------------------------------------------
    // Readouts
    // ------------------------------------------------------------------

    #[inline]
    pub fn state(&self) -> PlayerState {
        self.state
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    #[inline]
    pub fn is_dashing(&self) -> bool {
        self.dashing
    }

    #[inline]
    pub fn is_wall_clinging(&self) -> bool {
        self.grip.is_some()
    }

    #[inline]
    pub fn air_dash_used(&self) -> bool {
        self.air_dash_used
    }

    #[inline]
    pub fn dash_timer(&self) -> f32 {
        self.dash_timer
    }

    #[inline]
    pub fn dash_cooldown_remaining(&self) -> f32 {
        self.dash_cooldown_timer
    }

    /// 1.0 when a dash is available, rising from 0.0 while cooling down.
    pub fn dash_cooldown_fraction(&self, params: &MotionTunables) -> f32 {
        if self.dash_cooldown_timer <= 0.0 || params.dash_cooldown <= 0.0 {
            return 1.0;
        }
        1.0 - self.dash_cooldown_timer / params.dash_cooldown
    }

    /// -1 (left), 0 (none) or 1 (right).
    #[inline]
    pub fn wall_direction(&self) -> i8 {
        match self.grip {
            Some(WallGrip { side: Side::Left, .. }) => -1,
            Some(WallGrip { side: Side::Right, .. }) => 1,
            None => 0,
        }
    }

    #[inline]
    pub fn current_wall(&self) -> Option<Entity> {
        self.grip.map(|g| g.wall)
    }

    #[inline]
    pub fn climb_distance(&self) -> f32 {
        self.climb_distance
    }

    #[inline]
    pub fn attach_y(&self) -> f32 {
        self.attach_y
    }

    #[inline]
    pub fn current_slide_speed(&self) -> f32 {
        self.current_slide_speed
    }

    #[inline]
    pub fn locked_wall(&self) -> Option<Entity> {
        self.locked_wall
    }

    #[inline]
    pub fn wall_lock_remaining(&self) -> f32 {
        self.wall_lock_timer
    }

    #[inline]
    pub fn facing(&self) -> f32 {
        self.facing
    }

    #[inline]
    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    #[inline]
    pub fn move_input(&self) -> f32 {
        self.move_input
    }
}

#[inline]
fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}
