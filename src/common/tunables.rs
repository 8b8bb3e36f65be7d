//! Tunable gameplay constants.
//!
//! Everything the session needs to configure lives in one `Tunables` resource. The
//! defaults reproduce the shipped tuning; a JSON document may override any subset of
//! fields (`#[serde(default)]` everywhere) and is validated once on load.

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::plugins::world::rules::WorldRules;
use crate::plugins::world::state::WorldKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed tunables document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("slide_speed_max ({max}) is below slide_speed_start ({start})")]
    SlideRange { start: f32, max: f32 },
}

#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Tunables {
    /// Avian length unit (world units per metre).
    pub length_unit: f32,
    pub gravity: f32,
    pub starting_world: WorldKind,
    /// Player collider size (width, height).
    pub player_size: [f32; 2],
    pub motion: MotionTunables,
    pub respawn: RespawnTunables,
    pub worlds: WorldRules,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            length_unit: 1.0,
            gravity: 9.81,
            starting_world: WorldKind::A,
            player_size: [0.8, 1.0],
            motion: MotionTunables::default(),
            respawn: RespawnTunables::default(),
            worlds: WorldRules::default(),
        }
    }
}

/// Player locomotion constants.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MotionTunables {
    pub move_speed: f32,
    pub jump_force: f32,

    pub dash_speed: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,

    pub ground_check_radius: f32,

    pub max_climb_distance: f32,
    pub climb_speed_start: f32,
    pub slide_speed_start: f32,
    pub slide_speed_max: f32,
    /// Climb distance within this of the cap snaps to the cap.
    pub climb_distance_epsilon: f32,
    pub wall_check_distance: f32,
    pub wall_check_height: f32,
    pub wall_jump_horizontal_speed: f32,
    pub wall_jump_vertical_multiplier: f32,
    pub wall_lock_duration: f32,

    /// Axis values with magnitude below this count as "no input".
    pub input_deadzone: f32,
}

impl Default for MotionTunables {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            jump_force: 10.0,
            dash_speed: 15.0,
            dash_duration: 0.2,
            dash_cooldown: 1.5,
            ground_check_radius: 0.2,
            max_climb_distance: 3.5,
            climb_speed_start: 4.5,
            slide_speed_start: 1.0,
            slide_speed_max: 2.5,
            climb_distance_epsilon: 0.05,
            wall_check_distance: 0.1,
            wall_check_height: 1.0,
            wall_jump_horizontal_speed: 4.0,
            wall_jump_vertical_multiplier: 1.4,
            wall_lock_duration: 1.0,
            input_deadzone: 0.1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RespawnTunables {
    pub default_spawn: [f32; 2],
    pub respawn_delay: f32,
    /// Used only when `out_of_bounds` is `None`.
    pub fall_out_min_y: f32,
    pub out_of_bounds: Option<BoundsTunables>,
}

impl Default for RespawnTunables {
    fn default() -> Self {
        Self {
            default_spawn: [0.0, 0.0],
            respawn_delay: 0.5,
            fall_out_min_y: -20.0,
            out_of_bounds: Some(BoundsTunables { center: [0.0, 0.0], size: [200.0, 200.0] }),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BoundsTunables {
    pub center: [f32; 2],
    pub size: [f32; 2],
}

impl BoundsTunables {
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(Vec2::from(self.center), Vec2::from(self.size))
    }
}

impl Tunables {
    /// Parse a (possibly partial) JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tunables: Self = serde_json::from_str(json)?;
        tunables.validate()?;
        Ok(tunables)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.motion;
        positive("length_unit", self.length_unit)?;
        positive("player_size.x", self.player_size[0])?;
        positive("player_size.y", self.player_size[1])?;
        positive("move_speed", m.move_speed)?;
        positive("jump_force", m.jump_force)?;
        positive("dash_speed", m.dash_speed)?;
        positive("dash_duration", m.dash_duration)?;
        non_negative("dash_cooldown", m.dash_cooldown)?;
        positive("ground_check_radius", m.ground_check_radius)?;
        positive("max_climb_distance", m.max_climb_distance)?;
        non_negative("climb_speed_start", m.climb_speed_start)?;
        non_negative("slide_speed_start", m.slide_speed_start)?;
        non_negative("climb_distance_epsilon", m.climb_distance_epsilon)?;
        non_negative("wall_check_distance", m.wall_check_distance)?;
        non_negative("wall_check_height", m.wall_check_height)?;
        non_negative("wall_lock_duration", m.wall_lock_duration)?;
        non_negative("input_deadzone", m.input_deadzone)?;
        non_negative("respawn_delay", self.respawn.respawn_delay)?;
        if m.slide_speed_max < m.slide_speed_start {
            return Err(ConfigError::SlideRange { start: m.slide_speed_start, max: m.slide_speed_max });
        }
        if let Some(bounds) = &self.respawn.out_of_bounds {
            positive("out_of_bounds.size.x", bounds.size[0])?;
            positive("out_of_bounds.size.y", bounds.size[1])?;
        }
        self.worlds.validate()
    }
}

pub(crate) fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

pub(crate) fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(Tunables::default().validate().is_ok());
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let t = Tunables::from_json_str(r#"{ "starting_world": "B", "motion": { "jump_force": 12.0 } }"#)
            .expect("valid document");
        assert_eq!(t.starting_world, WorldKind::B);
        assert_eq!(t.motion.jump_force, 12.0);
        assert_eq!(t.motion.move_speed, 5.0);
        assert_eq!(t.respawn.respawn_delay, 0.5);
    }

    #[test]
    fn null_bounds_falls_back_to_min_y() {
        let t = Tunables::from_json_str(r#"{ "respawn": { "out_of_bounds": null, "fall_out_min_y": -5.0 } }"#)
            .expect("valid document");
        assert!(t.respawn.out_of_bounds.is_none());
        assert_eq!(t.respawn.fall_out_min_y, -5.0);
    }

    #[test]
    fn rejects_bad_values() {
        let err = Tunables::from_json_str(r#"{ "motion": { "max_climb_distance": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NotPositive { field: "max_climb_distance", .. }));

        let err = Tunables::from_json_str(r#"{ "motion": { "slide_speed_start": 3.0, "slide_speed_max": 2.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::SlideRange { .. }));

        let err = Tunables::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
