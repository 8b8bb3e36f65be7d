//! Per-world physics rules.

use serde::Deserialize;

use super::state::WorldKind;
use crate::common::tunables::{positive, ConfigError};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorldRule {
    pub name: String,
    /// Multiplies global gravity for the player.
    pub gravity_multiplier: f32,
    /// Multiplies run and dash speed.
    pub speed_multiplier: f32,
}

impl Default for WorldRule {
    fn default() -> Self {
        Self { name: String::new(), gravity_multiplier: 1.0, speed_multiplier: 1.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorldRules {
    pub a: WorldRule,
    pub b: WorldRule,
}

impl Default for WorldRules {
    fn default() -> Self {
        Self {
            a: WorldRule { name: "Reality".into(), gravity_multiplier: 1.0, speed_multiplier: 1.0 },
            b: WorldRule { name: "Mirror".into(), gravity_multiplier: 0.6, speed_multiplier: 1.2 },
        }
    }
}

impl WorldRules {
    #[inline]
    pub fn for_world(&self, world: WorldKind) -> &WorldRule {
        match world {
            WorldKind::A => &self.a,
            WorldKind::B => &self.b,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("worlds.a.speed_multiplier", self.a.speed_multiplier)?;
        positive("worlds.b.speed_multiplier", self.b.speed_multiplier)?;
        positive("worlds.a.gravity_multiplier", self.a.gravity_multiplier)?;
        positive("worlds.b.gravity_multiplier", self.b.gravity_multiplier)
    }
}
