//! Level description document.
//!
//! A level is a list of rooms; each room has an origin and a flat list of objects
//! tagged by `type` + `kind` strings. Parsing is plain serde; [`LevelObject::classify`]
//! turns the string tags into a typed [`ObjectSpec`], which is what the spawner
//! consumes.
//!
//! Object positions and moving-platform paths are room-local.

pub mod spawn;

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::plugins::hazards::HazardKind;
use crate::plugins::pickups::PickupKind;
use crate::plugins::world::membership::Belonging;
use crate::plugins::world::phase::{PhaseMotion, PhaseMotionError};

/// Key id granted by `MirrorRuneKey` and required by `KeyDoor_MirrorRune`.
pub const MIRROR_RUNE: &str = "MirrorRune";

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("malformed level document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown object type `{0}`")]
    UnknownType(String),
    #[error("unknown {ty} kind `{kind}`")]
    UnknownKind { ty: String, kind: String },
    #[error("moving platform `{kind}`: {source}")]
    Motion {
        kind: String,
        #[source]
        source: PhaseMotionError,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LevelData {
    pub meta: LevelMeta,
    pub rooms: Vec<Room>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LevelMeta {
    pub name: String,
    pub version: u32,
    #[serde(rename = "roomSize")]
    pub room_size: Option<Size2>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Room {
    pub id: String,
    pub origin: Point,
    pub size: Option<Size2>,
    pub theme: Option<String>,
    pub objects: Vec<LevelObject>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Vec2::new(p.x, p.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Size2 {
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct WorldPhase {
    #[serde(rename = "A", default)]
    pub a: f32,
    #[serde(rename = "B", default)]
    pub b: f32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LevelObject {
    #[serde(rename = "type")]
    pub ty: String,
    pub kind: String,
    pub pos: Point,
    pub size: Option<Size2>,
    pub note: Option<String>,
    pub path: Vec<Point>,
    pub speed: f32,
    #[serde(rename = "worldPhase")]
    pub world_phase: WorldPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneKind {
    WorldLock,
    /// Decoration only; nothing to spawn.
    WallMarker,
    /// Solid in world B, passable in world A.
    OneWayDropBtoA,
}

#[derive(Debug, Clone)]
pub enum ObjectSpec {
    Platform { belonging: Belonging },
    Hazard { kind: HazardKind, belonging: Belonging },
    Checkpoint,
    Pickup(PickupKind),
    Door { required_key: String },
    Zone(ZoneKind),
    MovingPlatform(PhaseMotion),
}

impl LevelData {
    pub fn from_json_str(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn object_count(&self) -> usize {
        self.rooms.iter().map(|r| r.objects.len()).sum()
    }
}

impl LevelObject {
    /// Absolute position given the room's origin.
    #[inline]
    pub fn world_position(&self, room_origin: Vec2) -> Vec2 {
        room_origin + Vec2::from(self.pos)
    }

    /// Collider size; missing or non-positive sizes fall back to a unit square.
    pub fn extent(&self) -> Vec2 {
        match self.size {
            Some(Size2 { w, h }) if w > 0.0 && h > 0.0 => Vec2::new(w, h),
            _ => Vec2::ONE,
        }
    }

    pub fn classify(&self) -> Result<ObjectSpec, LevelError> {
        let unknown_kind = || LevelError::UnknownKind { ty: self.ty.clone(), kind: self.kind.clone() };

        let spec = match self.ty.as_str() {
            "Platform" => ObjectSpec::Platform {
                belonging: match self.kind.as_str() {
                    "A" => Belonging::WorldA,
                    "B" => Belonging::WorldB,
                    "Both" => Belonging::Both,
                    _ => return Err(unknown_kind()),
                },
            },
            "Hazard" => {
                let (kind, belonging) = match self.kind.as_str() {
                    "SpikeBoth" => (HazardKind::Spike, Belonging::Both),
                    "SpikeA" => (HazardKind::Spike, Belonging::WorldA),
                    "SpikeB" => (HazardKind::Spike, Belonging::WorldB),
                    "PitBoth" => (HazardKind::Pit, Belonging::Both),
                    "LaserA" => (HazardKind::Laser, Belonging::WorldA),
                    "LaserB" => (HazardKind::Laser, Belonging::WorldB),
                    "SawA" => (HazardKind::Saw, Belonging::WorldA),
                    "SawB" => (HazardKind::Saw, Belonging::WorldB),
                    "ThornA" => (HazardKind::Thorn, Belonging::WorldA),
                    "ThornB" => (HazardKind::Thorn, Belonging::WorldB),
                    _ => return Err(unknown_kind()),
                };
                ObjectSpec::Hazard { kind, belonging }
            }
            "Checkpoint" => ObjectSpec::Checkpoint,
            "Pickup" => ObjectSpec::Pickup(match self.kind.as_str() {
                "EchoShard" => PickupKind::Score { points: 1 },
                "EchoCrystal_DashReset" => PickupKind::DashReset,
                "MirrorRuneKey" => PickupKind::Key { id: MIRROR_RUNE.into() },
                _ => return Err(unknown_kind()),
            }),
            "Door" => match self.kind.as_str() {
                "KeyDoor_MirrorRune" => ObjectSpec::Door { required_key: MIRROR_RUNE.into() },
                _ => return Err(unknown_kind()),
            },
            "Zone" => ObjectSpec::Zone(match self.kind.as_str() {
                "WorldLock" => ZoneKind::WorldLock,
                "WallMarker" => ZoneKind::WallMarker,
                "OneWayDrop_BtoA" => ZoneKind::OneWayDropBtoA,
                _ => return Err(unknown_kind()),
            }),
            "MovingPlatform" => {
                let path = self.path.iter().copied().map(Vec2::from).collect();
                let motion = PhaseMotion::new(path, self.speed, self.world_phase.a, self.world_phase.b)
                    .map_err(|source| LevelError::Motion { kind: self.kind.clone(), source })?;
                ObjectSpec::MovingPlatform(motion)
            }
            other => return Err(LevelError::UnknownType(other.to_owned())),
        };
        Ok(spec)
    }
}
