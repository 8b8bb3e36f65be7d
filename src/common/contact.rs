//! Player contact classification for avian collision messages.
//!
//! Hazards, pickups, checkpoints and zones all react to "the player touched me".
//! Avian reports contacts as unordered collider pairs, so every consumer needs the same
//! "which side is the player?" split. It lives here once.
//!
//! Gameplay components (`Hazard`, `Pickup`, ...) sit on the sensor collider itself, so
//! consumers look them up by `CollisionTarget::collider`.

use avian2d::prelude::*;
use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionTarget {
    pub collider: Entity,
    pub body: Option<Entity>,
}

impl CollisionTarget {
    #[inline]
    fn is(self, pred: &impl Fn(Entity) -> bool) -> bool {
        pred(self.collider) || self.body.is_some_and(pred)
    }
}

/// A contact message carrying a collider pair.
pub trait ContactPair {
    fn targets(&self) -> (CollisionTarget, CollisionTarget);
}

impl ContactPair for CollisionStart {
    #[inline]
    fn targets(&self) -> (CollisionTarget, CollisionTarget) {
        (
            CollisionTarget { collider: self.collider1, body: self.body1 },
            CollisionTarget { collider: self.collider2, body: self.body2 },
        )
    }
}

impl ContactPair for CollisionEnd {
    #[inline]
    fn targets(&self) -> (CollisionTarget, CollisionTarget) {
        (
            CollisionTarget { collider: self.collider1, body: self.body1 },
            CollisionTarget { collider: self.collider2, body: self.body2 },
        )
    }
}

/// Split a contact into `(player, other)` when exactly one side is the player.
pub fn split_player_contact<P: ContactPair>(
    ev: &P,
    is_player: impl Fn(Entity) -> bool,
) -> Option<(CollisionTarget, CollisionTarget)> {
    let (t1, t2) = ev.targets();
    match (t1.is(&is_player), t2.is(&is_player)) {
        (true, false) => Some((t1, t2)),
        (false, true) => Some((t2, t1)),
        _ => None,
    }
}
