//! Per-entity world membership.
//!
//! An inactive member keeps all its components; we only swap its collision layers to
//! `CollisionLayers::NONE` and hide it. No archetype moves, and spatial queries stop
//! seeing it because its memberships are empty. Collision and visibility always flip
//! together.

use avian2d::prelude::*;
use bevy::prelude::*;
use serde::Deserialize;

use super::state::{WorldKind, WorldState, WorldSwitched};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Belonging {
    WorldA,
    WorldB,
    #[default]
    Both,
}

impl Belonging {
    #[inline]
    pub fn is_active_in(self, world: WorldKind) -> bool {
        match self {
            Self::Both => true,
            Self::WorldA => world == WorldKind::A,
            Self::WorldB => world == WorldKind::B,
        }
    }
}

#[derive(Component, Debug, Clone)]
#[require(Visibility, CollisionLayers)]
pub struct WorldMember {
    belonging: Belonging,
    active: bool,
    /// Layers restored when the member becomes active.
    solid_layers: CollisionLayers,
}

impl WorldMember {
    pub fn new(belonging: Belonging, solid_layers: CollisionLayers) -> Self {
        Self { belonging, active: true, solid_layers }
    }

    #[inline]
    pub fn belonging(&self) -> Belonging {
        self.belonging
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Recompute `active` for `world`. Returns the new value if it changed.
    pub fn recompute(&mut self, world: WorldKind) -> Option<bool> {
        let active = self.belonging.is_active_in(world);
        if active == self.active {
            return None;
        }
        self.active = active;
        Some(active)
    }

    /// Write the collidable + visible pair for the current `active` value.
    pub fn apply(&self, layers: &mut CollisionLayers, visibility: &mut Visibility) {
        if self.active {
            *layers = self.solid_layers;
            *visibility = Visibility::Inherited;
        } else {
            *layers = CollisionLayers::NONE;
            *visibility = Visibility::Hidden;
        }
    }
}

/// Creation-time recompute. Always writes, since spawn-time layers are arbitrary.
pub fn init_world_members(
    state: Res<WorldState>,
    mut q: Query<(&mut WorldMember, &mut CollisionLayers, &mut Visibility), Added<WorldMember>>,
) {
    let world = state.current();
    for (mut member, mut layers, mut vis) in &mut q {
        member.recompute(world);
        member.apply(&mut layers, &mut vis);
    }
}

/// Observer: recompute every member on a world switch.
pub fn sync_world_members(
    switched: On<WorldSwitched>,
    mut q: Query<(&mut WorldMember, &mut CollisionLayers, &mut Visibility)>,
) {
    let world = switched.event().current;
    for (mut member, mut layers, mut vis) in &mut q {
        if member.recompute(world).is_some() {
            member.apply(&mut layers, &mut vis);
        }
    }
}
