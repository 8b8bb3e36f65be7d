//! Active-world bookkeeping and the world-switch notification.
//!
//! `WorldState` is plain data. The free functions [`switch_world`] and [`force_switch`]
//! mutate it and then `World::trigger` a [`WorldSwitched`] event, so every observer runs
//! (and sees the new world) before the call returns. Systems that only hold `Commands`
//! go through [`WorldCommandsExt`], which queues the same call.

use bevy::prelude::*;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum WorldKind {
    #[default]
    A,
    B,
}

impl WorldKind {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Fired once per effective world change, never for a no-op.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldSwitched {
    pub previous: WorldKind,
    pub current: WorldKind,
}

#[derive(Resource, Debug, Clone)]
pub struct WorldState {
    current: WorldKind,
    switch_locked: bool,
}

impl WorldState {
    pub fn new(starting: WorldKind) -> Self {
        Self { current: starting, switch_locked: false }
    }

    #[inline]
    pub fn current(&self) -> WorldKind {
        self.current
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.switch_locked
    }

    pub fn set_lock(&mut self, locked: bool) {
        self.switch_locked = locked;
    }

    /// Toggle unless locked. Returns the change to publish, if any.
    pub fn toggle(&mut self) -> Option<WorldSwitched> {
        if self.switch_locked {
            return None;
        }
        self.set(self.current.other())
    }

    /// Set the world regardless of the lock. Returns the change to publish, if any.
    pub fn set(&mut self, world: WorldKind) -> Option<WorldSwitched> {
        if self.current == world {
            return None;
        }
        let previous = self.current;
        self.current = world;
        Some(WorldSwitched { previous, current: world })
    }
}

/// Toggle the active world unless switching is locked.
///
/// Returns whether the world changed. Observers of [`WorldSwitched`] have already run
/// when this returns.
pub fn switch_world(world: &mut World) -> bool {
    let change = {
        let Some(mut state) = world.get_resource_mut::<WorldState>() else {
            warn!("switch_world called without a WorldState resource");
            return false;
        };
        if state.is_locked() {
            debug!("world switch refused: switching is locked");
        }
        state.toggle()
    };
    publish(world, change)
}

/// Set the active world, bypassing the lock.
pub fn force_switch(world: &mut World, target: WorldKind) -> bool {
    let change = {
        let Some(mut state) = world.get_resource_mut::<WorldState>() else {
            warn!("force_switch called without a WorldState resource");
            return false;
        };
        state.set(target)
    };
    publish(world, change)
}

fn publish(world: &mut World, change: Option<WorldSwitched>) -> bool {
    let Some(switched) = change else {
        return false;
    };
    info!("world switched: {:?} -> {:?}", switched.previous, switched.current);
    world.trigger(switched);
    true
}

/// Deferred world switching for systems that only hold `Commands`.
pub trait WorldCommandsExt {
    fn switch_world(&mut self);
    fn force_switch(&mut self, target: WorldKind);
}

impl WorldCommandsExt for Commands<'_, '_> {
    fn switch_world(&mut self) {
        self.queue(|world: &mut World| {
            switch_world(world);
        });
    }

    fn force_switch(&mut self, target: WorldKind) {
        self.queue(move |world: &mut World| {
            force_switch(world, target);
        });
    }
}
