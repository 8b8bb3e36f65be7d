//! Deferred despawning.
//!
//! We never despawn physics entities inside the fixed step. Gameplay code marks them
//! with `PendingDespawn`, the grace countdown runs on fixed time, and the despawn
//! itself happens in PostUpdate.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PendingDespawn {
    remaining: f32,
}

impl PendingDespawn {
    /// Despawn at the next PostUpdate.
    pub fn now() -> Self {
        Self { remaining: 0.0 }
    }

    pub fn after(seconds: f32) -> Self {
        Self { remaining: seconds.max(0.0) }
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    #[inline]
    pub fn is_due(&self) -> bool {
        self.remaining <= 0.0
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(FixedUpdate, tick_pending_despawns)
        .add_systems(PostUpdate, despawn_due);
}

pub fn tick_pending_despawns(time: Res<Time<Fixed>>, mut q: Query<&mut PendingDespawn>) {
    let dt = time.delta_secs();
    for mut pending in &mut q {
        if !pending.is_due() {
            pending.remaining = (pending.remaining - dt).max(0.0);
        }
    }
}

pub fn despawn_due(mut commands: Commands, q: Query<(Entity, &PendingDespawn)>) {
    for (e, pending) in &q {
        if pending.is_due() {
            commands.entity(e).despawn();
        }
    }
}
