//! Test helpers.
//!
//! `World::run_system_once` (via the `RunSystemOnce` trait) runs a single system without
//! building a schedule. Systems that use `Commands` only enqueue structural changes, so we
//! call `world.flush()` afterwards to apply them before assertions.

use std::time::Duration;

use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// Advance `Time<Fixed>` by `dt` seconds, inserting it first if missing.
///
/// Elapsed time accumulates across calls, the way it does across real fixed ticks.
pub fn advance_fixed(world: &mut World, dt: f32) {
    if !world.contains_resource::<Time<Fixed>>() {
        world.insert_resource(Time::<Fixed>::default());
    }
    world
        .resource_mut::<Time<Fixed>>()
        .advance_by(Duration::from_secs_f32(dt));
}
