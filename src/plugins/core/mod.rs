//! Core plugin: shared resources.
//!
//! `Tunables` may be inserted before the plugins run (e.g. loaded from disk); every other
//! session resource is derived from it here.

use bevy::prelude::*;

use crate::common::despawn;
use crate::common::tunables::Tunables;
use crate::plugins::respawn::RespawnController;
use crate::plugins::session::GameState;
use crate::plugins::world::state::WorldState;

pub fn plugin(app: &mut App) {
    app.init_resource::<Tunables>();
    let tunables = app.world().resource::<Tunables>().clone();

    app.insert_resource(WorldState::new(tunables.starting_world))
        .insert_resource(RespawnController::from_tunables(&tunables))
        .init_resource::<GameState>();

    despawn::plugin(app);
}

#[cfg(test)]
mod tests;
