use bevy::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::core;
use crate::plugins::respawn::RespawnController;
use crate::plugins::session::GameState;
use crate::plugins::world::state::{WorldKind, WorldState};

#[test]
fn inserts_resources() {
    let mut app = App::new();
    core::plugin(&mut app);
    assert!(app.world().get_resource::<Tunables>().is_some());
    assert!(app.world().get_resource::<GameState>().is_some());
    assert_eq!(app.world().resource::<WorldState>().current(), WorldKind::A);
    assert!(!app.world().resource::<RespawnController>().is_respawning());
}

#[test]
fn keeps_preloaded_tunables() {
    let mut app = App::new();
    let mut tunables = Tunables::default();
    tunables.starting_world = WorldKind::B;
    tunables.respawn.default_spawn = [3.0, 4.0];
    app.insert_resource(tunables);

    core::plugin(&mut app);

    assert_eq!(app.world().resource::<WorldState>().current(), WorldKind::B);
    assert_eq!(app.world().resource::<RespawnController>().default_spawn(), Vec2::new(3.0, 4.0));
}
