mod common;

use avian2d::prelude::*;
use bevy::prelude::*;
use mirror_shift::common::state::AppState;
use mirror_shift::plugins::player::Player;
use mirror_shift::plugins::world::state::{WorldKind, WorldState};

#[test]
fn boots_and_ticks() {
    let mut app = common::app_headless();
    common::tick(&mut app, 3);
    assert_eq!(*app.world().resource::<State<AppState>>().get(), AppState::InGame);
    assert_eq!(app.world().resource::<WorldState>().current(), WorldKind::A);
}

#[test]
fn player_interpolation_pipeline_is_wired() {
    let mut app = common::app_headless();
    common::tick(&mut app, 5);

    let ok = app
        .world_mut()
        .query::<(&Player, &TranslationInterpolation)>()
        .iter(app.world())
        .next()
        .is_some();

    assert!(ok, "Player should opt in to smoothing via TranslationInterpolation");
}

#[test]
fn player_falls_without_ground() {
    let mut app = common::app_headless();
    common::tick(&mut app, 2);
    let player = common::player(&mut app);
    let start = app.world().get::<Position>(player).unwrap().0;

    common::tick(&mut app, 30);

    let now = app.world().get::<Position>(player).unwrap().0;
    assert!(now.y < start.y, "expected a fall, {start} -> {now}");
}
