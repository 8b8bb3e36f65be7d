use bevy::prelude::*;

use super::{pause_on_input, sync_pause, GameState, KeyCollect};
use crate::plugins::player::PlayerInput;
use crate::common::test_utils::run_system_once;

#[test]
fn keys_are_idempotent() {
    let mut s = GameState::default();
    assert_eq!(s.collect_key("MirrorRune"), KeyCollect::Added);
    assert_eq!(s.collect_key("MirrorRune"), KeyCollect::AlreadyHeld);
    assert_eq!(s.key_count(), 1);
    assert!(s.has_key("MirrorRune"));
    assert!(!s.has_key("SunRune"));
}

#[test]
fn reset_clears_score_and_keys() {
    let mut s = GameState::default();
    s.add_score(3);
    s.collect_key("MirrorRune");
    s.toggle_pause();

    s.reset();
    assert_eq!(s.score(), 0);
    assert_eq!(s.key_count(), 0);
    assert!(s.is_paused());
}

#[test]
fn score_saturates() {
    let mut s = GameState::default();
    s.add_score(u32::MAX);
    s.add_score(5);
    assert_eq!(s.score(), u32::MAX);
}

#[test]
fn pause_input_freezes_virtual_time() {
    let mut world = World::new();
    world.init_resource::<GameState>();
    world.insert_resource(PlayerInput { pause: true, ..default() });
    world.insert_resource(Time::<Virtual>::default());

    run_system_once(&mut world, pause_on_input);
    run_system_once(&mut world, sync_pause);
    assert!(world.resource::<GameState>().is_paused());
    assert!(world.resource::<Time<Virtual>>().is_paused());

    world.resource_mut::<PlayerInput>().pause = true;
    run_system_once(&mut world, pause_on_input);
    run_system_once(&mut world, sync_pause);
    assert!(!world.resource::<Time<Virtual>>().is_paused());
}
