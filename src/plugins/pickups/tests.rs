use avian2d::prelude::*;
use bevy::prelude::*;

use super::{apply_pickup, DoorOpened, KeyDoor, Pickup, PickupCollected, PickupEffect, PickupKind};
use crate::common::despawn::PendingDespawn;
use crate::common::layers::ground_layers;
use crate::common::test_utils::run_system_once;
use crate::common::tunables::MotionTunables;
use crate::plugins::player::motion::PlayerMotion;
use crate::plugins::player::Player;
use crate::plugins::session::{GameState, KeyCollect};

fn rune() -> PickupKind {
    PickupKind::Key { id: "MirrorRune".into() }
}

fn pickup_world() -> (World, Entity) {
    let mut world = World::new();
    world.init_resource::<GameState>();
    world.init_resource::<Messages<CollisionStart>>();
    world.init_resource::<Messages<PickupCollected>>();
    world.init_resource::<Messages<DoorOpened>>();
    let player = world.spawn((Player, PlayerMotion::default())).id();
    (world, player)
}

fn touch(world: &mut World, a: Entity, b: Entity) {
    world.resource_mut::<Messages<CollisionStart>>().clear();
    world.write_message(CollisionStart { collider1: a, collider2: b, body1: None, body2: None });
    run_system_once(world, super::collect_pickups);
}

fn spawn_pickup(world: &mut World, pickup: Pickup) -> Entity {
    world.spawn((pickup, CollisionLayers::default(), Visibility::Inherited)).id()
}

#[test]
fn score_pickup_adds_points() {
    let mut game = GameState::default();
    assert_eq!(
        apply_pickup(&PickupKind::Score { points: 1 }, &mut game, None),
        PickupEffect::Scored { total: 1 }
    );
    assert_eq!(
        apply_pickup(&PickupKind::Score { points: 4 }, &mut game, None),
        PickupEffect::Scored { total: 5 }
    );
}

#[test]
fn dash_reset_clears_cooldown_and_air_dash() {
    let params = MotionTunables::default();
    let mut game = GameState::default();
    let mut motion = PlayerMotion::default();
    let mut v = Vec2::ZERO;
    assert!(motion.dash(&params, &mut v));
    assert!(motion.air_dash_used());

    let effect = apply_pickup(&PickupKind::DashReset, &mut game, Some(&mut motion));
    assert_eq!(effect, PickupEffect::DashReset);
    assert_eq!(motion.dash_cooldown_remaining(), 0.0);
    assert!(!motion.air_dash_used());
    // Still mid-dash: the reset does not cut it short.
    assert!(motion.is_dashing());

    assert_eq!(apply_pickup(&PickupKind::DashReset, &mut game, None), PickupEffect::NoEffect);
}

#[test]
fn duplicate_key_is_harmless() {
    let mut game = GameState::default();
    assert_eq!(apply_pickup(&rune(), &mut game, None), PickupEffect::Key(KeyCollect::Added));
    assert_eq!(apply_pickup(&rune(), &mut game, None), PickupEffect::Key(KeyCollect::AlreadyHeld));
    assert_eq!(game.key_count(), 1);
}

#[test]
fn pickup_fires_once_and_despawns() {
    let (mut world, player) = pickup_world();
    let shard = spawn_pickup(&mut world, Pickup::new(PickupKind::Score { points: 1 }));

    touch(&mut world, shard, player);
    touch(&mut world, player, shard);

    assert_eq!(world.resource::<GameState>().score(), 1);
    assert!(world.get::<Pickup>(shard).unwrap().is_collected());
    assert_eq!(world.get::<PendingDespawn>(shard), Some(&PendingDespawn::now()));

    let messages = run_system_once(&mut world, |mut r: MessageReader<PickupCollected>| {
        r.read().cloned().collect::<Vec<_>>()
    });
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].pickup, shard);
}

#[test]
fn persistent_pickup_hides_and_stops_colliding() {
    let (mut world, player) = pickup_world();
    let crystal = spawn_pickup(&mut world, Pickup::persistent(PickupKind::DashReset));
    {
        let mut motion = world.get_mut::<PlayerMotion>(player).unwrap();
        let mut v = Vec2::ZERO;
        assert!(motion.dash(&MotionTunables::default(), &mut v));
    }

    touch(&mut world, player, crystal);

    assert!(world.get::<PendingDespawn>(crystal).is_none());
    assert_eq!(*world.get::<CollisionLayers>(crystal).unwrap(), CollisionLayers::NONE);
    assert_eq!(*world.get::<Visibility>(crystal).unwrap(), Visibility::Hidden);
    assert_eq!(world.get::<PlayerMotion>(player).unwrap().dash_cooldown_remaining(), 0.0);
}

#[test]
fn door_opens_once_key_is_held() {
    let (mut world, player) = pickup_world();
    let door = world.spawn((KeyDoor::new("MirrorRune"), ground_layers())).id();
    let key = spawn_pickup(&mut world, Pickup::new(rune()));

    run_system_once(&mut world, super::open_key_doors);
    assert!(!world.get::<KeyDoor>(door).unwrap().is_open());
    assert_eq!(*world.get::<CollisionLayers>(door).unwrap(), ground_layers());

    touch(&mut world, key, player);
    run_system_once(&mut world, super::open_key_doors);
    assert!(world.get::<KeyDoor>(door).unwrap().is_open());
    assert_eq!(*world.get::<CollisionLayers>(door).unwrap(), CollisionLayers::NONE);

    // A second key and more polls change nothing.
    let again = spawn_pickup(&mut world, Pickup::new(rune()));
    touch(&mut world, again, player);
    run_system_once(&mut world, super::open_key_doors);
    assert_eq!(world.resource::<GameState>().key_count(), 1);

    let opened = run_system_once(&mut world, |mut r: MessageReader<DoorOpened>| r.read().count());
    assert_eq!(opened, 1);
}

#[test]
fn door_ignores_other_keys() {
    let (mut world, _) = pickup_world();
    let door = world.spawn((KeyDoor::new("MirrorRune"), ground_layers())).id();
    world.resource_mut::<GameState>().collect_key("SunRune");

    run_system_once(&mut world, super::open_key_doors);
    assert!(!world.get::<KeyDoor>(door).unwrap().is_open());
}
