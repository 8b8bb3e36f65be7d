use avian2d::prelude::*;
use bevy::prelude::*;

use super::{Hazard, HazardKind};
use crate::common::despawn::PendingDespawn;
use crate::common::test_utils::run_system_once;
use crate::common::tunables::Tunables;
use crate::plugins::player::Player;
use crate::plugins::respawn::{DeathReason, PlayerDied, RespawnController};

fn setup() -> (World, Entity) {
    let mut world = World::new();
    world.insert_resource(RespawnController::from_tunables(&Tunables::default()));
    world.init_resource::<Messages<CollisionStart>>();
    world.init_resource::<Messages<PlayerDied>>();
    let player = world.spawn((Player, Position::new(Vec2::new(3.0, -1.0)))).id();
    (world, player)
}

fn touch(world: &mut World, a: Entity, b: Entity) {
    world.write_message(CollisionStart { collider1: a, collider2: b, body1: None, body2: None });
}

fn deaths(world: &mut World) -> Vec<PlayerDied> {
    run_system_once(world, |mut died: MessageReader<PlayerDied>| died.read().copied().collect::<Vec<_>>())
}

#[test]
fn contact_kills_the_player() {
    let (mut world, player) = setup();
    let spike = world.spawn(Hazard::new(HazardKind::Spike)).id();

    touch(&mut world, spike, player);
    run_system_once(&mut world, super::hazard_contacts);

    assert!(world.resource::<RespawnController>().is_respawning());
    assert_eq!(
        deaths(&mut world),
        vec![PlayerDied { reason: DeathReason::Hazard(HazardKind::Spike), position: Vec2::new(3.0, -1.0) }]
    );
    // Permanent hazards stay.
    assert!(world.get::<PendingDespawn>(spike).is_none());
}

#[test]
fn overlapping_hazards_kill_once() {
    let (mut world, player) = setup();
    let saw = world.spawn(Hazard::new(HazardKind::Saw)).id();
    let laser = world.spawn(Hazard::new(HazardKind::Laser)).id();

    touch(&mut world, player, saw);
    touch(&mut world, laser, player);
    run_system_once(&mut world, super::hazard_contacts);

    let died = deaths(&mut world);
    assert_eq!(died.len(), 1);
    assert_eq!(died[0].reason, DeathReason::Hazard(HazardKind::Saw));
}

#[test]
fn consumed_hazard_is_marked_for_despawn() {
    let (mut world, player) = setup();
    let thorn = world.spawn(Hazard::consumed(HazardKind::Thorn)).id();

    touch(&mut world, thorn, player);
    run_system_once(&mut world, super::hazard_contacts);

    let pending = world.get::<PendingDespawn>(thorn).unwrap();
    assert_eq!(pending.remaining(), super::CONSUMED_HAZARD_GRACE);
}

#[test]
fn non_player_contacts_are_ignored() {
    let (mut world, _) = setup();
    let pit = world.spawn(Hazard::new(HazardKind::Pit)).id();
    let rock = world.spawn_empty().id();

    touch(&mut world, pit, rock);
    run_system_once(&mut world, super::hazard_contacts);

    assert!(!world.resource::<RespawnController>().is_respawning());
    assert!(deaths(&mut world).is_empty());
}
