mod common;

use avian2d::prelude::*;
use bevy::prelude::*;
use mirror_shift::level::spawn::LevelSource;
use mirror_shift::level::{LevelData, MIRROR_RUNE};
use mirror_shift::plugins::pickups::{DoorOpened, KeyDoor, Pickup};
use mirror_shift::plugins::session::GameState;

/// Key and a shard overlap the spawn point; the door is further right.
const KEY_ROOM: &str = r#"{ "rooms": [{ "objects": [
    { "type": "Platform", "kind": "Both", "pos": { "x": 0, "y": -1 }, "size": { "w": 20, "h": 1 } },
    { "type": "Pickup", "kind": "MirrorRuneKey", "pos": { "x": 0, "y": 0 }, "size": { "w": 0.5, "h": 0.5 } },
    { "type": "Pickup", "kind": "EchoShard", "pos": { "x": 0, "y": 0.2 }, "size": { "w": 0.5, "h": 0.5 } },
    { "type": "Door", "kind": "KeyDoor_MirrorRune", "pos": { "x": 4, "y": 1 }, "size": { "w": 1, "h": 3 } }
] }] }"#;

#[test]
fn collecting_the_key_opens_the_door() {
    let mut app = common::app_headless();
    app.insert_resource(LevelSource(LevelData::from_json_str(KEY_ROOM).expect("test level parses")));
    common::record::<DoorOpened>(&mut app);
    common::tick(&mut app, 10);

    let game = app.world().resource::<GameState>();
    assert!(game.has_key(MIRROR_RUNE));
    assert_eq!(game.score(), 1);

    let pickups_left = app.world_mut().query::<&Pickup>().iter(app.world()).count();
    assert_eq!(pickups_left, 0, "one-shot pickups are despawned");

    let (door, layers) = app
        .world_mut()
        .query::<(&KeyDoor, &CollisionLayers)>()
        .single(app.world())
        .map(|(d, l)| (d.clone(), *l))
        .expect("one door");
    assert!(door.is_open());
    assert_eq!(layers, CollisionLayers::NONE);
    assert_eq!(common::recorded::<DoorOpened>(&app).len(), 1);
}
