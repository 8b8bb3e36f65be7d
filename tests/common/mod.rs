//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `mirror_shift::game::configure_headless` to install gameplay plugins.
//!
//! Time is stepped manually, one fixed tick per `app.update()`, so tests count ticks
//! instead of racing the wall clock.

#![allow(dead_code)]

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::ecs::message::Message;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use mirror_shift::common::tunables::Tunables;

pub const TICK: Duration = Duration::from_micros(15_625);

pub fn app_headless() -> App {
    app_headless_with(Tunables::default())
}

/// Headless app built around the given tunables.
pub fn app_headless_with(tunables: Tunables) -> App {
    let mut app = App::new();

    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(TICK));
    app.insert_resource(tunables);

    mirror_shift::game::configure_headless(&mut app);
    // `App::run` would do this; avian registers some resources in `Plugin::finish`.
    app.finish();
    app.cleanup();
    app
}

pub fn tick(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update();
    }
}

/// Every message of type `M` seen so far, in order.
#[derive(Resource)]
pub struct Recorded<M: Message>(pub Vec<M>);

pub fn record<M: Message + Clone>(app: &mut App) {
    app.insert_resource(Recorded::<M>(Vec::new()));
    app.add_systems(Last, |mut reader: MessageReader<M>, mut out: ResMut<Recorded<M>>| {
        out.0.extend(reader.read().cloned());
    });
}

pub fn recorded<M: Message + Clone>(app: &App) -> Vec<M> {
    app.world().resource::<Recorded<M>>().0.clone()
}

pub fn player(app: &mut App) -> Entity {
    app.world_mut()
        .query_filtered::<Entity, With<mirror_shift::plugins::player::Player>>()
        .single(app.world())
        .expect("exactly one player")
}
