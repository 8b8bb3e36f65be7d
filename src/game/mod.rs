//! Game composition root.
//!
//! Provides two public configuration functions:
//! - `configure_full`: includes DefaultPlugins (window/render) + game plugins.
//! - `configure_headless`: minimal configuration for integration tests.

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use bevy::window::WindowResolution;

use crate::common::state::AppState;
use crate::common::tunables::Tunables;
use crate::level::spawn::LevelSource;
use crate::level::LevelData;
use crate::plugins;

const TUNABLES_PATH: &str = "assets/tunables.json";
const LEVEL_PATH: &str = "assets/level.json";

pub fn run() {
    App::new().add_plugins(configure_full).run();
}

/// Full configuration for `cargo run`.
pub fn configure_full(app: &mut App) {
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Mirror Shift".into(),
            resolution: WindowResolution::new(1280, 720),
            ..default()
        }),
        ..default()
    }));

    load_documents(app, Path::new(TUNABLES_PATH), Path::new(LEVEL_PATH));
    configure_game(app);
    plugins::register_render(app);
}

/// Headless configuration for integration tests.
///
/// Notes:
/// - Do NOT add DefaultPlugins.
/// - Do NOT add render-only plugins (camera).
pub fn configure_headless(app: &mut App) {
    configure_game(app);
}

/// Configuration shared by both full and headless apps.
fn configure_game(app: &mut App) {
    app.init_state::<AppState>();
    plugins::register_gameplay(app);
}

/// Insert `Tunables` and `LevelSource` from disk when present.
///
/// Must run before `configure_game`, which derives the session resources from
/// `Tunables`. Missing files are not an error; malformed ones fall back to the defaults
/// (or no level) with a warning.
pub fn load_documents(app: &mut App, tunables: &Path, level: &Path) {
    if let Ok(text) = fs::read_to_string(tunables) {
        match Tunables::from_json_str(&text) {
            Ok(t) => {
                info!("tunables loaded from {}", tunables.display());
                app.insert_resource(t);
            }
            Err(err) => warn!("ignoring {}: {err}", tunables.display()),
        }
    }

    if let Ok(text) = fs::read_to_string(level) {
        match LevelData::from_json_str(&text) {
            Ok(data) => {
                app.insert_resource(LevelSource(data));
            }
            Err(err) => warn!("ignoring {}: {err}", level.display()),
        }
    }
}
