//! Session-wide game state: score, keys and pause.

use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::plugins::player::{gather_input, PlayerInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCollect {
    Added,
    AlreadyHeld,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct GameState {
    score: u32,
    collected_keys: HashSet<String>,
    paused: bool,
}

impl GameState {
    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn collect_key(&mut self, id: &str) -> KeyCollect {
        if self.collected_keys.insert(id.to_owned()) {
            KeyCollect::Added
        } else {
            KeyCollect::AlreadyHeld
        }
    }

    #[inline]
    pub fn has_key(&self, id: &str) -> bool {
        self.collected_keys.contains(id)
    }

    #[inline]
    pub fn key_count(&self) -> usize {
        self.collected_keys.len()
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Flip pause. Returns the new value.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Clear score and keys for a fresh run. Pause is left alone.
    pub fn reset(&mut self) {
        self.score = 0;
        self.collected_keys.clear();
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(Update, (pause_on_input, sync_pause).chain().after(gather_input));
}

pub fn pause_on_input(mut input: ResMut<PlayerInput>, mut state: ResMut<GameState>) {
    if input.take_pause() {
        let paused = state.toggle_pause();
        info!("game {}", if paused { "paused" } else { "resumed" });
    }
}

/// Mirror the pause flag onto virtual time; fixed ticks stop with it.
pub fn sync_pause(state: Res<GameState>, mut time: ResMut<Time<Virtual>>) {
    if state.is_paused() && !time.is_paused() {
        time.pause();
    } else if !state.is_paused() && time.is_paused() {
        time.unpause();
    }
}

#[cfg(test)]
mod tests;
