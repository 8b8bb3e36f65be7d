//! Phase-shifted path motion for moving platforms.
//!
//! Position is a pure function of (elapsed time, active world, path). Nothing is
//! integrated, so a platform can never drift, and a world switch snaps it to where the
//! other world's phase says it is right now.

use avian2d::prelude::*;
use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use super::state::{WorldKind, WorldState};

#[derive(Debug, Error, PartialEq)]
pub enum PhaseMotionError {
    #[error("platform speed must be positive, got {0}")]
    NonPositiveSpeed(f32),
    #[error("phase offset must lie in [0, 1], got {0}")]
    PhaseOutOfRange(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PathMode {
    /// Wrap back to the first point.
    #[default]
    Loop,
    /// Run to the end and back within one cycle.
    PingPong,
    /// Run once and park on the last point.
    Once,
}

#[derive(Component, Debug, Clone)]
#[require(PhaseClock)]
pub struct PhaseMotion {
    path: Vec<Vec2>,
    speed: f32,
    phase_a: f32,
    phase_b: f32,
    mode: PathMode,
    /// Added to every evaluated point (room origin).
    origin: Vec2,
    segment_lengths: Vec<f32>,
    total_length: f32,
}

/// Fixed-time epoch of a moving platform, stamped on its first tick.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PhaseClock {
    started_at: Option<f32>,
}

impl PhaseClock {
    /// Seconds since the first tick this clock saw.
    pub fn elapsed(&mut self, now: f32) -> f32 {
        now - *self.started_at.get_or_insert(now)
    }
}

impl PhaseMotion {
    pub fn new(path: Vec<Vec2>, speed: f32, phase_a: f32, phase_b: f32) -> Result<Self, PhaseMotionError> {
        if !(speed > 0.0) {
            return Err(PhaseMotionError::NonPositiveSpeed(speed));
        }
        for phase in [phase_a, phase_b] {
            if !(0.0..=1.0).contains(&phase) {
                return Err(PhaseMotionError::PhaseOutOfRange(phase));
            }
        }
        let mut motion = Self {
            path: Vec::new(),
            speed,
            phase_a,
            phase_b,
            mode: PathMode::Loop,
            origin: Vec2::ZERO,
            segment_lengths: Vec::new(),
            total_length: 0.0,
        };
        motion.set_path(path);
        Ok(motion)
    }

    pub fn with_mode(mut self, mode: PathMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Replace the path and recompute segment lengths.
    pub fn set_path(&mut self, path: Vec<Vec2>) {
        self.segment_lengths = path.windows(2).map(|w| w[0].distance(w[1])).collect();
        self.total_length = self.segment_lengths.iter().sum();
        self.path = path;
    }

    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    pub fn segment_lengths(&self) -> &[f32] {
        &self.segment_lengths
    }

    #[inline]
    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    #[inline]
    pub fn mode(&self) -> PathMode {
        self.mode
    }

    /// Fewer than two points, or all points coincide.
    #[inline]
    pub fn is_stationary(&self) -> bool {
        self.path.len() < 2 || self.total_length <= 0.0
    }

    #[inline]
    pub fn phase_for(&self, world: WorldKind) -> f32 {
        match world {
            WorldKind::A => self.phase_a,
            WorldKind::B => self.phase_b,
        }
    }

    #[inline]
    pub fn cycle_time(&self) -> f32 {
        self.total_length / self.speed
    }

    /// Normalized progress along the path in `[0, 1]` after the mode remap.
    pub fn progress(&self, elapsed: f32, world: WorldKind) -> f32 {
        if self.is_stationary() {
            return 0.0;
        }
        let raw = elapsed / self.cycle_time() + self.phase_for(world);
        let u = raw.rem_euclid(1.0);
        match self.mode {
            PathMode::Loop => u,
            PathMode::PingPong => {
                let x = u * 2.0;
                if x <= 1.0 { x } else { 2.0 - x }
            }
            PathMode::Once => {
                if raw >= 1.0 { 1.0 } else { u }
            }
        }
    }

    /// Position at `elapsed` seconds in `world`.
    pub fn evaluate(&self, elapsed: f32, world: WorldKind) -> Vec2 {
        self.origin + self.point_at(self.progress(elapsed, world))
    }

    /// Path-local point at normalized distance `u`.
    pub fn point_at(&self, u: f32) -> Vec2 {
        let Some(&first) = self.path.first() else {
            return Vec2::ZERO;
        };
        if self.is_stationary() || u <= 0.0 {
            return first;
        }
        let last = self.path[self.path.len() - 1];
        if u >= 1.0 {
            return last;
        }

        let target = u * self.total_length;
        let mut walked = 0.0;
        for (i, &len) in self.segment_lengths.iter().enumerate() {
            if walked + len >= target {
                if len <= 0.0 {
                    return self.path[i];
                }
                let t = (target - walked) / len;
                return self.path[i].lerp(self.path[i + 1], t);
            }
            walked += len;
        }
        last
    }
}

/// Report degenerate paths once, when the platform appears.
pub fn report_stationary_platforms(q: Query<(Entity, &PhaseMotion), Added<PhaseMotion>>) {
    for (e, motion) in &q {
        match motion.path.len() {
            0 => warn!("moving platform {e:?} has an empty path; parking it at the origin"),
            1 => warn!("moving platform {e:?} has a single path point; it will not move"),
            _ if motion.total_length <= 0.0 => {
                warn!("moving platform {e:?} has a zero-length path; it will not move")
            }
            _ => {}
        }
    }
}

/// Place every moving platform at its time/world position.
pub fn drive_phase_platforms(
    time: Res<Time<Fixed>>,
    state: Res<WorldState>,
    mut q: Query<(&PhaseMotion, &mut PhaseClock, &mut Position)>,
) {
    let now = time.elapsed_secs();
    let world = state.current();
    for (motion, mut clock, mut pos) in &mut q {
        let elapsed = clock.elapsed(now);
        pos.0 = motion.evaluate(elapsed, world);
    }
}
