//! Ground and wall sensing.
//!
//! Geometry lives here; the motion state machine only sees the result ([`Senses`]).
//! The physics queries go through [`SurfaceProbe`] so the geometry can be checked
//! without a physics world.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::common::tunables::MotionTunables;

/// What the player touched this tick.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Senses {
    /// `None` when the player has no ground probe.
    pub grounded: Option<bool>,
    pub wall_left: Option<Entity>,
    pub wall_right: Option<Entity>,
    pub position: Vec2,
}

/// Circle overlap below the feet.
#[derive(Component, Debug, Clone, Copy)]
pub struct GroundProbe {
    pub radius: f32,
}

/// Axis-aligned body extents in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl BodyBounds {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self { min: center - half, max: center + half }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        (self.max.x - self.min.x) * 0.5
    }
}

impl From<&ColliderAabb> for BodyBounds {
    fn from(aabb: &ColliderAabb) -> Self {
        Self { min: aabb.min, max: aabb.max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallHit {
    pub entity: Entity,
    pub is_trigger: bool,
}

/// Physics queries the sensing geometry needs.
pub trait SurfaceProbe {
    /// Any solid ground overlaps the circle.
    fn overlap_circle(&self, center: Vec2, radius: f32) -> bool;
    /// Nearest ground hit along the ray.
    fn cast_ray(&self, origin: Vec2, direction: Dir2, max_distance: f32) -> Option<WallHit>;
}

/// Ground probe circle centre: just below the feet.
#[inline]
pub fn ground_probe_center(bounds: &BodyBounds, radius: f32) -> Vec2 {
    Vec2::new(bounds.center().x, bounds.min.y - radius * 0.5)
}

/// Horizontal ray length: at least reaches past the body's side.
#[inline]
pub fn wall_ray_length(bounds: &BodyBounds, params: &MotionTunables) -> f32 {
    params
        .wall_check_distance
        .max(bounds.half_width() + 0.05)
        .max(0.01)
}

/// Upper and lower ray origins, `wall_check_height / 2` above and below centre.
#[inline]
pub fn wall_ray_origins(bounds: &BodyBounds, params: &MotionTunables) -> [Vec2; 2] {
    let c = bounds.center();
    let h = params.wall_check_height * 0.5;
    [c + Vec2::Y * h, c - Vec2::Y * h]
}

pub fn probe_ground(probe: &impl SurfaceProbe, bounds: &BodyBounds, radius: f32) -> bool {
    probe.overlap_circle(ground_probe_center(bounds, radius), radius)
}

/// First non-trigger wall hit on `direction`'s side, upper ray first.
pub fn probe_wall(
    probe: &impl SurfaceProbe,
    bounds: &BodyBounds,
    params: &MotionTunables,
    direction: Dir2,
) -> Option<Entity> {
    let length = wall_ray_length(bounds, params);
    wall_ray_origins(bounds, params)
        .into_iter()
        .filter_map(|origin| probe.cast_ray(origin, direction, length))
        .find(|hit| !hit.is_trigger)
        .map(|hit| hit.entity)
}

/// Full sensing pass for one body.
pub fn sense(
    probe: &impl SurfaceProbe,
    bounds: &BodyBounds,
    ground: Option<&GroundProbe>,
    params: &MotionTunables,
    position: Vec2,
) -> Senses {
    Senses {
        grounded: ground.map(|g| probe_ground(probe, bounds, g.radius)),
        wall_left: probe_wall(probe, bounds, params, Dir2::NEG_X),
        wall_right: probe_wall(probe, bounds, params, Dir2::X),
        position,
    }
}

/// [`SurfaceProbe`] backed by avian's spatial queries, restricted to ground.
pub struct AvianProbe<'a, 'w, 's> {
    spatial: &'a SpatialQuery<'w, 's>,
    is_trigger: &'a dyn Fn(Entity) -> bool,
    filter: SpatialQueryFilter,
}

impl<'a, 'w, 's> AvianProbe<'a, 'w, 's> {
    pub fn new(spatial: &'a SpatialQuery<'w, 's>, player: Entity, is_trigger: &'a dyn Fn(Entity) -> bool) -> Self {
        Self {
            spatial,
            is_trigger,
            filter: SpatialQueryFilter::from_mask(Layer::Ground).with_excluded_entities([player]),
        }
    }
}

impl SurfaceProbe for AvianProbe<'_, '_, '_> {
    fn overlap_circle(&self, center: Vec2, radius: f32) -> bool {
        !self
            .spatial
            .shape_intersections(&Collider::circle(radius), center, 0.0, &self.filter)
            .is_empty()
    }

    fn cast_ray(&self, origin: Vec2, direction: Dir2, max_distance: f32) -> Option<WallHit> {
        self.spatial
            .cast_ray(origin, direction, max_distance, true, &self.filter)
            .map(|hit| WallHit { entity: hit.entity, is_trigger: (self.is_trigger)(hit.entity) })
    }
}
