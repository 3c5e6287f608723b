//! Raycasting for weapon hit detection.

use engine_core::Vec3;
use rapier3d::na::{Isometry3, Point3, Vector3};
use rapier3d::parry::query::{Ray, RayCast};
use rapier3d::parry::shape::Cuboid;

/// An axis-aligned box that can be hit by a ray (enemy body, pickup, ...).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitBox {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl HitBox {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self { center, half_extents }
    }

    /// Distance along `direction` (unit length) to this box, if hit within `max_distance`.
    pub fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let shape = Cuboid::new(Vector3::new(
            self.half_extents.x,
            self.half_extents.y,
            self.half_extents.z,
        ));
        let pose = Isometry3::translation(self.center.x, self.center.y, self.center.z);
        let ray = Ray::new(
            Point3::new(origin.x, origin.y, origin.z),
            Vector3::new(direction.x, direction.y, direction.z),
        );
        shape.cast_ray(&pose, &ray, max_distance, true)
    }
}

/// Result of a raycast against a set of keyed boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit<K> {
    /// Key of the box that was hit.
    pub target: K,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
}

/// Cast a ray against every box and return all hits, nearest first.
pub fn raycast_all<K, I>(origin: Vec3, direction: Vec3, max_distance: f32, boxes: I) -> Vec<RaycastHit<K>>
where
    I: IntoIterator<Item = (K, HitBox)>,
{
    let direction = direction.normalize_or_zero();
    if direction == Vec3::ZERO {
        return Vec::new();
    }

    let mut hits: Vec<RaycastHit<K>> = boxes
        .into_iter()
        .filter_map(|(target, hit_box)| {
            hit_box
                .cast(origin, direction, max_distance)
                .map(|distance| RaycastHit {
                    target,
                    distance,
                    point: origin + direction * distance,
                })
        })
        .collect();

    // Sort by distance (use unwrap_or to avoid panic on NaN)
    hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal));
    hits
}
