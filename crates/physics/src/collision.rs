//! Axis-aligned wall collision on the horizontal plane.

use engine_core::Vec3;

/// Default expansion applied to every wall footprint.
pub const COLLISION_MARGIN: f32 = 0.1;

/// A wall footprint on the XZ plane, already expanded by the collision margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallBoundary {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl WallBoundary {
    /// Build a boundary from a raw footprint, expanding every side by `margin`.
    ///
    /// Returns `None` for a zero-area (or inverted) footprint.
    pub fn from_footprint(min_x: f32, max_x: f32, min_z: f32, max_z: f32, margin: f32) -> Option<Self> {
        if !(max_x > min_x && max_z > min_z) {
            return None;
        }
        Some(Self {
            min_x: min_x - margin,
            max_x: max_x + margin,
            min_z: min_z - margin,
            max_z: max_z + margin,
        })
    }

    /// Does a square of half-size `radius` centred at `point` touch this boundary?
    ///
    /// Edges count as touching. Height is ignored.
    pub fn overlaps(&self, point: Vec3, radius: f32) -> bool {
        point.x + radius >= self.min_x
            && point.x - radius <= self.max_x
            && point.z + radius >= self.min_z
            && point.z - radius <= self.max_z
    }
}

/// Flat list of wall boundaries built once per level and read every frame.
#[derive(Debug, Clone)]
pub struct CollisionGrid {
    walls: Vec<WallBoundary>,
    margin: f32,
}

impl Default for CollisionGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionGrid {
    pub fn new() -> Self {
        Self::with_margin(COLLISION_MARGIN)
    }

    pub fn with_margin(margin: f32) -> Self {
        Self {
            walls: Vec::new(),
            margin,
        }
    }

    /// Register a wall footprint. Degenerate footprints are skipped and never collide.
    pub fn register(&mut self, min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> bool {
        match WallBoundary::from_footprint(min_x, max_x, min_z, max_z, self.margin) {
            Some(boundary) => {
                self.walls.push(boundary);
                true
            }
            None => {
                log::debug!(
                    "Skipping degenerate wall footprint x[{}, {}] z[{}, {}]",
                    min_x, max_x, min_z, max_z
                );
                false
            }
        }
    }

    /// True if a square of half-size `radius` centred at `point` overlaps any wall.
    pub fn query(&self, point: Vec3, radius: f32) -> bool {
        self.walls.iter().any(|wall| wall.overlaps(point, radius))
    }

    /// Remove every wall (level reset).
    pub fn clear(&mut self) {
        self.walls.clear();
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }
}
