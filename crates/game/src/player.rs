//! Player controller: mouse look, WASD movement and wall-gated translation.

use engine_core::{Health, Transform, Vec2, Vec3};
use input::{InputState, MovementKeys};
use physics::CollisionGrid;
use std::f32::consts::FRAC_PI_2;

/// Camera height above the floor.
pub const PLAYER_HEIGHT: f32 = 1.7;
/// Half-size of the player's collision square.
pub const PLAYER_RADIUS: f32 = 0.7;
pub const MOVE_SPEED: f32 = 5.0;
pub const SPRINT_SPEED: f32 = 10.0;
pub const MAX_HEALTH: u32 = 100;

/// Result of one movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Idle,
    Moved,
    /// The candidate position hit a wall; the player did not move.
    Blocked,
}

/// Player controller handling movement and camera.
#[derive(Debug, Clone)]
pub struct PlayerController {
    pub position: Vec3,
    /// Radians; positive turns left.
    pub yaw: f32,
    /// Radians, clamped to [-pi/2, pi/2].
    pub pitch: f32,
    pub health: Health,
    pub mouse_sensitivity: f32,
    spawn: Vec3,
}

impl PlayerController {
    pub fn new(spawn: Vec3) -> Self {
        Self {
            position: spawn,
            yaw: 0.0,
            pitch: 0.0,
            health: Health::new(MAX_HEALTH),
            mouse_sensitivity: 0.002,
            spawn,
        }
    }

    /// Per-frame update: look, then move.
    pub fn update(&mut self, input: &InputState, grid: &CollisionGrid, dt: f32) -> Motion {
        self.look(input.mouse_delta(), input.is_cursor_locked());
        self.apply_movement(input.movement_keys(), input.is_sprinting(), grid, dt)
    }

    /// Accumulate a pointer delta into yaw/pitch. No-op unless the pointer is captured.
    pub fn look(&mut self, delta: Vec2, captured: bool) {
        if !captured {
            return;
        }
        self.yaw -= delta.x * self.mouse_sensitivity;
        self.pitch = (self.pitch - delta.y * self.mouse_sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Horizontal displacement the keys ask for this frame, before collision.
    pub fn move_intent(&self, keys: MovementKeys, sprint: bool, dt: f32) -> Vec3 {
        let forward = Transform::flat_forward(self.yaw);
        let right = Transform::flat_right(self.yaw);

        let mut direction = Vec3::ZERO;
        if keys.forward {
            direction += forward;
        }
        if keys.back {
            direction -= forward;
        }
        if keys.left {
            direction -= right;
        }
        if keys.right {
            direction += right;
        }

        let speed = if sprint { SPRINT_SPEED } else { MOVE_SPEED };
        direction.normalize_or_zero() * speed * dt
    }

    /// Move by the key intent unless the destination overlaps a wall.
    ///
    /// There is no sliding: any overlap cancels the whole step.
    pub fn apply_movement(&mut self, keys: MovementKeys, sprint: bool, grid: &CollisionGrid, dt: f32) -> Motion {
        let step = self.move_intent(keys, sprint, dt);
        if step == Vec3::ZERO {
            return Motion::Idle;
        }

        let candidate = self.position + step;
        if grid.query(candidate, PLAYER_RADIUS) {
            Motion::Blocked
        } else {
            self.position = candidate;
            Motion::Moved
        }
    }

    /// First-person camera transform.
    pub fn camera(&self) -> Transform {
        Transform::from_yaw_pitch(self.position, self.yaw, self.pitch)
    }

    /// Back to a spawn point with zero orientation. Health is left alone.
    pub fn reset(&mut self, spawn: Vec3) {
        self.spawn = spawn;
        self.position = spawn;
        self.yaw = 0.0;
        self.pitch = 0.0;
    }

    pub fn spawn(&self) -> Vec3 {
        self.spawn
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }
}
