//! Transform component and utilities for spatial positioning.

use glam::{EulerRot, Quat, Vec3};

/// A 3D transform representing position and rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with first-person yaw/pitch (YXZ order, like a camera).
    pub fn from_yaw_pitch(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0),
        }
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the right direction (positive X).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Horizontal forward for a yaw angle. Independent of pitch, so it holds
    /// its direction even when looking straight up or down.
    pub fn flat_forward(yaw: f32) -> Vec3 {
        let (sin, cos) = yaw.sin_cos();
        Vec3::new(-sin, 0.0, -cos)
    }

    /// Horizontal right for a yaw angle.
    pub fn flat_right(yaw: f32) -> Vec3 {
        let (sin, cos) = yaw.sin_cos();
        Vec3::new(cos, 0.0, -sin)
    }

    /// Set rotation to a pure yaw around the Y axis.
    pub fn set_yaw(&mut self, angle: f32) {
        self.rotation = Quat::from_rotation_y(angle);
    }

    /// Turn to face a target on the horizontal plane. Returns the yaw used.
    ///
    /// Yaw is `atan2(dx, dz)`, so a billboard's +Z axis points at the target.
    pub fn face_towards(&mut self, target: Vec3) -> f32 {
        let yaw = (target.x - self.position.x).atan2(target.z - self.position.z);
        self.set_yaw(yaw);
        yaw
    }

    /// Yaw angle of the current rotation.
    pub fn yaw(&self) -> f32 {
        let (yaw, _, _) = self.rotation.to_euler(EulerRot::YXZ);
        yaw
    }
}
