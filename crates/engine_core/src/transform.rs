//! Local transform of a scene node relative to its parent.

use glam::{Quat, Vec3};

/// A local transform: position and rotation relative to the parent node.
///
/// Interior models are never scaled, so only translation and rotation are
/// tracked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Zero offset, no rotation.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Create a transform at the origin with the given rotation.
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Approximate equality, treating `q` and `-q` as the same rotation.
    pub fn abs_diff_eq(&self, other: &Transform, max_abs_diff: f32) -> bool {
        self.position.abs_diff_eq(other.position, max_abs_diff)
            && self.rotation.dot(other.rotation).abs() >= 1.0 - max_abs_diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abs_diff_eq_ignores_quaternion_sign() {
        let a = Transform::from_rotation(Quat::from_rotation_x(0.3));
        let b = Transform::from_rotation(-Quat::from_rotation_x(0.3));
        assert!(a.abs_diff_eq(&b, 1e-5));
    }
}
