//! Spatial helpers shared by the possession stages.
//!
//! All positions are world space, y-up, in meters. "Horizontal" always means
//! the ground plane spanned by x and z.

use glam::{Quat, Vec2, Vec3};

/// Separation below which a direction between two points is degenerate (1 cm).
pub const MIN_DIRECTION_LENGTH: f32 = 0.01;

/// Projects a world-space vector onto the ground plane.
#[inline]
#[must_use]
pub fn horizontal(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Center-to-center distance on the ground plane.
#[inline]
#[must_use]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    horizontal(a).distance(horizontal(b))
}

/// Straight-line distance in 3D.
#[inline]
#[must_use]
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}

/// Unit vector pointing from `from` to `to`, together with the separation.
///
/// Returns `None` when the points are closer than [`MIN_DIRECTION_LENGTH`].
#[must_use]
pub fn direction_between(from: Vec3, to: Vec3) -> Option<(Vec3, f32)> {
    let delta = to - from;
    let length = delta.length();
    if length < MIN_DIRECTION_LENGTH {
        return None;
    }
    Some((delta / length, length))
}

/// Rotates a vector about the world up axis by `angle` radians.
#[inline]
#[must_use]
pub fn rotate_about_up(v: Vec3, angle: f32) -> Vec3 {
    Quat::from_rotation_y(angle) * v
}

/// Ground-plane forward vector for a yaw angle. Yaw 0 faces +z.
#[inline]
#[must_use]
pub fn yaw_forward(yaw: f32) -> Vec2 {
    Vec2::new(yaw.sin(), yaw.cos())
}

/// Unsigned angle in radians between the ground-plane projections of two vectors.
///
/// Returns `None` if either projection is too short to have a direction.
#[must_use]
pub fn horizontal_angle_between(a: Vec3, b: Vec3) -> Option<f32> {
    let a = horizontal(a).try_normalize()?;
    let b = horizontal(b).try_normalize()?;
    Some(a.dot(b).clamp(-1.0, 1.0).acos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn horizontal_distance_ignores_height() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 10.0, 4.0);
        assert!((horizontal_distance(a, b) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn direction_between_rejects_near_points() {
        let a = Vec3::new(1.0, 1.0, 1.0);
        assert!(direction_between(a, a + Vec3::splat(0.001)).is_none());
    }

    #[test]
    fn direction_between_is_unit_length() {
        let (dir, len) = direction_between(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0)).unwrap();
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!((len - 2.0).abs() < 1e-5);
    }

    #[test]
    fn rotate_about_up_matches_yaw_forward() {
        let rotated = rotate_about_up(Vec3::Z, FRAC_PI_2);
        let forward = yaw_forward(FRAC_PI_2);
        assert!((rotated.x - forward.x).abs() < 1e-5);
        assert!((rotated.z - forward.y).abs() < 1e-5);
        assert!(rotated.y.abs() < 1e-5);
    }

    #[test]
    fn horizontal_angle_between_perpendicular() {
        let angle = horizontal_angle_between(Vec3::X, Vec3::new(0.0, 5.0, 1.0)).unwrap();
        assert!((angle - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn horizontal_angle_between_vertical_vector_is_none() {
        assert!(horizontal_angle_between(Vec3::Y, Vec3::X).is_none());
    }
}
