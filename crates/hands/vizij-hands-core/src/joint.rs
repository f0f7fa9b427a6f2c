//! Poses, joints and the fixed 5x5 joint grid.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::ids::{Finger, FingerJoint, FINGERS, JOINTS_PER_FINGER};

/// `[finger][joint]`, thumb first, metacarpal first.
pub type JointGrid<T> = [[T; JOINTS_PER_FINGER]; FINGERS];

/// Position + orientation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    #[inline]
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Reflect across the YZ plane: turns left-hand data into right-hand data.
    #[inline]
    pub fn mirrored_x(self) -> Pose {
        let q = self.orientation;
        Pose {
            position: Vec3::new(-self.position.x, self.position.y, self.position.z),
            orientation: Quat::from_xyzw(q.x, -q.y, -q.z, q.w),
        }
    }

    /// Express a pose given relative to `self` in the parent space of `self`.
    /// The local rotation is applied first, then this pose's orientation.
    #[inline]
    pub fn transform(&self, local: &Pose) -> Pose {
        Pose {
            position: self.orientation * local.position + self.position,
            orientation: self.orientation * local.orientation,
        }
    }

    /// Blend toward `target` by `t` (lerp position, slerp orientation).
    #[inline]
    pub fn blend(&self, target: &Pose, t: f32) -> Pose {
        Pose {
            position: self.position.lerp(target.position, t),
            orientation: self.orientation.slerp(target.orientation, t),
        }
    }
}

/// A skeletal point on a finger in world space.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandJoint {
    pub position: Vec3,
    pub orientation: Quat,
    pub radius: f32,
}

impl Default for HandJoint {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            radius: 0.0,
        }
    }
}

impl HandJoint {
    #[inline]
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.orientation)
    }
}

/// Lookup by enum pair.
#[inline]
pub fn at<T>(grid: &JointGrid<T>, finger: Finger, joint: FingerJoint) -> &T {
    &grid[finger.index()][joint.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_twice_is_identity() {
        let p = Pose::new(
            Vec3::new(0.1, -0.2, 0.3),
            Quat::from_euler(glam::EulerRot::XYZ, 0.3, 0.5, -0.7),
        );
        let back = p.mirrored_x().mirrored_x();
        assert!(back.position.abs_diff_eq(p.position, 1e-6));
        assert!(back.orientation.abs_diff_eq(p.orientation, 1e-6));
    }

    #[test]
    fn transform_applies_palm_rotation_then_offset() {
        let palm = Pose::new(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        );
        let local = Pose::new(Vec3::new(0.0, 0.0, -1.0), Quat::IDENTITY);
        let world = palm.transform(&local);
        // -Z rotated +90deg about Y points along -X
        assert!(world.position.abs_diff_eq(Vec3::new(0.0, 0.0, 0.0), 1e-6));
        assert!(world.orientation.abs_diff_eq(palm.orientation, 1e-6));
    }
}
