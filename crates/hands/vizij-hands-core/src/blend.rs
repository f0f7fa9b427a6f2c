//! Pose blending and skeleton projection.
//!
//! Simulated hands chase one of the canonical poses with a fixed time
//! constant: each tick moves `clamp(dt * rate, 0, 1)` of the remaining way,
//! so any tick of at least `1 / rate` seconds lands exactly on the target.
//! The blended, palm-local pose is then mirrored (right hand) and projected
//! into world space with per-joint radii.

use crate::config::HandConfig;
use crate::ids::{Finger, FingerJoint, Handedness, FINGERS, JOINTS_PER_FINGER};
use crate::joint::{HandJoint, JointGrid, Pose};
use crate::poses::CanonicalPoseId;

/// Map the two digital buttons onto a target pose.
#[inline]
pub fn select_target(trigger: bool, grip: bool) -> CanonicalPoseId {
    match (trigger, grip) {
        (true, false) => CanonicalPoseId::Pinch,
        (true, true) => CanonicalPoseId::Fist,
        (false, true) => CanonicalPoseId::Point,
        (false, false) => CanonicalPoseId::Neutral,
    }
}

/// Per-tick blend factor for elapsed unscaled seconds.
/// A non-finite product holds the pose still.
#[inline]
pub fn blend_factor(dt: f32, rate: f32) -> f32 {
    let f = dt * rate;
    if f.is_finite() {
        f.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Current interpolated palm-local pose of one hand.
/// Keeps its last value while the hand is untracked.
#[derive(Clone, Debug, PartialEq)]
pub struct BlendBuffer {
    joints: JointGrid<Pose>,
}

impl BlendBuffer {
    pub fn new(initial: &JointGrid<Pose>) -> Self {
        Self { joints: *initial }
    }

    #[inline]
    pub fn joints(&self) -> &JointGrid<Pose> {
        &self.joints
    }

    /// Move every joint `factor` of the way toward `target`.
    pub fn step(&mut self, target: &JointGrid<Pose>, factor: f32) {
        for (current, goal) in self.joints.iter_mut().zip(target.iter()) {
            for (c, g) in current.iter_mut().zip(goal.iter()) {
                *c = c.blend(g, factor);
            }
        }
    }
}

/// Write world-space joints for `local` poses relative to `palm`.
///
/// `mirror` reflects each local pose across the YZ plane first; canonical
/// data is authored for the left hand, so simulated right hands pass `true`.
pub fn project_skeleton(
    out: &mut JointGrid<HandJoint>,
    local: &JointGrid<Pose>,
    palm: &Pose,
    mirror: bool,
    cfg: &HandConfig,
) {
    for f in 0..FINGERS {
        let finger = Finger::ALL[f];
        for j in 0..JOINTS_PER_FINGER {
            let joint = FingerJoint::ALL[j];
            let src = if mirror {
                local[f][j].mirrored_x()
            } else {
                local[f][j]
            };
            let world = palm.transform(&src);
            out[f][j] = HandJoint {
                position: world.position,
                orientation: world.orientation,
                radius: cfg.joint_radius(finger, joint),
            };
        }
    }
}

/// Whether canonical (left-authored) data needs mirroring for this hand.
#[inline]
pub fn needs_mirror(handedness: Handedness) -> bool {
    handedness == Handedness::Right
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poses::CanonicalPoses;
    use glam::{Quat, Vec3};

    #[test]
    fn target_table() {
        assert_eq!(select_target(true, false), CanonicalPoseId::Pinch);
        assert_eq!(select_target(true, true), CanonicalPoseId::Fist);
        assert_eq!(select_target(false, true), CanonicalPoseId::Point);
        assert_eq!(select_target(false, false), CanonicalPoseId::Neutral);
    }

    #[test]
    fn factor_saturates() {
        assert_eq!(blend_factor(0.0, 30.0), 0.0);
        assert!((blend_factor(1.0 / 60.0, 30.0) - 0.5).abs() < 1e-6);
        assert_eq!(blend_factor(0.5, 30.0), 1.0);
        assert_eq!(blend_factor(-1.0, 30.0), 0.0);
    }

    #[test]
    fn non_finite_dt_holds_still() {
        assert_eq!(blend_factor(f32::NAN, 30.0), 0.0);
        assert_eq!(blend_factor(f32::INFINITY, 30.0), 0.0);
        assert_eq!(blend_factor(1.0, f32::NAN), 0.0);
    }

    #[test]
    fn half_step_moves_halfway() {
        let poses = CanonicalPoses::standard();
        let from = poses.get(CanonicalPoseId::Neutral);
        let to = poses.get(CanonicalPoseId::Fist);
        let mut buf = BlendBuffer::new(from);
        buf.step(to, 0.5);
        let mid = buf.joints()[1][4].position;
        let expect = (from[1][4].position + to[1][4].position) * 0.5;
        assert!(mid.abs_diff_eq(expect, 1e-6));
    }

    #[test]
    fn zero_factor_keeps_buffer() {
        let poses = CanonicalPoses::standard();
        let mut buf = BlendBuffer::new(poses.get(CanonicalPoseId::Point));
        let before = buf.clone();
        buf.step(poses.get(CanonicalPoseId::Fist), 0.0);
        for (a, b) in before.joints().iter().flatten().zip(buf.joints().iter().flatten()) {
            assert!(a.position.abs_diff_eq(b.position, 1e-7));
            assert!(a.orientation.abs_diff_eq(b.orientation, 1e-6));
        }
    }

    #[test]
    fn projection_applies_palm_and_radius() {
        let cfg = HandConfig::default();
        let mut local = [[Pose::IDENTITY; JOINTS_PER_FINGER]; FINGERS];
        local[1][4] = Pose::new(Vec3::new(0.0, 0.0, -0.1), Quat::IDENTITY);
        let palm = Pose::new(
            Vec3::new(0.0, 1.0, 0.0),
            Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
        );
        let mut out = [[HandJoint::default(); JOINTS_PER_FINGER]; FINGERS];
        project_skeleton(&mut out, &local, &palm, false, &cfg);
        // -Z rotated +90deg about X points along +Y
        assert!(out[1][4]
            .position
            .abs_diff_eq(Vec3::new(0.0, 1.1, 0.0), 1e-6));
        assert!((out[1][4].radius - 0.015 * 0.25).abs() < 1e-7);
        assert!((out[0][1].radius - 1.15 * 0.026 * 0.25).abs() < 1e-7);
    }
}
