//! Canonical hand poses (neutral, point, pinch, fist).
//!
//! Authored once, for the left hand only, in palm-local metres: palm facing
//! -Y, fingers pointing -Z, thumb toward +X. Right-hand data is never stored;
//! readers apply [`Pose::mirrored_x`] at read time.
//!
//! The build step scales every position by [`POSE_SCALE`] and derives each
//! joint orientation from its bone direction. The resulting tables are
//! immutable and shared process-wide through [`CanonicalPoses::standard`].

use glam::{Quat, Vec3};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::ids::{Finger, FingerJoint, Handedness, FINGERS, JOINTS_PER_FINGER};
use crate::joint::{JointGrid, Pose};

/// Uniform position scale applied to all authored tables during the build.
pub const POSE_SCALE: f32 = 1.15;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalPoseId {
    Neutral = 0,
    Point = 1,
    Pinch = 2,
    Fist = 3,
}

impl CanonicalPoseId {
    pub const ALL: [CanonicalPoseId; 4] = [
        CanonicalPoseId::Neutral,
        CanonicalPoseId::Point,
        CanonicalPoseId::Pinch,
        CanonicalPoseId::Fist,
    ];
}

type Authored = [[[f32; 3]; JOINTS_PER_FINGER]; FINGERS];

#[rustfmt::skip]
const NEUTRAL: Authored = [
    // thumb
    [[0.020, -0.012, 0.020], [0.020, -0.012, 0.020], [0.045, -0.018, 0.000], [0.058, -0.022, -0.022], [0.066, -0.025, -0.040]],
    // index
    [[0.022, 0.000, 0.030], [0.024, 0.000, -0.035], [0.025, -0.005, -0.075], [0.025, -0.012, -0.098], [0.025, -0.020, -0.115]],
    // middle
    [[0.002, 0.000, 0.030], [0.002, 0.000, -0.038], [0.002, -0.006, -0.082], [0.002, -0.013, -0.108], [0.002, -0.021, -0.126]],
    // ring
    [[-0.016, 0.000, 0.028], [-0.020, 0.000, -0.033], [-0.022, -0.006, -0.073], [-0.023, -0.013, -0.097], [-0.024, -0.021, -0.113]],
    // little
    [[-0.030, 0.000, 0.024], [-0.038, 0.000, -0.025], [-0.042, -0.005, -0.055], [-0.044, -0.011, -0.073], [-0.045, -0.018, -0.087]],
];

#[rustfmt::skip]
const POINT: Authored = [
    [[0.020, -0.012, 0.020], [0.020, -0.012, 0.020], [0.035, -0.025, -0.005], [0.025, -0.035, -0.025], [0.010, -0.038, -0.035]],
    [[0.022, 0.000, 0.030], [0.024, 0.000, -0.035], [0.025, 0.000, -0.078], [0.025, 0.000, -0.103], [0.025, 0.000, -0.122]],
    [[0.002, 0.000, 0.030], [0.002, 0.000, -0.038], [0.002, -0.035, -0.042], [0.002, -0.045, -0.015], [0.002, -0.024, 0.016]],
    [[-0.016, 0.000, 0.028], [-0.020, 0.000, -0.033], [-0.021, -0.032, -0.037], [-0.021, -0.042, -0.013], [-0.019, -0.022, 0.014]],
    [[-0.030, 0.000, 0.024], [-0.038, 0.000, -0.025], [-0.040, -0.026, -0.028], [-0.039, -0.034, -0.010], [-0.036, -0.018, 0.010]],
];

#[rustfmt::skip]
const PINCH: Authored = [
    [[0.020, -0.012, 0.020], [0.020, -0.012, 0.020], [0.045, -0.030, -0.010], [0.050, -0.042, -0.040], [0.048, -0.050, -0.062]],
    [[0.022, 0.000, 0.030], [0.024, 0.000, -0.035], [0.030, -0.020, -0.060], [0.038, -0.035, -0.068], [0.044, -0.047, -0.070]],
    [[0.002, 0.000, 0.030], [0.002, 0.000, -0.038], [0.002, -0.006, -0.082], [0.002, -0.013, -0.108], [0.002, -0.021, -0.126]],
    [[-0.016, 0.000, 0.028], [-0.020, 0.000, -0.033], [-0.022, -0.006, -0.073], [-0.023, -0.013, -0.097], [-0.024, -0.021, -0.113]],
    [[-0.030, 0.000, 0.024], [-0.038, 0.000, -0.025], [-0.042, -0.005, -0.055], [-0.044, -0.011, -0.073], [-0.045, -0.018, -0.087]],
];

#[rustfmt::skip]
const FIST: Authored = [
    [[0.020, -0.012, 0.020], [0.020, -0.012, 0.020], [0.040, -0.028, 0.004], [0.034, -0.034, 0.008], [0.026, -0.035, 0.005]],
    [[0.022, 0.000, 0.030], [0.024, 0.000, -0.035], [0.025, -0.035, -0.040], [0.024, -0.045, -0.012], [0.022, -0.022, 0.018]],
    [[0.002, 0.000, 0.030], [0.002, 0.000, -0.038], [0.002, -0.035, -0.042], [0.002, -0.045, -0.015], [0.002, -0.024, 0.016]],
    [[-0.016, 0.000, 0.028], [-0.020, 0.000, -0.033], [-0.021, -0.032, -0.037], [-0.021, -0.042, -0.013], [-0.019, -0.022, 0.014]],
    [[-0.030, 0.000, 0.024], [-0.038, 0.000, -0.025], [-0.040, -0.026, -0.028], [-0.039, -0.034, -0.010], [-0.036, -0.018, 0.010]],
];

static STANDARD: Lazy<CanonicalPoses> = Lazy::new(|| CanonicalPoses::build(POSE_SCALE));

/// The four canonical tables, left-hand, palm-local.
#[derive(Clone, Debug)]
pub struct CanonicalPoses {
    tables: [JointGrid<Pose>; 4],
}

impl CanonicalPoses {
    /// Build all tables with a uniform position scale.
    pub fn build(scale: f32) -> Self {
        Self {
            tables: [
                build_table(&NEUTRAL, scale),
                build_table(&POINT, scale),
                build_table(&PINCH, scale),
                build_table(&FIST, scale),
            ],
        }
    }

    /// Shared tables built with [`POSE_SCALE`] on first access.
    pub fn standard() -> &'static CanonicalPoses {
        &STANDARD
    }

    #[inline]
    pub fn get(&self, id: CanonicalPoseId) -> &JointGrid<Pose> {
        &self.tables[id as usize]
    }

    /// Read one joint for a given hand, mirroring on the fly for the right hand.
    pub fn joint(
        &self,
        id: CanonicalPoseId,
        handedness: Handedness,
        finger: Finger,
        joint: FingerJoint,
    ) -> Pose {
        let pose = self.get(id)[finger.index()][joint.index()];
        match handedness {
            Handedness::Left => pose,
            Handedness::Right => pose.mirrored_x(),
        }
    }
}

fn build_table(authored: &Authored, scale: f32) -> JointGrid<Pose> {
    let mut out = [[Pose::IDENTITY; JOINTS_PER_FINGER]; FINGERS];
    for (f, finger) in authored.iter().enumerate() {
        let positions: [Vec3; JOINTS_PER_FINGER] = finger.map(|p| Vec3::from_array(p) * scale);
        for (j, pose) in out[f].iter_mut().enumerate() {
            *pose = Pose::new(positions[j], bone_orientation(&positions, j));
        }
    }
    out
}

/// Rotation taking -Z onto the bone leaving joint `j`. Coincident joints (the
/// thumb base) look further along the finger; the tip reuses the last bone.
fn bone_orientation(positions: &[Vec3; JOINTS_PER_FINGER], j: usize) -> Quat {
    const EPS: f32 = 1e-6;
    let here = positions[j];
    let forward = positions[j + 1..]
        .iter()
        .map(|p| *p - here)
        .find(|d| d.length_squared() > EPS * EPS);
    let dir = forward.or_else(|| {
        positions[..j]
            .iter()
            .rev()
            .map(|p| here - *p)
            .find(|d| d.length_squared() > EPS * EPS)
    });
    match dir {
        Some(d) => Quat::from_rotation_arc(Vec3::NEG_Z, d.normalize()),
        None => Quat::IDENTITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tables_are_scaled_once() {
        let poses = CanonicalPoses::standard();
        let tip = poses.get(CanonicalPoseId::Neutral)[1][4].position;
        assert!(tip.abs_diff_eq(Vec3::new(0.025, -0.020, -0.115) * POSE_SCALE, 1e-6));
        // second access hands back the same tables
        let again = CanonicalPoses::standard();
        assert!(std::ptr::eq(poses, again));
    }

    #[test]
    fn orientations_are_unit_and_follow_bones() {
        let poses = CanonicalPoses::build(1.0);
        for id in CanonicalPoseId::ALL {
            for finger in poses.get(id) {
                for joint in finger {
                    assert!(joint.orientation.is_normalized());
                }
            }
        }
        let index = &poses.get(CanonicalPoseId::Point)[1];
        let dir = (index[2].position - index[1].position).normalize();
        let fwd = index[1].orientation * Vec3::NEG_Z;
        assert!(fwd.abs_diff_eq(dir, 1e-5));
    }

    #[test]
    fn thumb_base_uses_the_next_distinct_joint() {
        let poses = CanonicalPoses::build(1.0);
        let thumb = &poses.get(CanonicalPoseId::Neutral)[0];
        assert_eq!(thumb[0].position, thumb[1].position);
        assert!(thumb[0].orientation.abs_diff_eq(thumb[1].orientation, 1e-6));
    }

    #[test]
    fn right_hand_reads_are_mirrored() {
        let poses = CanonicalPoses::standard();
        let left = poses.joint(
            CanonicalPoseId::Pinch,
            Handedness::Left,
            Finger::Index,
            FingerJoint::Tip,
        );
        let right = poses.joint(
            CanonicalPoseId::Pinch,
            Handedness::Right,
            Finger::Index,
            FingerJoint::Tip,
        );
        assert_eq!(right.position.x, -left.position.x);
        assert_eq!(right.position.y, left.position.y);
        assert_eq!(right.orientation.y, -left.orientation.y);
        assert_eq!(right.orientation.z, -left.orientation.z);
        assert_eq!(right.orientation.w, left.orientation.w);
    }
}
