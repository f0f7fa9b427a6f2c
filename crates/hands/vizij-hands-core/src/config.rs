//! Core configuration for vizij-hands-core.

use serde::{Deserialize, Serialize};

use crate::error::HandError;
use crate::ids::{Finger, FingerJoint, FINGERS, JOINTS_PER_FINGER};

/// Tuning for blending, gesture thresholds, joint radii and the palm proxy.
/// Every field has a default, so partial JSON objects are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandConfig {
    /// Blend rate per second; the per-tick factor is `dt * blend_rate`, clamped to 1.
    pub blend_rate: f32,

    /// Extra gap (m) between index and thumb tips, on top of their radii, that counts as a pinch.
    pub pinch_gap: f32,
    /// Max tip-to-metacarpal distance (m) for index and middle fingers to count as a grip.
    pub grip_reach: f32,

    /// Joint radius = finger_size[f] * joint_size[j] * joint_radius_scale.
    pub joint_radius_scale: f32,
    /// Thumb to little finger. Defaults shrink from the thumb (1.15) to the little finger (0.75).
    pub finger_size: [f32; FINGERS],
    /// Metacarpal to tip.
    pub joint_size: [f32; JOINTS_PER_FINGER],
    /// Radius multiplier for the two thumb joints at the base of the mesh tube.
    pub thumb_base_radius_scale: f32,

    /// Full extents (m) of the palm collision box.
    pub proxy_box_size: [f32; 3],

    /// Initial skin visibility for both hands.
    pub visible: bool,
    /// Create the translucent default hand material at startup.
    pub default_material: bool,
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            blend_rate: 30.0,
            pinch_gap: 0.02,
            grip_reach: 0.04,
            joint_radius_scale: 0.25,
            finger_size: [1.15, 1.0, 1.0, 0.85, 0.75],
            joint_size: [0.01, 0.026, 0.023, 0.02, 0.015],
            thumb_base_radius_scale: 0.5,
            proxy_box_size: [0.03, 0.1, 0.2],
            visible: true,
            default_material: true,
        }
    }
}

impl HandConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, HandError> {
        let cfg: HandConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), HandError> {
        fn positive(name: &str, v: f32) -> Result<(), HandError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(HandError::InvalidConfig(format!(
                    "{name} must be finite and > 0, got {v}"
                )))
            }
        }

        positive("blend_rate", self.blend_rate)?;
        positive("pinch_gap", self.pinch_gap)?;
        positive("grip_reach", self.grip_reach)?;
        positive("joint_radius_scale", self.joint_radius_scale)?;
        positive("thumb_base_radius_scale", self.thumb_base_radius_scale)?;
        for (i, v) in self.finger_size.iter().enumerate() {
            positive(&format!("finger_size[{i}]"), *v)?;
        }
        for (i, v) in self.joint_size.iter().enumerate() {
            positive(&format!("joint_size[{i}]"), *v)?;
        }
        for (i, v) in self.proxy_box_size.iter().enumerate() {
            positive(&format!("proxy_box_size[{i}]"), *v)?;
        }
        Ok(())
    }

    /// Radius of a projected joint.
    #[inline]
    pub fn joint_radius(&self, finger: Finger, joint: FingerJoint) -> f32 {
        self.finger_size[finger.index()] * self.joint_size[joint.index()] * self.joint_radius_scale
    }
}
