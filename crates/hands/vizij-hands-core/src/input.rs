//! Per-tick hand input and controller profiles.
//!
//! A hand is driven either by genuine joint tracking from the device layer or
//! by a tracked controller whose trigger/grip buttons pick a canonical pose.
//! Both arrive as a [`HandInput`] and go through the same update contract.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::ids::{Handedness, FINGERS, JOINTS_PER_FINGER};
use crate::joint::{JointGrid, Pose};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandInput {
    /// Articulated tracking. `joints` are palm-local and already in the
    /// hand's own chirality.
    DeviceTracked {
        palm: Pose,
        joints: Box<JointGrid<Pose>>,
        tracked: bool,
    },
    /// Controller emulation: buttons select a canonical pose.
    SimulatedFromButtons {
        palm: Pose,
        tracked: bool,
        trigger: bool,
        grip: bool,
    },
}

impl Default for HandInput {
    fn default() -> Self {
        Self::untracked()
    }
}

impl HandInput {
    /// Simulated input with nothing tracked.
    pub fn untracked() -> Self {
        HandInput::SimulatedFromButtons {
            palm: Pose::IDENTITY,
            tracked: false,
            trigger: false,
            grip: false,
        }
    }

    /// Tracked controller at `palm` with the given buttons.
    pub fn buttons(palm: Pose, trigger: bool, grip: bool) -> Self {
        HandInput::SimulatedFromButtons {
            palm,
            tracked: true,
            trigger,
            grip,
        }
    }

    /// Tracked articulated hand.
    pub fn device(palm: Pose, joints: JointGrid<Pose>) -> Self {
        HandInput::DeviceTracked {
            palm,
            joints: Box::new(joints),
            tracked: true,
        }
    }

    pub fn palm(&self) -> &Pose {
        match self {
            HandInput::DeviceTracked { palm, .. } | HandInput::SimulatedFromButtons { palm, .. } => {
                palm
            }
        }
    }

    pub fn is_tracked(&self) -> bool {
        match self {
            HandInput::DeviceTracked { tracked, .. }
            | HandInput::SimulatedFromButtons { tracked, .. } => *tracked,
        }
    }
}

/// Identity joint grid, handy for building device input by hand.
pub fn identity_joints() -> JointGrid<Pose> {
    [[Pose::IDENTITY; JOINTS_PER_FINGER]; FINGERS]
}

/// Display technology; it changes how Microsoft motion controllers are held.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayKind {
    #[default]
    Opaque,
    SeeThrough,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerProfile {
    MicrosoftMotion,
    HtcVive,
    ValveIndex,
    OculusTouch,
    KhrSimple,
}

impl ControllerProfile {
    pub const ALL: [ControllerProfile; 5] = [
        ControllerProfile::MicrosoftMotion,
        ControllerProfile::HtcVive,
        ControllerProfile::ValveIndex,
        ControllerProfile::OculusTouch,
        ControllerProfile::KhrSimple,
    ];

    pub fn path(self) -> &'static str {
        match self {
            ControllerProfile::MicrosoftMotion => "/interaction_profiles/microsoft/motion_controller",
            ControllerProfile::HtcVive => "/interaction_profiles/htc/vive_controller",
            ControllerProfile::ValveIndex => "/interaction_profiles/valve/index_controller",
            ControllerProfile::OculusTouch => "/interaction_profiles/oculus/touch_controller",
            ControllerProfile::KhrSimple => "/interaction_profiles/khr/simple_controller",
        }
    }

    /// Look up a profile by its interaction-profile path.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.path() == path)
    }

    /// Replace `current` with the profile for `path`. Unknown paths keep the
    /// previous profile. Returns true when the profile changed.
    pub fn switch(current: &mut Option<Self>, handedness: Handedness, path: &str) -> bool {
        let Some(next) = Self::from_path(path) else {
            return false;
        };
        if *current == Some(next) {
            return false;
        }
        log::debug!(
            "switched {} controller profile to {}",
            handedness.as_str(),
            next.path()
        );
        *current = Some(next);
        true
    }

    /// Grip-to-palm offset for a hand.
    pub fn offset(self, handedness: Handedness, display: DisplayKind) -> Pose {
        let side = match handedness {
            Handedness::Left => -1.0,
            Handedness::Right => 1.0,
        };
        let (pitch_deg, position) = match (self, display) {
            (ControllerProfile::MicrosoftMotion, DisplayKind::Opaque) => {
                (-45.0, Vec3::new(0.01, -0.01, 0.015))
            }
            (ControllerProfile::MicrosoftMotion, DisplayKind::SeeThrough) => {
                (-68.0, Vec3::new(0.0, 0.005, 0.0))
            }
            (ControllerProfile::HtcVive | ControllerProfile::ValveIndex, _) => {
                (-40.0, Vec3::new(0.035 * side, 0.0, 0.0))
            }
            (ControllerProfile::OculusTouch, _) => (-80.0, Vec3::new(0.03 * side, 0.01, 0.0)),
            (ControllerProfile::KhrSimple, _) => (0.0, Vec3::ZERO),
        };
        Pose::new(position, Quat::from_rotation_x(f32::to_radians(pitch_deg)))
    }

    /// Convert a controller grip pose into the palm pose the hand is driven by.
    pub fn palm_from_grip(self, handedness: Handedness, display: DisplayKind, grip: &Pose) -> Pose {
        grip.transform(&self.offset(handedness, display))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_tags_variants() {
        let json = serde_json::to_value(HandInput::untracked()).unwrap();
        assert_eq!(json["kind"], "simulated_from_buttons");
        assert_eq!(json["tracked"], false);
        let back: HandInput = serde_json::from_value(json).unwrap();
        assert_eq!(back, HandInput::untracked());
    }

    #[test]
    fn profile_paths_resolve() {
        for p in ControllerProfile::ALL {
            assert_eq!(ControllerProfile::from_path(p.path()), Some(p));
        }
        assert_eq!(ControllerProfile::from_path("/interaction_profiles/unknown"), None);
    }

    #[test]
    fn unknown_path_keeps_previous_profile() {
        let mut current = None;
        assert!(ControllerProfile::switch(
            &mut current,
            Handedness::Left,
            "/interaction_profiles/oculus/touch_controller"
        ));
        assert!(!ControllerProfile::switch(&mut current, Handedness::Left, "/nope"));
        assert_eq!(current, Some(ControllerProfile::OculusTouch));
    }

    #[test]
    fn side_offsets_mirror() {
        let l = ControllerProfile::HtcVive.offset(Handedness::Left, DisplayKind::Opaque);
        let r = ControllerProfile::HtcVive.offset(Handedness::Right, DisplayKind::Opaque);
        assert_eq!(l.position, Vec3::new(-0.035, 0.0, 0.0));
        assert_eq!(r.position, Vec3::new(0.035, 0.0, 0.0));
        let ms = ControllerProfile::MicrosoftMotion.offset(Handedness::Left, DisplayKind::SeeThrough);
        assert_eq!(ms.position, Vec3::new(0.0, 0.005, 0.0));
    }
}
