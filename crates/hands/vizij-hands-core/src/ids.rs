//! Handedness, finger and joint identifiers.
//!
//! Everything inside the core indexes by these enums, so an out-of-range hand
//! or joint cannot be expressed. Raw integers are only accepted through the
//! `TryFrom` impls at the crate boundary.

use serde::{Deserialize, Serialize};

use crate::error::HandError;

pub const FINGERS: usize = 5;
pub const JOINTS_PER_FINGER: usize = 5;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left = 0,
    Right = 1,
}

impl Handedness {
    pub const ALL: [Handedness; 2] = [Handedness::Left, Handedness::Right];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handedness::Left => "left",
            Handedness::Right => "right",
        }
    }
}

impl TryFrom<u32> for Handedness {
    type Error = HandError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Handedness::Left),
            1 => Ok(Handedness::Right),
            other => Err(HandError::InvalidHandedness(other)),
        }
    }
}

/// Fingers from thumb (0) to little finger (4).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finger {
    Thumb = 0,
    Index = 1,
    Middle = 2,
    Ring = 3,
    Little = 4,
}

impl Finger {
    pub const ALL: [Finger; FINGERS] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Little,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for Finger {
    type Error = HandError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Finger::ALL
            .get(value)
            .copied()
            .ok_or(HandError::InvalidFinger(value))
    }
}

/// Joints along a finger, from the base of the hand to the tip.
/// For thumbs, Metacarpal and Proximal share the same position.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerJoint {
    Metacarpal = 0,
    Proximal = 1,
    Intermediate = 2,
    Distal = 3,
    Tip = 4,
}

impl FingerJoint {
    pub const ALL: [FingerJoint; JOINTS_PER_FINGER] = [
        FingerJoint::Metacarpal,
        FingerJoint::Proximal,
        FingerJoint::Intermediate,
        FingerJoint::Distal,
        FingerJoint::Tip,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for FingerJoint {
    type Error = HandError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        FingerJoint::ALL
            .get(value)
            .copied()
            .ok_or(HandError::InvalidJoint(value))
    }
}
