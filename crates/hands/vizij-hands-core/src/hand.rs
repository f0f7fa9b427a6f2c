//! Per-hand state.
//!
//! [`Hand`] is the public snapshot (what applications read each frame).
//! `HandSlot` wraps it with everything the system owns on its behalf.

use serde::{Deserialize, Serialize};

use crate::backend::MaterialId;
use crate::blend::BlendBuffer;
use crate::collision::CollisionProxy;
use crate::ids::{Finger, FingerJoint, Handedness, FINGERS, JOINTS_PER_FINGER};
use crate::joint::{at, HandJoint, JointGrid, Pose};
use crate::mesh::HandMesh;
use crate::state::InputState;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub handedness: Handedness,
    pub palm: Pose,
    /// World-space joints, `[finger][joint]`.
    pub fingers: JointGrid<HandJoint>,
    pub state: InputState,
}

impl Hand {
    pub fn new(handedness: Handedness) -> Self {
        Self {
            handedness,
            palm: Pose::IDENTITY,
            fingers: [[HandJoint::default(); JOINTS_PER_FINGER]; FINGERS],
            state: InputState::NONE,
        }
    }

    #[inline]
    pub fn joint(&self, finger: Finger, joint: FingerJoint) -> &HandJoint {
        at(&self.fingers, finger, joint)
    }

    #[inline]
    pub fn is_tracked(&self) -> bool {
        self.state.is_tracked()
    }
}

#[derive(Debug)]
pub(crate) struct HandSlot {
    pub info: Hand,
    pub blend: BlendBuffer,
    pub mesh: HandMesh,
    pub proxy: CollisionProxy,
    pub material: Option<MaterialId>,
    pub visible: bool,
    pub solid: bool,
}
