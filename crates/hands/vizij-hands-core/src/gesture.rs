//! Pinch/grip detection and edge-triggered state flags.

use crate::config::HandConfig;
use crate::ids::{Finger, FingerJoint};
use crate::joint::{at, HandJoint, JointGrid};
use crate::state::InputState;

/// Index and thumb tips closer than `pinch_gap` plus both tip radii.
pub fn is_pinching(joints: &JointGrid<HandJoint>, cfg: &HandConfig) -> bool {
    let index = at(joints, Finger::Index, FingerJoint::Tip);
    let thumb = at(joints, Finger::Thumb, FingerJoint::Tip);
    let reach = cfg.pinch_gap + index.radius + thumb.radius;
    index.position.distance_squared(thumb.position) < reach * reach
}

/// Index and middle tips both curled within `grip_reach` of their metacarpals.
pub fn is_gripping(joints: &JointGrid<HandJoint>, cfg: &HandConfig) -> bool {
    let reach_sq = cfg.grip_reach * cfg.grip_reach;
    let curled = |finger: Finger| {
        let tip = at(joints, finger, FingerJoint::Tip).position;
        let base = at(joints, finger, FingerJoint::Metacarpal).position;
        tip.distance_squared(base) < reach_sq
    };
    curled(Finger::Index) && curled(Finger::Middle)
}

/// Steady flag plus edge flag for one boolean transition.
fn edge(was: bool, now: bool, steady: InputState, rise: InputState, fall: InputState) -> InputState {
    let mut out = InputState::NONE;
    if was != now {
        out |= if now { rise } else { fall };
    }
    if now {
        out |= steady;
    }
    out
}

/// Tracking family for this tick.
pub fn tracked_flags(was_tracked: bool, tracked: bool) -> InputState {
    edge(
        was_tracked,
        tracked,
        InputState::TRACKED,
        InputState::JUST_TRACKED,
        InputState::UNTRACKED,
    )
}

/// Recompute the whole bitset from the previous one and the current skeleton.
/// Edge flags from `prev` never carry over.
pub fn next_state(
    prev: InputState,
    tracked: bool,
    joints: &JointGrid<HandJoint>,
    cfg: &HandConfig,
) -> InputState {
    let pinch = is_pinching(joints, cfg);
    let grip = is_gripping(joints, cfg);
    tracked_flags(prev.is_tracked(), tracked)
        | edge(
            prev.is_pinched(),
            pinch,
            InputState::PINCH,
            InputState::JUST_PINCH,
            InputState::UNPINCH,
        )
        | edge(
            prev.is_gripped(),
            grip,
            InputState::GRIP,
            InputState::JUST_GRIP,
            InputState::UNGRIP,
        )
}
