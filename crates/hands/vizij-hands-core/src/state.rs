//! Per-hand input state bitset.
//!
//! Flags are independent: a hand can be tracked, pinching and gripping at the
//! same time. `JUST_*`, `UN*` and `UNTRACKED` are edge flags that only live
//! for the tick where the underlying boolean changed.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputState(u32);

impl InputState {
    pub const NONE: InputState = InputState(0);
    pub const TRACKED: InputState = InputState(1 << 0);
    pub const JUST_TRACKED: InputState = InputState(1 << 1);
    pub const UNTRACKED: InputState = InputState(1 << 2);
    pub const PINCH: InputState = InputState(1 << 3);
    pub const JUST_PINCH: InputState = InputState(1 << 4);
    pub const UNPINCH: InputState = InputState(1 << 5);
    pub const GRIP: InputState = InputState(1 << 6);
    pub const JUST_GRIP: InputState = InputState(1 << 7);
    pub const UNGRIP: InputState = InputState(1 << 8);

    /// Flags that describe tracking rather than gestures.
    pub const TRACKING_FAMILY: InputState =
        InputState(Self::TRACKED.0 | Self::JUST_TRACKED.0 | Self::UNTRACKED.0);

    const NAMES: [(InputState, &'static str); 9] = [
        (Self::TRACKED, "TRACKED"),
        (Self::JUST_TRACKED, "JUST_TRACKED"),
        (Self::UNTRACKED, "UNTRACKED"),
        (Self::PINCH, "PINCH"),
        (Self::JUST_PINCH, "JUST_PINCH"),
        (Self::UNPINCH, "UNPINCH"),
        (Self::GRIP, "GRIP"),
        (Self::JUST_GRIP, "JUST_GRIP"),
        (Self::UNGRIP, "UNGRIP"),
    ];

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Unknown bits are dropped.
    #[inline]
    pub const fn from_bits_truncate(bits: u32) -> Self {
        InputState(bits & 0x1ff)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every flag in `other` is set.
    #[inline]
    pub const fn contains(self, other: InputState) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when any flag in `other` is set.
    #[inline]
    pub const fn intersects(self, other: InputState) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn insert(&mut self, other: InputState) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn set(&mut self, other: InputState, on: bool) {
        if on {
            self.0 |= other.0;
        } else {
            self.0 &= !other.0;
        }
    }

    #[inline]
    pub fn is_tracked(self) -> bool {
        self.contains(Self::TRACKED)
    }

    #[inline]
    pub fn is_pinched(self) -> bool {
        self.contains(Self::PINCH)
    }

    #[inline]
    pub fn is_gripped(self) -> bool {
        self.contains(Self::GRIP)
    }
}

impl BitOr for InputState {
    type Output = InputState;
    fn bitor(self, rhs: Self) -> Self {
        InputState(self.0 | rhs.0)
    }
}

impl BitOrAssign for InputState {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for InputState {
    type Output = InputState;
    fn bitand(self, rhs: Self) -> Self {
        InputState(self.0 & rhs.0)
    }
}

impl fmt::Debug for InputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "InputState(NONE)");
        }
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "InputState({})", names.join(" | "))
    }
}
