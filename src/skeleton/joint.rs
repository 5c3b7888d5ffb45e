//! Hand joint enumeration.
//!
//! The 26 tracked joints of an articulated hand. Joints form an implicit
//! wrist → metacarpal → proximal → tip tree but are stored as a flat
//! indexed array everywhere in this crate; index stability is the
//! invariant, not hierarchy traversal. The thumb has no intermediate
//! segment.

/// Total number of joints per hand.
pub const JOINT_COUNT: usize = 26;

/// One tracked skeletal point of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandJoint {
    Wrist,
    Palm,
    ThumbMetacarpal,
    ThumbProximal,
    ThumbDistal,
    ThumbTip,
    IndexMetacarpal,
    IndexProximal,
    IndexIntermediate,
    IndexDistal,
    IndexTip,
    MiddleMetacarpal,
    MiddleProximal,
    MiddleIntermediate,
    MiddleDistal,
    MiddleTip,
    RingMetacarpal,
    RingProximal,
    RingIntermediate,
    RingDistal,
    RingTip,
    LittleMetacarpal,
    LittleProximal,
    LittleIntermediate,
    LittleDistal,
    LittleTip,
}

/// All joint names in order, matching `HandJoint` indices.
pub const JOINT_NAMES: [&str; JOINT_COUNT] = [
    "wrist",
    "palm",
    "thumb-metacarpal",
    "thumb-proximal",
    "thumb-distal",
    "thumb-tip",
    "index-metacarpal",
    "index-proximal",
    "index-intermediate",
    "index-distal",
    "index-tip",
    "middle-metacarpal",
    "middle-proximal",
    "middle-intermediate",
    "middle-distal",
    "middle-tip",
    "ring-metacarpal",
    "ring-proximal",
    "ring-intermediate",
    "ring-distal",
    "ring-tip",
    "little-metacarpal",
    "little-proximal",
    "little-intermediate",
    "little-distal",
    "little-tip",
];

impl HandJoint {
    /// All joints in index order.
    pub const ALL: [HandJoint; JOINT_COUNT] = [
        Self::Wrist,
        Self::Palm,
        Self::ThumbMetacarpal,
        Self::ThumbProximal,
        Self::ThumbDistal,
        Self::ThumbTip,
        Self::IndexMetacarpal,
        Self::IndexProximal,
        Self::IndexIntermediate,
        Self::IndexDistal,
        Self::IndexTip,
        Self::MiddleMetacarpal,
        Self::MiddleProximal,
        Self::MiddleIntermediate,
        Self::MiddleDistal,
        Self::MiddleTip,
        Self::RingMetacarpal,
        Self::RingProximal,
        Self::RingIntermediate,
        Self::RingDistal,
        Self::RingTip,
        Self::LittleMetacarpal,
        Self::LittleProximal,
        Self::LittleIntermediate,
        Self::LittleDistal,
        Self::LittleTip,
    ];

    /// Flat array index (0-25).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Joint for a flat array index, if in range.
    pub fn from_index(index: usize) -> Option<HandJoint> {
        Self::ALL.get(index).copied()
    }

    /// String representation for serialized formats.
    pub fn as_str(&self) -> &'static str {
        JOINT_NAMES[self.index()]
    }

    /// Parse a serialized joint name.
    pub fn parse(s: &str) -> Option<HandJoint> {
        JOINT_NAMES
            .iter()
            .position(|&name| name == s)
            .and_then(Self::from_index)
    }

    /// Fingertip joints, thumb first.
    pub fn fingertips() -> [HandJoint; 5] {
        [
            Self::ThumbTip,
            Self::IndexTip,
            Self::MiddleTip,
            Self::RingTip,
            Self::LittleTip,
        ]
    }
}

/// A finger of the hand, in `HandState::finger_curl` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Self::Thumb,
        Self::Index,
        Self::Middle,
        Self::Ring,
        Self::Little,
    ];

    /// The four non-thumb fingers, used by grip-strength calculation.
    pub const NON_THUMB: [Finger; 4] = [Self::Index, Self::Middle, Self::Ring, Self::Little];

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Metacarpal joint of this finger.
    pub fn metacarpal(&self) -> HandJoint {
        match self {
            Self::Thumb => HandJoint::ThumbMetacarpal,
            Self::Index => HandJoint::IndexMetacarpal,
            Self::Middle => HandJoint::MiddleMetacarpal,
            Self::Ring => HandJoint::RingMetacarpal,
            Self::Little => HandJoint::LittleMetacarpal,
        }
    }

    /// Knuckle (proximal) joint of this finger.
    pub fn knuckle(&self) -> HandJoint {
        match self {
            Self::Thumb => HandJoint::ThumbProximal,
            Self::Index => HandJoint::IndexProximal,
            Self::Middle => HandJoint::MiddleProximal,
            Self::Ring => HandJoint::RingProximal,
            Self::Little => HandJoint::LittleProximal,
        }
    }

    /// Middle joint of this finger: the intermediate segment, or the
    /// distal one for the thumb (which has no intermediate).
    pub fn middle_joint(&self) -> HandJoint {
        match self {
            Self::Thumb => HandJoint::ThumbDistal,
            Self::Index => HandJoint::IndexIntermediate,
            Self::Middle => HandJoint::MiddleIntermediate,
            Self::Ring => HandJoint::RingIntermediate,
            Self::Little => HandJoint::LittleIntermediate,
        }
    }

    /// Tip joint of this finger.
    pub fn tip(&self) -> HandJoint {
        match self {
            Self::Thumb => HandJoint::ThumbTip,
            Self::Index => HandJoint::IndexTip,
            Self::Middle => HandJoint::MiddleTip,
            Self::Ring => HandJoint::RingTip,
            Self::Little => HandJoint::LittleTip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_indices_are_stable() {
        assert_eq!(HandJoint::Wrist.index(), 0);
        assert_eq!(HandJoint::Palm.index(), 1);
        assert_eq!(HandJoint::ThumbMetacarpal.index(), 2);
        assert_eq!(HandJoint::IndexMetacarpal.index(), 6);
        assert_eq!(HandJoint::LittleTip.index(), 25);
        assert_eq!(HandJoint::ALL.len(), JOINT_COUNT);
    }

    #[test]
    fn test_names_round_trip() {
        for joint in HandJoint::ALL {
            assert_eq!(HandJoint::parse(joint.as_str()), Some(joint));
        }
        assert_eq!(HandJoint::parse("elbow"), None);
    }

    #[test]
    fn test_from_index_bounds() {
        assert_eq!(HandJoint::from_index(0), Some(HandJoint::Wrist));
        assert_eq!(HandJoint::from_index(25), Some(HandJoint::LittleTip));
        assert_eq!(HandJoint::from_index(26), None);
    }

    #[test]
    fn test_finger_joints() {
        // Thumb skips the intermediate segment
        assert_eq!(Finger::Thumb.middle_joint(), HandJoint::ThumbDistal);
        assert_eq!(Finger::Index.middle_joint(), HandJoint::IndexIntermediate);
        assert_eq!(Finger::Little.tip(), HandJoint::LittleTip);
        assert_eq!(Finger::NON_THUMB.len(), 4);
        assert!(!Finger::NON_THUMB.contains(&Finger::Thumb));
    }
}
