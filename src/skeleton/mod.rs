//! Hand skeleton data model.
//!
//! Pose/handedness primitives, the per-tick input frame delivered by a
//! platform integration, and the fixed-size joint-indexed skeleton used in
//! both world space and canonical local space.

pub mod canonical;
pub mod joint;

pub use joint::{Finger, HandJoint, JOINT_COUNT, JOINT_NAMES};

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Which hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// An immutable position + rotation pair. Value type, copied freely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Local +Z axis of this pose's rotation.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Local +Y axis of this pose's rotation.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Bitmask with every joint marked tracked.
pub const FULL_TRACKED_MASK: u32 = (1 << JOINT_COUNT as u32) - 1;

/// Raw per-tick hand data from a platform integration.
///
/// Joint poses are world-space. `tracked_mask` carries per-joint validity
/// (bit N set = joint at flat index N was tracked this frame); calculations
/// that need an untracked joint are skipped for the tick and the dependent
/// output retains its previous value.
///
/// The `Option` override fields are platform capability hooks: when a
/// platform supplies a signal natively, the corresponding fallback
/// calculation is suppressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandFrame {
    pub handedness: Handedness,
    pub is_tracked: bool,
    pub joints: [Pose; JOINT_COUNT],
    #[serde(default = "default_tracked_mask")]
    pub tracked_mask: u32,
    #[serde(default)]
    pub pinch: Option<bool>,
    #[serde(default)]
    pub pinch_strength: Option<f32>,
    #[serde(default)]
    pub is_pointing: Option<bool>,
    #[serde(default)]
    pub pointer_pose: Option<Pose>,
}

fn default_tracked_mask() -> u32 {
    FULL_TRACKED_MASK
}

impl HandFrame {
    /// An untracked frame with identity joints.
    pub fn untracked(handedness: Handedness) -> Self {
        Self {
            handedness,
            is_tracked: false,
            joints: [Pose::IDENTITY; JOINT_COUNT],
            tracked_mask: 0,
            pinch: None,
            pinch_strength: None,
            is_pointing: None,
            pointer_pose: None,
        }
    }

    /// A tracked frame with the given joints and every joint valid.
    pub fn tracked(handedness: Handedness, joints: [Pose; JOINT_COUNT]) -> Self {
        Self {
            handedness,
            is_tracked: true,
            joints,
            tracked_mask: FULL_TRACKED_MASK,
            pinch: None,
            pinch_strength: None,
            is_pointing: None,
            pointer_pose: None,
        }
    }

    /// Whether a single joint carries valid data this frame.
    pub fn has_joint(&self, joint: HandJoint) -> bool {
        self.tracked_mask & (1 << joint.index() as u32) != 0
    }

    /// Pose of a joint, or `None` when the platform did not track it.
    pub fn joint(&self, joint: HandJoint) -> Option<Pose> {
        self.has_joint(joint).then(|| self.joints[joint.index()])
    }

    /// Whether every joint in `joints` is valid this frame.
    pub fn has_joints(&self, joints: &[HandJoint]) -> bool {
        joints.iter().all(|j| self.has_joint(*j))
    }

    /// Wrist pose; the root of the canonical conversion.
    pub fn root_pose(&self) -> Pose {
        self.joints[HandJoint::Wrist.index()]
    }

    /// Mark a joint untracked.
    pub fn clear_joint(&mut self, joint: HandJoint) {
        self.tracked_mask &= !(1 << joint.index() as u32);
    }
}

/// A fixed-size joint-indexed skeleton.
///
/// The same type serves two coordinate spaces: world space (as delivered by
/// the platform, `root_pose` = wrist in world space) and canonical local
/// space (right-hand, root-relative; see [`canonical`]). Conversion between
/// the two is a pure function over the array, never shared mutable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandSkeleton {
    pub joints: [Pose; JOINT_COUNT],
    pub is_tracked: bool,
    pub root_pose: Pose,
}

impl HandSkeleton {
    pub fn new(joints: [Pose; JOINT_COUNT], root_pose: Pose) -> Self {
        Self {
            joints,
            is_tracked: true,
            root_pose,
        }
    }

    pub fn untracked() -> Self {
        Self {
            joints: [Pose::IDENTITY; JOINT_COUNT],
            is_tracked: false,
            root_pose: Pose::IDENTITY,
        }
    }

    pub fn joint(&self, joint: HandJoint) -> Pose {
        self.joints[joint.index()]
    }
}

/// A rotation whose +Z axis points along `forward`, with `up` as the
/// vertical hint.
///
/// Returns identity when `forward` is degenerate (shorter than 1e-5) or
/// parallel to `up` — per-tick math must stay total, so degenerate input
/// falls back rather than erroring.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    if forward.length_squared() < 1e-10 {
        return Quat::IDENTITY;
    }
    let f = forward.normalize();
    let right = up.cross(f);
    if right.length_squared() < 1e-10 {
        return Quat::IDENTITY;
    }
    let right = right.normalize();
    let up = f.cross(right);
    Quat::from_mat3(&glam::Mat3::from_cols(right, up, f))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A full skeleton with every joint at a distinct position.
    pub fn spread_joints() -> [Pose; JOINT_COUNT] {
        let mut joints = [Pose::IDENTITY; JOINT_COUNT];
        for (i, pose) in joints.iter_mut().enumerate() {
            pose.position = Vec3::new(i as f32 * 0.01, (i % 5) as f32 * 0.02, 0.1);
        }
        joints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_joint_mask() {
        let mut frame = HandFrame::tracked(Handedness::Right, [Pose::IDENTITY; JOINT_COUNT]);
        assert!(frame.has_joint(HandJoint::ThumbTip));
        assert!(frame.joint(HandJoint::ThumbTip).is_some());

        frame.clear_joint(HandJoint::ThumbTip);
        assert!(!frame.has_joint(HandJoint::ThumbTip));
        assert!(frame.joint(HandJoint::ThumbTip).is_none());
        assert!(!frame.has_joints(&[HandJoint::IndexTip, HandJoint::ThumbTip]));
        assert!(frame.has_joints(&[HandJoint::IndexTip, HandJoint::Wrist]));
    }

    #[test]
    fn test_untracked_frame() {
        let frame = HandFrame::untracked(Handedness::Left);
        assert!(!frame.is_tracked);
        assert_eq!(frame.tracked_mask, 0);
        assert!(frame.joint(HandJoint::Wrist).is_none());
    }

    #[test]
    fn test_frame_serde_defaults() {
        // A minimal serialized frame fills in the mask and overrides
        let json = serde_json::json!({
            "handedness": "right",
            "is_tracked": true,
            "joints": (0..JOINT_COUNT).map(|_| serde_json::json!({
                "position": [0.0, 0.0, 0.0],
                "rotation": [0.0, 0.0, 0.0, 1.0],
            })).collect::<Vec<_>>(),
        })
        .to_string();

        let frame: HandFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(frame.tracked_mask, FULL_TRACKED_MASK);
        assert!(frame.pinch.is_none());
        assert!(frame.pointer_pose.is_none());
    }

    #[test]
    fn test_pose_axes() {
        let pose = Pose::IDENTITY;
        assert!((pose.forward() - Vec3::Z).length() < 1e-6);
        assert!((pose.up() - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_look_rotation_forward() {
        let q = look_rotation(Vec3::new(1.0, 0.0, 0.0), Vec3::Y);
        let f = q * Vec3::Z;
        assert!((f - Vec3::X).length() < 1e-5, "forward should map to +X, got {f}");
    }

    #[test]
    fn test_look_rotation_degenerate() {
        assert_eq!(look_rotation(Vec3::ZERO, Vec3::Y), Quat::IDENTITY);
        // forward parallel to up
        assert_eq!(look_rotation(Vec3::Y, Vec3::Y), Quat::IDENTITY);
    }
}
