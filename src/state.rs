//! Per-hand output snapshot.

use glam::Vec3;
use serde::Serialize;

use crate::bounds::HandBounds;
use crate::skeleton::{Handedness, Pose, JOINT_COUNT};

/// Everything the interaction/rendering layer needs about one hand for
/// one tick.
///
/// Recomputed every tick from the incoming frame; there is no cross-tick
/// ownership, but fields whose source joints went untracked keep the
/// previous tick's value rather than resetting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandState {
    pub handedness: Handedness,
    pub is_tracked: bool,
    pub is_pinching: bool,
    /// [0, 1], 1.0 at fingertip contact
    pub pinch_strength: f32,
    pub is_pointing: bool,
    pub is_gripping: bool,
    /// [0, 1], 1.0 at a closed fist
    pub grip_strength: f32,
    /// Per-finger curl strength [0, 1]: thumb, index, middle, ring, little
    pub finger_curl: [f32; 5],
    /// Best-matching reference pose id, if any
    pub recognized_pose: Option<String>,
    /// Stabilized pointer ray pose
    pub pointer_pose: Pose,
    /// Linear velocity of the hand root (units/second)
    pub velocity: Vec3,
    /// Angular velocity of the hand root (radians/second, Euler rates)
    pub angular_velocity: Vec3,
    /// Per-region bounding boxes for physics consumers
    pub bounds: HandBounds,
    /// Canonical local-space joint poses for visualization
    pub canonical_joints: [Pose; JOINT_COUNT],
}

impl HandState {
    pub fn new(handedness: Handedness) -> Self {
        Self {
            handedness,
            is_tracked: false,
            is_pinching: false,
            pinch_strength: 0.0,
            is_pointing: false,
            is_gripping: false,
            grip_strength: 0.0,
            finger_curl: [0.0; 5],
            recognized_pose: None,
            pointer_pose: Pose::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            bounds: HandBounds::default(),
            canonical_joints: [Pose::IDENTITY; JOINT_COUNT],
        }
    }
}
