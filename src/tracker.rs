//! Per-hand tick orchestration.
//!
//! A [`HandTracker`] owns all mutable per-hand state (debounce windows,
//! velocity window, recognition throttle, pointer filter, cached bounds)
//! and runs the full per-tick sequence: canonical normalization, derived
//! signals, pose recognition, velocity, pointer stabilization, bounds.
//! Nothing here is shared between hands.

use std::sync::Arc;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bounds::HandBoundsBuilder;
use crate::config::Config;
use crate::filter::{StabilizedRay, VelocityEstimator};
use crate::recognize::{PoseLibrary, PoseRecognizer};
use crate::signals::SignalCalculator;
use crate::skeleton::{canonical, HandFrame, HandJoint, HandSkeleton, Handedness, Pose};
use crate::state::HandState;

/// The viewer's (camera/head) pose, needed for the point signal and
/// pointer orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for ViewerPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl ViewerPose {
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

/// All tracking state for one hand.
pub struct HandTracker {
    handedness: Handedness,
    config: Config,
    library: Arc<PoseLibrary>,
    signals: SignalCalculator,
    recognizer: PoseRecognizer,
    velocity: VelocityEstimator,
    pointer_filter: StabilizedRay,
    bounds: HandBoundsBuilder,
    state: HandState,
}

impl HandTracker {
    pub fn new(handedness: Handedness, config: Config, library: Arc<PoseLibrary>) -> Self {
        Self {
            handedness,
            signals: SignalCalculator::new(config.signals.debounce_window),
            recognizer: PoseRecognizer::new(),
            velocity: VelocityEstimator::new(&config.velocity),
            pointer_filter: StabilizedRay::new(config.stabilizer.pointer_half_life),
            bounds: HandBoundsBuilder::new(config.bounds.mode),
            state: HandState::new(handedness),
            config,
            library,
        }
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn state(&self) -> &HandState {
        &self.state
    }

    /// The canonical-space skeleton from the last tick, for
    /// visualization. Its root pose is the identity by construction.
    pub fn canonical_skeleton(&self) -> HandSkeleton {
        if self.state.is_tracked {
            HandSkeleton::new(self.state.canonical_joints, Pose::IDENTITY)
        } else {
            HandSkeleton::untracked()
        }
    }

    /// Process one tick of tracking data.
    ///
    /// `time_secs` is the host's monotonic frame time; it only has to be
    /// consistent across calls, not wall-clock.
    pub fn update(&mut self, frame: &HandFrame, viewer: &ViewerPose, time_secs: f64) -> &HandState {
        if !frame.is_tracked {
            if self.state.is_tracked {
                debug!(hand = %self.handedness.as_str(), "tracking lost");
            }
            self.on_tracking_lost();
            return &self.state;
        }
        self.state.is_tracked = true;

        // Canonical space: wrist-relative, viewer-aligned, mirrored to a
        // right hand
        let canonical = canonical::normalize(
            &frame.joints,
            frame.handedness,
            frame.root_pose(),
            viewer.rotation,
        );
        self.state.canonical_joints = canonical;

        let raw_pointer = self.signals.update(
            frame,
            viewer.forward(),
            viewer.up(),
            &self.config.signals,
            &mut self.state,
        );

        let recognized = self
            .recognizer
            .tick(&canonical, &self.state, &self.library, &self.config)
            .map(str::to_string);
        self.state.recognized_pose = recognized;

        if let Some(palm) = frame.joint(HandJoint::Palm) {
            self.velocity.update(palm, time_secs);
            self.state.velocity = self.velocity.velocity();
            self.state.angular_velocity = self.velocity.angular_velocity();
        }

        if let Some(raw) = raw_pointer {
            if frame.pointer_pose.is_some() {
                // Platform-provided pointers arrive already stabilized
                self.state.pointer_pose = raw;
            } else {
                self.pointer_filter.add_sample(raw.position, raw.forward());
                self.state.pointer_pose = Pose::new(
                    self.pointer_filter.position(),
                    self.pointer_filter.rotation(),
                );
            }
        }

        self.bounds.rebuild(frame);
        self.state.bounds = self.bounds.bounds().clone();

        &self.state
    }

    /// Clear the temporal state that must not survive a tracking gap.
    /// Strengths, curls, bounds, and the last recognized pose stay
    /// cached; the interaction booleans drop so a stale pinch cannot keep
    /// an interaction alive.
    fn on_tracking_lost(&mut self) {
        self.state.is_tracked = false;
        self.state.is_pinching = false;
        self.state.is_pointing = false;
        self.state.is_gripping = false;
        self.signals.reset();
        self.velocity.reset();
        self.pointer_filter.reset();
        self.recognizer.reset();
    }
}
