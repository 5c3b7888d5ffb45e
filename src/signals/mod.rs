//! Derived semantic signals: pinch, point, grip, and per-finger curl.
//!
//! Stateless metric functions over the current joint array, plus a
//! per-hand [`SignalCalculator`] that applies platform overrides, skips
//! calculations whose joints went untracked (retaining the prior value),
//! and debounces the interaction booleans through unanimous windows.

pub mod debounce;

use glam::{Quat, Vec3};

use crate::config::{CurlRanges, SignalConfig};
use crate::skeleton::{look_rotation, Finger, HandFrame, HandJoint, Pose, JOINT_COUNT};
use crate::state::HandState;
use debounce::DebounceWindow;

/// The two measured curl segments of a finger. The thumb, lacking an
/// intermediate joint, measures metacarpal + proximal; the other fingers
/// measure proximal + intermediate.
pub fn curl_segments(finger: Finger) -> [HandJoint; 2] {
    match finger {
        Finger::Thumb => [HandJoint::ThumbMetacarpal, HandJoint::ThumbProximal],
        other => [other.knuckle(), other.middle_joint()],
    }
}

/// The palm's look rotation, built from its forward/up axes. Curl angles
/// are measured against this frame.
pub fn palm_look_rotation(palm: Pose) -> Quat {
    look_rotation(palm.forward(), palm.up())
}

/// Raw pinch metrics from fingertip positions: (is_pinching, strength).
///
/// Pinch engages below 2cm (squared threshold); strength ramps linearly
/// from 1.0 at 2cm down to 0.0 at 5cm.
pub fn pinch_metrics(thumb_tip: Vec3, index_tip: Vec3, cfg: &SignalConfig) -> (bool, f32) {
    let dist_sq = thumb_tip.distance_squared(index_tip);
    let raw = dist_sq < cfg.pinch_enter_distance_sq;
    let strength =
        (1.0 - (dist_sq - cfg.pinch_enter_distance_sq) / cfg.pinch_ramp_distance_sq)
            .clamp(0.0, 1.0);
    (raw, strength)
}

/// Raw pointing test: project the palm's down vector onto the plane
/// orthogonal to the viewer's up vector and compare against the viewer's
/// forward direction.
pub fn point_metric(palm: Pose, viewer_forward: Vec3, viewer_up: Vec3, threshold: f32) -> bool {
    let v = -palm.up();
    let projected = v - viewer_up * v.dot(viewer_up);
    match projected.try_normalize() {
        Some(dir) => viewer_forward.dot(dir) > threshold,
        None => false,
    }
}

/// Curl state of a full joint array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurlFeatures {
    /// Per-finger curl strength [0, 1], thumb first.
    pub curls: [f32; 5],
    /// Normalized grip strength from the four non-thumb fingers.
    pub grip_strength: f32,
}

/// Curl angle of a single segment against the palm frame, in degrees.
fn segment_angle_deg(palm_look: Quat, joint_rotation: Quat) -> f32 {
    palm_look.angle_between(joint_rotation).to_degrees()
}

/// Compute per-finger curl strengths and grip strength for a complete
/// joint array (used both per-tick and against recorded reference poses).
///
/// Finger curl averages the two measured segments' normalized angles.
/// Grip strength sums the non-thumb intermediate segments' curl distances
/// and divides by the summed range of all four.
pub fn curl_features(joints: &[Pose; JOINT_COUNT], ranges: &CurlRanges) -> CurlFeatures {
    let palm_look = palm_look_rotation(joints[HandJoint::Palm.index()]);

    let mut curls = [0.0f32; 5];
    for finger in Finger::ALL {
        let segments = curl_segments(finger);
        let segment_ranges = ranges.for_finger(finger);
        let mut total = 0.0;
        for (joint, range) in segments.iter().zip(segment_ranges.iter()) {
            let angle = segment_angle_deg(palm_look, joints[joint.index()].rotation);
            total += range.normalize(angle);
        }
        curls[finger.index()] = total / segments.len() as f32;
    }

    let mut curl_distance = 0.0;
    let mut range_total = 0.0;
    for finger in Finger::NON_THUMB {
        let range = ranges.for_finger(finger)[1];
        let joint = curl_segments(finger)[1];
        let angle = segment_angle_deg(palm_look, joints[joint.index()].rotation);
        curl_distance += (angle - range.low).clamp(0.0, range.span());
        range_total += range.span();
    }

    CurlFeatures {
        curls,
        grip_strength: if range_total > 0.0 {
            curl_distance / range_total
        } else {
            0.0
        },
    }
}

/// Synthesized pointer pose for platforms that don't supply one: the
/// midpoint of thumb-proximal and index-distal, aimed at a target
/// projected `lookahead` units along the palm's forward axis, oriented by
/// the viewer's up vector.
pub fn fallback_pointer_pose(
    thumb_proximal: Vec3,
    index_distal: Vec3,
    palm_forward: Vec3,
    viewer_up: Vec3,
    lookahead: f32,
) -> Pose {
    let origin = (thumb_proximal + index_distal) * 0.5;
    let target = origin + palm_forward * lookahead;
    Pose {
        position: origin,
        rotation: look_rotation(target - origin, viewer_up),
    }
}

/// Per-hand signal state: debounce windows for the interaction booleans.
#[derive(Debug, Clone)]
pub struct SignalCalculator {
    pinch_window: DebounceWindow,
    point_window: DebounceWindow,
    grip_window: DebounceWindow,
}

impl SignalCalculator {
    pub fn new(window: usize) -> Self {
        Self {
            pinch_window: DebounceWindow::new(window),
            point_window: DebounceWindow::new(window),
            grip_window: DebounceWindow::new(window),
        }
    }

    /// Discard all buffered samples (tracking loss).
    pub fn reset(&mut self) {
        self.pinch_window.reset();
        self.point_window.reset();
        self.grip_window.reset();
    }

    /// Run all sub-calculations for one tick, writing into `state`.
    ///
    /// Returns the raw pointer pose for this tick (platform override or
    /// synthesized fallback), or `None` when the joints it depends on were
    /// untracked — the caller retains its previous pointer in that case.
    /// Fields whose joints are missing keep their previous value in
    /// `state`; the debounce windows are not fed for skipped signals.
    pub fn update(
        &mut self,
        frame: &HandFrame,
        viewer_forward: Vec3,
        viewer_up: Vec3,
        cfg: &SignalConfig,
        state: &mut HandState,
    ) -> Option<Pose> {
        // Pinch: the boolean and strength overrides are independent
        // capabilities; the fingertip-distance fallback fills in
        // whichever of the two the platform does not supply
        let metrics = match (
            frame.joint(HandJoint::ThumbTip),
            frame.joint(HandJoint::IndexTip),
        ) {
            (Some(thumb), Some(index)) => {
                Some(pinch_metrics(thumb.position, index.position, cfg))
            }
            _ => None,
        };
        if let Some(strength) = frame.pinch_strength {
            state.pinch_strength = strength.clamp(0.0, 1.0);
        } else if let Some((_, strength)) = metrics {
            state.pinch_strength = strength;
        }
        if let Some(raw) = frame.pinch.or(metrics.map(|(raw, _)| raw)) {
            state.is_pinching = self.pinch_window.push(raw);
        }

        let palm = frame.joint(HandJoint::Palm);

        // Point: override, else palm projection — only evaluated while
        // not pinching
        let point_raw = match frame.is_pointing {
            Some(raw) => Some(raw),
            None => palm.map(|palm| {
                !state.is_pinching
                    && point_metric(palm, viewer_forward, viewer_up, cfg.point_dot_threshold)
            }),
        };
        if let Some(raw) = point_raw {
            state.is_pointing = self.point_window.push(raw);
        }

        // Curl + grip need the palm frame and every measured segment
        let curl_joints_tracked = frame.has_joint(HandJoint::Palm)
            && Finger::ALL
                .iter()
                .all(|f| frame.has_joints(&curl_segments(*f)));
        if curl_joints_tracked {
            let features = curl_features(&frame.joints, &cfg.curl_ranges);
            state.finger_curl = features.curls;
            state.grip_strength = features.grip_strength;

            // The index-curl conjunction keeps a pinch from reading as a
            // grip; an active pinch excludes grip outright.
            let grip_raw = !state.is_pinching
                && features.grip_strength >= cfg.grip_enter_strength
                && features.curls[Finger::Index.index()] >= cfg.grip_index_curl;
            state.is_gripping = self.grip_window.push(grip_raw);
        }

        // Pointer pose: platform override, else synthesized fallback
        if let Some(pose) = frame.pointer_pose {
            return Some(pose);
        }
        match (
            frame.joint(HandJoint::ThumbProximal),
            frame.joint(HandJoint::IndexDistal),
            palm,
        ) {
            (Some(thumb), Some(index), Some(palm)) => Some(fallback_pointer_pose(
                thumb.position,
                index.position,
                palm.forward(),
                viewer_up,
                cfg.pointer_lookahead,
            )),
            _ => None,
        }
    }
}
