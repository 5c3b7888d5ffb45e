//! Per-hand pose matching with throttling.
//!
//! Two strategies share the same contract: given the live canonical
//! skeleton (or its curl features), return the id of the best-matching
//! reference record, or `None`. Recognition is throttled to every Nth
//! tick per hand; the previous result is held in between. Left and right
//! hands own independent recognizer instances.

use crate::config::{Config, RecognizerConfig, RecognizerStrategy};
use crate::recognize::{PoseLibrary, MIN_SCALE_DISTANCE};
use crate::signals::{curl_features, CurlFeatures};
use crate::skeleton::canonical::wrist_palm_distance;
use crate::skeleton::{Finger, Pose, JOINT_COUNT};
use crate::state::HandState;

/// Flat joint indices below this are excluded from the full comparison:
/// the wrist and palm anchor the canonical frame, and the thumb
/// metacarpal barely moves relative to it.
const COMPARE_START: usize = 3;

/// Feature count of the curl strategy: grip boolean, grip strength, and
/// the four non-thumb finger curls.
const CURL_FEATURE_COUNT: usize = 6;

/// Scale-corrected per-joint position comparison.
///
/// Each record's positions are rescaled by the live/recorded
/// wrist-to-palm ratio, then compared per axis against an absolute
/// tolerance. A record qualifies when at least `required_matches` joints
/// pass; the qualifying record with the highest pass fraction wins.
pub fn recognize_full(
    canonical: &[Pose; JOINT_COUNT],
    library: &PoseLibrary,
    cfg: &RecognizerConfig,
) -> Option<String> {
    let live_scale = wrist_palm_distance(canonical);
    if live_scale < MIN_SCALE_DISTANCE {
        return None;
    }

    let compared = (JOINT_COUNT - COMPARE_START) as f32;
    let mut best: Option<(f32, &str)> = None;
    for record in library.records() {
        let scale = live_scale / record.scale_denominator;
        let mut matches = 0usize;
        for i in COMPARE_START..JOINT_COUNT {
            let expected = record.joints[i].position * scale;
            let actual = canonical[i].position;
            if (actual.x - expected.x).abs() <= cfg.position_tolerance
                && (actual.y - expected.y).abs() <= cfg.position_tolerance
                && (actual.z - expected.z).abs() <= cfg.position_tolerance
            {
                matches += 1;
            }
        }
        if matches < cfg.required_matches {
            continue;
        }
        let fraction = matches as f32 / compared;
        if best.map_or(true, |(b, _)| fraction > b) {
            best = Some((fraction, &record.id));
        }
    }
    best.map(|(_, id)| id.to_string())
}

/// Six-feature grip/curl comparison, cheaper but coarser than the full
/// strategy.
pub fn recognize_curl(
    live: &CurlFeatures,
    live_gripping: bool,
    library: &PoseLibrary,
    config: &Config,
) -> Option<String> {
    let rcfg = &config.recognizer;
    let mut best: Option<(f32, &str)> = None;
    for record in library.records() {
        let recorded = curl_features(&record.joints, &config.signals.curl_ranges);
        let recorded_gripping = recorded.grip_strength >= config.signals.grip_enter_strength;

        let mut passes = 0usize;
        if recorded_gripping == live_gripping {
            passes += 1;
        }
        if (recorded.grip_strength - live.grip_strength).abs() <= rcfg.grip_strength_tolerance {
            passes += 1;
        }
        for finger in Finger::NON_THUMB {
            let delta = recorded.curls[finger.index()] - live.curls[finger.index()];
            if delta.abs() <= rcfg.curl_tolerance {
                passes += 1;
            }
        }

        let fraction = passes as f32 / CURL_FEATURE_COUNT as f32;
        if fraction < rcfg.min_feature_fraction {
            continue;
        }
        if best.map_or(true, |(b, _)| fraction > b) {
            best = Some((fraction, &record.id));
        }
    }
    best.map(|(_, id)| id.to_string())
}

/// Per-hand recognizer state: the throttle counter and the held result.
#[derive(Debug, Clone, Default)]
pub struct PoseRecognizer {
    counter: u32,
    held: Option<String>,
}

impl PoseRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one tick. Recognition recomputes on the first call and every
    /// `tick_interval` calls thereafter; in between the previous result
    /// is held.
    pub fn tick(
        &mut self,
        canonical: &[Pose; JOINT_COUNT],
        state: &HandState,
        library: &PoseLibrary,
        config: &Config,
    ) -> Option<&str> {
        if self.counter == 0 {
            self.held = match config.recognizer.strategy {
                RecognizerStrategy::Full => {
                    recognize_full(canonical, library, &config.recognizer)
                }
                RecognizerStrategy::Curl => {
                    let live = CurlFeatures {
                        curls: state.finger_curl,
                        grip_strength: state.grip_strength,
                    };
                    recognize_curl(&live, state.is_gripping, library, config)
                }
            };
        }
        self.counter = (self.counter + 1) % config.recognizer.tick_interval.max(1);
        self.held.as_deref()
    }

    /// The held result without advancing the throttle.
    pub fn held(&self) -> Option<&str> {
        self.held.as_deref()
    }

    /// Forget the held result and restart the throttle (tracking loss).
    pub fn reset(&mut self) {
        self.counter = 0;
        self.held = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognize::ReferencePoseRecord;
    use crate::skeleton::test_support::spread_joints;
    use crate::skeleton::{HandJoint, Handedness};
    use crate::signals::curl_segments;
    use glam::{Quat, Vec3};

    fn spread_library() -> PoseLibrary {
        PoseLibrary::from_records([ReferencePoseRecord::new("spread", spread_joints())])
    }

    fn scaled(joints: &[Pose; JOINT_COUNT], factor: f32) -> [Pose; JOINT_COUNT] {
        let mut scaled = *joints;
        for pose in scaled.iter_mut() {
            pose.position *= factor;
        }
        scaled
    }

    #[test]
    fn test_full_exact_match() {
        let library = spread_library();
        let result = recognize_full(&spread_joints(), &library, &RecognizerConfig::default());
        assert_eq!(result.as_deref(), Some("spread"));
    }

    #[test]
    fn test_full_scale_invariant() {
        // A hand 1.5x the recorded size still matches: the wrist-to-palm
        // ratio corrects the record before comparison.
        let library =
            PoseLibrary::from_records([ReferencePoseRecord::new(
                "spread",
                scaled(&spread_joints(), 1.5),
            )]);
        let result = recognize_full(&spread_joints(), &library, &RecognizerConfig::default());
        assert_eq!(result.as_deref(), Some("spread"));
    }

    #[test]
    fn test_full_rejects_different_geometry() {
        let library = spread_library();
        let mut live = spread_joints();
        // Move every fingertip well out of tolerance
        for joint in HandJoint::fingertips() {
            live[joint.index()].position += Vec3::new(0.1, 0.0, 0.0);
        }
        let result = recognize_full(&live, &library, &RecognizerConfig::default());
        assert_eq!(result, None);
    }

    #[test]
    fn test_full_picks_highest_pass_fraction() {
        let mut near = spread_joints();
        // Two joints pushed out of tolerance: 21/23 passes
        near[HandJoint::IndexTip.index()].position += Vec3::new(0.05, 0.0, 0.0);
        near[HandJoint::LittleTip.index()].position += Vec3::new(0.05, 0.0, 0.0);

        let library = PoseLibrary::from_records([
            ReferencePoseRecord::new("near", near),
            ReferencePoseRecord::new("exact", spread_joints()),
        ]);
        let cfg = RecognizerConfig {
            required_matches: 20,
            ..RecognizerConfig::default()
        };
        let result = recognize_full(&spread_joints(), &library, &cfg);
        assert_eq!(result.as_deref(), Some("exact"));
    }

    #[test]
    fn test_full_degenerate_live_scale_is_no_match() {
        let library = spread_library();
        let result = recognize_full(
            &[Pose::IDENTITY; JOINT_COUNT],
            &library,
            &RecognizerConfig::default(),
        );
        assert_eq!(result, None);
    }

    /// Joint array with curl segments rotated `angle_deg` off the palm
    /// frame and a non-degenerate wrist-palm span.
    fn curled_record_joints(angle_deg: f32) -> [Pose; JOINT_COUNT] {
        let mut joints = [Pose::IDENTITY; JOINT_COUNT];
        joints[HandJoint::Palm.index()].position = Vec3::new(0.0, 0.0, 0.08);
        let rot = Quat::from_rotation_x(angle_deg.to_radians());
        for finger in Finger::ALL {
            for joint in curl_segments(finger) {
                joints[joint.index()].rotation = rot;
            }
        }
        joints
    }

    #[test]
    fn test_curl_matches_same_features() {
        let config = Config::default();
        let fist = curled_record_joints(170.0);
        let library = PoseLibrary::from_records([ReferencePoseRecord::new("fist", fist)]);

        let live = curl_features(&fist, &config.signals.curl_ranges);
        let gripping = live.grip_strength >= config.signals.grip_enter_strength;
        let result = recognize_curl(&live, gripping, &library, &config);
        assert_eq!(result.as_deref(), Some("fist"));
    }

    #[test]
    fn test_curl_rejects_open_hand_against_fist() {
        let config = Config::default();
        let library = PoseLibrary::from_records([ReferencePoseRecord::new(
            "fist",
            curled_record_joints(170.0),
        )]);

        let open = curl_features(&curled_record_joints(0.0), &config.signals.curl_ranges);
        let result = recognize_curl(&open, false, &library, &config);
        assert_eq!(result, None);
    }

    #[test]
    fn test_recognizer_holds_between_throttle_ticks() {
        let config = Config::default();
        let library = spread_library();
        let mut recognizer = PoseRecognizer::new();
        let state = HandState::new(Handedness::Right);

        let live = spread_joints();
        assert_eq!(
            recognizer.tick(&live, &state, &library, &config).map(str::to_string),
            Some("spread".to_string())
        );

        // Geometry collapses, but the held result persists until the
        // next recomputation boundary
        let garbage = [Pose::IDENTITY; JOINT_COUNT];
        for _ in 0..(config.recognizer.tick_interval - 1) {
            assert_eq!(
                recognizer
                    .tick(&garbage, &state, &library, &config)
                    .map(str::to_string),
                Some("spread".to_string())
            );
        }
        // Tick 11: counter wrapped, recognition re-runs
        assert_eq!(recognizer.tick(&garbage, &state, &library, &config), None);
    }

    #[test]
    fn test_reset_clears_held_pose() {
        let config = Config::default();
        let library = spread_library();
        let mut recognizer = PoseRecognizer::new();
        let state = HandState::new(Handedness::Right);

        recognizer.tick(&spread_joints(), &state, &library, &config);
        assert_eq!(recognizer.held(), Some("spread"));
        recognizer.reset();
        assert_eq!(recognizer.held(), None);
    }
}
