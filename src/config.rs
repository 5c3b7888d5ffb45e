//! Configuration parsing and management for Handkit
//!
//! Every tunable constant of the pipeline lives here with the empirically
//! observed default: pinch/point thresholds, per-segment curl degree
//! ranges, recognizer tolerances and throttle, debounce window length,
//! stabilizer half-life, velocity window, and bounds level of detail.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::bounds::BoundsMode;
use crate::error::{ConfigError, HandkitError};
use crate::signals::debounce::MAX_WINDOW;
use crate::skeleton::{Finger, JOINT_COUNT};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub signals: SignalConfig,
    pub recognizer: RecognizerConfig,
    pub stabilizer: StabilizerConfig,
    pub velocity: VelocityConfig,
    pub bounds: BoundsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            signals: SignalConfig::default(),
            recognizer: RecognizerConfig::default(),
            stabilizer: StabilizerConfig::default(),
            velocity: VelocityConfig::default(),
            bounds: BoundsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HandkitError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, HandkitError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), HandkitError> {
        if self.signals.debounce_window == 0 || self.signals.debounce_window > MAX_WINDOW {
            return Err(ConfigError::InvalidValue {
                field: "signals.debounce_window".to_string(),
                message: format!("must be between 1 and {}", MAX_WINDOW),
            }
            .into());
        }

        if self.signals.pinch_ramp_distance_sq <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "signals.pinch_ramp_distance_sq".to_string(),
                message: "must be greater than 0".to_string(),
            }
            .into());
        }

        for finger in Finger::ALL {
            for range in self.signals.curl_ranges.for_finger(finger) {
                if range.high <= range.low {
                    return Err(ConfigError::InvalidValue {
                        field: format!("signals.curl_ranges.{:?}", finger),
                        message: format!(
                            "high ({}) must exceed low ({})",
                            range.high, range.low
                        ),
                    }
                    .into());
                }
            }
        }

        if self.recognizer.position_tolerance <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "recognizer.position_tolerance".to_string(),
                message: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.recognizer.tick_interval == 0 {
            return Err(ConfigError::InvalidValue {
                field: "recognizer.tick_interval".to_string(),
                message: "must be at least 1".to_string(),
            }
            .into());
        }

        if self.recognizer.required_matches > JOINT_COUNT {
            return Err(ConfigError::InvalidValue {
                field: "recognizer.required_matches".to_string(),
                message: format!("cannot exceed joint count ({})", JOINT_COUNT),
            }
            .into());
        }

        if self.stabilizer.pointer_half_life < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "stabilizer.pointer_half_life".to_string(),
                message: "must not be negative".to_string(),
            }
            .into());
        }

        if self.velocity.frame_interval == 0 {
            return Err(ConfigError::InvalidValue {
                field: "velocity.frame_interval".to_string(),
                message: "must be at least 1".to_string(),
            }
            .into());
        }

        if !(0.0..=1.0).contains(&self.velocity.blend) {
            return Err(ConfigError::InvalidValue {
                field: "velocity.blend".to_string(),
                message: "must be between 0.0 and 1.0".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Derived signal calculation thresholds (pinch, point, grip, pointer)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Squared thumb-tip↔index-tip distance below which pinch engages (2cm)
    pub pinch_enter_distance_sq: f32,
    /// Squared-distance span of the pinch strength ramp (2cm → 5cm)
    pub pinch_ramp_distance_sq: f32,
    /// Minimum viewer-forward · projected-palm dot product for pointing
    pub point_dot_threshold: f32,
    /// Forward projection distance for the synthesized pointer target
    pub pointer_lookahead: f32,
    /// Unanimous-window length for debounced booleans
    pub debounce_window: usize,
    /// Grip strength at or above which a grip may engage
    pub grip_enter_strength: f32,
    /// Index curl required in addition to grip strength, so a pinch is
    /// never classified as a grip
    pub grip_index_curl: f32,
    /// Per-segment curl angle ranges in degrees
    pub curl_ranges: CurlRanges,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            pinch_enter_distance_sq: 4.0e-4,
            pinch_ramp_distance_sq: 2.1e-3,
            point_dot_threshold: 0.3,
            pointer_lookahead: 10.0,
            debounce_window: 5,
            grip_enter_strength: 0.9,
            grip_index_curl: 0.8,
            curl_ranges: CurlRanges::default(),
        }
    }
}

/// A [low, high] curl angle range in degrees for one finger segment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CurlRange {
    pub low: f32,
    pub high: f32,
}

impl CurlRange {
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    pub fn span(&self) -> f32 {
        self.high - self.low
    }

    /// Normalized position of `angle_deg` inside the range, clamped to [0, 1].
    pub fn normalize(&self, angle_deg: f32) -> f32 {
        ((angle_deg - self.low) / self.span()).clamp(0.0, 1.0)
    }
}

/// Empirical curl ranges, two measured segments per finger: metacarpal +
/// proximal for the thumb, proximal + intermediate for the others.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurlRanges {
    pub thumb: [CurlRange; 2],
    pub index: [CurlRange; 2],
    pub middle: [CurlRange; 2],
    pub ring: [CurlRange; 2],
    pub little: [CurlRange; 2],
}

impl Default for CurlRanges {
    fn default() -> Self {
        let finger = [CurlRange::new(15.0, 110.0), CurlRange::new(25.0, 140.0)];
        Self {
            thumb: [CurlRange::new(10.0, 50.0), CurlRange::new(15.0, 80.0)],
            index: finger,
            middle: finger,
            ring: finger,
            little: finger,
        }
    }
}

impl CurlRanges {
    pub fn for_finger(&self, finger: Finger) -> [CurlRange; 2] {
        match finger {
            Finger::Thumb => self.thumb,
            Finger::Index => self.index,
            Finger::Middle => self.middle,
            Finger::Ring => self.ring,
            Finger::Little => self.little,
        }
    }
}

/// Which comparison the pose recognizer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognizerStrategy {
    /// Per-joint scale-corrected position comparison (precise, O(joints))
    Full,
    /// Six coarse grip/curl features (cheap, for performance-sensitive hosts)
    Curl,
}

/// Static pose recognition tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    pub strategy: RecognizerStrategy,
    /// Absolute per-axis position tolerance for the full strategy
    pub position_tolerance: f32,
    /// Joints that must pass for a record to match (full strategy)
    pub required_matches: usize,
    /// Recognition re-runs every Nth tick per hand; the previous pose id
    /// is held in between
    pub tick_interval: u32,
    /// Per-finger curl delta tolerance (curl strategy)
    pub curl_tolerance: f32,
    /// Grip strength delta tolerance (curl strategy)
    pub grip_strength_tolerance: f32,
    /// Minimum feature pass fraction for the curl strategy
    pub min_feature_fraction: f32,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            strategy: RecognizerStrategy::Full,
            position_tolerance: 0.01,
            required_matches: JOINT_COUNT - 3,
            tick_interval: 10,
            curl_tolerance: 0.15,
            grip_strength_tolerance: 0.15,
            min_feature_fraction: 0.8,
        }
    }
}

/// Pointer ray stabilization tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// Half-life of the exponential decay filter; 0 disables smoothing
    pub pointer_half_life: f32,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            pointer_half_life: 0.05,
        }
    }
}

/// Hand velocity estimation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityConfig {
    /// Frames per differencing window; larger windows suppress jitter
    /// amplification from per-frame differencing
    pub frame_interval: u32,
    /// Weight of the newly measured velocity in the exponential blend
    pub blend: f32,
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self {
            frame_interval: 9,
            blend: 0.2,
        }
    }
}

/// Bounding box level of detail
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsConfig {
    pub mode: BoundsMode,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            mode: BoundsMode::Fine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.signals.debounce_window, 5);
        assert_eq!(config.recognizer.tick_interval, 10);
        assert_eq!(config.recognizer.required_matches, JOINT_COUNT - 3);
        assert_eq!(config.velocity.frame_interval, 9);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = Config::from_str(
            r#"
            [signals]
            debounce_window = 3

            [recognizer]
            strategy = "curl"
            tick_interval = 4

            [bounds]
            mode = "coarse"
            "#,
        )
        .unwrap();

        assert_eq!(config.signals.debounce_window, 3);
        assert_eq!(config.recognizer.strategy, RecognizerStrategy::Curl);
        assert_eq!(config.recognizer.tick_interval, 4);
        assert_eq!(config.bounds.mode, BoundsMode::Coarse);
        // Untouched sections keep defaults
        assert!((config.signals.pinch_enter_distance_sq - 4.0e-4).abs() < 1e-9);
    }

    #[test]
    fn test_parse_error() {
        assert!(Config::from_str("signals = 12").is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.recognizer.tick_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_curl_range() {
        let mut config = Config::default();
        config.signals.curl_ranges.index[0] = CurlRange::new(90.0, 10.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_blend() {
        let mut config = Config::default();
        config.velocity.blend = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_curl_range_normalize() {
        let range = CurlRange::new(20.0, 120.0);
        assert_eq!(range.normalize(20.0), 0.0);
        assert_eq!(range.normalize(120.0), 1.0);
        assert!((range.normalize(70.0) - 0.5).abs() < 1e-6);
        assert_eq!(range.normalize(-10.0), 0.0);
        assert_eq!(range.normalize(200.0), 1.0);
    }
}
