//! Handkit - Hand-Pose Tracking Core
//!
//! A host-agnostic library for processing articulated hand tracking data:
//! - Converts raw per-joint world-space poses into a canonical right-hand,
//!   root-relative skeleton
//! - Derives semantic signals (pinch, point, grip, per-finger curl) with
//!   temporal debouncing
//! - Recognizes static poses against a recorded reference library
//! - Stabilizes pointer rays and estimates hand velocity over time
//! - Builds per-region bounding boxes for physics/collision consumers
//!
//! The library is tick-driven and synchronous: the host calls
//! [`pipeline::HandPipeline::update`] once per frame with a
//! [`skeleton::HandFrame`] and receives a [`state::HandState`] snapshot.
//! No ambient globals — every cross-cutting input (viewer pose, pose
//! library, configuration) is passed explicitly.

pub mod bounds;
pub mod config;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod recognize;
pub mod signals;
pub mod skeleton;
pub mod state;
pub mod tracker;

pub use config::Config;
pub use error::{HandkitError, Result};
pub use pipeline::HandPipeline;
pub use skeleton::{HandFrame, Handedness, Pose};
pub use state::HandState;
pub use tracker::{HandTracker, ViewerPose};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
