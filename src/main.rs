//! Handkit - Hand Tracking Replay Tool
//!
//! Feeds a recorded capture (JSON) through the full tracking pipeline and
//! logs the derived signal transitions, for tuning thresholds offline.

use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::thread;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use handkit::{
    recognize::PoseLibrary, Config, HandFrame, HandPipeline, HandState, Handedness, ViewerPose,
};

/// Handkit - replay recorded hand tracking captures
#[derive(Parser, Debug)]
#[command(name = "handkit", version, about, long_about = None)]
struct Args {
    /// Recorded capture file (JSON)
    recording: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reference pose library path
    #[arg(short, long)]
    library: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// One recorded tick: the viewer pose plus every hand frame captured in
/// that host frame.
#[derive(Debug, Deserialize)]
struct RecordedTick {
    time: f64,
    #[serde(default)]
    viewer: ViewerPose,
    hands: Vec<HandFrame>,
}

#[derive(Debug, Deserialize)]
struct Recording {
    ticks: Vec<RecordedTick>,
}

impl Recording {
    fn from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Signal edges worth logging between consecutive snapshots of one hand.
#[derive(Debug, Default, Clone)]
struct EdgeTracker {
    pinching: bool,
    pointing: bool,
    gripping: bool,
    recognized: Option<String>,
}

impl EdgeTracker {
    fn observe(&mut self, state: &HandState) {
        let hand = state.handedness.as_str();
        if state.is_pinching != self.pinching {
            info!(hand, pinching = state.is_pinching, strength = state.pinch_strength, "pinch edge");
            self.pinching = state.is_pinching;
        }
        if state.is_pointing != self.pointing {
            info!(hand, pointing = state.is_pointing, "point edge");
            self.pointing = state.is_pointing;
        }
        if state.is_gripping != self.gripping {
            info!(hand, gripping = state.is_gripping, strength = state.grip_strength, "grip edge");
            self.gripping = state.is_gripping;
        }
        if state.recognized_pose != self.recognized {
            match &state.recognized_pose {
                Some(id) => info!(hand, pose = %id, "pose recognized"),
                None => info!(hand, "pose released"),
            }
            self.recognized = state.recognized_pose.clone();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting {} v{}", handkit::NAME, handkit::VERSION);

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.validate()?;

    let library = match &args.library {
        Some(path) => PoseLibrary::from_file(path)?,
        None => PoseLibrary::empty(),
    };
    info!(poses = library.len(), "pose library ready");

    let recording = Recording::from_file(&args.recording)?;
    info!(
        path = %args.recording.display(),
        ticks = recording.ticks.len(),
        "replaying capture"
    );

    let mut pipeline = HandPipeline::new(config, library)?;
    let snapshots = pipeline.snapshot_channel();

    // Edge logging runs off-thread on the snapshot channel, the way a
    // host interaction layer would consume it
    let logger = thread::spawn(move || {
        let mut left = EdgeTracker::default();
        let mut right = EdgeTracker::default();
        let mut count = 0usize;
        for state in snapshots.iter() {
            match state.handedness {
                Handedness::Left => left.observe(&state),
                Handedness::Right => right.observe(&state),
            }
            count += 1;
        }
        count
    });

    for tick in &recording.ticks {
        for frame in &tick.hands {
            pipeline.update(frame, &tick.viewer, tick.time);
        }
    }

    drop(pipeline);
    let processed = logger
        .join()
        .map_err(|_| anyhow::anyhow!("snapshot logger thread panicked"))?;
    info!(snapshots = processed, "replay complete");

    Ok(())
}
