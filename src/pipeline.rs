//! Two-hand pipeline and state fan-out.
//!
//! Owns one [`HandTracker`] per hand, routes incoming frames by
//! handedness, and fans the resulting snapshots out to registered
//! listeners and an optional channel. The pose library is loaded once and
//! shared read-only between the two trackers.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use tracing::trace;

use crate::config::Config;
use crate::error::Result;
use crate::recognize::PoseLibrary;
use crate::skeleton::{HandFrame, Handedness};
use crate::state::HandState;
use crate::tracker::{HandTracker, ViewerPose};

/// Callback invoked with every fresh per-hand snapshot.
pub type StateListener = Box<dyn FnMut(&HandState) + Send>;

/// Tick-driven processing for both hands.
///
/// Single-threaded by contract: the host calls [`update`](Self::update)
/// once per frame per hand from its frame callback.
pub struct HandPipeline {
    left: HandTracker,
    right: HandTracker,
    listeners: Vec<StateListener>,
    sender: Option<Sender<HandState>>,
}

impl HandPipeline {
    /// Validates the configuration and builds both trackers.
    pub fn new(config: Config, library: PoseLibrary) -> Result<Self> {
        config.validate()?;
        let library = Arc::new(library);
        Ok(Self {
            left: HandTracker::new(Handedness::Left, config.clone(), Arc::clone(&library)),
            right: HandTracker::new(Handedness::Right, config, library),
            listeners: Vec::new(),
            sender: None,
        })
    }

    /// Register a listener called with every snapshot produced by
    /// [`update`](Self::update).
    pub fn on_state(&mut self, listener: StateListener) {
        self.listeners.push(listener);
    }

    /// An unbounded channel of snapshot clones, for consumers on another
    /// thread. Dropping the receiver detaches it.
    pub fn snapshot_channel(&mut self) -> Receiver<HandState> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.sender = Some(tx);
        rx
    }

    /// Process one frame for the hand it is tagged with.
    pub fn update(&mut self, frame: &HandFrame, viewer: &ViewerPose, time_secs: f64) -> &HandState {
        let tracker = match frame.handedness {
            Handedness::Left => &mut self.left,
            Handedness::Right => &mut self.right,
        };
        tracker.update(frame, viewer, time_secs);

        // Fan out before handing the borrow back to the caller
        let state = match frame.handedness {
            Handedness::Left => self.left.state(),
            Handedness::Right => self.right.state(),
        };
        trace!(
            hand = %state.handedness.as_str(),
            tracked = state.is_tracked,
            pinching = state.is_pinching,
            "hand state updated"
        );
        for listener in &mut self.listeners {
            listener(state);
        }
        let disconnected = self
            .sender
            .as_ref()
            .is_some_and(|sender| sender.send(state.clone()).is_err());
        if disconnected {
            self.sender = None;
        }

        match frame.handedness {
            Handedness::Left => self.left.state(),
            Handedness::Right => self.right.state(),
        }
    }

    /// Latest snapshot for a hand, without processing anything.
    pub fn state(&self, handedness: Handedness) -> &HandState {
        match handedness {
            Handedness::Left => self.left.state(),
            Handedness::Right => self.right.state(),
        }
    }
}
