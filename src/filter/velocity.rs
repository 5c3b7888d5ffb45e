//! Windowed velocity estimation for the hand root.
//!
//! Per-frame differencing amplifies tracking jitter, so velocity is only
//! recomputed at fixed frame-interval boundaries and blended into the
//! persistent estimate.

use glam::{EulerRot, Quat, Vec3};

use crate::config::VelocityConfig;
use crate::skeleton::Pose;

/// Estimates linear and angular velocity of a palm pose over a fixed
/// frame window.
#[derive(Debug, Clone)]
pub struct VelocityEstimator {
    frame_interval: u32,
    blend: f32,
    frame_count: u32,
    window_start_position: Vec3,
    window_start_normal: Vec3,
    window_start_time: f64,
    velocity: Vec3,
    angular_velocity: Vec3,
}

impl VelocityEstimator {
    pub fn new(config: &VelocityConfig) -> Self {
        Self {
            frame_interval: config.frame_interval.max(1),
            blend: config.blend,
            frame_count: 0,
            window_start_position: Vec3::ZERO,
            window_start_normal: Vec3::Y,
            window_start_time: 0.0,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }

    /// Feed one tick of the palm pose. The estimate only changes on
    /// window-boundary frames.
    pub fn update(&mut self, palm: Pose, time_secs: f64) {
        if self.frame_count == 0 {
            self.begin_window(palm, time_secs);
            self.frame_count = 1;
            return;
        }

        self.frame_count += 1;
        if self.frame_count < self.frame_interval {
            return;
        }

        let elapsed = (time_secs - self.window_start_time) as f32;
        if elapsed > f32::EPSILON {
            let new_velocity = (palm.position - self.window_start_position) / elapsed;
            self.velocity = self.velocity * (1.0 - self.blend) + new_velocity * self.blend;

            let normal = palm_normal(palm);
            let delta = Quat::from_rotation_arc(self.window_start_normal, normal);
            let (x, y, z) = delta.to_euler(EulerRot::XYZ);
            let rate = Vec3::new(x, y, z) / elapsed;
            self.angular_velocity =
                self.angular_velocity * (1.0 - self.blend) + rate * self.blend;
        }

        self.begin_window(palm, time_secs);
        self.frame_count = 1;
    }

    fn begin_window(&mut self, palm: Pose, time_secs: f64) {
        self.window_start_position = palm.position;
        self.window_start_normal = palm_normal(palm);
        self.window_start_time = time_secs;
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    /// Drop the current window and estimates, e.g. after tracking loss.
    pub fn reset(&mut self) {
        self.frame_count = 0;
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }
}

fn palm_normal(palm: Pose) -> Vec3 {
    (palm.rotation * Vec3::Y).normalize_or_zero()
}
