//! Dynamic exponential-decay ray stabilizer.
//!
//! Smooths a ray (position + direction) with a per-component half-life
//! filter: small deltas are damped hard, large deltas pass through almost
//! unchanged, so the ray stays pinned while hovering but snaps on real
//! movement.

use glam::{Quat, Vec3};

use crate::skeleton::look_rotation;

/// Per-component decay: `lerp(old, sample, 1 - 0.5^(|sample - old| / half_life))`.
///
/// A half-life of 0 collapses the coefficient to 1 (no smoothing).
fn decay(old: f32, sample: f32, half_life: f32) -> f32 {
    if half_life <= 0.0 {
        return sample;
    }
    let t = 1.0 - 0.5f32.powf((sample - old).abs() / half_life);
    old + (sample - old) * t
}

/// Exponentially stabilized ray state.
#[derive(Debug, Clone)]
pub struct StabilizedRay {
    half_life: f32,
    position: Vec3,
    direction: Vec3,
    initialized: bool,
}

impl StabilizedRay {
    pub fn new(half_life: f32) -> Self {
        Self {
            half_life,
            position: Vec3::ZERO,
            direction: Vec3::Z,
            initialized: false,
        }
    }

    /// Feed one raw sample. The first sample initializes the state
    /// directly; later samples decay toward the raw values per component.
    pub fn add_sample(&mut self, position: Vec3, direction: Vec3) {
        let direction = direction.normalize_or_zero();
        if !self.initialized {
            self.position = position;
            self.direction = direction;
            self.initialized = true;
            return;
        }

        self.position = Vec3::new(
            decay(self.position.x, position.x, self.half_life),
            decay(self.position.y, position.y, self.half_life),
            decay(self.position.z, position.z, self.half_life),
        );
        self.direction = Vec3::new(
            decay(self.direction.x, direction.x, self.half_life),
            decay(self.direction.y, direction.y, self.half_life),
            decay(self.direction.z, direction.z, self.half_life),
        );
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Rotation looking along the stabilized direction; identity when the
    /// interpolated direction has degenerated to (near) zero length.
    pub fn rotation(&self) -> Quat {
        if self.direction.length() > 1e-5 {
            look_rotation(self.direction, Vec3::Y)
        } else {
            Quat::IDENTITY
        }
    }

    /// Forget all samples.
    pub fn reset(&mut self) {
        self.initialized = false;
        self.position = Vec3::ZERO;
        self.direction = Vec3::Z;
    }
}
