//! Temporal filters over noisy tracking signals.

pub mod stabilizer;
pub mod velocity;

pub use stabilizer::StabilizedRay;
pub use velocity::VelocityEstimator;
