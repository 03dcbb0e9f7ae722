//! Patched-conic trajectory prediction.
//!
//! A [`Trajectory`] is a queue of [`TrajectorySection`]s, each one arc of a single
//! orbit inside one body's sphere of influence. [`plan_trajectory`] builds it by
//! chaining conics across SOI boundaries; [`Traversal`] drains it as time passes.

pub mod builder;
pub mod cache;
pub mod config;
pub mod search;
pub mod section;
pub mod trajectory;
pub mod traversal;

pub use builder::{Prediction, TrajectoryRequest, plan_scenario, plan_trajectory};
pub use cache::PredictionCache;
pub use config::TrajectoryConfig;
pub use search::{Intersection, find_intersection};
pub use section::TrajectorySection;
pub use trajectory::Trajectory;
pub use traversal::{MovingTarget, Traversal};

use solar_ephemeris::EphemerisError;

/// Errors surfaced while building or consuming a trajectory.
#[derive(Debug, thiserror::Error)]
pub enum TrajectoryError {
    #[error("trajectory has no sections")]
    Empty,
    #[error("time {time} lies past the end of the trajectory at {end}")]
    PastEnd { time: f64, end: f64 },
    #[error("body lookup failed: {0}")]
    Ephemeris(#[from] EphemerisError),
}
