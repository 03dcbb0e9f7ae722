//! Two-body Keplerian orbits: element and state-vector conversion, Kepler solvers,
//! and sphere-of-influence crossings.

pub mod conic;
pub mod orbit;
pub mod rotation;

pub use conic::{ANOMALY_ITERATIONS, Conic, solve_eccentric_anomaly, solve_hyperbolic_anomaly};
pub use orbit::{ECCENTRICITY_EPSILON, Orbit, OrbitalElements, Primary, RADIAL_NUDGE};
pub use rotation::PlaneRotation;
