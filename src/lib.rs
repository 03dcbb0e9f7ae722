//! Patched-conic orbit propagation and trajectory prediction.
//!
//! The numeric work lives in the workspace crates; this facade re-exports them
//! and adds scenario loading for the binaries.

pub mod scenario;

pub use solar_config as config;
pub use solar_core::{constants, state, time, vector};
pub use solar_ephemeris as ephemeris;
pub use solar_export as export;
pub use solar_orbits as orbits;
pub use solar_trajectory as trajectory;

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
