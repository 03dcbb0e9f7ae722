use solar_config::SolverConfig;

/// Bounds for the patch chain and the SOI entry search.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryConfig {
    pub max_patches: usize,
    pub search_iterations: usize,
    /// Fraction of the estimated time-to-contact taken per step, below 1.
    pub step_damping: f64,
    /// Step cap as a fraction of the arc duration (or period for full orbits).
    pub max_step_fraction: f64,
    pub soi_epsilon: f64,
    /// Search horizon of a section that never exits, in periods.
    pub full_orbit_horizon: f64,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self::from(&SolverConfig::default())
    }
}

impl From<&SolverConfig> for TrajectoryConfig {
    fn from(solver: &SolverConfig) -> Self {
        Self {
            max_patches: solver.max_patches,
            search_iterations: solver.search_iterations,
            step_damping: solver.step_damping,
            max_step_fraction: solver.max_step_fraction,
            soi_epsilon: solver.soi_epsilon,
            full_orbit_horizon: solver.full_orbit_horizon,
        }
    }
}
