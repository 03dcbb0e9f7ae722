//! Scenario loading: a body catalog plus a craft's starting state.

use std::path::Path;

use thiserror::Error;

use solar_config::{ConfigError, ScenarioConfig, load_bodies, load_scenario};
use solar_ephemeris::{BodySystem, EphemerisError};
use solar_trajectory::{Prediction, TrajectoryConfig, TrajectoryRequest};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("body catalog error: {0}")]
    Ephemeris(#[from] EphemerisError),
}

/// A resolved scenario ready for prediction.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub system: BodySystem,
    pub config: ScenarioConfig,
}

impl Scenario {
    /// Load the catalog at `bodies` and the scenario at `scenario`.
    pub fn load<B, S>(bodies: B, scenario: S) -> Result<Self, ScenarioError>
    where
        B: AsRef<Path>,
        S: AsRef<Path>,
    {
        let system = BodySystem::from_configs(&load_bodies(bodies)?)?;
        let config = load_scenario(scenario)?;
        system.lookup(&config.start_body)?;
        log::info!(
            "scenario `{}` starts around `{}` at t = {}",
            config.name,
            config.start_body,
            config.start_time
        );
        Ok(Self { system, config })
    }

    pub fn request(&self) -> Result<TrajectoryRequest, ScenarioError> {
        Ok(TrajectoryRequest {
            body: self.system.lookup(&self.config.start_body)?,
            state: solar_core::state::StateVector::new(self.config.position, self.config.velocity),
            time: self.config.start_time,
        })
    }

    /// Solver limits from the scenario file.
    pub fn trajectory_config(&self) -> TrajectoryConfig {
        TrajectoryConfig::from(&self.config.solver)
    }

    pub fn predict(&self) -> Result<Prediction, ScenarioError> {
        self.predict_with(&self.trajectory_config())
    }

    pub fn predict_with(&self, config: &TrajectoryConfig) -> Result<Prediction, ScenarioError> {
        let request = self.request()?;
        Ok(solar_trajectory::plan_trajectory(&self.system, &request, config))
    }
}
