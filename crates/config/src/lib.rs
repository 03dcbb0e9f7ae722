//! Configuration models and loaders for body catalogs and trajectory scenarios.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// One gravitating body in a catalog.
#[derive(Debug, Deserialize, Clone)]
pub struct BodyConfig {
    pub name: String,
    /// Name of the body this one orbits. Exactly one body in a catalog has none.
    #[serde(default)]
    pub parent: Option<String>,
    pub mu: f64,
    /// Absent means the sphere of influence is unbounded.
    #[serde(default)]
    pub soi_radius: Option<f64>,
    /// Phase offset added to simulation time when evaluating the body's orbit.
    #[serde(default)]
    pub starting_t: f64,
    #[serde(default)]
    pub orbit: Option<OrbitConfig>,
}

/// Keplerian elements as written in catalogs. Angles are in degrees.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OrbitConfig {
    pub semi_major_axis: f64,
    #[serde(default)]
    pub eccentricity: f64,
    #[serde(default)]
    pub inclination_deg: f64,
    #[serde(default)]
    pub ascending_node_deg: f64,
    #[serde(default)]
    pub argument_of_periapsis_deg: f64,
}

/// A craft's initial state and the solver limits used to predict its path.
#[derive(Debug, Deserialize, Clone)]
pub struct ScenarioConfig {
    pub name: String,
    pub start_body: String,
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    #[serde(default)]
    pub start_time: f64,
    #[serde(default)]
    pub solver: SolverConfig,
}

/// Limits for the patched-conic search.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum number of sections in one prediction.
    pub max_patches: usize,
    /// Iteration cap of the SOI entry search per section.
    pub search_iterations: usize,
    /// Fraction of the estimated time-to-contact taken per search step.
    pub step_damping: f64,
    /// Largest search step as a fraction of the section duration.
    pub max_step_fraction: f64,
    /// Distance tolerance for an SOI entry.
    pub soi_epsilon: f64,
    /// Search horizon for orbits that never leave their SOI, in periods.
    pub full_orbit_horizon: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_patches: 5,
            search_iterations: 500,
            step_damping: 0.5,
            max_step_fraction: 0.1,
            soi_epsilon: 1e-3,
            full_orbit_horizon: 2.0,
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("no scenario found in {0}")]
    EmptyScenario(PathBuf),
}

/// Load a body catalog from a YAML list, a single TOML file, or a directory of TOML files.
pub fn load_bodies<P: AsRef<Path>>(path: P) -> Result<Vec<BodyConfig>, ConfigError> {
    load_records(path)
}

/// Load one scenario from a YAML or TOML file.
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<ScenarioConfig, ConfigError> {
    let path = path.as_ref();
    if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        let scenario: Option<ScenarioConfig> = serde_yaml::from_reader(reader)?;
        scenario.ok_or_else(|| ConfigError::EmptyScenario(path.to_path_buf()))
    }
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}
