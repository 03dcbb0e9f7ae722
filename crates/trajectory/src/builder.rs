//! Patched-conic chaining across the body hierarchy.

use solar_config::ScenarioConfig;
use solar_core::state::StateVector;
use solar_ephemeris::{BodyId, BodySystem};
use solar_orbits::Orbit;

use crate::config::TrajectoryConfig;
use crate::search;
use crate::section::TrajectorySection;
use crate::trajectory::Trajectory;
use crate::TrajectoryError;

/// Starting point of a prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryRequest {
    /// Body the state is expressed relative to.
    pub body: BodyId,
    pub state: StateVector,
    /// Global simulation time of `state`.
    pub time: f64,
}

/// A built trajectory and the global time its first section starts at.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub trajectory: Trajectory,
    pub epoch: f64,
    /// Hand-off state waiting past the last section when the patch limit cut the
    /// chain short. `None` when the chain ended on its own.
    pub next: Option<TrajectoryRequest>,
}

impl Prediction {
    /// Global time at which each section starts.
    pub fn section_epochs(&self) -> Vec<f64> {
        let mut epoch = self.epoch;
        self.trajectory
            .sections()
            .map(|section| {
                let start = epoch;
                epoch += section.duration();
                start
            })
            .collect()
    }
}

/// Predict the mover's path, switching reference body at every SOI boundary.
///
/// Each patch fits an orbit to the current state, finds where it leaves the
/// current SOI, and searches the arc for an earlier entry into a child SOI. An
/// entry re-bases the state into the child, an exit re-bases it into the parent,
/// and an orbit that never leaves ends the chain. The chain never holds more
/// than `config.max_patches` sections; when the limit stops it, the pending
/// hand-off is returned in [`Prediction::next`] so a later call can continue.
pub fn plan_trajectory(
    system: &BodySystem,
    request: &TrajectoryRequest,
    config: &TrajectoryConfig,
) -> Prediction {
    let mut trajectory = Trajectory::new();
    let mut body = request.body;
    let mut state = request.state;
    let mut time = request.time;
    let mut finished = false;

    while trajectory.len() < config.max_patches {
        let (orbit, start_anomaly) = Orbit::from_state_vector(system.primary(body), state);
        let start_t = orbit.true_anomaly_to_time(start_anomaly);
        let exit_t = orbit
            .sphere_intersection()
            .map(|exit_anomaly| orbit.true_anomaly_to_time(exit_anomaly));
        let section = TrajectorySection::new(orbit, body, start_t, exit_t);

        if let Some(hit) = search::find_intersection(system, &section, time, config) {
            let section = section.with_end(hit.time);
            let handoff = time + section.duration();
            state = section.orbit().state_vector(hit.time) - system.state_vector(hit.body, handoff);
            log::debug!(
                "patch {}: `{}` -> `{}` at {:.3}",
                trajectory.len(),
                system.body(body).name(),
                system.body(hit.body).name(),
                handoff
            );
            body = hit.body;
            time = handoff;
            trajectory.push(section);
            continue;
        }

        match (section.end_t(), system.parent(body)) {
            (Some(end_t), Some(parent)) => {
                let handoff = time + section.duration();
                state = section.orbit().state_vector(end_t) + system.state_vector(body, handoff);
                log::debug!(
                    "patch {}: `{}` -> `{}` at {:.3}",
                    trajectory.len(),
                    system.body(body).name(),
                    system.body(parent).name(),
                    handoff
                );
                body = parent;
                time = handoff;
                trajectory.push(section);
            }
            (end_t, _) => {
                if end_t.is_some() {
                    log::warn!(
                        "orbit leaves the SOI of root body `{}`; ending prediction there",
                        system.body(body).name()
                    );
                }
                log::debug!(
                    "patch {}: terminal section around `{}`",
                    trajectory.len(),
                    system.body(body).name()
                );
                trajectory.push(section);
                finished = true;
                break;
            }
        }
    }

    let next = (!finished).then_some(TrajectoryRequest { body, state, time });
    Prediction {
        trajectory,
        epoch: request.time,
        next,
    }
}

/// Resolve a scenario against a body system and predict its trajectory.
pub fn plan_scenario(
    system: &BodySystem,
    scenario: &ScenarioConfig,
) -> Result<Prediction, TrajectoryError> {
    let body = system.lookup(&scenario.start_body)?;
    let request = TrajectoryRequest {
        body,
        state: StateVector::new(scenario.position, scenario.velocity),
        time: scenario.start_time,
    };
    Ok(plan_trajectory(
        system,
        &request,
        &TrajectoryConfig::from(&scenario.solver),
    ))
}
