//! Adaptive search for the first entry into a child body's sphere of influence.

use solar_core::vector;
use solar_ephemeris::{BodyId, BodySystem};

use crate::config::TrajectoryConfig;
use crate::section::TrajectorySection;

/// First SOI entry found along a section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Orbit time (since periapsis) of the entry.
    pub time: f64,
    pub body: BodyId,
}

/// Walk `section` forward looking for the first child SOI it enters.
///
/// `epoch` is the global time at the start of the section; candidate bodies are
/// evaluated at `epoch` plus the elapsed section time. Each step covers a damped
/// estimate of the time until the nearest approaching SOI edge is reached, capped
/// at a fraction of the arc. A body whose SOI the mover is leaving (on the edge
/// but receding) does not count as an entry.
pub fn find_intersection(
    system: &BodySystem,
    section: &TrajectorySection,
    epoch: f64,
    config: &TrajectoryConfig,
) -> Option<Intersection> {
    let orbit = section.orbit();
    let inner = orbit.periapsis();
    let outer = if orbit.is_elliptic() {
        orbit.apoapsis()
    } else {
        orbit.primary().soi_radius
    };

    let candidates: Vec<BodyId> = system
        .children(section.body())
        .iter()
        .copied()
        .filter(|&id| {
            let body = system.body(id);
            body.orbit().is_some_and(|child| {
                child.periapsis() - body.soi_radius() <= outer
                    && child.apoapsis() + body.soi_radius() >= inner
            })
        })
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let span = if section.is_full() {
        orbit.characteristic_time()
    } else {
        section.duration()
    };
    let limit = if section.is_full() {
        config.full_orbit_horizon * span
    } else {
        span
    };
    let max_step = config.max_step_fraction * span;

    let mut t = section.start_t();
    for _ in 0..config.search_iterations {
        let elapsed = t - section.start_t();
        if elapsed > limit {
            break;
        }
        let mover = orbit.state_vector(t);
        let global = epoch + elapsed;

        let mut step = f64::INFINITY;
        for &id in &candidates {
            let relative = system.state_vector(id, global) - mover;
            let distance = relative.radius();
            let gap = distance - system.body(id).soi_radius();
            let closing = vector::dot(&relative.velocity, &relative.position) / distance;

            if gap < config.soi_epsilon && (closing < 0.0 || gap < -config.soi_epsilon) {
                log::debug!(
                    "entered SOI of `{}` at t = {:.3} (gap {:.2e})",
                    system.body(id).name(),
                    t,
                    gap
                );
                return Some(Intersection { time: t, body: id });
            }

            let candidate_step = if closing < 0.0 {
                (gap / closing).abs()
            } else {
                max_step
            };
            step = step.min(candidate_step);
        }
        let advance = (step * config.step_damping).min(max_step);
        if advance <= 0.0 {
            break;
        }
        t += advance;
    }

    log::debug!(
        "no SOI entry among {} candidate(s) within {:.3}",
        candidates.len(),
        limit
    );
    None
}
