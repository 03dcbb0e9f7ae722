use std::collections::VecDeque;

use solar_core::state::StateVector;
use solar_ephemeris::BodySystem;

use crate::TrajectoryError;
use crate::section::TrajectorySection;

/// Chronological queue of patched-conic sections.
///
/// Only grows at the back while being built and only shrinks at the front while
/// being consumed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    sections: VecDeque<TrajectorySection>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, section: TrajectorySection) {
        self.sections.push_back(section);
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn front(&self) -> Option<&TrajectorySection> {
        self.sections.front()
    }

    pub fn last(&self) -> Option<&TrajectorySection> {
        self.sections.back()
    }

    pub fn get(&self, index: usize) -> Option<&TrajectorySection> {
        self.sections.get(index)
    }

    /// Sections front to back. The iterator is `Clone`, so renderers can restart it.
    pub fn sections(&self) -> impl Iterator<Item = &TrajectorySection> + Clone + '_ {
        self.sections.iter()
    }

    /// Drop the front section once time has moved past it.
    pub fn skip(&mut self) -> Result<TrajectorySection, TrajectoryError> {
        self.sections.pop_front().ok_or_else(|| {
            log::warn!("skip called on an empty trajectory");
            TrajectoryError::Empty
        })
    }

    /// Sum of durations up to and including the first section that never ends.
    pub fn total_duration(&self) -> f64 {
        let mut total = 0.0;
        for section in &self.sections {
            total += section.duration();
            if section.is_full() {
                break;
            }
        }
        total
    }

    /// Section covering time `t` since the start of the trajectory, with the time
    /// left over inside that section.
    pub fn locate(&self, t: f64) -> Result<(&TrajectorySection, f64), TrajectoryError> {
        if self.sections.is_empty() {
            return Err(TrajectoryError::Empty);
        }
        let mut remaining = t;
        for section in &self.sections {
            let duration = section.duration();
            if remaining <= duration {
                return Ok((section, remaining));
            }
            remaining -= duration;
        }
        Err(TrajectoryError::PastEnd {
            time: t,
            end: self.total_duration(),
        })
    }

    /// State at `t` since the start, relative to the body of the covering section.
    pub fn evaluate(&self, t: f64) -> Result<StateVector, TrajectoryError> {
        let (section, local) = self.locate(t)?;
        Ok(section.evaluate(local))
    }

    /// State at `t` since the start, relative to the root body. `epoch` is the
    /// global time the trajectory starts at.
    pub fn evaluate_global(
        &self,
        system: &BodySystem,
        epoch: f64,
        t: f64,
    ) -> Result<StateVector, TrajectoryError> {
        let (section, local) = self.locate(t)?;
        Ok(section.evaluate(local) + system.global_state_vector(section.body(), epoch + t))
    }
}
