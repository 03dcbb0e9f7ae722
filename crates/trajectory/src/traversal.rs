use solar_core::state::StateVector;
use solar_ephemeris::BodyId;

use crate::TrajectoryError;
use crate::trajectory::Trajectory;

/// Something carried along a predicted trajectory.
pub trait MovingTarget {
    /// Called once per SOI boundary crossed, with the body of the new section.
    fn reparent(&mut self, body: BodyId);

    /// Called with the state in the current section's body frame.
    fn set_state(&mut self, state: StateVector);
}

/// Consumes a trajectory front to back as global time advances.
#[derive(Debug, Clone)]
pub struct Traversal {
    trajectory: Trajectory,
    boundary: f64,
}

impl Traversal {
    /// `epoch` is the global time the first section starts at.
    pub fn new(trajectory: Trajectory, epoch: f64) -> Self {
        Self {
            trajectory,
            boundary: epoch,
        }
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Global time at which the current front section started.
    pub fn boundary_time(&self) -> f64 {
        self.boundary
    }

    /// Move `target` to global time `now`.
    ///
    /// Exhausted sections are dropped, carrying the leftover time into the next
    /// one. Returns how many boundaries were crossed. The last section is never
    /// dropped; running past its end is reported as [`TrajectoryError::PastEnd`].
    pub fn advance<T>(&mut self, now: f64, target: &mut T) -> Result<usize, TrajectoryError>
    where
        T: MovingTarget + ?Sized,
    {
        let mut crossed = 0;
        loop {
            let duration = self
                .trajectory
                .front()
                .ok_or(TrajectoryError::Empty)?
                .duration();
            if now - self.boundary <= duration {
                break;
            }
            if self.trajectory.len() == 1 {
                return Err(TrajectoryError::PastEnd {
                    time: now,
                    end: self.boundary + duration,
                });
            }
            self.trajectory.skip()?;
            self.boundary += duration;
            crossed += 1;
            if let Some(next) = self.trajectory.front() {
                target.reparent(next.body());
            }
        }

        let front = self.trajectory.front().ok_or(TrajectoryError::Empty)?;
        target.set_state(front.evaluate(now - self.boundary));
        Ok(crossed)
    }
}
