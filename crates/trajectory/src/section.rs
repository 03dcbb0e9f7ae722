use solar_core::state::StateVector;
use solar_ephemeris::BodyId;
use solar_orbits::Orbit;

/// Fraction of a period below which an end before the start counts as rounding.
const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// One arc of an orbit, valid while the mover stays inside `body`'s SOI.
///
/// Times are measured from the orbit's periapsis passage. A section without an
/// end time never leaves its SOI and repeats forever.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySection {
    orbit: Orbit,
    body: BodyId,
    start_t: f64,
    end_t: Option<f64>,
}

impl TrajectorySection {
    pub fn new(orbit: Orbit, body: BodyId, start_t: f64, end_t: Option<f64>) -> Self {
        Self {
            orbit,
            body,
            start_t,
            end_t,
        }
    }

    /// Same arc cut short at `end_t`.
    pub fn with_end(self, end_t: f64) -> Self {
        Self {
            end_t: Some(end_t),
            ..self
        }
    }

    #[inline]
    pub fn orbit(&self) -> &Orbit {
        &self.orbit
    }

    /// Body whose frame the arc is expressed in.
    #[inline]
    pub fn body(&self) -> BodyId {
        self.body
    }

    #[inline]
    pub fn start_t(&self) -> f64 {
        self.start_t
    }

    #[inline]
    pub fn end_t(&self) -> Option<f64> {
        self.end_t
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.end_t.is_none()
    }

    /// Time spent in the section.
    ///
    /// On an ellipse an end before the start wraps by one period. A start already
    /// at or past the exit, which rounding produces on SOI boundaries, gives zero.
    pub fn duration(&self) -> f64 {
        match self.end_t {
            None => f64::INFINITY,
            Some(end_t) => {
                let duration = end_t - self.start_t;
                if duration >= 0.0 {
                    duration
                } else if self.orbit.is_elliptic()
                    && -duration > BOUNDARY_TOLERANCE * self.orbit.period()
                {
                    duration + self.orbit.period()
                } else {
                    0.0
                }
            }
        }
    }

    /// State `t` seconds after entering the section, in the section body's frame.
    pub fn evaluate(&self, t: f64) -> StateVector {
        let mut local = self.start_t + t;
        if self.orbit.is_elliptic() {
            local %= self.orbit.period();
        }
        self.orbit.state_vector(local)
    }

    pub fn start_true_anomaly(&self) -> f64 {
        self.orbit.time_to_true_anomaly(self.start_t)
    }

    pub fn end_true_anomaly(&self) -> Option<f64> {
        self.end_t.map(|end_t| self.orbit.time_to_true_anomaly(end_t))
    }
}
