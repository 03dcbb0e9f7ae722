//! Closed-form relations for the two conic kinds a patched trajectory can follow.
//!
//! Every function here is written once per variant: the elliptical branch works in
//! eccentric anomaly `E`, the hyperbolic branch in hyperbolic anomaly `H`. Callers
//! only ever see "the anomaly" and let the variant pick the formula.

use solar_core::constants::TAU;

/// Fixed Newton-Raphson iteration count for Kepler's equation.
///
/// There is no convergence check: eight steps from the start values below reach
/// double precision for every eccentricity this crate produces.
pub const ANOMALY_ITERATIONS: usize = 8;

/// Shape of a Keplerian orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conic {
    /// `0 < e < 1`, `a > 0`.
    Elliptic { a: f64, e: f64 },
    /// `e > 1`, `a < 0`.
    Hyperbolic { a: f64, e: f64 },
}

impl Conic {
    /// Classify a semi-major axis / eccentricity pair. The sign of `a` follows the kind.
    pub fn new(a: f64, e: f64) -> Self {
        if e > 1.0 {
            Conic::Hyperbolic { a: -a.abs(), e }
        } else {
            Conic::Elliptic { a: a.abs(), e }
        }
    }

    #[inline]
    pub fn semi_major_axis(&self) -> f64 {
        match *self {
            Conic::Elliptic { a, .. } | Conic::Hyperbolic { a, .. } => a,
        }
    }

    #[inline]
    pub fn eccentricity(&self) -> f64 {
        match *self {
            Conic::Elliptic { e, .. } | Conic::Hyperbolic { e, .. } => e,
        }
    }

    #[inline]
    pub fn is_elliptic(&self) -> bool {
        matches!(self, Conic::Elliptic { .. })
    }

    /// Ratio of semi-minor to semi-major axis (b / a).
    pub fn axis_ratio(&self) -> f64 {
        match *self {
            Conic::Elliptic { e, .. } => (1.0 - e * e).sqrt(),
            Conic::Hyperbolic { e, .. } => (e * e - 1.0).sqrt(),
        }
    }

    pub fn periapsis(&self) -> f64 {
        let a = self.semi_major_axis();
        a * (1.0 - self.eccentricity())
    }

    /// Farthest distance from the focus. Negative for hyperbolas, where it has no meaning.
    pub fn apoapsis(&self) -> f64 {
        let a = self.semi_major_axis();
        a * (1.0 + self.eccentricity())
    }

    /// Reduce a mean anomaly into one revolution. Hyperbolic mean anomaly never wraps.
    #[inline]
    pub fn wrap_mean_anomaly(&self, mean_anomaly: f64) -> f64 {
        match self {
            Conic::Elliptic { .. } => mean_anomaly % TAU,
            Conic::Hyperbolic { .. } => mean_anomaly,
        }
    }

    /// Solve Kepler's equation for the anomaly matching `mean_anomaly`.
    pub fn solve_kepler(&self, mean_anomaly: f64) -> f64 {
        match *self {
            Conic::Elliptic { e, .. } => {
                solve_eccentric_anomaly(mean_anomaly, e, ANOMALY_ITERATIONS)
            }
            Conic::Hyperbolic { e, .. } => {
                solve_hyperbolic_anomaly(mean_anomaly, e, ANOMALY_ITERATIONS)
            }
        }
    }

    /// Mean anomaly reached at the given anomaly.
    pub fn mean_from_anomaly(&self, anomaly: f64) -> f64 {
        match *self {
            Conic::Elliptic { e, .. } => anomaly - e * anomaly.sin(),
            Conic::Hyperbolic { e, .. } => e * anomaly.sinh() - anomaly,
        }
    }

    pub fn anomaly_to_true(&self, anomaly: f64) -> f64 {
        match *self {
            Conic::Elliptic { e, .. } => {
                2.0 * (((1.0 + e) / (1.0 - e)).sqrt() * (anomaly * 0.5).tan()).atan()
            }
            Conic::Hyperbolic { e, .. } => {
                2.0 * (((e + 1.0) / (e - 1.0)).sqrt() * (anomaly * 0.5).tanh()).atan()
            }
        }
    }

    pub fn true_to_anomaly(&self, true_anomaly: f64) -> f64 {
        match *self {
            Conic::Elliptic { e, .. } => {
                2.0 * (((1.0 - e) / (1.0 + e)).sqrt() * (true_anomaly * 0.5).tan()).atan()
            }
            Conic::Hyperbolic { e, .. } => {
                2.0 * (((e - 1.0) / (e + 1.0)).sqrt() * (true_anomaly * 0.5).tan()).atanh()
            }
        }
    }

    /// Distance from the focus at the given anomaly.
    pub fn radius_at(&self, anomaly: f64) -> f64 {
        match *self {
            Conic::Elliptic { a, e } => a * (1.0 - e * anomaly.cos()),
            Conic::Hyperbolic { a, e } => a * (1.0 - e * anomaly.cosh()),
        }
    }

    /// Unit tangent of the conic in its own plane at the given anomaly.
    pub fn velocity_direction(&self, anomaly: f64) -> [f64; 2] {
        let ratio = self.axis_ratio();
        let (x, y) = match self {
            Conic::Elliptic { .. } => (-anomaly.sin(), ratio * anomaly.cos()),
            Conic::Hyperbolic { .. } => (-anomaly.sinh(), ratio * anomaly.cosh()),
        };
        let length = (x * x + y * y).sqrt();
        [x / length, y / length]
    }

    /// True anomaly where the conic crosses a sphere of radius `soi_radius` around its focus.
    ///
    /// The orbital plane passes through the focus, so the sphere reduces to a circle in
    /// that plane. Substituting the focus-centred conic into the circle equation gives a
    /// quadratic in `x`; its outward root yields the crossing angle. Ellipses whose
    /// apoapsis stays inside the sphere never cross it and return `None`.
    pub fn sphere_intersection(&self, soi_radius: f64) -> Option<f64> {
        let r = soi_radius;
        let a = self.semi_major_axis();
        let b = a * self.axis_ratio();

        let sq_a = a * a;
        let sq_b = b * b;
        let sq_r = r * r;

        let cos_v = match self {
            Conic::Elliptic { e, .. } => {
                if self.apoapsis() < r {
                    return None;
                }
                let c = a * e;
                let sq_c = c * c;
                let root = -(sq_a * sq_a * sq_b) + (sq_a * sq_b * sq_b) + (sq_a * sq_a * sq_r)
                    + (sq_a * sq_b * sq_c)
                    - (sq_a * sq_b * sq_r);
                let x = ((sq_b * c) - root.max(0.0).sqrt()) / (sq_a - sq_b);
                x / r
            }
            Conic::Hyperbolic { .. } => {
                let c = (sq_a + sq_b).sqrt();
                let sq_c = c * c;
                let root = (sq_a * sq_a * sq_b) + (sq_a * sq_b * sq_b) - (sq_a * sq_b * sq_c)
                    + (sq_a * sq_a * sq_r)
                    + (sq_a * sq_b * sq_r);
                let x = (-(sq_b * c) + root.max(0.0).sqrt()) / (sq_a + sq_b);
                // the hyperbola opens towards -x
                -x / r
            }
        };

        let true_anomaly = cos_v.clamp(-1.0, 1.0).acos();
        true_anomaly.is_finite().then_some(true_anomaly)
    }
}

/// Newton-Raphson solve of `M = E - e sin E` with a fixed number of steps.
pub fn solve_eccentric_anomaly(mean_anomaly: f64, e: f64, iterations: usize) -> f64 {
    let mut anomaly = mean_anomaly + 0.85 * e * mean_anomaly.sin().signum();
    for _ in 0..iterations {
        anomaly -= (anomaly - e * anomaly.sin() - mean_anomaly) / (1.0 - e * anomaly.cos());
    }
    anomaly
}

/// Newton-Raphson solve of `M = e sinh H - H` with a fixed number of steps.
pub fn solve_hyperbolic_anomaly(mean_anomaly: f64, e: f64, iterations: usize) -> f64 {
    let mut anomaly = (2.0 * mean_anomaly.abs() / e + 1.8).ln() * mean_anomaly.signum();
    for _ in 0..iterations {
        anomaly -= (e * anomaly.sinh() - anomaly - mean_anomaly) / (e * anomaly.cosh() - 1.0);
    }
    anomaly
}
