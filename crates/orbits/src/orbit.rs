use std::fmt;

use solar_core::constants::{PI, TAU};
use solar_core::state::StateVector;
use solar_core::vector::{self, Vector3};

use crate::conic::Conic;
use crate::rotation::PlaneRotation;

/// Eccentricities are kept at least this far from 0 and from 1.
pub const ECCENTRICITY_EPSILON: f64 = 1e-7;

/// Tangential kick applied to purely radial velocities before conversion.
pub const RADIAL_NUDGE: f64 = 0.001;

const REFERENCE_POLE: Vector3 = [0.0, 0.0, 1.0];

/// Gravitating body an orbit is expressed around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primary {
    /// Gravitational parameter.
    pub mu: f64,
    /// Radius of the sphere of influence. `f64::INFINITY` for the root body.
    pub soi_radius: f64,
}

impl Primary {
    pub fn new(mu: f64, soi_radius: f64) -> Self {
        Self { mu, soi_radius }
    }

    pub fn unbounded(mu: f64) -> Self {
        Self::new(mu, f64::INFINITY)
    }
}

/// Classical Keplerian elements. Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub ascending_node: f64,
    pub argument_of_periapsis: f64,
}

/// Immutable Keplerian orbit around a [`Primary`].
///
/// Time zero is the periapsis passage. The world frame is y-up, and an orbit
/// propagated forward in time sweeps through decreasing plane angles, so every
/// propagator negates its time or anomaly argument before evaluating the conic.
#[derive(Debug, Clone, PartialEq)]
pub struct Orbit {
    primary: Primary,
    conic: Conic,
    inclination: f64,
    ascending_node: f64,
    argument_of_periapsis: f64,
    mean_motion: f64,
    rotation: PlaneRotation,
}

impl Orbit {
    /// Build an orbit from elements. The eccentricity is nudged off 0 and 1, and
    /// hyperbolic semi-major axes are forced negative.
    pub fn from_elements(primary: Primary, elements: OrbitalElements) -> Self {
        let e = perturb_eccentricity(elements.eccentricity);
        let conic = Conic::new(elements.semi_major_axis, e);
        let a = conic.semi_major_axis();

        Self {
            primary,
            conic,
            inclination: elements.inclination,
            ascending_node: elements.ascending_node,
            argument_of_periapsis: elements.argument_of_periapsis,
            mean_motion: (primary.mu / a.abs().powi(3)).sqrt(),
            rotation: PlaneRotation::new(
                elements.inclination,
                elements.ascending_node,
                elements.argument_of_periapsis,
            ),
        }
    }

    /// Fit an orbit to a body-centred state vector.
    ///
    /// Returns the orbit and the true anomaly the state sits at. A purely radial
    /// velocity is nudged sideways by [`RADIAL_NUDGE`] so the orbital plane exists.
    /// Equatorial orbits (no ascending node) get `Ω = 0` and take the periapsis
    /// direction straight from the eccentricity vector.
    pub fn from_state_vector(primary: Primary, state: StateVector) -> (Self, f64) {
        let mu = primary.mu;

        let mut velocity = state.velocity;
        if vector::norm(&vector::cross(&state.position, &velocity)) == 0.0 {
            let side = vector::cross(&state.position, &vector::north(&state.position));
            velocity = vector::add(&velocity, &vector::scale(&vector::normalize(&side), RADIAL_NUDGE));
            log::trace!("radial velocity nudged to {:?}", velocity);
        }

        let r = to_reference_frame(&state.position);
        let v = to_reference_frame(&velocity);
        let r_mag = vector::norm(&r);

        let h = vector::cross(&r, &v);
        let h_mag = vector::norm(&h);
        let node = vector::cross(&REFERENCE_POLE, &h);
        let node_mag = vector::norm(&node);

        let a = -0.5 * mu / (0.5 * vector::norm_squared(&v) - mu / r_mag);

        let e_vec = vector::sub(
            &vector::scale(&vector::cross(&v, &h), 1.0 / mu),
            &vector::normalize(&r),
        );
        let raw_e = vector::norm(&e_vec);
        let e = perturb_eccentricity(raw_e);
        // a circular fit measures its periapsis from the current position
        let e_hat = if raw_e == 0.0 {
            vector::normalize(&r)
        } else {
            vector::scale(&e_vec, 1.0 / raw_e)
        };

        let mut true_anomaly = clamped_acos(vector::dot(&e_hat, &r) / r_mag);
        if vector::dot(&r, &v) < 0.0 {
            true_anomaly = TAU - true_anomaly;
        }

        let (inclination, ascending_node, argument_of_periapsis) = if node_mag == 0.0 {
            if h[2] >= 0.0 {
                (0.0, 0.0, e_hat[1].atan2(e_hat[0]).rem_euclid(TAU))
            } else {
                (PI, 0.0, (-e_hat[1]).atan2(e_hat[0]).rem_euclid(TAU))
            }
        } else {
            let mut ascending_node = clamped_acos(node[0] / node_mag);
            if node[1] < 0.0 {
                ascending_node = TAU - ascending_node;
            }
            let mut argument = clamped_acos(vector::dot(&e_hat, &node) / node_mag);
            if e_hat[2] < 0.0 {
                argument = TAU - argument;
            }
            (clamped_acos(h[2] / h_mag), ascending_node, argument)
        };

        let orbit = Self::from_elements(
            primary,
            OrbitalElements {
                semi_major_axis: a,
                eccentricity: e,
                inclination,
                ascending_node,
                argument_of_periapsis,
            },
        );
        (orbit, true_anomaly)
    }

    #[inline]
    pub fn primary(&self) -> &Primary {
        &self.primary
    }

    #[inline]
    pub fn conic(&self) -> &Conic {
        &self.conic
    }

    pub fn elements(&self) -> OrbitalElements {
        OrbitalElements {
            semi_major_axis: self.semi_major_axis(),
            eccentricity: self.eccentricity(),
            inclination: self.inclination,
            ascending_node: self.ascending_node,
            argument_of_periapsis: self.argument_of_periapsis,
        }
    }

    #[inline]
    pub fn semi_major_axis(&self) -> f64 {
        self.conic.semi_major_axis()
    }

    #[inline]
    pub fn eccentricity(&self) -> f64 {
        self.conic.eccentricity()
    }

    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    pub fn ascending_node(&self) -> f64 {
        self.ascending_node
    }

    pub fn argument_of_periapsis(&self) -> f64 {
        self.argument_of_periapsis
    }

    #[inline]
    pub fn is_elliptic(&self) -> bool {
        self.conic.is_elliptic()
    }

    pub fn mean_motion(&self) -> f64 {
        self.mean_motion
    }

    pub fn periapsis(&self) -> f64 {
        self.conic.periapsis()
    }

    pub fn apoapsis(&self) -> f64 {
        self.conic.apoapsis()
    }

    pub fn axis_ratio(&self) -> f64 {
        self.conic.axis_ratio()
    }

    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis().abs() * self.axis_ratio()
    }

    /// Orbital period, infinite for hyperbolas.
    pub fn period(&self) -> f64 {
        if self.is_elliptic() {
            self.characteristic_time()
        } else {
            f64::INFINITY
        }
    }

    /// `τ / n`: the period for ellipses and the matching time scale for hyperbolas.
    pub fn characteristic_time(&self) -> f64 {
        TAU / self.mean_motion
    }

    /// World-frame unit normal of the orbital plane, along the angular momentum.
    pub fn normal(&self) -> Vector3 {
        let periapsis_dir = self.rotation.to_world(1.0, 0.0);
        let quarter_dir = vector::scale(&self.rotation.to_world(0.0, 1.0), -1.0);
        vector::normalize(&vector::cross(&periapsis_dir, &quarter_dir))
    }

    /// State `t` seconds after periapsis passage.
    pub fn state_vector(&self, t: f64) -> StateVector {
        let mean_anomaly = self.conic.wrap_mean_anomaly(self.mean_motion * -t);
        let anomaly = self.conic.solve_kepler(mean_anomaly);
        self.plane_state(anomaly, self.conic.anomaly_to_true(anomaly))
    }

    pub fn state_vector_from_true_anomaly(&self, true_anomaly: f64) -> StateVector {
        let v = -true_anomaly;
        self.plane_state(self.conic.true_to_anomaly(v), v)
    }

    /// State at an eccentric (or hyperbolic) anomaly.
    pub fn state_vector_from_anomaly(&self, anomaly: f64) -> StateVector {
        let x = -anomaly;
        self.plane_state(x, self.conic.anomaly_to_true(x))
    }

    /// Position only, for plotting an orbit by true anomaly.
    pub fn sample_position(&self, true_anomaly: f64) -> Vector3 {
        let v = -true_anomaly;
        let radius = self.conic.radius_at(self.conic.true_to_anomaly(v));
        vector::scale(&self.rotation.to_world(v.cos(), v.sin()), radius)
    }

    /// Time since periapsis at which the orbit reaches `true_anomaly`.
    ///
    /// Elliptical results fall in `(-T/2, T/2]`.
    pub fn true_anomaly_to_time(&self, true_anomaly: f64) -> f64 {
        let anomaly = self.conic.true_to_anomaly(true_anomaly);
        self.conic.mean_from_anomaly(anomaly) / self.mean_motion
    }

    pub fn time_to_true_anomaly(&self, t: f64) -> f64 {
        let mean_anomaly = self.conic.wrap_mean_anomaly(self.mean_motion * t);
        self.conic.anomaly_to_true(self.conic.solve_kepler(mean_anomaly))
    }

    /// Outbound true anomaly where the orbit leaves its primary's sphere of influence.
    pub fn sphere_intersection(&self) -> Option<f64> {
        self.conic.sphere_intersection(self.primary.soi_radius)
    }

    fn plane_state(&self, anomaly: f64, true_anomaly: f64) -> StateVector {
        let radius = self.conic.radius_at(anomaly);
        let speed = (self.primary.mu * (2.0 / radius - 1.0 / self.semi_major_axis())).sqrt();
        let [vx, vy] = self.conic.velocity_direction(anomaly);

        StateVector {
            position: vector::scale(
                &self.rotation.to_world(true_anomaly.cos(), true_anomaly.sin()),
                radius,
            ),
            velocity: vector::scale(&self.rotation.to_world(vx, vy), -speed),
        }
    }
}

impl fmt::Display for Orbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "a: {:.3}, e: {:.6}, i: {:.3}°, Ω: {:.3}°, ω: {:.3}°",
            self.semi_major_axis(),
            self.eccentricity(),
            self.inclination.to_degrees(),
            self.ascending_node.to_degrees(),
            self.argument_of_periapsis.to_degrees()
        )
    }
}

/// y-up world to the z-up frame the element formulas are written in.
#[inline]
fn to_reference_frame(v: &Vector3) -> Vector3 {
    [v[0], -v[2], v[1]]
}

#[inline]
fn clamped_acos(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).acos()
}

fn perturb_eccentricity(e: f64) -> f64 {
    if (e - 1.0).abs() < ECCENTRICITY_EPSILON {
        1.0 - ECCENTRICITY_EPSILON
    } else if e < ECCENTRICITY_EPSILON {
        ECCENTRICITY_EPSILON
    } else {
        e
    }
}
