//! Core constants, vector primitives, and simulation time shared across the workspace.

/// Mathematical constants used by the propagators.
pub mod constants {
    /// Full turn in radians.
    pub const TAU: f64 = std::f64::consts::TAU;
    /// Half turn in radians.
    pub const PI: f64 = std::f64::consts::PI;
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector in world units (or world units per second).
    pub type Vector3 = [f64; 3];

    /// The zero vector.
    pub const ZERO: Vector3 = [0.0, 0.0, 0.0];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Squared Euclidean norm.
    #[inline]
    pub fn norm_squared(v: &Vector3) -> f64 {
        dot(v, v)
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Right-handed cross product.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Unit vector in the direction of `v`. The zero vector is returned unchanged.
    #[inline]
    pub fn normalize(v: &Vector3) -> Vector3 {
        let length = norm(v);
        if length == 0.0 {
            *v
        } else {
            scale(v, 1.0 / length)
        }
    }

    /// Signed length of the projection of `a` onto `b`.
    #[inline]
    pub fn component(a: &Vector3, b: &Vector3) -> f64 {
        dot(a, b) / norm(b)
    }

    /// Local "north" direction on a sphere around the origin in a y-up world.
    ///
    /// Points along the surface towards +Y at the location `r`. Returns the zero
    /// vector for the origin.
    pub fn north(r: &Vector3) -> Vector3 {
        if *r == ZERO {
            return ZERO;
        }
        let r = normalize(r);
        let theta = if r[2] == 0.0 { 0.0 } else { r[2].atan2(r[0]) };
        let x = -theta.cos() * r[1];
        let y = (1.0 - r[1] * r[1]).max(0.0).sqrt();
        let z = -theta.sin() * r[1];
        normalize(&[x, y, z])
    }
}

/// Position/velocity pairs expressed relative to some reference body.
pub mod state {
    use std::fmt;
    use std::ops::{Add, Neg, Sub};

    use super::vector::{self, Vector3};

    /// Instantaneous position and velocity in a body-centred frame.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct StateVector {
        pub position: Vector3,
        pub velocity: Vector3,
    }

    impl StateVector {
        pub const ZERO: StateVector = StateVector {
            position: vector::ZERO,
            velocity: vector::ZERO,
        };

        pub fn new(position: Vector3, velocity: Vector3) -> Self {
            Self { position, velocity }
        }

        /// Distance from the frame origin.
        pub fn radius(&self) -> f64 {
            vector::norm(&self.position)
        }

        pub fn speed(&self) -> f64 {
            vector::norm(&self.velocity)
        }
    }

    impl Add for StateVector {
        type Output = StateVector;

        fn add(self, rhs: StateVector) -> StateVector {
            StateVector {
                position: vector::add(&self.position, &rhs.position),
                velocity: vector::add(&self.velocity, &rhs.velocity),
            }
        }
    }

    impl Sub for StateVector {
        type Output = StateVector;

        fn sub(self, rhs: StateVector) -> StateVector {
            StateVector {
                position: vector::sub(&self.position, &rhs.position),
                velocity: vector::sub(&self.velocity, &rhs.velocity),
            }
        }
    }

    impl Neg for StateVector {
        type Output = StateVector;

        fn neg(self) -> StateVector {
            StateVector {
                position: vector::scale(&self.position, -1.0),
                velocity: vector::scale(&self.velocity, -1.0),
            }
        }
    }

    impl fmt::Display for StateVector {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "r = [{:.3}, {:.3}, {:.3}], v = [{:.5}, {:.5}, {:.5}]",
                self.position[0],
                self.position[1],
                self.position[2],
                self.velocity[0],
                self.velocity[1],
                self.velocity[2]
            )
        }
    }
}

/// Simulation time: an explicit clock value threaded through propagation calls.
pub mod time {
    /// Accumulated simulation time. Rate scaling is supplied per step.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct SimClock {
        time: f64,
    }

    impl SimClock {
        pub fn new(start: f64) -> Self {
            Self { time: start }
        }

        /// Current simulation time.
        #[inline]
        pub fn now(&self) -> f64 {
            self.time
        }

        /// Advance by `delta` real seconds scaled by `rate`; returns the new time.
        pub fn step(&mut self, delta: f64, rate: f64) -> f64 {
            self.time += delta * rate;
            self.time
        }
    }

    /// Ordered set of time-scale presets stepped up and down by the user.
    #[derive(Debug, Clone)]
    pub struct TimeScaleLadder {
        scales: Vec<f64>,
        current: usize,
    }

    impl TimeScaleLadder {
        /// Build a ladder from presets. An empty list yields a single 1x preset.
        pub fn new(scales: Vec<f64>) -> Self {
            let scales = if scales.is_empty() { vec![1.0] } else { scales };
            Self { scales, current: 0 }
        }

        pub fn current(&self) -> f64 {
            self.scales[self.current]
        }

        /// Move one preset up, staying on the last preset at the top.
        pub fn raise(&mut self) -> f64 {
            if self.current + 1 < self.scales.len() {
                self.current += 1;
            }
            self.current()
        }

        /// Move one preset down, staying on the first preset at the bottom.
        pub fn lower(&mut self) -> f64 {
            self.current = self.current.saturating_sub(1);
            self.current()
        }

        pub fn reset(&mut self) -> f64 {
            self.current = 0;
            self.current()
        }
    }

    impl Default for TimeScaleLadder {
        fn default() -> Self {
            Self::new(vec![1.0, 10.0, 100.0, 1_000.0, 10_000.0])
        }
    }
}
