use solar_core::vector::Vector3;

/// Cached 3x2 map from the orbital plane into the y-up world frame.
///
/// Built once from inclination, longitude of the ascending node and argument of
/// periapsis. The plane's second axis comes out mirrored; the propagators negate
/// their anomaly to match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneRotation([f64; 6]);

impl PlaneRotation {
    pub fn new(inclination: f64, ascending_node: f64, argument_of_periapsis: f64) -> Self {
        let (sin_i, cos_i) = inclination.sin_cos();
        let (sin_o, cos_o) = ascending_node.sin_cos();
        let (sin_w, cos_w) = argument_of_periapsis.sin_cos();

        Self([
            -(cos_i * sin_o * sin_w - cos_o * cos_w),
            cos_i * sin_o * cos_w + cos_o * sin_w,
            sin_i * sin_w,
            -sin_i * cos_w,
            -(cos_i * cos_o * sin_w + sin_o * cos_w),
            cos_i * cos_o * cos_w - sin_o * sin_w,
        ])
    }

    #[inline]
    pub fn to_world(&self, x: f64, y: f64) -> Vector3 {
        let m = &self.0;
        [x * m[0] + y * m[1], x * m[2] + y * m[3], x * m[4] + y * m[5]]
    }
}
