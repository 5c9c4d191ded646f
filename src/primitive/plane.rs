use nalgebra::{Point3, Unit, Vector3, Vector4};

/// An oriented plane: the points `p` with `normal . p + dist == 0`.
///
/// The side the normal points to has positive signed distance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plane {
    pub normal: Unit<Vector3<f32>>,
    pub dist: f32,
}

impl Plane {
    pub fn new(normal: Unit<Vector3<f32>>, dist: f32) -> Self {
        Self { normal, dist }
    }

    /// The plane through `point` facing `normal`.
    pub fn from_point_normal(point: &Point3<f32>, normal: Unit<Vector3<f32>>) -> Self {
        Self {
            normal,
            dist: -normal.dot(&point.coords),
        }
    }

    /// Normalizes the plane equation `ax + by + cz + d = 0`.
    ///
    /// Returns `None` when `(a, b, c)` vanishes.
    pub fn from_coefficients(coefficients: &Vector4<f32>) -> Option<Self> {
        let (normal, len) = Unit::try_new_and_get(coefficients.xyz(), 0.0)?;
        Some(Self {
            normal,
            dist: coefficients.w / len,
        })
    }

    pub fn signed_distance(&self, point: &Point3<f32>) -> f32 {
        self.normal.dot(&point.coords) + self.dist
    }

    /// Orthogonal projection of `point` onto the plane.
    pub fn project_point(&self, point: &Point3<f32>) -> Point3<f32> {
        point - self.normal.into_inner() * self.signed_distance(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn coefficients_are_normalized() {
        let plane = Plane::from_coefficients(&Vector4::new(0.0, 0.0, 2.0, -4.0)).unwrap();
        assert_relative_eq!(plane.normal.into_inner(), Vector3::z());
        assert_relative_eq!(plane.dist, -2.0);
        assert_relative_eq!(plane.signed_distance(&Point3::new(3.0, 1.0, 2.0)), 0.0);
    }

    #[test]
    fn vanishing_normal_is_rejected() {
        assert!(Plane::from_coefficients(&Vector4::new(0.0, 0.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn projection_lands_on_plane() {
        let plane = Plane::from_point_normal(&Point3::new(0.0, 1.0, 0.0), Vector3::y_axis());
        let projected = plane.project_point(&Point3::new(4.0, -3.0, 2.0));
        assert_relative_eq!(projected, Point3::new(4.0, 1.0, 2.0));
    }
}
