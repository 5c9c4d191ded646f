use crate::primitive::vector_utils::clamp_length;
use crate::primitive::Plane;
use nalgebra::{Point3, Unit, Vector3};

/// A flat, filled circle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Disk {
    pub center: Point3<f32>,
    pub normal: Unit<Vector3<f32>>,
    pub radius: f32,
}

impl Disk {
    pub fn new(center: Point3<f32>, normal: Unit<Vector3<f32>>, radius: f32) -> Self {
        Self {
            center,
            normal,
            radius,
        }
    }

    /// The plane the disk lies in.
    pub fn plane(&self) -> Plane {
        Plane::from_point_normal(&self.center, self.normal)
    }

    /// The point of the disk nearest to `pt`.
    pub fn closest_point(&self, pt: &Point3<f32>) -> Point3<f32> {
        let delta = pt - self.center;
        let in_plane = delta - self.normal.into_inner() * self.normal.dot(&delta);
        self.center + clamp_length(in_plane, self.radius)
    }
}
