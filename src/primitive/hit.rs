use crate::primitive::Plane;
use nalgebra::{Point3, Unit, Vector3};

/// The first point where a ray touches a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hit {
    /// World-space position of the intersection.
    pub pos: Point3<f32>,
    /// Tangent plane at `pos`; the normal faces out of the surface.
    pub plane: Plane,
}

impl Hit {
    pub fn new(pos: Point3<f32>, normal: Unit<Vector3<f32>>) -> Self {
        Self {
            pos,
            plane: Plane::from_point_normal(&pos, normal),
        }
    }

    pub fn normal(&self) -> Unit<Vector3<f32>> {
        self.plane.normal
    }
}

impl Default for Hit {
    fn default() -> Self {
        Self::new(Point3::origin(), Vector3::z_axis())
    }
}
