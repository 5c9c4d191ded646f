use nalgebra::{Point3, Vector3};

/// Represents a ray in 3D space, defined by an origin point and a direction.
///
/// The direction does not have to be normalized: intersection queries parameterize the
/// ray as `origin + t * dir` with `t >= 0`. Rays built by [`crate::frustum::make_ray`]
/// carry a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ray {
    pub origin: Point3<f32>,
    pub dir: Vector3<f32>,
}

impl Ray {
    /// Creates a new `Ray` from an origin point and a direction vector.
    ///
    /// # Parameters
    /// - `origin`: The origin point of the ray.
    /// - `dir`: The direction vector of the ray.
    pub fn new(origin: Point3<f32>, dir: Vector3<f32>) -> Self {
        Self { origin, dir }
    }

    /// Returns the point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.dir * t
    }

    /// A zero direction cannot hit anything.
    pub(crate) fn is_degenerate(&self) -> bool {
        !(self.dir.norm_squared() > super::DEGENERATE_LENGTH_SQUARED)
    }
}
