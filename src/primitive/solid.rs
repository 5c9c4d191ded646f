//! Solids of revolution around a segment: cylinders, capsules and cones.
//!
//! An axis of zero length has no orientation. Every query on such a shape treats it as a
//! ball of the same radius around its first point.

use crate::primitive::vector_utils::clamp_length;
use crate::primitive::{Disk, Segment, Sphere, Triangle, DEGENERATE_LENGTH_SQUARED};
use nalgebra::{Point3, Unit, Vector3};

/// A capped cylinder between `start` and `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cylinder {
    pub start: Point3<f32>,
    pub end: Point3<f32>,
    pub radius: f32,
}

/// A segment swept by a ball: a cylinder with hemispherical caps.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capsule {
    pub start: Point3<f32>,
    pub end: Point3<f32>,
    pub radius: f32,
}

/// A right circular cone: a disk of `radius` around `base`, narrowing to `apex`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cone {
    pub base: Point3<f32>,
    pub apex: Point3<f32>,
    pub radius: f32,
}

/// Unit direction of `from -> to` and its length, or `None` for a zero-length axis.
pub(crate) fn unit_axis(
    from: &Point3<f32>,
    to: &Point3<f32>,
) -> Option<(Unit<Vector3<f32>>, f32)> {
    let axis = to - from;
    if !(axis.norm_squared() > DEGENERATE_LENGTH_SQUARED) {
        return None;
    }
    Some(Unit::new_and_get(axis))
}

/// Splits `pt - origin` into its coordinate along `axis` and the perpendicular remainder.
fn split_along(
    pt: &Point3<f32>,
    origin: &Point3<f32>,
    axis: &Unit<Vector3<f32>>,
) -> (f32, Vector3<f32>) {
    let delta = pt - origin;
    let h = axis.dot(&delta);
    (h, delta - axis.into_inner() * h)
}

impl Cylinder {
    pub fn new(start: Point3<f32>, end: Point3<f32>, radius: f32) -> Self {
        Self { start, end, radius }
    }

    pub fn axis(&self) -> Vector3<f32> {
        self.end - self.start
    }

    /// The two end caps, with normals facing out of the cylinder.
    pub fn caps(&self) -> Option<[Disk; 2]> {
        let (axis, _) = unit_axis(&self.start, &self.end)?;
        Some([
            Disk::new(self.start, -axis, self.radius),
            Disk::new(self.end, axis, self.radius),
        ])
    }

    /// The point of the solid cylinder nearest to `pt`.
    pub fn closest_point(&self, pt: &Point3<f32>) -> Point3<f32> {
        let Some((axis, len)) = unit_axis(&self.start, &self.end) else {
            return Sphere::new(self.start, self.radius).closest_point(pt);
        };

        let (h, radial) = split_along(pt, &self.start, &axis);
        let on_axis = self.start + axis.into_inner() * h.clamp(0.0, len);
        on_axis + clamp_length(radial, self.radius)
    }
}

impl Capsule {
    pub fn new(start: Point3<f32>, end: Point3<f32>, radius: f32) -> Self {
        Self { start, end, radius }
    }

    pub fn segment(&self) -> Segment {
        Segment::new(self.start, self.end)
    }

    pub fn closest_point(&self, pt: &Point3<f32>) -> Point3<f32> {
        let on_axis = self.segment().closest_point(pt);
        on_axis + clamp_length(pt - on_axis, self.radius)
    }
}

impl Cone {
    pub fn new(base: Point3<f32>, apex: Point3<f32>, radius: f32) -> Self {
        Self { base, apex, radius }
    }

    /// The base cap, facing away from the apex.
    pub fn base_disk(&self) -> Option<Disk> {
        let (axis, _) = unit_axis(&self.apex, &self.base)?;
        Some(Disk::new(self.base, axis, self.radius))
    }

    /// The point of the solid cone nearest to `pt`.
    ///
    /// The cone is a solid of revolution, so the search happens in the meridian
    /// half-plane through `pt`, where the cone's cross-section is the right triangle with
    /// corners at the base center, the base rim and the apex.
    pub fn closest_point(&self, pt: &Point3<f32>) -> Point3<f32> {
        let Some((axis, len)) = unit_axis(&self.base, &self.apex) else {
            return Sphere::new(self.base, self.radius).closest_point(pt);
        };

        let (h, radial) = split_along(pt, &self.base, &axis);
        let rho = radial.norm();
        let radial_dir = if rho > 0.0 {
            radial / rho
        } else {
            Vector3::zeros()
        };

        let section = Triangle::new(
            Point3::origin(),
            Point3::new(0.0, self.radius, 0.0),
            Point3::new(len, 0.0, 0.0),
        );
        let closest = section.closest_point(&Point3::new(h, rho, 0.0));
        self.base + axis.into_inner() * closest.x + radial_dir * closest.y
    }
}
