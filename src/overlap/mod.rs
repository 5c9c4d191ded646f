//! Boolean overlap tests between pairs of shapes.
//!
//! Spheres, boxes and triangles can be tested against every shape; the remaining pairs
//! (cone against cone, say) have no predicate. Statically typed callers use
//! [`Overlaps`], which is implemented in both argument orders with identical results.
//! [`overlap`] dispatches over [`Shape`] at runtime.
//!
//! All tests count touching as overlapping, up to [`OVERLAP_TOLERANCE`].

mod gjk;
mod sat;
mod support;

pub use support::SupportMap;

use crate::primitive::{
    Aabb, Capsule, Cone, Cylinder, Disk, Obb, Plane, Shape, Sphere, Triangle,
};
use nalgebra::{distance_squared, Point3};
use sat::Parallelepiped;

/// Absolute distance under which two shapes still count as touching.
pub const OVERLAP_TOLERANCE: f32 = 1.0e-5;

pub trait Overlaps<Rhs: ?Sized = Self> {
    fn overlaps(&self, other: &Rhs) -> bool;
}

/// Implements `Overlaps<$lhs> for $rhs` by swapping the arguments of an existing impl.
macro_rules! overlaps_reverse {
    ($lhs:ty => $($rhs:ty),+ $(,)?) => {
        $(
            impl Overlaps<$lhs> for $rhs {
                fn overlaps(&self, other: &$lhs) -> bool {
                    other.overlaps(self)
                }
            }
        )+
    };
}

/// Whether `pt`, a point of some shape, lies within `sphere` (plus tolerance).
fn sphere_reaches(sphere: &Sphere, pt: &Point3<f32>) -> bool {
    let reach = sphere.radius + OVERLAP_TOLERANCE;
    distance_squared(&sphere.center, pt) <= reach * reach
}

impl Overlaps<Point3<f32>> for Sphere {
    fn overlaps(&self, pt: &Point3<f32>) -> bool {
        sphere_reaches(self, pt)
    }
}

impl Overlaps for Sphere {
    fn overlaps(&self, other: &Sphere) -> bool {
        let reach = self.radius + other.radius + OVERLAP_TOLERANCE;
        distance_squared(&self.center, &other.center) <= reach * reach
    }
}

impl Overlaps<Aabb> for Sphere {
    fn overlaps(&self, aabb: &Aabb) -> bool {
        sphere_reaches(self, &aabb.closest_point(&self.center))
    }
}

impl Overlaps<Plane> for Sphere {
    fn overlaps(&self, plane: &Plane) -> bool {
        plane.signed_distance(&self.center).abs() <= self.radius + OVERLAP_TOLERANCE
    }
}

impl Overlaps<Triangle> for Sphere {
    fn overlaps(&self, triangle: &Triangle) -> bool {
        sphere_reaches(self, &triangle.closest_point(&self.center))
    }
}

impl Overlaps<Cylinder> for Sphere {
    fn overlaps(&self, cylinder: &Cylinder) -> bool {
        sphere_reaches(self, &cylinder.closest_point(&self.center))
    }
}

impl Overlaps<Capsule> for Sphere {
    fn overlaps(&self, capsule: &Capsule) -> bool {
        let reach = self.radius + capsule.radius + OVERLAP_TOLERANCE;
        capsule.segment().distance_to_point(&self.center) <= reach
    }
}

impl Overlaps<Cone> for Sphere {
    fn overlaps(&self, cone: &Cone) -> bool {
        sphere_reaches(self, &cone.closest_point(&self.center))
    }
}

impl Overlaps<Disk> for Sphere {
    fn overlaps(&self, disk: &Disk) -> bool {
        sphere_reaches(self, &disk.closest_point(&self.center))
    }
}

/// Sheared boxes have no cheap exact closest point, so they go through GJK.
impl Overlaps<Obb> for Sphere {
    fn overlaps(&self, obb: &Obb) -> bool {
        if obb.has_orthogonal_axes() {
            sphere_reaches(self, &obb.closest_point(&self.center))
        } else {
            gjk::intersects(self, obb, OVERLAP_TOLERANCE)
        }
    }
}

impl Overlaps<Point3<f32>> for Aabb {
    fn overlaps(&self, pt: &Point3<f32>) -> bool {
        self.inflated(OVERLAP_TOLERANCE).contains_point(pt)
    }
}

impl Overlaps for Aabb {
    fn overlaps(&self, other: &Aabb) -> bool {
        (0..3).all(|i| {
            self.min[i] <= other.max[i] + OVERLAP_TOLERANCE
                && other.min[i] <= self.max[i] + OVERLAP_TOLERANCE
        })
    }
}

/// The box's projection radius onto the normal covers its center's distance.
impl Overlaps<Plane> for Aabb {
    fn overlaps(&self, plane: &Plane) -> bool {
        let radius = self.half_extents().dot(&plane.normal.abs());
        plane.signed_distance(&self.center()).abs() <= radius + OVERLAP_TOLERANCE
    }
}

impl Overlaps<Triangle> for Aabb {
    fn overlaps(&self, triangle: &Triangle) -> bool {
        if triangle.is_degenerate() {
            return gjk::intersects(self, triangle, OVERLAP_TOLERANCE);
        }
        sat::parallelepiped_triangle(&Parallelepiped::from_aabb(self), triangle)
    }
}

impl Overlaps<Cylinder> for Aabb {
    fn overlaps(&self, cylinder: &Cylinder) -> bool {
        gjk::intersects(self, cylinder, OVERLAP_TOLERANCE)
    }
}

impl Overlaps<Capsule> for Aabb {
    fn overlaps(&self, capsule: &Capsule) -> bool {
        gjk::intersects(self, capsule, OVERLAP_TOLERANCE)
    }
}

impl Overlaps<Cone> for Aabb {
    fn overlaps(&self, cone: &Cone) -> bool {
        gjk::intersects(self, cone, OVERLAP_TOLERANCE)
    }
}

impl Overlaps<Disk> for Aabb {
    fn overlaps(&self, disk: &Disk) -> bool {
        gjk::intersects(self, disk, OVERLAP_TOLERANCE)
    }
}

impl Overlaps<Obb> for Aabb {
    fn overlaps(&self, obb: &Obb) -> bool {
        sat::parallelepiped_parallelepiped(
            &Parallelepiped::from_aabb(self),
            &Parallelepiped::from_obb(obb),
        )
    }
}

impl Overlaps<Point3<f32>> for Triangle {
    fn overlaps(&self, pt: &Point3<f32>) -> bool {
        distance_squared(&self.closest_point(pt), pt) <= OVERLAP_TOLERANCE * OVERLAP_TOLERANCE
    }
}

impl Overlaps<Plane> for Triangle {
    fn overlaps(&self, plane: &Plane) -> bool {
        let distances = self.vertices().map(|pt| plane.signed_distance(&pt));
        let lowest = distances.iter().copied().fold(f32::INFINITY, f32::min);
        let highest = distances.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        lowest <= OVERLAP_TOLERANCE && highest >= -OVERLAP_TOLERANCE
    }
}

impl Overlaps for Triangle {
    fn overlaps(&self, other: &Triangle) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return gjk::intersects(self, other, OVERLAP_TOLERANCE);
        }
        sat::triangle_triangle(self, other)
    }
}

impl Overlaps<Cylinder> for Triangle {
    fn overlaps(&self, cylinder: &Cylinder) -> bool {
        gjk::intersects(self, cylinder, OVERLAP_TOLERANCE)
    }
}

impl Overlaps<Capsule> for Triangle {
    fn overlaps(&self, capsule: &Capsule) -> bool {
        gjk::intersects(self, capsule, OVERLAP_TOLERANCE)
    }
}

impl Overlaps<Cone> for Triangle {
    fn overlaps(&self, cone: &Cone) -> bool {
        gjk::intersects(self, cone, OVERLAP_TOLERANCE)
    }
}

impl Overlaps<Disk> for Triangle {
    fn overlaps(&self, disk: &Disk) -> bool {
        gjk::intersects(self, disk, OVERLAP_TOLERANCE)
    }
}

/// Tested in the box's local frame, where it is the cube `[-1, 1]^3`. A flat box has no
/// local frame and overlaps nothing.
impl Overlaps<Obb> for Triangle {
    fn overlaps(&self, obb: &Obb) -> bool {
        let Some(to_local) = obb.inverse() else {
            return false;
        };
        let local = Triangle::new(
            to_local.transform_point(&self.a),
            to_local.transform_point(&self.b),
            to_local.transform_point(&self.c),
        );
        let cube = Aabb::from_center_extent(Point3::origin(), nalgebra::Vector3::repeat(1.0));
        cube.overlaps(&local)
    }
}

overlaps_reverse!(Sphere => Point3<f32>, Aabb, Plane, Triangle, Cylinder, Capsule, Cone, Disk, Obb);
overlaps_reverse!(Aabb => Point3<f32>, Plane, Triangle, Cylinder, Capsule, Cone, Disk, Obb);
overlaps_reverse!(Triangle => Point3<f32>, Plane, Cylinder, Capsule, Cone, Disk, Obb);

fn sphere_overlaps(sphere: &Sphere, other: &Shape) -> bool {
    match other {
        Shape::Point(pt) => sphere.overlaps(pt),
        Shape::Sphere(other) => sphere.overlaps(other),
        Shape::Aabb(aabb) => sphere.overlaps(aabb),
        Shape::Plane(plane) => sphere.overlaps(plane),
        Shape::Triangle(triangle) => sphere.overlaps(triangle),
        Shape::Cylinder(cylinder) => sphere.overlaps(cylinder),
        Shape::Capsule(capsule) => sphere.overlaps(capsule),
        Shape::Cone(cone) => sphere.overlaps(cone),
        Shape::Disk(disk) => sphere.overlaps(disk),
        Shape::Obb(obb) => sphere.overlaps(obb),
    }
}

fn aabb_overlaps(aabb: &Aabb, other: &Shape) -> bool {
    match other {
        Shape::Point(pt) => aabb.overlaps(pt),
        Shape::Sphere(sphere) => aabb.overlaps(sphere),
        Shape::Aabb(other) => aabb.overlaps(other),
        Shape::Plane(plane) => aabb.overlaps(plane),
        Shape::Triangle(triangle) => aabb.overlaps(triangle),
        Shape::Cylinder(cylinder) => aabb.overlaps(cylinder),
        Shape::Capsule(capsule) => aabb.overlaps(capsule),
        Shape::Cone(cone) => aabb.overlaps(cone),
        Shape::Disk(disk) => aabb.overlaps(disk),
        Shape::Obb(obb) => aabb.overlaps(obb),
    }
}

fn triangle_overlaps(triangle: &Triangle, other: &Shape) -> bool {
    match other {
        Shape::Point(pt) => triangle.overlaps(pt),
        Shape::Sphere(sphere) => triangle.overlaps(sphere),
        Shape::Aabb(aabb) => triangle.overlaps(aabb),
        Shape::Plane(plane) => triangle.overlaps(plane),
        Shape::Triangle(other) => triangle.overlaps(other),
        Shape::Cylinder(cylinder) => triangle.overlaps(cylinder),
        Shape::Capsule(capsule) => triangle.overlaps(capsule),
        Shape::Cone(cone) => triangle.overlaps(cone),
        Shape::Disk(disk) => triangle.overlaps(disk),
        Shape::Obb(obb) => triangle.overlaps(obb),
    }
}

/// Runtime dispatch over [`Overlaps`]. `None` when neither shape is a sphere, box or
/// triangle.
pub fn overlap(a: &Shape, b: &Shape) -> Option<bool> {
    match (a, b) {
        (Shape::Sphere(sphere), other) | (other, Shape::Sphere(sphere)) => {
            Some(sphere_overlaps(sphere, other))
        }
        (Shape::Aabb(aabb), other) | (other, Shape::Aabb(aabb)) => Some(aabb_overlaps(aabb, other)),
        (Shape::Triangle(triangle), other) | (other, Shape::Triangle(triangle)) => {
            Some(triangle_overlaps(triangle, other))
        }
        _ => None,
    }
}
