use crate::primitive::{Aabb, Capsule, Cone, Cylinder, Disk, Obb, Plane, Sphere, Triangle};
use nalgebra::Point3;

/// Every geometric entity the ray and overlap engines accept, as one closed type.
///
/// Matching on `Shape` lets callers hold heterogeneous volumes (a culling list, a pick
/// list) and still get an exhaustive dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    Point(Point3<f32>),
    Sphere(Sphere),
    Aabb(Aabb),
    Plane(Plane),
    Triangle(Triangle),
    Cylinder(Cylinder),
    Capsule(Capsule),
    Cone(Cone),
    Disk(Disk),
    Obb(Obb),
}

impl Shape {
    /// Axis-aligned bounds, or `None` for the unbounded plane.
    pub fn aabb(&self) -> Option<Aabb> {
        Some(match self {
            Shape::Point(pt) => Aabb::singleton(*pt),
            Shape::Sphere(sphere) => Aabb::from_sphere(sphere),
            Shape::Aabb(aabb) => *aabb,
            Shape::Plane(_) => return None,
            Shape::Triangle(triangle) => Aabb::from_triangle(triangle),
            Shape::Cylinder(cylinder) => Aabb::from_cylinder(cylinder),
            Shape::Capsule(capsule) => Aabb::from_capsule(capsule),
            Shape::Cone(cone) => Aabb::from_cone(cone),
            Shape::Disk(disk) => Aabb::from_disk(disk),
            Shape::Obb(obb) => Aabb::from_obb(obb),
        })
    }
}

macro_rules! shape_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Shape {
                fn from(value: $ty) -> Self {
                    Shape::$variant(value)
                }
            }
        )*
    };
}

shape_from!(
    Point(Point3<f32>),
    Sphere(Sphere),
    Aabb(Aabb),
    Plane(Plane),
    Triangle(Triangle),
    Cylinder(Cylinder),
    Capsule(Capsule),
    Cone(Cone),
    Disk(Disk),
    Obb(Obb),
);
