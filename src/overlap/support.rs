use crate::primitive::solid::unit_axis;
use crate::primitive::vector_utils::perpendicular_of_length;
use crate::primitive::{Aabb, Capsule, Cone, Cylinder, Disk, Obb, Segment, Sphere, Triangle};
use nalgebra::{Point3, Vector3};
use ordered_float::OrderedFloat;

/// A convex shape described by its furthest point in any direction.
pub trait SupportMap {
    /// A point of the shape maximizing `dir . p`. `dir` need not be normalized.
    fn support_point(&self, dir: &Vector3<f32>) -> Point3<f32>;
}

fn furthest<const N: usize>(points: [Point3<f32>; N], dir: &Vector3<f32>) -> Point3<f32> {
    points
        .into_iter()
        .max_by_key(|pt| OrderedFloat(pt.coords.dot(dir)))
        .unwrap_or_else(Point3::origin)
}

impl SupportMap for Point3<f32> {
    fn support_point(&self, _dir: &Vector3<f32>) -> Point3<f32> {
        *self
    }
}

impl SupportMap for Sphere {
    fn support_point(&self, dir: &Vector3<f32>) -> Point3<f32> {
        // A zero axis makes the "perpendicular" any direction of the requested length.
        self.center + perpendicular_of_length(dir, &Vector3::zeros(), self.radius)
    }
}

impl SupportMap for Aabb {
    fn support_point(&self, dir: &Vector3<f32>) -> Point3<f32> {
        Point3::new(
            if dir.x >= 0.0 { self.max.x } else { self.min.x },
            if dir.y >= 0.0 { self.max.y } else { self.min.y },
            if dir.z >= 0.0 { self.max.z } else { self.min.z },
        )
    }
}

impl SupportMap for Obb {
    fn support_point(&self, dir: &Vector3<f32>) -> Point3<f32> {
        self.half_axes().iter().fold(self.center(), |pt, half_axis| {
            if half_axis.dot(dir) >= 0.0 {
                pt + half_axis
            } else {
                pt - half_axis
            }
        })
    }
}

impl SupportMap for Triangle {
    fn support_point(&self, dir: &Vector3<f32>) -> Point3<f32> {
        furthest(self.vertices(), dir)
    }
}

impl SupportMap for Segment {
    fn support_point(&self, dir: &Vector3<f32>) -> Point3<f32> {
        furthest([self.a, self.b], dir)
    }
}

impl SupportMap for Disk {
    fn support_point(&self, dir: &Vector3<f32>) -> Point3<f32> {
        self.center + perpendicular_of_length(dir, &self.normal, self.radius)
    }
}

impl SupportMap for Cylinder {
    fn support_point(&self, dir: &Vector3<f32>) -> Point3<f32> {
        let rim = perpendicular_of_length(dir, &self.axis(), self.radius);
        Segment::new(self.start, self.end).support_point(dir) + rim
    }
}

impl SupportMap for Capsule {
    fn support_point(&self, dir: &Vector3<f32>) -> Point3<f32> {
        let ball = perpendicular_of_length(dir, &Vector3::zeros(), self.radius);
        self.segment().support_point(dir) + ball
    }
}

impl SupportMap for Cone {
    fn support_point(&self, dir: &Vector3<f32>) -> Point3<f32> {
        let Some((axis, _)) = unit_axis(&self.base, &self.apex) else {
            return Sphere::new(self.base, self.radius).support_point(dir);
        };
        let rim = self.base + perpendicular_of_length(dir, &axis, self.radius);
        furthest([self.apex, rim], dir)
    }
}
