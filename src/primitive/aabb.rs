use crate::primitive::vector_utils::orthonormal_basis;
use crate::primitive::{Capsule, Cone, Cylinder, Disk, Obb, Sphere, Triangle};
use crate::vertex_buffer::VertexBuffer;
use itertools::iproduct;
use nalgebra::{center, Matrix4, Point3, Vector3};

/// Axis-Aligned Bounding Box (AABB) structure.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    /// Minimum point of the AABB.
    pub min: Point3<f32>,
    /// Maximum point of the AABB.
    pub max: Point3<f32>,
}

impl Aabb {
    /// Creates an AABB that encompasses all the given points.
    ///
    /// # Arguments
    ///
    /// * `points` - The points to be enclosed by the AABB.
    ///
    /// # Returns
    ///
    /// An AABB that encloses all the given points. With no points, the result is the
    /// inverted box from `+inf` to `-inf`, which contains nothing and grows correctly
    /// under [`Aabb::expand_to_cover`].
    pub fn around_points(points: impl IntoIterator<Item = Point3<f32>>) -> Self {
        let mut aabb = Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        };

        for pt in points {
            aabb.expand_to_cover(pt);
        }

        aabb
    }

    /// Creates an AABB that represents a single point.
    pub fn singleton(pt: Point3<f32>) -> Self {
        Self { min: pt, max: pt }
    }

    /// The box spanning `center - extent` to `center + extent`.
    pub fn from_center_extent(center: Point3<f32>, extent: Vector3<f32>) -> Self {
        Self {
            min: center - extent,
            max: center + extent,
        }
    }

    /// Bounds every position of a vertex buffer.
    pub fn from_vertices(vertices: &VertexBuffer<'_>) -> Self {
        Self::around_points(vertices.points())
    }

    /// Bounds every position of a vertex buffer after transforming it by `transform`.
    pub fn from_transformed_vertices(transform: &Matrix4<f32>, vertices: &VertexBuffer<'_>) -> Self {
        Self::around_points(vertices.points().map(|pt| transform.transform_point(&pt)))
    }

    /// Bounds the eight corners of an oriented box.
    pub fn from_obb(obb: &Obb) -> Self {
        Self::around_points(obb.corners())
    }

    pub fn from_sphere(sphere: &Sphere) -> Self {
        Self::from_center_extent(sphere.center, Vector3::repeat(sphere.radius))
    }

    /// Tightest box around a disk.
    ///
    /// With `(u, v)` an orthonormal basis of the disk's plane, the circle reaches
    /// `radius * sqrt(u_i^2 + v_i^2)` along world axis `i`.
    pub fn from_disk(disk: &Disk) -> Self {
        let (u, v) = orthonormal_basis(&disk.normal);
        let extent = Vector3::from_fn(|i, _| disk.radius * (u[i] * u[i] + v[i] * v[i]).sqrt());
        Self::from_center_extent(disk.center, extent)
    }

    /// Union of the bounds of both end caps.
    pub fn from_cylinder(cylinder: &Cylinder) -> Self {
        match cylinder.caps() {
            Some([start, end]) => Self::from_disk(&start).union(&Self::from_disk(&end)),
            None => Self::from_sphere(&Sphere::new(cylinder.start, cylinder.radius)),
        }
    }

    pub fn from_capsule(capsule: &Capsule) -> Self {
        Self::from_sphere(&Sphere::new(capsule.start, capsule.radius))
            .union(&Self::from_sphere(&Sphere::new(capsule.end, capsule.radius)))
    }

    pub fn from_cone(cone: &Cone) -> Self {
        match cone.base_disk() {
            Some(base) => {
                let mut aabb = Self::from_disk(&base);
                aabb.expand_to_cover(cone.apex);
                aabb
            }
            None => Self::from_sphere(&Sphere::new(cone.base, cone.radius)),
        }
    }

    pub fn from_triangle(triangle: &Triangle) -> Self {
        Self::around_points(triangle.vertices())
    }

    /// Calculates the center point of the AABB.
    pub fn center(&self) -> Point3<f32> {
        center(&self.min, &self.max)
    }

    /// Compute the half-extents of the AABB.
    pub fn half_extents(&self) -> Vector3<f32> {
        (self.max - self.min) / 2.0
    }

    /// Full edge lengths along x, y and z.
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Surface area `2 (wh + hd + dw)`.
    pub fn surface_area(&self) -> f32 {
        let size = self.size();
        2.0 * (size.x * size.y + size.y * size.z + size.z * size.x)
    }

    pub fn volume(&self) -> f32 {
        let size = self.size();
        size.x * size.y * size.z
    }

    /// The eight corners, `min` first and `max` last.
    pub fn corners(&self) -> [Point3<f32>; 8] {
        let mut corners = [self.min; 8];
        for (corner, (x, y, z)) in corners.iter_mut().zip(iproduct!(
            [self.min.x, self.max.x],
            [self.min.y, self.max.y],
            [self.min.z, self.max.z]
        )) {
            *corner = Point3::new(x, y, z);
        }
        corners
    }

    pub fn contains_point(&self, pt: &Point3<f32>) -> bool {
        (0..3).all(|i| self.min[i] <= pt[i] && pt[i] <= self.max[i])
    }

    /// The point of the box nearest to `pt`.
    pub fn closest_point(&self, pt: &Point3<f32>) -> Point3<f32> {
        Point3::from(Vector3::from_fn(|i, _| pt[i].clamp(self.min[i], self.max[i])))
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Expands the AABB to cover the given point.
    ///
    /// # Arguments
    ///
    /// * `pt` - The point to be covered by the AABB.
    pub fn expand_to_cover(&mut self, pt: Point3<f32>) {
        self.min = self.min.inf(&pt);
        self.max = self.max.sup(&pt);
    }

    /// Grows the box by `amount` on every side.
    pub fn expand_by(&mut self, amount: f32) {
        let margin = Vector3::repeat(amount);
        self.min -= margin;
        self.max += margin;
    }

    /// Create a version inflated by a given amount.
    pub fn inflated(&self, amount: f32) -> Self {
        let mut aabb = *self;
        aabb.expand_by(amount);
        aabb
    }
}
