use crate::primitive::{
    Aabb, Capsule, Cone, Cylinder, Disk, Obb, Plane, Ray, Shape, Sphere, Triangle,
};
use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3};
use proptest::prelude::*;

/// A Strategy to generate f32 values within the range [-50.0, 50.0].
/// though it is set up to be likely to produce zeros, round numbers, and edge cases.
///
/// We picked 50.0 as that's comfortably larger than any scene a test needs, while
/// keeping f32 rounding well below the tolerances the tests use.
pub fn scalar_strategy() -> impl Strategy<Value = f32> {
    prop_oneof![
        prop_oneof![
            Just(0.0),
            Just(1.0),
            Just(-1.0),
            Just(10.0),
            Just(-10.0),
            Just(0.5),
            Just(-0.5),
            Just(std::f32::consts::PI),
            Just(-std::f32::consts::PI),
        ],
        -50.0f32..=50.0,
    ]
}

pub fn radius_strategy() -> impl Strategy<Value = f32> {
    prop_oneof![Just(1.0f32), Just(0.5), 0.1f32..=10.0]
}

pub fn arbitrary_vector() -> impl Strategy<Value = Vector3<f32>> {
    (scalar_strategy(), scalar_strategy(), scalar_strategy())
        .prop_map(|(x, y, z)| Vector3::new(x, y, z))
}

pub fn arbitrary_unit_vector() -> impl Strategy<Value = Unit<Vector3<f32>>> {
    arbitrary_vector()
        .prop_filter("Non-zero vector", |v| v.norm() > 0.0001)
        .prop_map(Unit::new_normalize)
}

pub fn arbitrary_point() -> impl Strategy<Value = Point3<f32>> {
    arbitrary_vector().prop_map(Point3::from)
}

pub fn arbitrary_points(max_n: usize) -> impl Strategy<Value = Vec<Point3<f32>>> {
    prop::collection::vec(arbitrary_point(), 1..=max_n)
}

/// Raw vertex positions in general position, ready for [`crate::VertexBuffer::from_positions`].
pub fn arbitrary_point_cloud(max_n: usize) -> impl Strategy<Value = Vec<[f32; 3]>> {
    prop::collection::vec(
        (-50.0f32..=50.0, -50.0f32..=50.0, -50.0f32..=50.0),
        4..=max_n.max(4),
    )
    .prop_map(|points| points.into_iter().map(|(x, y, z)| [x, y, z]).collect())
}

pub fn arbitrary_triangle() -> impl Strategy<Value = Triangle> {
    (arbitrary_point(), arbitrary_point(), arbitrary_point())
        .prop_map(|(a, b, c)| Triangle::new(a, b, c))
}

/// Triangles that are neither tiny nor sliver-thin, for checks with tight tolerances.
pub fn well_shaped_triangle() -> impl Strategy<Value = Triangle> {
    arbitrary_triangle().prop_filter("Well-shaped triangle", |triangle| {
        let area = triangle.area();
        let longest_sq = triangle
            .edges()
            .iter()
            .map(|edge| edge.length().powi(2))
            .fold(0.0f32, f32::max);
        area > 1.0 && 2.0 * area / longest_sq > 0.05
    })
}

pub fn arbitrary_barycentric() -> impl Strategy<Value = (f32, f32, f32)> {
    prop_oneof![
        // One of the vertices
        Just((1.0, 0.0, 0.0)),
        Just((0.0, 1.0, 0.0)),
        Just((0.0, 0.0, 1.0)),
        // Center of one of the edges
        Just((0.5, 0.5, 0.0)),
        Just((0.0, 0.5, 0.5)),
        Just((0.5, 0.0, 0.5)),
        // Middle:
        Just((1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)),
        // Random on one of the edges
        (0.0f32..=1.0).prop_map(|x| (x, 1.0 - x, 0.0)),
        (0.0f32..=1.0).prop_map(|x| (0.0, x, 1.0 - x)),
        (0.0f32..=1.0).prop_map(|x| (1.0 - x, 0.0, x)),
        // Random
        (0.0f32..=1.0, 0.0f32..=1.0).prop_map(|(x, y)| {
            let u = x;
            let y = y * (1.0 - u);
            let z = 1.0 - u - y;
            (u, y, z)
        })
    ]
}

pub fn arbitrary_sphere() -> impl Strategy<Value = Sphere> {
    (arbitrary_point(), radius_strategy()).prop_map(|(center, radius)| Sphere::new(center, radius))
}

pub fn arbitrary_aabb() -> impl Strategy<Value = Aabb> {
    (arbitrary_point(), radius_strategy(), radius_strategy(), radius_strategy())
        .prop_map(|(center, x, y, z)| Aabb::from_center_extent(center, Vector3::new(x, y, z)))
}

pub fn arbitrary_plane() -> impl Strategy<Value = Plane> {
    (arbitrary_point(), arbitrary_unit_vector())
        .prop_map(|(point, normal)| Plane::from_point_normal(&point, normal))
}

/// A segment whose length stays well above the zero-axis threshold.
fn arbitrary_axis() -> impl Strategy<Value = (Point3<f32>, Point3<f32>)> {
    (arbitrary_point(), arbitrary_unit_vector(), radius_strategy())
        .prop_map(|(start, dir, len)| (start, start + dir.into_inner() * len * 2.0))
}

pub fn arbitrary_cylinder() -> impl Strategy<Value = Cylinder> {
    (arbitrary_axis(), radius_strategy())
        .prop_map(|((start, end), radius)| Cylinder::new(start, end, radius))
}

pub fn arbitrary_capsule() -> impl Strategy<Value = Capsule> {
    (arbitrary_axis(), radius_strategy())
        .prop_map(|((start, end), radius)| Capsule::new(start, end, radius))
}

pub fn arbitrary_cone() -> impl Strategy<Value = Cone> {
    (arbitrary_axis(), radius_strategy())
        .prop_map(|((base, apex), radius)| Cone::new(base, apex, radius))
}

pub fn arbitrary_disk() -> impl Strategy<Value = Disk> {
    (arbitrary_point(), arbitrary_unit_vector(), radius_strategy())
        .prop_map(|(center, normal, radius)| Disk::new(center, normal, radius))
}

/// A rotated box with orthogonal axes.
pub fn arbitrary_obb() -> impl Strategy<Value = Obb> {
    (
        arbitrary_aabb(),
        -3.2f32..3.2,
        -1.5f32..1.5,
        -3.2f32..3.2,
    )
        .prop_map(|(aabb, roll, pitch, yaw)| {
            let rotation = Rotation3::from_euler_angles(roll, pitch, yaw);
            let center = aabb.center().coords;
            Obb::new(
                Matrix4::new_translation(&center)
                    * rotation.to_homogeneous()
                    * Matrix4::new_nonuniform_scaling(&aabb.half_extents()),
            )
        })
}

/// A rotated box whose axes are sheared against each other, but never flat.
pub fn arbitrary_sheared_obb() -> impl Strategy<Value = Obb> {
    (
        arbitrary_obb(),
        -3.0f32..3.0,
        -3.0f32..3.0,
        -3.0f32..3.0,
    )
        .prop_map(|(obb, xy, xz, yz)| {
            let mut shear = Matrix4::identity();
            shear[(0, 1)] = xy;
            shear[(0, 2)] = xz;
            shear[(1, 2)] = yz;
            Obb::new(obb.transform * shear)
        })
}

pub fn arbitrary_ray() -> impl Strategy<Value = Ray> {
    (arbitrary_point(), arbitrary_unit_vector())
        .prop_map(|(origin, dir)| Ray::new(origin, dir.into_inner()))
}

/// Any bounded shape, with oriented boxes both orthogonal and sheared.
pub fn arbitrary_solid() -> impl Strategy<Value = Shape> {
    prop_oneof![
        arbitrary_point().prop_map(Shape::from),
        arbitrary_sphere().prop_map(Shape::from),
        arbitrary_aabb().prop_map(Shape::from),
        well_shaped_triangle().prop_map(Shape::from),
        arbitrary_cylinder().prop_map(Shape::from),
        arbitrary_capsule().prop_map(Shape::from),
        arbitrary_cone().prop_map(Shape::from),
        arbitrary_disk().prop_map(Shape::from),
        arbitrary_obb().prop_map(Shape::from),
        arbitrary_sheared_obb().prop_map(Shape::from),
    ]
}

pub fn arbitrary_shape() -> impl Strategy<Value = Shape> {
    prop_oneof![
        9 => arbitrary_solid(),
        1 => arbitrary_plane().prop_map(Shape::from),
    ]
}
