//! Separating-axis tests between boxes and triangles.
//!
//! Two convex polyhedra are disjoint iff their projections are disjoint on one of the
//! face normals of either, or on a cross product of an edge of each. Boxes here are
//! parallelepipeds, so an oriented box with sheared axes still gets the exact axis set.

use crate::overlap::OVERLAP_TOLERANCE;
use crate::primitive::vector_utils::any_perpendicular;
use crate::primitive::{Aabb, Obb, Triangle};
use itertools::iproduct;
use nalgebra::{Point3, Vector3};

/// Axes from nearly parallel edges are skipped; the face normals cover that case.
const MIN_AXIS_SINE: f32 = 1.0e-6;

/// Shapes that can be projected onto an axis.
trait Project {
    fn project(&self, axis: &Vector3<f32>) -> (f32, f32);
}

/// A box spanned by three half-edge vectors around a center.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Parallelepiped {
    center: Point3<f32>,
    half_edges: [Vector3<f32>; 3],
    /// Unit edge directions; a collapsed edge is replaced by a direction completing the
    /// other two to a basis, so face normals of flat boxes still exist.
    dirs: [Vector3<f32>; 3],
}

impl Parallelepiped {
    pub fn from_aabb(aabb: &Aabb) -> Self {
        let extent = aabb.half_extents();
        Self {
            center: aabb.center(),
            half_edges: [
                Vector3::x() * extent.x,
                Vector3::y() * extent.y,
                Vector3::z() * extent.z,
            ],
            dirs: [Vector3::x(), Vector3::y(), Vector3::z()],
        }
    }

    pub fn from_obb(obb: &Obb) -> Self {
        let half_edges = obb.half_axes();
        Self {
            center: obb.center(),
            half_edges,
            dirs: complete_basis(half_edges.map(|edge| edge.try_normalize(0.0))),
        }
    }

    fn face_normals(&self) -> [Option<Vector3<f32>>; 3] {
        let [a, b, c] = self.dirs;
        [unit_cross(&b, &c), unit_cross(&c, &a), unit_cross(&a, &b)]
    }

    fn edge_dirs(&self) -> [Option<Vector3<f32>>; 3] {
        self.dirs.map(Some)
    }
}

impl Project for Parallelepiped {
    fn project(&self, axis: &Vector3<f32>) -> (f32, f32) {
        let center = self.center.coords.dot(axis);
        let radius: f32 = self.half_edges.iter().map(|edge| edge.dot(axis).abs()).sum();
        (center - radius, center + radius)
    }
}

impl Project for Triangle {
    fn project(&self, axis: &Vector3<f32>) -> (f32, f32) {
        self.vertices()
            .iter()
            .map(|pt| pt.coords.dot(axis))
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), d| {
                (lo.min(d), hi.max(d))
            })
    }
}

/// Fills in missing directions so that the three span space.
fn complete_basis(dirs: [Option<Vector3<f32>>; 3]) -> [Vector3<f32>; 3] {
    let mut basis = [Vector3::x(), Vector3::y(), Vector3::z()];
    for (slot, dir) in basis.iter_mut().zip(dirs) {
        if let Some(dir) = dir {
            *slot = dir;
        }
    }

    for i in 0..3 {
        if dirs[i].is_some() {
            continue;
        }
        let (u, v) = (basis[(i + 1) % 3], basis[(i + 2) % 3]);
        basis[i] = unit_cross(&u, &v).unwrap_or_else(|| any_perpendicular(u).normalize());
    }
    basis
}

fn unit_cross(a: &Vector3<f32>, b: &Vector3<f32>) -> Option<Vector3<f32>> {
    a.cross(b).try_normalize(MIN_AXIS_SINE)
}

fn triangle_normal(triangle: &Triangle) -> Option<Vector3<f32>> {
    triangle.unit_normal().map(|normal| normal.into_inner())
}

fn triangle_edge_dirs(triangle: &Triangle) -> [Option<Vector3<f32>>; 3] {
    triangle
        .edges()
        .map(|edge| (edge.b - edge.a).try_normalize(0.0))
}

fn edge_crosses(
    a: [Option<Vector3<f32>>; 3],
    b: [Option<Vector3<f32>>; 3],
) -> impl Iterator<Item = Option<Vector3<f32>>> {
    iproduct!(a, b).map(|(a, b)| unit_cross(&a?, &b?))
}

fn has_separating_axis(
    a: &impl Project,
    b: &impl Project,
    axes: impl IntoIterator<Item = Option<Vector3<f32>>>,
) -> bool {
    axes.into_iter().flatten().any(|axis| {
        let (a_min, a_max) = a.project(&axis);
        let (b_min, b_max) = b.project(&axis);
        a_min > b_max + OVERLAP_TOLERANCE || b_min > a_max + OVERLAP_TOLERANCE
    })
}

/// Box faces, the triangle normal, and the edge cross products: 13 axes for a box.
pub(crate) fn parallelepiped_triangle(cuboid: &Parallelepiped, triangle: &Triangle) -> bool {
    let axes = cuboid
        .face_normals()
        .into_iter()
        .chain([triangle_normal(triangle)])
        .chain(edge_crosses(cuboid.edge_dirs(), triangle_edge_dirs(triangle)));
    !has_separating_axis(cuboid, triangle, axes)
}

/// Both normals, the nine edge cross products, and each normal crossed with every edge
/// of both triangles, which separates triangles lying in a common plane.
pub(crate) fn triangle_triangle(a: &Triangle, b: &Triangle) -> bool {
    let (a_edges, b_edges) = (triangle_edge_dirs(a), triangle_edge_dirs(b));
    let normals = [triangle_normal(a), triangle_normal(b)];
    let in_plane = iproduct!(normals, a_edges.into_iter().chain(b_edges))
        .map(|(normal, edge)| unit_cross(&normal?, &edge?));

    let axes = normals
        .into_iter()
        .chain(edge_crosses(a_edges, b_edges))
        .chain(in_plane);
    !has_separating_axis(a, b, axes)
}

/// Face normals of both, and the nine edge cross products: 15 axes.
pub(crate) fn parallelepiped_parallelepiped(a: &Parallelepiped, b: &Parallelepiped) -> bool {
    let axes = a
        .face_normals()
        .into_iter()
        .chain(b.face_normals())
        .chain(edge_crosses(a.edge_dirs(), b.edge_dirs()));
    !has_separating_axis(a, b, axes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Matrix4, Rotation3};

    fn unit_box() -> Parallelepiped {
        Parallelepiped::from_aabb(&Aabb::from_center_extent(Point3::origin(), Vector3::repeat(1.0)))
    }

    fn tri(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle {
        Triangle::new(a.into(), b.into(), c.into())
    }

    #[test]
    fn triangle_crossing_box_without_vertices_inside() {
        // Large triangle slicing through the box; no vertex is inside.
        let slicing = tri([-5.0, -5.0, 0.0], [5.0, -5.0, 0.0], [0.0, 5.0, 0.0]);
        assert!(parallelepiped_triangle(&unit_box(), &slicing));
    }

    #[test]
    fn triangle_along_box_edge() {
        // Upright triangles in the planes x + y = 2.2 and x + y = 2, which touches the
        // (1, 1, z) edge.
        let past_edge = tri([0.2, 2.0, -1.0], [2.0, 0.2, -1.0], [1.1, 1.1, 1.0]);
        assert!(!parallelepiped_triangle(&unit_box(), &past_edge));

        let touching = tri([0.0, 2.0, -1.0], [2.0, 0.0, -1.0], [1.0, 1.0, 1.0]);
        assert!(parallelepiped_triangle(&unit_box(), &touching));
    }

    #[test]
    fn coplanar_triangles() {
        let a = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let overlapping = tri([0.2, 0.2, 0.0], [2.0, 0.2, 0.0], [0.2, 2.0, 0.0]);
        let beside = tri([1.0, 1.0, 0.0], [2.0, 1.0, 0.0], [1.0, 2.0, 0.0]);

        assert!(triangle_triangle(&a, &overlapping));
        assert!(!triangle_triangle(&a, &beside));
    }

    #[test]
    fn crossing_triangles() {
        let flat = tri([-1.0, -1.0, 0.0], [2.0, -1.0, 0.0], [-1.0, 2.0, 0.0]);
        let upright = tri([0.0, 0.0, -1.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]);
        let lifted = tri([0.0, 0.0, 0.5], [0.0, 0.0, 1.0], [0.0, 1.0, 0.5]);

        assert!(triangle_triangle(&flat, &upright));
        assert!(!triangle_triangle(&flat, &lifted));
    }

    #[test]
    fn rotated_box_corner_against_box() {
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), std::f32::consts::FRAC_PI_4);
        let diamond = |x: f32| {
            Parallelepiped::from_obb(&Obb::new(
                Matrix4::new_translation(&Vector3::new(x, 0.0, 0.0)) * rotation.to_homogeneous(),
            ))
        };

        // The diamond's corner reaches sqrt(2) from its center.
        assert!(parallelepiped_parallelepiped(&unit_box(), &diamond(2.4)));
        assert!(!parallelepiped_parallelepiped(&unit_box(), &diamond(2.5)));
    }

    #[test]
    fn flat_box_keeps_side_axes() {
        let flat = Parallelepiped::from_obb(&Obb::new(Matrix4::new_nonuniform_scaling(
            &Vector3::new(1.0, 1.0, 0.0),
        )));
        let beside = Parallelepiped::from_aabb(&Aabb::from_center_extent(
            Point3::new(3.0, 0.0, 0.0),
            Vector3::repeat(1.0),
        ));

        assert!(!parallelepiped_parallelepiped(&flat, &beside));
        assert!(parallelepiped_parallelepiped(&flat, &unit_box()));
    }
}
