use crate::primitive::Aabb;
use nalgebra::{Matrix4, Point3, Vector3};

/// An oriented box: the image of the cube `[-1, 1]^3` under an affine transform.
///
/// Column `i` of the upper 3x3 block is the half-edge vector along local axis `i`, and
/// the translation column is the box center. Boxes built by [`Obb::from_aabb`] and
/// [`crate::bounding::calc_obb`] have mutually orthogonal columns; queries that need
/// that (point projection) say so.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obb {
    pub transform: Matrix4<f32>,
}

impl Obb {
    pub fn new(transform: Matrix4<f32>) -> Self {
        Self { transform }
    }

    /// Scale by the half extents, then translate to the center.
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self::new(
            Matrix4::new_translation(&aabb.center().coords)
                * Matrix4::new_nonuniform_scaling(&aabb.half_extents()),
        )
    }

    pub fn center(&self) -> Point3<f32> {
        Point3::from(self.transform.column(3).xyz())
    }

    /// Half-edge vectors of the three local axes.
    pub fn half_axes(&self) -> [Vector3<f32>; 3] {
        [0, 1, 2].map(|i| self.transform.column(i).xyz())
    }

    pub fn corners(&self) -> [Point3<f32>; 8] {
        Aabb::from_center_extent(Point3::origin(), Vector3::repeat(1.0))
            .corners()
            .map(|corner| self.transform.transform_point(&corner))
    }

    /// World-to-local transform, or `None` when the box is flat.
    pub fn inverse(&self) -> Option<Matrix4<f32>> {
        let inverse = self.transform.try_inverse();
        if inverse.is_none() {
            log::debug!("oriented box transform is not invertible");
        }
        inverse
    }

    /// Whether the three half axes are mutually perpendicular, as for every box built by
    /// [`Obb::from_aabb`] or [`crate::bounding::calc_obb`]. Collapsed axes count as
    /// perpendicular to everything.
    pub fn has_orthogonal_axes(&self) -> bool {
        let [x, y, z] = self.half_axes();
        [(x, y), (y, z), (z, x)]
            .iter()
            .all(|(a, b)| a.dot(b).abs() <= 1.0e-5 * a.norm() * b.norm())
    }

    /// The point of the box nearest to `pt`.
    ///
    /// Exact only when [`Obb::has_orthogonal_axes`] holds; a sheared box gets the point
    /// found by clamping along each axis in turn, which can lie off the true nearest point.
    pub fn closest_point(&self, pt: &Point3<f32>) -> Point3<f32> {
        let center = self.center();
        let delta = pt - center;

        self.half_axes()
            .iter()
            .filter_map(|half_axis| half_axis.try_normalize(0.0).map(|dir| (dir, half_axis.norm())))
            .fold(center, |closest, (dir, extent)| {
                closest + dir * dir.dot(&delta).clamp(-extent, extent)
            })
    }
}
