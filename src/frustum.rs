//! View-frustum planes, plane intersection and pick-ray unprojection.
//!
//! Matrices follow nalgebra's column-vector convention: a world point `p` lands in clip
//! space as `view_proj * p`. Plane normals point into the frustum, so a point is inside
//! when its signed distance to every plane is non-negative.

use crate::primitive::{Aabb, Plane, Ray, Sphere};
use log::debug;
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// Depth range of clip space after the perspective divide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum ClipDepth {
    /// `z` in `[-1, 1]`: OpenGL, and what nalgebra's projections produce.
    #[default]
    NegativeOneToOne,
    /// `z` in `[0, 1]`: Direct3D, Vulkan, Metal and wgpu.
    ZeroToOne,
}

impl ClipDepth {
    /// NDC depth of the near plane.
    pub fn near_z(self) -> f32 {
        match self {
            ClipDepth::NegativeOneToOne => -1.0,
            ClipDepth::ZeroToOne => 0.0,
        }
    }
}

/// Extracts the six clip planes of `view_proj`, ordered near, far, left, right, top,
/// bottom.
///
/// Each plane is a sum or difference of the matrix rows (Gribb and Hartmann), so the
/// frustum does not have to be symmetric, and an orthographic matrix works the same way.
pub fn build_frustum_planes(view_proj: &Matrix4<f32>, depth: ClipDepth) -> [Plane; 6] {
    let [r0, r1, r2, r3] = [0, 1, 2, 3].map(|i| view_proj.row(i).transpose());

    let near = match depth {
        ClipDepth::NegativeOneToOne => r3 + r2,
        ClipDepth::ZeroToOne => r2,
    };

    [near, r3 - r2, r3 + r0, r3 - r0, r3 - r1, r3 + r1]
        .map(|coefficients| normalized_plane(&coefficients))
}

fn normalized_plane(coefficients: &Vector4<f32>) -> Plane {
    Plane::from_coefficients(coefficients).unwrap_or_else(|| {
        // A vanishing normal means the plane sits at infinity (an infinite far plane).
        // Every point is on the side given by the sign of the constant term.
        debug!("frustum plane {coefficients:?} has no normal, treating it as unbounded");
        Plane::new(Vector3::z_axis(), coefficients.w.signum() * f32::INFINITY)
    })
}

/// The single point shared by three planes, or `None` when their normals are (nearly)
/// linearly dependent.
pub fn intersect_planes(pa: &Plane, pb: &Plane, pc: &Plane) -> Option<Point3<f32>> {
    let (na, nb, nc) = (pa.normal.into_inner(), pb.normal.into_inner(), pc.normal.into_inner());

    let bc = nb.cross(&nc);
    let ca = nc.cross(&na);
    let ab = na.cross(&nb);

    let denom = na.dot(&bc);
    if denom.abs() <= 1.0e-6 {
        debug!("planes {pa:?}, {pb:?}, {pc:?} do not meet in a single point");
        return None;
    }

    Some(Point3::from(
        -(bc * pa.dist + ca * pb.dist + ab * pc.dist) / denom,
    ))
}

/// The pick ray through normalized device coordinates `(x, y)`.
///
/// Both ends of the ray are unprojected with `inv_view_proj`: the origin lies on the near
/// plane and the unit direction points at the matching far-plane point.
pub fn make_ray(x: f32, y: f32, inv_view_proj: &Matrix4<f32>, depth: ClipDepth) -> Ray {
    let near = inv_view_proj.transform_point(&Point3::new(x, y, depth.near_z()));
    let far = inv_view_proj.transform_point(&Point3::new(x, y, 1.0));

    let dir = (far - near).try_normalize(0.0).unwrap_or_else(Vector3::zeros);
    Ray::new(near, dir)
}

/// A view volume bounded by six inward-facing planes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    pub fn from_view_proj(view_proj: &Matrix4<f32>, depth: ClipDepth) -> Self {
        Self {
            planes: build_frustum_planes(view_proj, depth),
        }
    }

    pub fn contains_point(&self, pt: &Point3<f32>) -> bool {
        self.planes.iter().all(|plane| plane.signed_distance(pt) >= 0.0)
    }

    /// Conservative: a sphere just outside a frustum edge may still be reported.
    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.signed_distance(&sphere.center) >= -sphere.radius)
    }

    /// Conservative in the same way as [`Frustum::intersects_sphere`]. Only the corner
    /// furthest along each plane normal is tested.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.planes.iter().all(|plane| {
            let n = plane.normal;
            let furthest = Point3::new(
                if n.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if n.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if n.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );
            plane.signed_distance(&furthest) >= 0.0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Isometry3, Perspective3};
    use proptest::prelude::*;

    fn gl_projection() -> Matrix4<f32> {
        Perspective3::new(1.5, std::f32::consts::FRAC_PI_3, 1.0, 20.0).to_homogeneous()
    }

    fn view() -> Matrix4<f32> {
        Isometry3::look_at_rh(
            &Point3::new(0.0, 0.0, 5.0),
            &Point3::origin(),
            &Vector3::y(),
        )
        .to_homogeneous()
    }

    /// Remaps clip depth from [-1, 1] to [0, 1].
    fn zero_to_one_remap() -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 0.5, 0.5, //
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn view_proj(depth: ClipDepth) -> Matrix4<f32> {
        match depth {
            ClipDepth::NegativeOneToOne => gl_projection() * view(),
            ClipDepth::ZeroToOne => zero_to_one_remap() * gl_projection() * view(),
        }
    }

    #[test]
    fn default_depth_is_negative_one_to_one() {
        assert_eq!(ClipDepth::default(), ClipDepth::NegativeOneToOne);
    }

    #[test]
    fn planes_of_a_perspective_camera() {
        let depth = ClipDepth::NegativeOneToOne;
        let [near, far, left, right, top, bottom] = build_frustum_planes(&view_proj(depth), depth);

        // The camera at z = 5 looks down -z; near is at z = 4, far at z = -15.
        assert_relative_eq!(near.normal.into_inner(), -Vector3::z(), epsilon = 1e-5);
        assert_relative_eq!(near.signed_distance(&Point3::new(0.0, 0.0, 4.0)), 0.0, epsilon = 1e-4);
        assert_relative_eq!(far.normal.into_inner(), Vector3::z(), epsilon = 1e-5);
        assert_relative_eq!(far.signed_distance(&Point3::new(0.0, 0.0, -15.0)), 0.0, epsilon = 1e-3);

        assert!(left.normal.x > 0.0);
        assert!(right.normal.x < 0.0);
        assert!(top.normal.y < 0.0);
        assert!(bottom.normal.y > 0.0);
    }

    #[test]
    fn both_depth_conventions_give_the_same_planes() {
        let gl = build_frustum_planes(&view_proj(ClipDepth::NegativeOneToOne), ClipDepth::NegativeOneToOne);
        let d3d = build_frustum_planes(&view_proj(ClipDepth::ZeroToOne), ClipDepth::ZeroToOne);

        for (a, b) in gl.iter().zip(d3d.iter()) {
            assert_relative_eq!(a.normal.into_inner(), b.normal.into_inner(), epsilon = 1e-4);
            assert_relative_eq!(a.dist, b.dist, epsilon = 1e-3);
        }
    }

    #[test]
    fn frustum_corners_are_plane_intersections() {
        let vp = view_proj(ClipDepth::NegativeOneToOne);
        let inverse = vp.try_inverse().unwrap();
        let [near, _, left, _, top, _] = build_frustum_planes(&vp, ClipDepth::NegativeOneToOne);

        let corner = intersect_planes(&near, &left, &top).unwrap();
        let expected = inverse.transform_point(&Point3::new(-1.0, 1.0, -1.0));
        assert_relative_eq!(corner, expected, epsilon = 1e-4);
    }

    #[test]
    fn parallel_planes_do_not_intersect() {
        let a = Plane::new(Vector3::z_axis(), 0.0);
        let b = Plane::new(Vector3::z_axis(), -1.0);
        let c = Plane::new(Vector3::x_axis(), 0.0);

        assert_eq!(intersect_planes(&a, &b, &c), None);
    }

    #[test]
    fn axis_planes_meet_at_their_offsets() {
        let pt = intersect_planes(
            &Plane::new(Vector3::x_axis(), -1.0),
            &Plane::new(Vector3::y_axis(), -2.0),
            &Plane::new(Vector3::z_axis(), 3.0),
        )
        .unwrap();

        assert_relative_eq!(pt, Point3::new(1.0, 2.0, -3.0), epsilon = 1e-6);
    }

    #[test]
    fn center_ray_looks_down_the_view_axis() {
        for depth in [ClipDepth::NegativeOneToOne, ClipDepth::ZeroToOne] {
            let inverse = view_proj(depth).try_inverse().unwrap();
            let ray = make_ray(0.0, 0.0, &inverse, depth);

            assert_relative_eq!(ray.origin, Point3::new(0.0, 0.0, 4.0), epsilon = 1e-4);
            assert_relative_eq!(ray.dir, -Vector3::z(), epsilon = 1e-5);
        }
    }

    #[test]
    fn culling_against_spheres_and_boxes() {
        let depth = ClipDepth::NegativeOneToOne;
        let frustum = Frustum::from_view_proj(&view_proj(depth), depth);

        assert!(frustum.contains_point(&Point3::origin()));
        assert!(!frustum.contains_point(&Point3::new(0.0, 0.0, 10.0)));

        assert!(frustum.intersects_sphere(&Sphere::new(Point3::new(0.0, 0.0, -3.0), 1.0)));
        // Behind the camera, but reaching past the near plane.
        assert!(frustum.intersects_sphere(&Sphere::new(Point3::new(0.0, 0.0, 6.0), 2.5)));
        assert!(!frustum.intersects_sphere(&Sphere::new(Point3::new(0.0, 0.0, 8.0), 1.0)));
        assert!(!frustum.intersects_sphere(&Sphere::new(Point3::new(100.0, 0.0, 0.0), 1.0)));

        let visible = Aabb::from_center_extent(Point3::new(1.0, 1.0, 0.0), Vector3::repeat(0.5));
        let far_off = Aabb::from_center_extent(Point3::new(0.0, 0.0, -40.0), Vector3::repeat(1.0));
        let straddling = Aabb::from_center_extent(Point3::new(0.0, 0.0, 4.0), Vector3::repeat(1.0));
        assert!(frustum.intersects_aabb(&visible));
        assert!(!frustum.intersects_aabb(&far_off));
        assert!(frustum.intersects_aabb(&straddling));
    }

    #[test]
    fn infinite_far_plane_accepts_everything_in_front() {
        // Same camera, far plane pushed to infinity.
        let (near, aspect, fovy) = (1.0f32, 1.5f32, std::f32::consts::FRAC_PI_3);
        let f = 1.0 / (fovy / 2.0).tan();
        let projection = Matrix4::new(
            f / aspect, 0.0, 0.0, 0.0, //
            0.0, f, 0.0, 0.0, //
            0.0, 0.0, -1.0, -2.0 * near, //
            0.0, 0.0, -1.0, 0.0,
        );
        let frustum = Frustum::from_view_proj(&(projection * view()), ClipDepth::NegativeOneToOne);

        assert!(frustum.contains_point(&Point3::new(0.0, 0.0, -1.0e6)));
        assert!(!frustum.contains_point(&Point3::new(0.0, 0.0, 6.0)));
    }

    proptest! {
        #[test]
        fn unprojected_points_are_inside_every_plane(
            depth in any::<ClipDepth>(),
            x in -0.99f32..0.99,
            y in -0.99f32..0.99,
            t in 0.01f32..0.99,
        ) {
            let vp = view_proj(depth);
            let inverse = vp.try_inverse().unwrap();
            let z = depth.near_z() + t * (1.0 - depth.near_z());
            let pt = inverse.transform_point(&Point3::new(x, y, z));

            for plane in build_frustum_planes(&vp, depth) {
                prop_assert!((plane.normal.norm() - 1.0).abs() < 1e-5);
                prop_assert!(plane.signed_distance(&pt) >= -1e-3);
            }
        }

        #[test]
        fn pick_rays_start_on_the_near_plane(
            depth in any::<ClipDepth>(),
            x in -1.0f32..=1.0,
            y in -1.0f32..=1.0,
        ) {
            let vp = view_proj(depth);
            let ray = make_ray(x, y, &vp.try_inverse().unwrap(), depth);
            let [near, far, ..] = build_frustum_planes(&vp, depth);

            prop_assert!(near.signed_distance(&ray.origin).abs() < 1e-3);
            prop_assert!((ray.dir.norm() - 1.0).abs() < 1e-5);
            // Heading into the frustum, away from the near plane.
            prop_assert!(near.normal.dot(&ray.dir) > 0.0);
            prop_assert!(far.normal.dot(&ray.dir) < 0.0);
        }
    }
}
