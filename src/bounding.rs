//! Bounding volumes fitted to vertex buffers.
//!
//! The axis-aligned and shape-to-shape conversions live on [`Aabb`] and [`Obb`]
//! directly. This module holds the fits that search: the oriented box and the two
//! bounding spheres.

use crate::primitive::{Aabb, Obb, Sphere};
use crate::vertex_buffer::VertexBuffer;
use itertools::iproduct;
use log::trace;
use nalgebra::{center, distance, distance_squared, Point3, Rotation3};
use ordered_float::OrderedFloat;
use std::f32::consts::FRAC_PI_2;

/// Hard cap on the tightening passes of [`calc_min_bounding_sphere`].
const MAX_TIGHTENING_PASSES: usize = 1024;

/// Orientation sweep used by [`calc_obb`].
///
/// Every orientation is one pass over the vertices, so the cost grows with the cube of
/// `steps`: the default of 17 makes 4913 passes. That suits fitting once at load time;
/// per-frame callers want a handful of steps.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObbSearch {
    /// Angles tried per Euler axis, spread over a quarter turn. The sweep evaluates
    /// `steps^3` orientations.
    pub steps: u32,
}

impl ObbSearch {
    /// Number of orientations [`calc_obb`] tries besides the axis-aligned start.
    pub fn candidate_orientations(&self) -> u64 {
        u64::from(self.steps).pow(3)
    }
}

impl Default for ObbSearch {
    fn default() -> Self {
        Self { steps: 17 }
    }
}

/// Tightening schedule used by [`calc_min_bounding_sphere`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinSphereSearch {
    /// Fraction of the radius removed before each regrowth pass. Smaller steps converge
    /// more finely and allow more passes (`ceil(1 / step)`).
    pub step: f32,
}

impl Default for MinSphereSearch {
    fn default() -> Self {
        Self { step: 0.01 }
    }
}

/// Approximates the minimum-volume oriented box around the vertices.
///
/// Starts from the axis-aligned box, then tries every rotation whose Euler angles are
/// multiples of `(pi / 2) / steps`. For each one the points are bounded in the rotated
/// frame, and a candidate replaces the best so far only if its (volume, surface area) is
/// strictly smaller. Surface area breaks ties between flat point sets, which all have
/// zero volume. The result only depends on per-axis min/max, so point order is irrelevant.
pub fn calc_obb(vertices: &VertexBuffer<'_>, search: &ObbSearch) -> Obb {
    let aabb = Aabb::from_vertices(vertices);
    let mut best_key = obb_key(&aabb);
    let mut best = Obb::from_aabb(&aabb);

    let steps = search.steps;
    let angle_step = FRAC_PI_2 / steps.max(1) as f32;

    for (i, j, k) in iproduct!(0..steps, 0..steps, 0..steps) {
        let rotation = Rotation3::from_euler_angles(
            i as f32 * angle_step,
            j as f32 * angle_step,
            k as f32 * angle_step,
        );
        let local = Aabb::from_transformed_vertices(&rotation.inverse().to_homogeneous(), vertices);

        let key = obb_key(&local);
        if key < best_key {
            best_key = key;
            best = Obb::new(rotation.to_homogeneous() * Obb::from_aabb(&local).transform);
        }
    }

    trace!(
        "oriented box over {} vertices, {} orientations: volume {}, area {}",
        vertices.len(),
        search.candidate_orientations(),
        best_key.0,
        best_key.1
    );
    best
}

fn obb_key(aabb: &Aabb) -> (OrderedFloat<f32>, OrderedFloat<f32>) {
    (OrderedFloat(aabb.volume()), OrderedFloat(aabb.surface_area()))
}

/// Loose bounding sphere: centered on the bounding box, reaching the farthest vertex.
///
/// Always contains every vertex; makes no attempt at minimality.
pub fn calc_max_bounding_sphere(vertices: &VertexBuffer<'_>) -> Sphere {
    let center = Aabb::from_vertices(vertices).center();
    Sphere::around_points_with_center(center, vertices.points())
}

/// Tight bounding sphere.
///
/// Seeds with the smaller of Ritter's sphere and [`calc_max_bounding_sphere`], then runs
/// tightening passes: shrink the best sphere by `step`, regrow it over every vertex with
/// [`Sphere::expand_to_cover`], and keep it if it came out smaller. Each pass starts at a
/// different vertex so the regrowth is pulled by different outliers. Stops at the first
/// pass that does not improve, or after `ceil(1 / step)` passes.
///
/// Every candidate is grown over all vertices, so the result contains them all, and its
/// radius never exceeds the loose sphere's.
pub fn calc_min_bounding_sphere(vertices: &VertexBuffer<'_>, search: &MinSphereSearch) -> Sphere {
    let loose = calc_max_bounding_sphere(vertices);
    let ritter = ritter_sphere(vertices);
    let mut best = if ritter.radius < loose.radius {
        ritter
    } else {
        loose
    };

    let step = search.step;
    if step > 0.0 && step < 1.0 && !vertices.is_empty() {
        let passes = ((1.0 / step).ceil() as usize).min(MAX_TIGHTENING_PASSES);
        let count = vertices.len();

        for pass in 0..passes {
            let offset = pass % count;
            let mut candidate = Sphere::new(best.center, best.radius * (1.0 - step));
            for pt in vertices.points().skip(offset).chain(vertices.points().take(offset)) {
                candidate.expand_to_cover(pt);
            }

            if candidate.radius < best.radius {
                best = candidate;
            } else {
                trace!("bounding sphere converged after {pass} passes");
                break;
            }
        }
    }

    // Re-measure from the final center so rounding during growth cannot leave a vertex
    // outside.
    let exact = Sphere::around_points_with_center(best.center, vertices.points());
    if exact.radius <= loose.radius {
        exact
    } else {
        loose
    }
}

/// Ritter's sphere: the farthest pair found from an arbitrary start, grown over every point.
fn ritter_sphere(vertices: &VertexBuffer<'_>) -> Sphere {
    let first = vertices.point(0).unwrap_or_else(Point3::origin);
    let x = farthest_from(vertices, &first);
    let y = farthest_from(vertices, &x);

    let mut sphere = Sphere::new(center(&x, &y), 0.5 * distance(&x, &y));
    for pt in vertices.points() {
        sphere.expand_to_cover(pt);
    }
    sphere
}

fn farthest_from(vertices: &VertexBuffer<'_>, from: &Point3<f32>) -> Point3<f32> {
    vertices
        .points()
        .max_by_key(|pt| OrderedFloat(distance_squared(from, pt)))
        .unwrap_or(*from)
}
