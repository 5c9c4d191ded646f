//! Boolean GJK: do two convex shapes come within a tolerance of each other?
//!
//! Works on the Minkowski difference `A - B`, which contains the origin exactly when the
//! shapes overlap. Each iteration finds the point of the current simplex nearest the
//! origin, drops the simplex vertices that do not support it, and adds the support point
//! of `A - B` in the opposite direction.

use crate::overlap::support::SupportMap;
use crate::primitive::{Segment, Triangle};
use log::trace;
use nalgebra::{Point3, Vector3};
use ordered_float::OrderedFloat;

const MAX_ITERATIONS: usize = 64;

/// Relative improvement of the distance estimate below which the search has converged.
const MIN_PROGRESS: f32 = 1.0e-6;

fn support<A: SupportMap, B: SupportMap>(a: &A, b: &B, dir: &Vector3<f32>) -> Point3<f32> {
    Point3::from(a.support_point(dir) - b.support_point(&-dir))
}

/// Whether the distance between `a` and `b` is at most `tolerance`.
pub fn intersects<A: SupportMap, B: SupportMap>(a: &A, b: &B, tolerance: f32) -> bool {
    let mut simplex = Simplex::new(support(a, b, &Vector3::x()));

    for _ in 0..MAX_ITERATIONS {
        let Some(closest) = simplex.reduce_to_closest() else {
            return true;
        };

        let v = closest.coords;
        let dist_sq = v.norm_squared();
        if dist_sq <= tolerance * tolerance {
            return true;
        }

        let w = support(a, b, &-v);
        let vw = v.dot(&w.coords);
        // Every point p of A - B has p . v >= w . v, so this is a lower distance bound.
        if vw > tolerance * dist_sq.sqrt() {
            return false;
        }
        // Stalled with `vw <= tolerance * |v|`, so `|v|` is within the tolerance up to
        // the progress threshold.
        if dist_sq - vw <= MIN_PROGRESS * dist_sq {
            return true;
        }

        simplex.push(w);
    }

    trace!("GJK did not converge in {MAX_ITERATIONS} iterations");
    false
}

/// Up to four points of the Minkowski difference.
struct Simplex {
    points: [Point3<f32>; 4],
    len: usize,
}

impl Simplex {
    fn new(pt: Point3<f32>) -> Self {
        Self {
            points: [pt; 4],
            len: 1,
        }
    }

    fn push(&mut self, pt: Point3<f32>) {
        if self.len < 4 {
            self.points[self.len] = pt;
            self.len += 1;
        }
    }

    fn keep<const N: usize>(&mut self, vertices: [Point3<f32>; N], weights: [f32; N]) {
        self.len = 0;
        for (pt, weight) in vertices.into_iter().zip(weights) {
            if weight > 0.0 {
                self.push(pt);
            }
        }
        if self.len == 0 {
            self.push(vertices[0]);
        }
    }

    /// The point of the simplex nearest the origin, after shrinking the simplex to the
    /// smallest face containing it. `None` when a tetrahedron encloses the origin.
    fn reduce_to_closest(&mut self) -> Option<Point3<f32>> {
        let origin = Point3::origin();
        let [a, b, c, d] = self.points;

        match self.len {
            1 => Some(a),
            2 => {
                let t = Segment::new(a, b).closest_parameter(&origin);
                self.keep([a, b], [1.0 - t, t]);
                Some(a + (b - a) * t)
            }
            3 => {
                let (closest, weights) = Triangle::new(a, b, c).closest_point_with_weights(&origin);
                self.keep([a, b, c], weights);
                Some(closest)
            }
            _ => {
                let (closest, face, weights) = closest_on_tetrahedron(a, b, c, d)?;
                self.keep(face, weights);
                Some(closest)
            }
        }
    }
}

type FaceHit = (Point3<f32>, [Point3<f32>; 3], [f32; 3]);

/// Nearest point to the origin over the faces the origin lies outside of.
///
/// A flat tetrahedron has no inside, so all four faces are searched.
fn closest_on_tetrahedron(
    a: Point3<f32>,
    b: Point3<f32>,
    c: Point3<f32>,
    d: Point3<f32>,
) -> Option<FaceHit> {
    let volume = (b - a).dot(&(c - a).cross(&(d - a)));
    let scale = (b - a).norm() * (c - a).norm() * (d - a).norm();
    let flat = volume.abs() <= 1.0e-6 * scale;

    [[a, b, c, d], [a, c, d, b], [a, d, b, c], [b, d, c, a]]
        .into_iter()
        .filter(|[p, q, r, opposite]| {
            let normal = (q - p).cross(&(r - p));
            let origin_side = -normal.dot(&p.coords);
            let opposite_side = normal.dot(&(opposite - p));
            flat || origin_side * opposite_side < 0.0
        })
        .map(|[p, q, r, _]| {
            let (closest, weights) = Triangle::new(p, q, r).closest_point_with_weights(&Point3::origin());
            (closest, [p, q, r], weights)
        })
        .min_by_key(|(closest, _, _)| OrderedFloat(closest.coords.norm_squared()))
}
