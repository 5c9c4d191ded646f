//! Ray casts against every surface in [`crate::primitive`].
//!
//! Every query has the shape `intersect_ray_*(ray, shape, hit) -> bool`. A ray is the
//! half-line `origin + t * dir` with `t >= 0`; a query reports the smallest such `t` on
//! the surface, which for a ray starting inside a solid is the exit point. When `hit`
//! is given it receives that point and the tangent plane there, normal facing out of the
//! surface. Disks are two-sided and report the side facing the ray; triangles report the
//! `(b - a) x (c - a)` side.
//!
//! A ray with a zero direction never hits anything.

use crate::primitive::solid::unit_axis;
use crate::primitive::{
    Aabb, Capsule, Cone, Cylinder, Disk, Hit, Obb, Plane, Ray, Shape, Sphere, Triangle,
};
use nalgebra::{Point3, Unit, Vector3};
use ordered_float::OrderedFloat;

/// Relative size below which `n . dir` counts as parallel.
const PARALLEL_TOLERANCE: f32 = 1.0e-6;

/// A candidate hit: ray parameter and (unnormalized) outward normal.
#[derive(Debug, Clone, Copy)]
struct Toi {
    t: f32,
    normal: Vector3<f32>,
}

impl Toi {
    fn new(t: f32, normal: Vector3<f32>) -> Option<Self> {
        (t >= 0.0 && t.is_finite()).then_some(Self { t, normal })
    }
}

fn nearest(candidates: impl IntoIterator<Item = Option<Toi>>) -> Option<Toi> {
    candidates
        .into_iter()
        .flatten()
        .min_by_key(|toi| OrderedFloat(toi.t))
}

/// Writes the hit if requested. A vanishing normal (the tip of a cone, a zero-radius
/// sphere) falls back to facing the ray.
fn report(ray: &Ray, toi: Option<Toi>, hit: Option<&mut Hit>) -> bool {
    let Some(toi) = toi else {
        return false;
    };
    if let Some(hit) = hit {
        let normal = Unit::try_new(toi.normal, 0.0).unwrap_or_else(|| Unit::new_normalize(-ray.dir));
        *hit = Hit::new(ray.at(toi.t), normal);
    }
    true
}

/// Roots of `a t^2 + 2 half_b t + c = 0` in ascending order.
///
/// Uses the cancellation-free form, so a vanishing `a` still yields the finite root.
fn solve_quadratic(a: f32, half_b: f32, c: f32) -> Option<[f32; 2]> {
    let disc = half_b * half_b - a * c;
    if !(disc >= 0.0) {
        return None;
    }

    let q = -(half_b + half_b.signum() * disc.sqrt());
    if q == 0.0 {
        return (a != 0.0).then_some([0.0, 0.0]);
    }

    let (t0, t1) = (q / a, c / q);
    Some(if t0 <= t1 { [t0, t1] } else { [t1, t0] })
}

pub fn intersect_ray_aabb(ray: &Ray, aabb: &Aabb, hit: Option<&mut Hit>) -> bool {
    !ray.is_degenerate() && report(ray, toi_slabs(ray, &aabb.min, &aabb.max), hit)
}

/// Slab test. Axes the ray runs parallel to only reject; the others narrow the
/// `[enter, exit]` window and remember which face did it.
fn toi_slabs(ray: &Ray, min: &Point3<f32>, max: &Point3<f32>) -> Option<Toi> {
    let mut enter = (f32::NEG_INFINITY, Vector3::zeros());
    let mut exit = (f32::INFINITY, Vector3::zeros());

    for axis in 0..3 {
        let (origin, dir) = (ray.origin[axis], ray.dir[axis]);
        if dir == 0.0 {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }

        let t_min = (min[axis] - origin) / dir;
        let t_max = (max[axis] - origin) / dir;
        let outward = Vector3::ith(axis, 1.0);
        let ((t_near, n_near), (t_far, n_far)) = if dir > 0.0 {
            ((t_min, -outward), (t_max, outward))
        } else {
            ((t_max, outward), (t_min, -outward))
        };

        if t_near > enter.0 {
            enter = (t_near, n_near);
        }
        if t_far < exit.0 {
            exit = (t_far, n_far);
        }
    }

    if enter.0 > exit.0 {
        return None;
    }
    Toi::new(enter.0, enter.1).or_else(|| Toi::new(exit.0, exit.1))
}

/// Casts in the box's local frame, where it is the cube `[-1, 1]^3`. The affine map keeps
/// the ray parameter, and normals go back through the inverse transpose.
pub fn intersect_ray_obb(ray: &Ray, obb: &Obb, hit: Option<&mut Hit>) -> bool {
    if ray.is_degenerate() {
        return false;
    }
    let Some(inverse) = obb.inverse() else {
        return false;
    };

    let local = Ray::new(
        inverse.transform_point(&ray.origin),
        inverse.transform_vector(&ray.dir),
    );
    let unit = Point3::new(1.0, 1.0, 1.0);
    let toi = toi_slabs(&local, &-unit, &unit).map(|toi| Toi {
        t: toi.t,
        normal: inverse.fixed_view::<3, 3>(0, 0).transpose() * toi.normal,
    });
    report(ray, toi, hit)
}

pub fn intersect_ray_sphere(ray: &Ray, sphere: &Sphere, hit: Option<&mut Hit>) -> bool {
    !ray.is_degenerate() && report(ray, toi_sphere(ray, sphere, |_| true), hit)
}

/// Nearest sphere hit whose surface point passes `accept`.
fn toi_sphere(ray: &Ray, sphere: &Sphere, accept: impl Fn(&Point3<f32>) -> bool) -> Option<Toi> {
    let m = ray.origin - sphere.center;
    let roots = solve_quadratic(
        ray.dir.norm_squared(),
        m.dot(&ray.dir),
        m.norm_squared() - sphere.radius * sphere.radius,
    )?;

    nearest(roots.map(|t| {
        let pt = ray.at(t);
        if accept(&pt) {
            Toi::new(t, pt - sphere.center)
        } else {
            None
        }
    }))
}

/// The side surface of the infinite cylinder around `start + axis * h`, kept where
/// `0 <= h <= len`.
fn toi_lateral(
    ray: &Ray,
    start: &Point3<f32>,
    axis: &Unit<Vector3<f32>>,
    len: f32,
    radius: f32,
) -> Option<Toi> {
    let reject = |v: Vector3<f32>| v - axis.into_inner() * axis.dot(&v);
    let m = reject(ray.origin - start);
    let d = reject(ray.dir);

    let roots = solve_quadratic(d.norm_squared(), m.dot(&d), m.norm_squared() - radius * radius)?;
    nearest(roots.map(|t| {
        let h = axis.dot(&(ray.at(t) - start));
        if (0.0..=len).contains(&h) {
            Toi::new(t, m + d * t)
        } else {
            None
        }
    }))
}

pub fn intersect_ray_cylinder(ray: &Ray, cylinder: &Cylinder, hit: Option<&mut Hit>) -> bool {
    if ray.is_degenerate() {
        return false;
    }
    let Some((axis, len)) = unit_axis(&cylinder.start, &cylinder.end) else {
        let ball = Sphere::new(cylinder.start, cylinder.radius);
        return report(ray, toi_sphere(ray, &ball, |_| true), hit);
    };

    let caps = cylinder
        .caps()
        .into_iter()
        .flatten()
        .map(|cap| toi_disk(ray, &cap).and_then(|t| Toi::new(t, cap.normal.into_inner())));
    let lateral = toi_lateral(ray, &cylinder.start, &axis, len, cylinder.radius);
    let toi = nearest(std::iter::once(lateral).chain(caps));
    report(ray, toi, hit)
}

pub fn intersect_ray_capsule(ray: &Ray, capsule: &Capsule, hit: Option<&mut Hit>) -> bool {
    if ray.is_degenerate() {
        return false;
    }
    let Some((axis, len)) = unit_axis(&capsule.start, &capsule.end) else {
        let ball = Sphere::new(capsule.start, capsule.radius);
        return report(ray, toi_sphere(ray, &ball, |_| true), hit);
    };

    let height = |pt: &Point3<f32>| axis.dot(&(pt - capsule.start));
    let toi = nearest([
        toi_lateral(ray, &capsule.start, &axis, len, capsule.radius),
        toi_sphere(ray, &Sphere::new(capsule.start, capsule.radius), |pt| {
            height(pt) <= 0.0
        }),
        toi_sphere(ray, &Sphere::new(capsule.end, capsule.radius), |pt| {
            height(pt) >= len
        }),
    ]);
    report(ray, toi, hit)
}

/// The lateral surface is the nappe of the double cone `(w . v)^2 = cos^2 |w|^2` between
/// the apex and the base, with `w` measured from the apex and `v` pointing at the base.
pub fn intersect_ray_cone(ray: &Ray, cone: &Cone, hit: Option<&mut Hit>) -> bool {
    if ray.is_degenerate() {
        return false;
    }
    let Some((axis, len)) = unit_axis(&cone.apex, &cone.base) else {
        let ball = Sphere::new(cone.base, cone.radius);
        return report(ray, toi_sphere(ray, &ball, |_| true), hit);
    };

    let cos_sq = len * len / (len * len + cone.radius * cone.radius);
    let m = ray.origin - cone.apex;
    let (dv, mv) = (axis.dot(&ray.dir), axis.dot(&m));

    let lateral = solve_quadratic(
        dv * dv - cos_sq * ray.dir.norm_squared(),
        mv * dv - cos_sq * m.dot(&ray.dir),
        mv * mv - cos_sq * m.norm_squared(),
    )
    .and_then(|roots| {
        nearest(roots.map(|t| {
            let w = m + ray.dir * t;
            let h = axis.dot(&w);
            if (0.0..=len).contains(&h) {
                Toi::new(t, w * cos_sq - axis.into_inner() * h)
            } else {
                None
            }
        }))
    });

    let base = cone
        .base_disk()
        .and_then(|disk| toi_disk(ray, &disk).and_then(|t| Toi::new(t, disk.normal.into_inner())));

    report(ray, nearest([lateral, base]), hit)
}

pub fn intersect_ray_disk(ray: &Ray, disk: &Disk, hit: Option<&mut Hit>) -> bool {
    if ray.is_degenerate() {
        return false;
    }
    let toi = toi_disk(ray, disk).and_then(|t| {
        let normal = disk.normal.into_inner();
        Toi::new(t, if normal.dot(&ray.dir) > 0.0 { -normal } else { normal })
    });
    report(ray, toi, hit)
}

fn toi_plane(ray: &Ray, plane: &Plane) -> Option<f32> {
    let denom = plane.normal.dot(&ray.dir);
    if denom.abs() <= PARALLEL_TOLERANCE * ray.dir.norm() {
        return None;
    }

    let t = -plane.signed_distance(&ray.origin) / denom;
    (t >= 0.0).then_some(t)
}

fn toi_disk(ray: &Ray, disk: &Disk) -> Option<f32> {
    let t = toi_plane(ray, &disk.plane())?;
    let radius_sq = disk.radius * disk.radius;
    ((ray.at(t) - disk.center).norm_squared() <= radius_sq).then_some(t)
}

/// On a hit, the reported plane is `plane` itself.
pub fn intersect_ray_plane(ray: &Ray, plane: &Plane, hit: Option<&mut Hit>) -> bool {
    if ray.is_degenerate() {
        return false;
    }
    let Some(t) = toi_plane(ray, plane) else {
        return false;
    };

    if let Some(hit) = hit {
        *hit = Hit {
            pos: ray.at(t),
            plane: *plane,
        };
    }
    true
}

/// Two-sided Moller-Trumbore. Degenerate triangles are never hit.
pub fn intersect_ray_triangle(ray: &Ray, triangle: &Triangle, hit: Option<&mut Hit>) -> bool {
    !ray.is_degenerate() && report(ray, toi_triangle(ray, triangle), hit)
}

fn toi_triangle(ray: &Ray, triangle: &Triangle) -> Option<Toi> {
    let e1 = triangle.b - triangle.a;
    let e2 = triangle.c - triangle.a;

    let p = ray.dir.cross(&e2);
    let det = e1.dot(&p);
    if det.abs() <= PARALLEL_TOLERANCE * e1.norm() * e2.norm() * ray.dir.norm() {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = ray.origin - triangle.a;
    let u = s.dot(&p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&e1);
    let v = ray.dir.dot(&q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    Toi::new(e2.dot(&q) * inv_det, e1.cross(&e2))
}

/// Casts against any shape. Points have no surface and are never hit.
pub fn intersect(ray: &Ray, shape: &Shape, hit: Option<&mut Hit>) -> bool {
    match shape {
        Shape::Point(_) => false,
        Shape::Sphere(sphere) => intersect_ray_sphere(ray, sphere, hit),
        Shape::Aabb(aabb) => intersect_ray_aabb(ray, aabb, hit),
        Shape::Plane(plane) => intersect_ray_plane(ray, plane, hit),
        Shape::Triangle(triangle) => intersect_ray_triangle(ray, triangle, hit),
        Shape::Cylinder(cylinder) => intersect_ray_cylinder(ray, cylinder, hit),
        Shape::Capsule(capsule) => intersect_ray_capsule(ray, capsule, hit),
        Shape::Cone(cone) => intersect_ray_cone(ray, cone, hit),
        Shape::Disk(disk) => intersect_ray_disk(ray, disk, hit),
        Shape::Obb(obb) => intersect_ray_obb(ray, obb, hit),
    }
}
