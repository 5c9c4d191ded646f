//! This module contains the primitive geometry types.
//!
//! We define primitive geometry as any geometry of O(1) complexity: points, segments,
//! triangles, planes, and the bounding volumes built around them.
//!
//! All of these are plain `Copy` values. The only mutation any of them supports is
//! growing an [`Aabb`] or a [`Sphere`] to cover an extra point.

pub mod aabb;
pub mod disk;
pub mod hit;
pub mod obb;
pub mod plane;
pub mod ray;
pub mod segment;
pub mod shape;
pub mod solid;
pub mod sphere;
pub mod triangle;
pub mod vector_utils;

pub use aabb::Aabb;
pub use disk::Disk;
pub use hit::Hit;
pub use obb::Obb;
pub use plane::Plane;
pub use ray::Ray;
pub use segment::Segment;
pub use shape::Shape;
pub use solid::{Capsule, Cone, Cylinder};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Squared length below which an axis or direction is treated as zero.
pub(crate) const DEGENERATE_LENGTH_SQUARED: f32 = 1.0e-12;
