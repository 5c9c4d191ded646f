//! Bounding volumes and geometric queries for culling and picking.
//!
//! Everything works in single precision on nalgebra types. Bounding volumes are fitted
//! to strided vertex buffers, rays can be cast against each primitive shape, and the
//! [`Overlaps`] trait answers whether two shapes touch.

pub mod bounding;
pub mod error;
pub mod frustum;
pub mod intersection;
pub mod overlap;
pub mod primitive;
pub mod vertex_buffer;

#[cfg(test)]
pub mod proptest;

// Re-export commonly used types
pub use bounding::{calc_max_bounding_sphere, calc_min_bounding_sphere, calc_obb, MinSphereSearch, ObbSearch};
pub use error::BufferError;
pub use frustum::{build_frustum_planes, intersect_planes, make_ray, ClipDepth, Frustum};
pub use intersection::intersect;
pub use overlap::{overlap, Overlaps, OVERLAP_TOLERANCE};
pub use primitive::{
    Aabb, Capsule, Cone, Cylinder, Disk, Hit, Obb, Plane, Ray, Segment, Shape, Sphere, Triangle,
};
pub use vertex_buffer::VertexBuffer;
