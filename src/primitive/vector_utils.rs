use nalgebra::{Unit, Vector3};

/// Compute an arbitrary 3D vector perpendicular to the given `Vector3<f32>`.
///
/// This function ensures numerical stability by comparing the absolute values of the components.
/// Credit: https://stackoverflow.com/a/11132720
///
/// # Parameters
/// - `vec`: A `Vector3<f32>` representing the input vector.
///
/// # Returns
/// A `Vector3<f32>` that is perpendicular to the input vector. It is zero only if `vec` is zero.
pub fn any_perpendicular(vec: Vector3<f32>) -> Vector3<f32> {
    if vec.z.abs() < vec.x.abs() {
        Vector3::new(vec.y, -vec.x, 0.0)
    } else {
        Vector3::new(0.0, -vec.z, vec.y)
    }
}

/// Completes `normal` into a right-handed orthonormal frame `(u, v, normal)`.
///
/// `u` and `v` span the plane perpendicular to `normal`; used to measure the in-plane
/// extent of circles (disks, cylinder caps).
pub fn orthonormal_basis(normal: &Unit<Vector3<f32>>) -> (Unit<Vector3<f32>>, Unit<Vector3<f32>>) {
    let u = Unit::new_normalize(any_perpendicular(normal.into_inner()));
    let v = Unit::new_normalize(normal.cross(&u));
    (u, v)
}

/// The component of `vec` perpendicular to `axis`, scaled to length `length`.
///
/// `axis` need not be normalized. Returns zero when `vec` is (nearly) parallel to `axis`,
/// in which case every perpendicular direction is equally valid.
pub(crate) fn perpendicular_of_length(
    vec: &Vector3<f32>,
    axis: &Vector3<f32>,
    length: f32,
) -> Vector3<f32> {
    let Some(axis) = axis.try_normalize(0.0) else {
        return vec
            .try_normalize(0.0)
            .map_or_else(Vector3::zeros, |dir| dir * length);
    };

    // Rejecting twice removes the parallel residue left by cancellation.
    let reject = |v: Vector3<f32>| v - axis * v.dot(&axis);
    reject(*vec)
        .try_normalize(1.0e-5 * vec.norm())
        .and_then(|dir| reject(dir).try_normalize(0.0))
        .map_or_else(Vector3::zeros, |dir| dir * length)
}

/// `vec` shortened to at most `max_len`.
pub(crate) fn clamp_length(vec: Vector3<f32>, max_len: f32) -> Vector3<f32> {
    let len_sq = vec.norm_squared();
    if len_sq <= max_len * max_len {
        vec
    } else {
        vec * (max_len / len_sq.sqrt())
    }
}
