use nalgebra::Point3;

/// A struct representing a line segment in 3D space.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Segment {
    /// The starting point of the segment.
    pub a: Point3<f32>,
    /// The ending point of the segment.
    pub b: Point3<f32>,
}

impl Segment {
    /// Creates a new `Segment` with the given starting and ending points.
    ///
    /// # Arguments
    ///
    /// * `a` - The starting point of the segment.
    /// * `b` - The ending point of the segment.
    pub fn new(a: Point3<f32>, b: Point3<f32>) -> Self {
        Self { a, b }
    }

    /// Parameter in `[0, 1]` of the point on the segment closest to `point`.
    ///
    /// A zero-length segment always yields `0`.
    pub fn closest_parameter(&self, point: &Point3<f32>) -> f32 {
        // Project the point onto the edge.
        let edge_dir = self.b - self.a;
        let len_sq = edge_dir.norm_squared();
        if len_sq <= 0.0 {
            return 0.0;
        }
        ((point - self.a).dot(&edge_dir) / len_sq).clamp(0.0, 1.0)
    }

    pub fn closest_point(&self, point: &Point3<f32>) -> Point3<f32> {
        self.at(self.closest_parameter(point))
    }

    pub fn distance_to_point(&self, point: &Point3<f32>) -> f32 {
        let closest = self.closest_point(point);
        (closest - point).norm()
    }

    /// Linear interpolation between `a` (at `t = 0`) and `b` (at `t = 1`).
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.a + (self.b - self.a) * t
    }

    pub fn length(&self) -> f32 {
        (self.b - self.a).norm()
    }
}
