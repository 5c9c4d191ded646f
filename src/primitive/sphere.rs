use crate::primitive::vector_utils::clamp_length;
use nalgebra::{distance_squared, Point3};

/// A solid ball.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    pub center: Point3<f32>,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Point3<f32>, radius: f32) -> Self {
        Self { center, radius }
    }

    /// The smallest sphere centered at `center` that covers every point.
    ///
    /// A point set with no points yields radius zero.
    pub fn around_points_with_center(
        center: Point3<f32>,
        points: impl IntoIterator<Item = Point3<f32>>,
    ) -> Self {
        let radius_sq = points
            .into_iter()
            .fold(0.0f32, |acc, pt| acc.max(distance_squared(&center, &pt)));
        Self::new(center, radius_sq.sqrt())
    }

    pub fn closest_point(&self, pt: &Point3<f32>) -> Point3<f32> {
        self.center + clamp_length(pt - self.center, self.radius)
    }

    pub fn contains_point(&self, pt: &Point3<f32>) -> bool {
        distance_squared(&self.center, pt) <= self.radius * self.radius
    }

    /// Grows the sphere just enough to cover `pt`.
    ///
    /// The new sphere also covers the old one: the center moves toward `pt` by exactly
    /// the amount the radius grows.
    pub fn expand_to_cover(&mut self, pt: Point3<f32>) {
        let delta = pt - self.center;
        let dist_sq = delta.norm_squared();
        if dist_sq <= self.radius * self.radius {
            return;
        }

        let dist = dist_sq.sqrt();
        let radius = 0.5 * (self.radius + dist);
        self.center += delta * ((radius - self.radius) / dist);
        self.radius = radius;
    }
}
