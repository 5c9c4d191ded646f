use crate::primitive::Segment;
use nalgebra::{Point3, Unit, Vector3};
use ordered_float::OrderedFloat;

/// A triangle in 3D space defined by three points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle {
    /// The first vertex of the triangle.
    pub a: Point3<f32>,
    /// The second vertex of the triangle.
    pub b: Point3<f32>,
    /// The third vertex of the triangle.
    pub c: Point3<f32>,
}

impl Triangle {
    /// True when the vertices are (nearly) collinear: the sine of the angle at `a` is
    /// below `1e-4`, or two vertices coincide.
    pub fn is_degenerate(&self) -> bool {
        let scale = (self.b - self.a).norm_squared() * (self.c - self.a).norm_squared();
        !(self.raw_normal().norm_squared() > 1.0e-8 * scale)
    }
}

impl Triangle {
    pub fn new(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        Self { a, b, c }
    }

    pub fn vertices(&self) -> [Point3<f32>; 3] {
        [self.a, self.b, self.c]
    }

    /// Counter-clockwise normal `(b - a) x (c - a)`; its length is twice the area.
    pub fn raw_normal(&self) -> Vector3<f32> {
        (self.b - self.a).cross(&(self.c - self.a))
    }

    /// `None` for degenerate triangles.
    pub fn unit_normal(&self) -> Option<Unit<Vector3<f32>>> {
        if self.is_degenerate() {
            return None;
        }
        Some(Unit::new_normalize(self.raw_normal()))
    }

    pub fn edges(&self) -> [Segment; 3] {
        [
            Segment::new(self.a, self.b),
            Segment::new(self.b, self.c),
            Segment::new(self.c, self.a),
        ]
    }

    pub fn center(&self) -> Point3<f32> {
        Point3::from((self.a.coords + self.b.coords + self.c.coords) / 3.0)
    }

    pub fn area(&self) -> f32 {
        0.5 * self.raw_normal().norm()
    }

    pub fn closest_point(&self, pt: &Point3<f32>) -> Point3<f32> {
        self.closest_point_with_weights(pt).0
    }

    /// The point of the triangle nearest to `pt`, with its barycentric weights for
    /// `(a, b, c)`.
    ///
    /// Walks the Voronoi regions of the vertices, then the edges, then the face. A weight
    /// of exactly zero means the vertex does not contribute, which the GJK simplex uses to
    /// drop points. Degenerate triangles fall back to the nearest edge.
    pub fn closest_point_with_weights(&self, pt: &Point3<f32>) -> (Point3<f32>, [f32; 3]) {
        let (a, b, c) = (self.a, self.b, self.c);

        if self.is_degenerate() {
            return self.closest_point_on_edges(pt);
        }

        let ab = b - a;
        let ac = c - a;
        let ap = pt - a;
        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return (a, [1.0, 0.0, 0.0]);
        }

        let bp = pt - b;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return (b, [0.0, 1.0, 0.0]);
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return (a + ab * v, [1.0 - v, v, 0.0]);
        }

        let cp = pt - c;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return (c, [0.0, 0.0, 1.0]);
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return (a + ac * w, [1.0 - w, 0.0, w]);
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return (b + (c - b) * w, [0.0, 1.0 - w, w]);
        }

        let denom = 1.0 / (va + vb + vc);
        let v = vb * denom;
        let w = vc * denom;
        (a + ab * v + ac * w, [1.0 - v - w, v, w])
    }

    fn closest_point_on_edges(&self, pt: &Point3<f32>) -> (Point3<f32>, [f32; 3]) {
        let [ab, bc, ca] = self.edges();
        let candidates = [
            {
                let t = ab.closest_parameter(pt);
                (ab.at(t), [1.0 - t, t, 0.0])
            },
            {
                let t = bc.closest_parameter(pt);
                (bc.at(t), [0.0, 1.0 - t, t])
            },
            {
                let t = ca.closest_parameter(pt);
                (ca.at(t), [t, 0.0, 1.0 - t])
            },
        ];

        candidates
            .into_iter()
            .min_by_key(|(closest, _)| OrderedFloat((closest - pt).norm_squared()))
            .unwrap_or((self.a, [1.0, 0.0, 0.0]))
    }
}
