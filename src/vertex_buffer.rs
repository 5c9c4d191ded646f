//! A borrowed, strided view of vertex positions.
//!
//! Vertex data usually interleaves positions with normals, UVs and so on. The view only
//! knows where each record starts and reads the leading `[f32; 3]` of every record.

use crate::error::BufferError;
use nalgebra::Point3;
use std::mem::size_of;

const POSITION_SIZE: usize = size_of::<[f32; 3]>();

#[derive(Debug, Clone, Copy)]
pub struct VertexBuffer<'a> {
    bytes: &'a [u8],
    count: usize,
    stride: usize,
}

impl<'a> VertexBuffer<'a> {
    /// Views `count` records of `stride` bytes each, starting at the front of `bytes`.
    ///
    /// The last record only needs to hold its position, so trailing attributes may be
    /// cut off. Reads are unaligned; `bytes` can come from any allocation.
    pub fn new(bytes: &'a [u8], count: usize, stride: usize) -> Result<Self, BufferError> {
        if count == 0 {
            return Err(BufferError::Empty);
        }
        if stride < POSITION_SIZE {
            return Err(BufferError::StrideTooSmall { stride });
        }

        let required = (count - 1)
            .checked_mul(stride)
            .and_then(|offset| offset.checked_add(POSITION_SIZE))
            .unwrap_or(usize::MAX);
        if bytes.len() < required {
            return Err(BufferError::TooShort {
                count,
                required,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            bytes,
            count,
            stride,
        })
    }

    /// Views a tightly packed position array.
    pub fn from_positions(positions: &'a [[f32; 3]]) -> Result<Self, BufferError> {
        Self::new(bytemuck::cast_slice(positions), positions.len(), POSITION_SIZE)
    }

    /// Number of vertices; never zero.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Always false for a constructed view, since [`VertexBuffer::new`] rejects empty
    /// buffers.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn point(&self, index: usize) -> Option<Point3<f32>> {
        if index >= self.count {
            return None;
        }
        let start = index * self.stride;
        self.bytes
            .get(start..start + POSITION_SIZE)
            .map(read_position)
    }

    pub fn points(&self) -> impl Iterator<Item = Point3<f32>> + Clone + 'a {
        let view = *self;
        (0..self.count).filter_map(move |index| view.point(index))
    }
}

fn read_position(record: &[u8]) -> Point3<f32> {
    let [x, y, z]: [f32; 3] = bytemuck::pod_read_unaligned(record);
    Point3::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_interleaved_positions() {
        // position (3 floats) followed by a uv pair.
        let interleaved: [f32; 10] = [1.0, 2.0, 3.0, 0.5, 0.5, 4.0, 5.0, 6.0, 0.0, 1.0];
        let bytes: &[u8] = bytemuck::cast_slice(&interleaved);
        let buffer = VertexBuffer::new(bytes, 2, 5 * 4).unwrap();

        assert_eq!(buffer.len(), 2);
        assert!(!buffer.is_empty());
        let points: Vec<_> = buffer.points().collect();
        assert_eq!(
            points,
            vec![Point3::new(1.0, 2.0, 3.0), Point3::new(4.0, 5.0, 6.0)]
        );
    }

    #[test]
    fn reads_unaligned_records() {
        let mut bytes = vec![0u8; 1 + 12];
        bytes[1..].copy_from_slice(bytemuck::cast_slice(&[7.0f32, 8.0, 9.0]));
        let buffer = VertexBuffer::new(&bytes[1..], 1, 12).unwrap();

        assert_eq!(buffer.point(0), Some(Point3::new(7.0, 8.0, 9.0)));
        assert_eq!(buffer.point(1), None);
    }

    #[test]
    fn last_record_may_be_truncated() {
        // Two records with a stride of 7 floats, the second cut off after its position.
        let data = [0.0f32; 7 + 3];
        let bytes: &[u8] = bytemuck::cast_slice(&data);
        assert!(VertexBuffer::new(bytes, 2, 7 * 4).is_ok());
        assert!(VertexBuffer::new(&bytes[..bytes.len() - 1], 2, 7 * 4).is_err());
    }

    #[test]
    fn rejects_bad_layouts() {
        let data = [0.0f32; 6];
        let bytes: &[u8] = bytemuck::cast_slice(&data);

        assert_eq!(VertexBuffer::new(bytes, 0, 12).unwrap_err(), BufferError::Empty);
        assert_eq!(
            VertexBuffer::new(bytes, 1, 8).unwrap_err(),
            BufferError::StrideTooSmall { stride: 8 }
        );
        assert_eq!(
            VertexBuffer::new(bytes, 3, 12).unwrap_err(),
            BufferError::TooShort {
                count: 3,
                required: 36,
                actual: 24
            }
        );
        assert!(VertexBuffer::from_positions(&[]).is_err());
    }
}
