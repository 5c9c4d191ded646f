use thiserror::Error;

/// Reasons a byte slice cannot be viewed as a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("vertex buffer holds no vertices")]
    Empty,
    #[error("stride of {stride} bytes cannot hold a 3-component f32 position")]
    StrideTooSmall { stride: usize },
    #[error("{count} vertices need {required} bytes, buffer has {actual}")]
    TooShort {
        count: usize,
        required: usize,
        actual: usize,
    },
}
