//! Error types returned by the pipeline's public entry points.

use thiserror::Error;

/// Errors the pipeline can report. Input-validation errors (everything but
/// [`PipelineError::OutOfMemory`]) are always surfaced before any framebuffer mutation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// `initialize_render` was called with a non-positive width or height.
    #[error("invalid framebuffer dimensions: {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    /// `render` was called before `initialize_render`, or with a shader unset.
    #[error("pipeline is not fully initialized: {0}")]
    Uninitialized(&'static str),

    /// An unrecognized primitive assembly mode.
    #[error("unrecognized render type")]
    InvalidRenderType,

    /// An index in `index_data` fell outside `[0, num_vertices)`.
    #[error("index {index} out of range for {num_vertices} vertices")]
    OutOfRangeIndex { index: u32, num_vertices: u32 },

    /// Allocation failed while clipping a primitive. The current primitive is
    /// abandoned; the framebuffer retains the state of the last fully processed one.
    #[error("out of memory while clipping a primitive")]
    OutOfMemory,
}

/// Convenience alias for pipeline results.
pub type PipelineResult<T> = Result<T, PipelineError>;
