//! Geometry-stage vertex data: clip-space position plus an owned attribute vector.

use nalgebra::Vector4;
use smallvec::SmallVec;

/// Upper bound on `floats_per_vertex`. Chosen generously enough for typical
/// position/normal/uv/color payloads while keeping [`AttributeBuffer`] inline for the
/// common case -- spilling to the heap only for unusually wide attribute vectors.
pub const MAX_FLOATS_PER_VERTEX: usize = 16;

/// A per-vertex attribute vector. Inline up to [`MAX_FLOATS_PER_VERTEX`] floats.
pub type AttributeBuffer = SmallVec<[f32; MAX_FLOATS_PER_VERTEX]>;

/// A vertex between the vertex shader and the rasterizer: a clip-space position and
/// an attribute vector it owns outright. Clipping never aliases attribute storage --
/// every vertex produced by splitting an edge gets a freshly interpolated buffer.
#[derive(Debug, Clone)]
pub struct GeometryVertex {
    /// Homogeneous clip-space (pre-divide) position, as written by the vertex shader.
    pub position: Vector4<f32>,
    /// Length-`F` attribute vector, `F == floats_per_vertex`.
    pub attrs: AttributeBuffer,
}

impl GeometryVertex {
    /// A vertex with a zeroed position and an attribute buffer of `floats_per_vertex`
    /// zeros, ready for the vertex shader to overwrite in place.
    pub fn zeroed(floats_per_vertex: usize) -> GeometryVertex {
        GeometryVertex {
            position: Vector4::zeros(),
            attrs: AttributeBuffer::from_elem(0.0, floats_per_vertex),
        }
    }

    /// Classify this vertex's position against one of the six canonical frustum
    /// planes (face 0 = `x >= -w` ... face 5 = `z <= w`). A point exactly on the
    /// plane counts as inside, so shared edges never produce degenerate zero-area
    /// splits.
    #[inline]
    pub fn inside(&self, face: usize) -> bool {
        let (x, y, z, w) = (self.position.x, self.position.y, self.position.z, self.position.w);

        match face {
            0 => x >= -w,
            1 => x <= w,
            2 => y >= -w,
            3 => y <= w,
            4 => z >= -w,
            5 => z <= w,
            _ => unreachable!("face index {} out of range", face),
        }
    }
}
