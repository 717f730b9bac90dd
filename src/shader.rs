//! Shader callback contracts. Shader bodies are user-supplied; the pipeline only
//! defines the calling convention and never inspects the uniform block it threads
//! through to them.

use crate::geometry::GeometryVertex;

/// Runs once per vertex. Reads the caller's per-vertex float slice (`floats_per_vertex`
/// long) and the opaque uniform block, and must write both the clip-space position and
/// all `floats_per_vertex` attribute floats of `out`.
pub type VertexShader<U> = dyn Fn(&[f32], &mut GeometryVertex, &U);

/// Runs once per covered, depth-tested pixel. Reads the interpolated attribute vector
/// (`floats_per_vertex` long) and the uniform block, and must return an RGBA color
/// with every channel in `[0, 1]`.
pub type FragmentShader<U> = dyn Fn(&[f32], &U) -> [f32; 4];
