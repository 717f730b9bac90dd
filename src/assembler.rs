//! Walks vertex/index data under one of the four [`RenderType`]s, runs the vertex
//! shader on each vertex, and hands assembled triangles to the clipper.

use crate::clip::clip_triangle;
use crate::error::{PipelineError, PipelineResult};
use crate::geometry::GeometryVertex;
use crate::interp::InterpRule;
use crate::primitive::RenderType;
use crate::shader::VertexShader;

/// Per-triangle vertex indices the assembler should hand to the vertex shader, for
/// one of the four [`RenderType`]s.
fn triangle_indices(render_type: RenderType, num_vertices: usize, index_data: Option<&[u32]>) -> PipelineResult<Vec<[usize; 3]>> {
    match render_type {
        RenderType::List => {
            let count = num_vertices / 3;
            Ok((0..count).map(|t| [t * 3, t * 3 + 1, t * 3 + 2]).collect())
        }
        RenderType::Indexed => {
            let indices = index_data.ok_or(PipelineError::Uninitialized("index_data is required for RenderType::Indexed"))?;

            for &index in indices {
                if index as usize >= num_vertices {
                    return Err(PipelineError::OutOfRangeIndex { index, num_vertices: num_vertices as u32 });
                }
            }

            Ok(indices.chunks_exact(3).map(|c| [c[0] as usize, c[1] as usize, c[2] as usize]).collect())
        }
        RenderType::Fan => {
            if num_vertices < 3 {
                return Ok(Vec::new());
            }
            Ok((1..num_vertices - 1).map(|k| [0, k, k + 1]).collect())
        }
        RenderType::Strip => {
            if num_vertices < 3 {
                return Ok(Vec::new());
            }
            Ok((0..num_vertices - 2).map(|k| [k, k + 1, k + 2]).collect())
        }
    }
}

/// Assemble and clip every triangle of one primitive, invoking `on_triangle` for each
/// fully-clipped triangle that survives all six planes (ready for the rasterizer).
///
/// Returns the number of triangles assembled before clipping.
pub fn assemble<U>(
    vertex_data: &[f32],
    num_vertices: usize,
    floats_per_vertex: usize,
    index_data: Option<&[u32]>,
    render_type: RenderType,
    rules: &[InterpRule],
    vertex_shader: &VertexShader<U>,
    uniforms: &U,
    mut on_triangle: impl FnMut(&[GeometryVertex; 3]),
) -> PipelineResult<usize> {
    let triangles = triangle_indices(render_type, num_vertices, index_data)?;

    for [i0, i1, i2] in triangles.iter().copied() {
        let tri = [
            run_vertex_shader(vertex_data, i0, floats_per_vertex, vertex_shader, uniforms),
            run_vertex_shader(vertex_data, i1, floats_per_vertex, vertex_shader, uniforms),
            run_vertex_shader(vertex_data, i2, floats_per_vertex, vertex_shader, uniforms),
        ];

        let first_attrs = tri[0].attrs.clone();
        clip_triangle(rules, &tri, 0, &first_attrs, &mut on_triangle);
        // `tri` and its attribute buffers are dropped here, before the next
        // triangle of this primitive is assembled.
    }

    Ok(triangles.len())
}

fn run_vertex_shader<U>(vertex_data: &[f32], index: usize, floats_per_vertex: usize, vertex_shader: &VertexShader<U>, uniforms: &U) -> GeometryVertex {
    let start = index * floats_per_vertex;
    let input = &vertex_data[start..start + floats_per_vertex];

    let mut out = GeometryVertex::zeroed(floats_per_vertex);
    vertex_shader(input, &mut out, uniforms);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_mode_ignores_trailing_vertices() {
        let indices = triangle_indices(RenderType::List, 7, None).unwrap();
        assert_eq!(indices, vec![[0, 1, 2], [3, 4, 5]]);
    }

    #[test]
    fn fan_mode_shares_the_first_vertex() {
        let indices = triangle_indices(RenderType::Fan, 5, None).unwrap();
        assert_eq!(indices, vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]]);
    }

    #[test]
    fn strip_mode_slides_by_one() {
        let indices = triangle_indices(RenderType::Strip, 5, None).unwrap();
        assert_eq!(indices, vec![[0, 1, 2], [1, 2, 3], [2, 3, 4]]);
    }

    #[test]
    fn indexed_mode_rejects_out_of_range_indices() {
        let err = triangle_indices(RenderType::Indexed, 3, Some(&[0, 1, 5])).unwrap_err();
        assert!(matches!(err, PipelineError::OutOfRangeIndex { index: 5, num_vertices: 3 }));
    }

    #[test]
    fn indexed_mode_reads_triangles_from_index_data() {
        let indices = triangle_indices(RenderType::Indexed, 4, Some(&[0, 1, 2, 1, 2, 3])).unwrap();
        assert_eq!(indices, vec![[0, 1, 2], [1, 2, 3]]);
    }
}
