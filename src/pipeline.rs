//! The state container: holds the framebuffer, both shaders, the uniform block and
//! the per-float interpolation rules, and exposes `initialize_render` / `render`.

use crate::assembler::assemble;
use crate::error::{PipelineError, PipelineResult};
use crate::framebuffer::Framebuffer;
use crate::interp::InterpRule;
use crate::primitive::RenderType;
use crate::rasterize::rasterize_triangle;
use crate::shader::{FragmentShader, VertexShader};

/// Bookkeeping returned by a successful `render()` call. Not part of the spec's data
/// model -- pure diagnostics for callers and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Triangles assembled from `vertex_data`/`index_data`, before clipping.
    pub triangles_assembled: usize,
    /// Triangles that survived clipping and reached the rasterizer.
    pub triangles_rasterized: usize,
    /// Fragments that passed both the coverage and depth tests and were shaded.
    pub fragments_shaded: usize,
}

/// Owns the framebuffer, shaders, uniform block and interpolation rules for one
/// render target, and drives `render()`.
///
/// `U` is the caller's opaque uniform type; the pipeline threads a reference to it
/// through to both shaders and never reads it itself.
pub struct Pipeline<U> {
    framebuffer: Option<Framebuffer>,
    vertex_shader: Option<Box<VertexShader<U>>>,
    fragment_shader: Option<Box<FragmentShader<U>>>,
    interp_rules: Vec<InterpRule>,
    uniforms: U,
}

impl<U> Pipeline<U> {
    /// Create an empty pipeline around the given uniform block. The caller must
    /// still supply shaders and interpolation rules, and call `initialize_render`,
    /// before `render` will succeed.
    pub fn new(uniforms: U) -> Pipeline<U> {
        Pipeline {
            framebuffer: None,
            vertex_shader: None,
            fragment_shader: None,
            interp_rules: Vec::new(),
            uniforms,
        }
    }

    /// Set the vertex shader.
    pub fn with_vertex_shader<F>(mut self, vertex_shader: F) -> Self
    where
        F: Fn(&[f32], &mut crate::geometry::GeometryVertex, &U) + 'static,
    {
        self.vertex_shader = Some(Box::new(vertex_shader));
        self
    }

    /// Set the fragment shader.
    pub fn with_fragment_shader<F>(mut self, fragment_shader: F) -> Self
    where
        F: Fn(&[f32], &U) -> [f32; 4] + 'static,
    {
        self.fragment_shader = Some(Box::new(fragment_shader));
        self
    }

    /// Set the per-float interpolation rules. Length determines `floats_per_vertex`.
    pub fn with_interp_rules(mut self, rules: Vec<InterpRule>) -> Self {
        self.interp_rules = rules;
        self
    }

    /// `floats_per_vertex`, i.e. the number of attribute floats per vertex, as
    /// implied by the length of the configured interpolation rules.
    pub fn floats_per_vertex(&self) -> usize {
        self.interp_rules.len()
    }

    /// Allocate the framebuffer. `width`/`height` must both be positive.
    pub fn initialize_render(&mut self, width: i64, height: i64) -> PipelineResult<()> {
        self.framebuffer = Some(Framebuffer::new(width, height)?);
        Ok(())
    }

    /// Reference to the framebuffer, if `initialize_render` has been called.
    pub fn framebuffer(&self) -> Option<&Framebuffer> {
        self.framebuffer.as_ref()
    }

    /// Reference to the uniform block.
    pub fn uniforms(&self) -> &U {
        &self.uniforms
    }

    /// Mutable reference to the uniform block.
    pub fn uniforms_mut(&mut self) -> &mut U {
        &mut self.uniforms
    }

    /// Render `vertex_data` (`num_vertices` vertices of `floats_per_vertex()` floats
    /// each) under `render_type`, writing shaded, depth-tested pixels into the
    /// framebuffer. For [`RenderType::Indexed`], `index_data` supplies the triangle
    /// indices; it is ignored for every other render type.
    ///
    /// Primitives are processed in assembly order and every fragment of one triangle
    /// is written before the next triangle is assembled, so among primitives whose
    /// interpolated depth at a pixel is exactly equal, the later-assembled one wins
    /// (the depth test is strict-greater, so only a strictly farther fragment is
    /// rejected; a later primitive at equal depth still passes and overwrites).
    pub fn render(
        &mut self,
        render_type: RenderType,
        vertex_data: &[f32],
        num_vertices: usize,
        index_data: Option<&[u32]>,
    ) -> PipelineResult<RenderStats> {
        let vertex_shader = self
            .vertex_shader
            .as_deref()
            .ok_or(PipelineError::Uninitialized("vertex shader not set"))?;
        let fragment_shader = self
            .fragment_shader
            .as_deref()
            .ok_or(PipelineError::Uninitialized("fragment shader not set"))?;
        let framebuffer = self
            .framebuffer
            .as_mut()
            .ok_or(PipelineError::Uninitialized("initialize_render was not called"))?;

        let floats_per_vertex = self.interp_rules.len();
        if floats_per_vertex == 0 && !vertex_data.is_empty() {
            return Err(PipelineError::Uninitialized("interpolation rules not set"));
        }

        log::debug!(
            "render: {:?}, {} vertices, {} floats/vertex",
            render_type,
            num_vertices,
            floats_per_vertex
        );

        let mut stats = RenderStats::default();
        let rules = &self.interp_rules;
        let uniforms = &self.uniforms;

        let triangles_assembled = assemble(
            vertex_data,
            num_vertices,
            floats_per_vertex,
            index_data,
            render_type,
            rules,
            vertex_shader,
            uniforms,
            |tri| {
                stats.triangles_rasterized += 1;
                stats.fragments_shaded += rasterize_triangle(framebuffer, tri, rules, fragment_shader, uniforms);
            },
        )?;

        stats.triangles_assembled = triangles_assembled;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryVertex;
    use nalgebra::Vector4;

    fn passthrough_vertex_shader(input: &[f32], out: &mut GeometryVertex, _: &()) {
        out.position = Vector4::new(input[0], input[1], input[2], input[3]);
        out.attrs.extend_from_slice(&input[4..]);
    }

    #[test]
    fn render_before_initialize_is_an_error() {
        let mut pipeline = Pipeline::new(())
            .with_vertex_shader(passthrough_vertex_shader)
            .with_fragment_shader(|_, _: &()| [0.0, 0.0, 0.0, 1.0])
            .with_interp_rules(vec![]);

        let err = pipeline.render(RenderType::List, &[], 0, None).unwrap_err();
        assert!(matches!(err, PipelineError::Uninitialized(_)));
    }

    #[test]
    fn blank_render_leaves_framebuffer_untouched() {
        let mut pipeline = Pipeline::new(())
            .with_vertex_shader(passthrough_vertex_shader)
            .with_fragment_shader(|_, _: &()| [1.0, 0.0, 0.0, 1.0])
            .with_interp_rules(vec![]);

        pipeline.initialize_render(4, 4).unwrap();
        let stats = pipeline.render(RenderType::List, &[], 0, None).unwrap();

        assert_eq!(stats.triangles_assembled, 0);
        let fb = pipeline.framebuffer().unwrap();
        assert!(fb.color().iter().all(|&c| c == crate::framebuffer::OPAQUE_BLACK));
    }

    #[test]
    fn full_screen_red_triangle_covers_every_pixel() {
        let mut pipeline = Pipeline::new(())
            .with_vertex_shader(passthrough_vertex_shader)
            .with_fragment_shader(|_, _: &()| [1.0, 0.0, 0.0, 1.0])
            .with_interp_rules(vec![]);

        pipeline.initialize_render(4, 4).unwrap();

        #[rustfmt::skip]
        let vertex_data: [f32; 12] = [
            -1.0, -1.0, 0.0, 1.0,
             3.0, -1.0, 0.0, 1.0,
            -1.0,  3.0, 0.0, 1.0,
        ];

        let stats = pipeline.render(RenderType::List, &vertex_data, 3, None).unwrap();

        assert_eq!(stats.triangles_assembled, 1);
        assert_eq!(stats.fragments_shaded, 16);

        let fb = pipeline.framebuffer().unwrap();
        assert!(fb.color().iter().all(|&c| c == crate::framebuffer::pack_rgba([1.0, 0.0, 0.0, 1.0])));
    }
}
