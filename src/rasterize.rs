//! Scan-converts one clip-space triangle that has survived all six clipping planes:
//! viewport transform, bounding box, barycentric coverage test, depth test, and
//! fragment-shader invocation.

use crate::framebuffer::Framebuffer;
use crate::geometry::{AttributeBuffer, GeometryVertex};
use crate::interp::{self, InterpRule, Weights};
use crate::shader::FragmentShader;

/// A vertex position after the perspective divide and viewport transform: pixel
/// coordinates `(i, j)` plus the post-divide depth `z/w` and `1/w`.
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    i: f32,
    j: f32,
    depth: f32,
    inv_w: f32,
}

fn to_screen(v: &GeometryVertex, width: usize, height: usize) -> ScreenVertex {
    let w = v.position.w;
    let (width, height) = (width as f32, height as f32);

    ScreenVertex {
        i: (width / 2.0) * (v.position.x / w) + (width / 2.0) - 0.5,
        j: (height / 2.0) * (v.position.y / w) + (height / 2.0) - 0.5,
        depth: v.position.z / w,
        inv_w: 1.0 / w,
    }
}

/// Twice the signed area of the triangle `(p0, p1, p2)` in screen space.
#[inline]
fn edge(p0: (f32, f32), p1: (f32, f32), p2: (f32, f32)) -> f32 {
    (p1.0 - p0.0) * (p2.1 - p0.1) - (p2.0 - p0.0) * (p1.1 - p0.1)
}

/// Rasterize one clipped triangle into `framebuffer`, invoking `fragment_shader` for
/// each covered, depth-tested pixel. Returns the number of fragments shaded.
pub fn rasterize_triangle<U>(
    framebuffer: &mut Framebuffer,
    tri: &[GeometryVertex; 3],
    rules: &[InterpRule],
    fragment_shader: &FragmentShader<U>,
    uniforms: &U,
) -> usize {
    let (width, height) = (framebuffer.width(), framebuffer.height());

    let s = [
        to_screen(&tri[0], width, height),
        to_screen(&tri[1], width, height),
        to_screen(&tri[2], width, height),
    ];

    let p = [(s[0].i, s[0].j), (s[1].i, s[1].j), (s[2].i, s[2].j)];

    let area = edge(p[0], p[1], p[2]);
    if area == 0.0 {
        return 0; // degenerate triangle, no pixels to cover
    }

    let min_i = p.iter().map(|v| v.0).fold(f32::INFINITY, f32::min).floor().max(0.0) as isize;
    let min_j = p.iter().map(|v| v.1).fold(f32::INFINITY, f32::min).floor().max(0.0) as isize;
    let max_i = p.iter().map(|v| v.0).fold(f32::NEG_INFINITY, f32::max).ceil().min(width as f32 - 1.0) as isize;
    let max_j = p.iter().map(|v| v.1).fold(f32::NEG_INFINITY, f32::max).ceil().min(height as f32 - 1.0) as isize;

    if min_i > max_i || min_j > max_j {
        return 0;
    }

    log::trace!("rasterizing triangle bbox [{},{}]..[{},{}]", min_i, min_j, max_i, max_j);

    let mut shaded = 0;
    let mut out_attrs = AttributeBuffer::new();

    for q in min_j..=max_j {
        for i in min_i..=max_i {
            let pixel = (i as f32, q as f32);

            let w0 = edge(p[1], p[2], pixel);
            let w1 = edge(p[2], p[0], pixel);
            let w2 = edge(p[0], p[1], pixel);

            // Barycentric weights, normalized so alpha+beta+gamma == 1 and all three
            // share the same sign convention as `area`.
            let alpha = w0 / area;
            let beta = w1 / area;
            let gamma = w2 / area;

            if alpha < 0.0 || beta < 0.0 || gamma < 0.0 {
                continue;
            }

            let depth = alpha * s[0].depth + beta * s[1].depth + gamma * s[2].depth;

            let (p_idx, q_idx) = (i as usize, q as usize);
            if !framebuffer.passes_depth_test(p_idx, q_idx, depth) {
                continue;
            }

            let weights = Weights { alpha, beta, gamma, inv_w: [s[0].inv_w, s[1].inv_w, s[2].inv_w] };
            interp::interpolate(rules, [&tri[0].attrs, &tri[1].attrs, &tri[2].attrs], &weights, &mut out_attrs);

            let rgba = fragment_shader(&out_attrs, uniforms);
            framebuffer.commit(p_idx, q_idx, depth, rgba);
            shaded += 1;
        }
    }

    shaded
}
