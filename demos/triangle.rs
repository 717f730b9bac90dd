//! Renders two overlapping, depth-tested triangles and dumps the result to a PPM.
//!
//! Exists only to exercise the public pipeline API end-to-end, the way the original
//! crate's `full_example`/`realtime_example` binaries did against the older API.
//! Image serialization is explicitly out of the pipeline's scope, so this hand-rolls
//! the three-line PPM header rather than pulling in an image codec.

use std::fs::File;
use std::io::{self, Write};

use nalgebra::Vector4;
use softrender::framebuffer::unpack_rgba;
use softrender::geometry::GeometryVertex;
use softrender::{InterpRule, Pipeline, RenderType};

/// vertex layout: [x, y, z, w, r, g, b]
fn vertex_shader(input: &[f32], out: &mut GeometryVertex, _: &()) {
    out.position = Vector4::new(input[0], input[1], input[2], input[3]);
    out.attrs.extend_from_slice(&input[4..7]);
}

fn fragment_shader(attrs: &[f32], _: &()) -> [f32; 4] {
    [attrs[0], attrs[1], attrs[2], 1.0]
}

fn write_ppm(path: &str, pipeline: &Pipeline<()>) -> io::Result<()> {
    let fb = pipeline.framebuffer().expect("initialize_render was called");
    let mut file = File::create(path)?;

    writeln!(file, "P3\n{} {}\n255", fb.width(), fb.height())?;

    // PPM rows run top to bottom; the framebuffer's row 0 is the bottom row.
    for q in (0..fb.height()).rev() {
        for p in 0..fb.width() {
            let [r, g, b, _a] = unpack_rgba(fb.color_at(p, q));
            writeln!(file, "{} {} {}", (r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)?;
        }
    }

    Ok(())
}

fn main() {
    pretty_env_logger::init();

    let mut pipeline = Pipeline::new(())
        .with_vertex_shader(vertex_shader)
        .with_fragment_shader(fragment_shader)
        .with_interp_rules(vec![InterpRule::Smooth; 3]);

    pipeline.initialize_render(256, 256).expect("valid framebuffer dimensions");

    #[rustfmt::skip]
    let vertex_data: [f32; 42] = [
        // nearer red triangle
        -0.8, -0.8, 0.0, 1.0,  1.0, 0.0, 0.0,
         0.8, -0.8, 0.0, 1.0,  1.0, 0.0, 0.0,
         0.0,  0.8, 0.0, 1.0,  1.0, 0.0, 0.0,
        // farther blue triangle, partially occluded by the one above
        -0.8,  0.4, 0.5, 1.0,  0.0, 0.0, 1.0,
         0.8,  0.4, 0.5, 1.0,  0.0, 0.0, 1.0,
         0.0, -0.6, 0.5, 1.0,  0.0, 0.0, 1.0,
    ];

    let stats = pipeline
        .render(RenderType::List, &vertex_data, 6, None)
        .expect("render should succeed");

    log::info!("{:?}", stats);

    write_ppm("triangle.ppm", &pipeline).expect("failed to write triangle.ppm");
}
