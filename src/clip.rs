//! Sutherland-Hodgman clipping against the six canonical view-frustum planes.
//!
//! `clip_triangle` never mutates its input; every vertex created by splitting an
//! edge against a plane is a fresh [`GeometryVertex`] with its own interpolated
//! attribute buffer, released once the recursion that created it returns.

use crate::geometry::GeometryVertex;
use crate::interp::{self, InterpRule};

/// Number of canonical frustum planes: `x >= -w`, `x <= w`, `y >= -w`, `y <= w`,
/// `z >= -w`, `z <= w`, tested in that order.
pub const NUM_CLIP_PLANES: usize = 6;

/// Recursively clip `tri` against planes `face..NUM_CLIP_PLANES`. Every triangle that
/// survives all six planes is passed to `emit` exactly once, in emission order.
///
/// `first_attrs` is the attribute vector of the *original* (pre-clipping) first
/// vertex of the primitive -- the value every `InterpRule::Flat` float must carry,
/// even for vertices synthesized partway through the recursion.
pub fn clip_triangle(
    rules: &[InterpRule],
    tri: &[GeometryVertex; 3],
    face: usize,
    first_attrs: &crate::geometry::AttributeBuffer,
    emit: &mut dyn FnMut(&[GeometryVertex; 3]),
) {
    if face == NUM_CLIP_PLANES {
        emit(tri);
        return;
    }

    let inside = [tri[0].inside(face), tri[1].inside(face), tri[2].inside(face)];
    let k = inside.iter().filter(|&&b| b).count();

    match k {
        3 => clip_triangle(rules, tri, face + 1, first_attrs, emit),
        0 => {}
        1 => {
            let i = inside.iter().position(|&b| b).unwrap();
            let o1 = (i + 1) % 3;
            let o2 = (i + 2) % 3;

            let p1 = intersect(rules, &tri[i], &tri[o1], face, first_attrs);
            let p2 = intersect(rules, &tri[i], &tri[o2], face, first_attrs);

            let mut new_tri = [tri[i].clone(), p1, p2];
            overwrite_flat(rules, &mut new_tri, first_attrs);
            clip_triangle(rules, &new_tri, face + 1, first_attrs, emit);
        }
        2 => {
            let o = inside.iter().position(|&b| !b).unwrap();
            let i0 = (o + 1) % 3;
            let i1 = (o + 2) % 3;

            // Quad {in0, in1, out} clipped to {in0, in1, p1, p0}; split along the
            // (in0, p1) diagonal per spec.
            let p1 = intersect(rules, &tri[i1], &tri[o], face, first_attrs);
            let p0 = intersect(rules, &tri[i0], &tri[o], face, first_attrs);

            let mut tri_a = [tri[i0].clone(), tri[i1].clone(), p1.clone()];
            let mut tri_b = [tri[i0].clone(), p1, p0];
            overwrite_flat(rules, &mut tri_a, first_attrs);
            overwrite_flat(rules, &mut tri_b, first_attrs);

            clip_triangle(rules, &tri_a, face + 1, first_attrs, emit);
            clip_triangle(rules, &tri_b, face + 1, first_attrs, emit);
        }
        _ => unreachable!("at most 3 vertices can be inside"),
    }
}

/// Force every `Flat`-tagged float of every vertex in `tri` to `first_attrs`.
///
/// The rasterizer only ever reads `Flat` floats from the triangle's vertex 0, but
/// clipping reorders and recombines vertices -- a triangle split out of the k==1/k==2
/// cases above can carry an original, un-synthesized vertex into slot 0 that is not
/// the primitive's provoking vertex. Synthesized vertices already get `first_attrs`
/// for `Flat` floats from [`interp::linear_interpolate`]; this keeps carried-through
/// vertices in sync so the invariant holds no matter which vertex ends up at index 0
/// after further recursion.
fn overwrite_flat(rules: &[InterpRule], tri: &mut [GeometryVertex; 3], first_attrs: &crate::geometry::AttributeBuffer) {
    for vertex in tri.iter_mut() {
        for (i, &rule) in rules.iter().enumerate() {
            if rule == InterpRule::Flat {
                vertex.attrs[i] = first_attrs[i];
            }
        }
    }
}

/// Intersect edge `a -> b` with the plane for `face`, producing a fresh vertex whose
/// position and attributes are both linearly interpolated in clip space.
fn intersect(
    rules: &[InterpRule],
    a: &GeometryVertex,
    b: &GeometryVertex,
    face: usize,
    first_attrs: &crate::geometry::AttributeBuffer,
) -> GeometryVertex {
    let t = plane_parameter(a, b, face);

    let position = a.position + (b.position - a.position) * t;

    let mut attrs = crate::geometry::AttributeBuffer::new();
    interp::linear_interpolate(rules, &a.attrs, &b.attrs, first_attrs, t, &mut attrs);

    GeometryVertex { position, attrs }
}

/// Solve `t` such that `(1-t)*a + t*b` lies exactly on the plane for `face`.
fn plane_parameter(a: &GeometryVertex, b: &GeometryVertex, face: usize) -> f32 {
    // For each plane, expressed so that "inside" is `expr >= 0`; `num` is the signed
    // distance of `a`, and `num - den` the signed distance of `b`.
    let signed_distance = |v: &GeometryVertex| -> f32 {
        let p = v.position;

        match face {
            0 => p.w + p.x,
            1 => p.w - p.x,
            2 => p.w + p.y,
            3 => p.w - p.y,
            4 => p.w + p.z,
            5 => p.w - p.z,
            _ => unreachable!("face index {} out of range", face),
        }
    };

    let da = signed_distance(a);
    let db = signed_distance(b);

    da / (da - db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::AttributeBuffer;
    use nalgebra::Vector4;

    fn vertex(x: f32, y: f32, z: f32, w: f32, attrs: &[f32]) -> GeometryVertex {
        GeometryVertex { position: Vector4::new(x, y, z, w), attrs: AttributeBuffer::from_slice(attrs) }
    }

    #[test]
    fn fully_inside_triangle_passes_through_unchanged() {
        let rules = [InterpRule::Smooth];
        let tri = [
            vertex(0.0, 0.0, 0.0, 1.0, &[1.0]),
            vertex(0.1, 0.0, 0.0, 1.0, &[2.0]),
            vertex(0.0, 0.1, 0.0, 1.0, &[3.0]),
        ];

        let mut out = Vec::new();
        clip_triangle(&rules, &tri, 0, &tri[0].attrs.clone(), &mut |t| out.push(t.clone()));

        assert_eq!(out.len(), 1);
        assert_eq!(out[0][0].position, tri[0].position);
        assert_eq!(out[0][1].attrs[0], 2.0);
    }

    #[test]
    fn fully_outside_triangle_is_discarded() {
        let rules = [InterpRule::Smooth];
        let tri = [
            vertex(5.0, 0.0, 0.0, 1.0, &[1.0]),
            vertex(6.0, 0.0, 0.0, 1.0, &[2.0]),
            vertex(5.0, 1.0, 0.0, 1.0, &[3.0]),
        ];

        let mut out = Vec::new();
        clip_triangle(&rules, &tri, 0, &tri[0].attrs.clone(), &mut |t| out.push(t.clone()));

        assert!(out.is_empty());
    }

    #[test]
    fn one_vertex_outside_produces_one_triangle() {
        let rules = [InterpRule::Smooth];
        // Vertex 1 is outside the right plane (x <= w); 0 and 2 are inside.
        let tri = [
            vertex(0.0, 0.0, 0.0, 1.0, &[0.0]),
            vertex(3.0, 0.0, 0.0, 1.0, &[10.0]),
            vertex(0.0, 1.0, 0.0, 1.0, &[20.0]),
        ];

        let mut out = Vec::new();
        clip_triangle(&rules, &tri, 1, &tri[0].attrs.clone(), &mut |t| out.push(t.clone()));

        assert_eq!(out.len(), 1);
        for v in out[0].iter() {
            assert!(v.position.x <= v.position.w + 1e-5);
        }
    }

    #[test]
    fn two_vertices_outside_produce_two_triangles() {
        let rules = [InterpRule::Smooth];
        let tri = [
            vertex(3.0, 0.0, 0.0, 1.0, &[0.0]),
            vertex(0.0, 0.0, 0.0, 1.0, &[10.0]),
            vertex(3.0, 1.0, 0.0, 1.0, &[20.0]),
        ];

        let mut out = Vec::new();
        clip_triangle(&rules, &tri, 1, &tri[0].attrs.clone(), &mut |t| out.push(t.clone()));

        assert_eq!(out.len(), 2);
        for t in &out {
            for v in t.iter() {
                assert!(v.position.x <= v.position.w + 1e-5);
            }
        }
    }

    #[test]
    fn flat_attribute_survives_clipping_as_original_first_vertex() {
        let rules = [InterpRule::Flat];
        let tri = [
            vertex(0.0, 0.0, 0.0, 1.0, &[7.0]),
            vertex(3.0, 0.0, 0.0, 1.0, &[99.0]),
            vertex(0.0, 1.0, 0.0, 1.0, &[99.0]),
        ];

        let first = tri[0].attrs.clone();
        let mut out = Vec::new();
        clip_triangle(&rules, &tri, 1, &first, &mut |t| out.push(t.clone()));

        for t in &out {
            for v in t.iter() {
                assert_eq!(v.attrs[0], 7.0);
            }
        }
    }
}
