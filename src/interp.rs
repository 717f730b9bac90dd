//! Attribute interpolation rules and the weighted blend used to apply them.
//!
//! Each float in a vertex attribute vector carries its own [`InterpRule`]; the
//! rasterizer resolves all three rules against one set of barycentric weights per
//! pixel, and the clipper resolves [`InterpRule::Smooth`] and
//! [`InterpRule::NoPerspective`] identically (both are affine in clip space).

use crate::geometry::AttributeBuffer;

/// How a single attribute float is blended across a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterpRule {
    /// Always takes the value from the triangle's first vertex.
    Flat,
    /// Perspective-correct: affine in world space, via the `1/w` divide and renormalize.
    Smooth,
    /// Linear in screen space; no `1/w` correction.
    NoPerspective,
}

/// Per-pixel barycentric weights in screen space, alongside the reciprocal `w` of
/// each vertex, needed to resolve [`InterpRule::Smooth`].
#[derive(Debug, Clone, Copy)]
pub struct Weights {
    pub alpha: f32,
    pub beta: f32,
    pub gamma: f32,
    pub inv_w: [f32; 3],
}

/// Blend one triangle's three attribute buffers into `out`, applying `rules[i]` to
/// float `i`. `out` is resized to match the input length and reused across pixels by
/// the caller.
pub fn interpolate(rules: &[InterpRule], attrs: [&AttributeBuffer; 3], weights: &Weights, out: &mut AttributeBuffer) {
    out.clear();

    let Weights { alpha, beta, gamma, inv_w } = *weights;

    // Perspective-correct renormalization factor, shared by every `Smooth` float.
    let s = alpha * inv_w[0] + beta * inv_w[1] + gamma * inv_w[2];
    let (a_p, b_p, g_p) = if s != 0.0 {
        (alpha * inv_w[0] / s, beta * inv_w[1] / s, gamma * inv_w[2] / s)
    } else {
        (alpha, beta, gamma)
    };

    for (i, &rule) in rules.iter().enumerate() {
        let value = match rule {
            InterpRule::Flat => attrs[0][i],
            InterpRule::NoPerspective => alpha * attrs[0][i] + beta * attrs[1][i] + gamma * attrs[2][i],
            InterpRule::Smooth => a_p * attrs[0][i] + b_p * attrs[1][i] + g_p * attrs[2][i],
        };

        out.push(value);
    }
}

/// Linearly interpolate two attribute buffers at clip-space parameter `t`, the
/// operation the clipper performs when it splits an edge against a plane.
///
/// `Flat` floats still take vertex `0`'s value unchanged -- `first` is the triangle's
/// original first vertex, which may be neither `a` nor `b` once clipping has already
/// replaced the in/out endpoints of the edge being split.
pub fn linear_interpolate(rules: &[InterpRule], a: &AttributeBuffer, b: &AttributeBuffer, first: &AttributeBuffer, t: f32, out: &mut AttributeBuffer) {
    out.clear();

    for (i, &rule) in rules.iter().enumerate() {
        let value = match rule {
            InterpRule::Flat => first[i],
            InterpRule::Smooth | InterpRule::NoPerspective => (1.0 - t) * a[i] + t * b[i],
        };

        out.push(value);
    }
}
