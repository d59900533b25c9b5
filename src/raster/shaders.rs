//! Pixel shader variants for the rasterization renderer.
//!
//! Ported from `rasterizer_renderer.cpp`'s `empty_pixel_shader`,
//! `ambient_pixel_shader`, `texture_pixel_shader`, `depth_pixel_shader`, and
//! `fog_pixel_shader`.

use crate::color::FColor;
use crate::texture::Sampler;
use crate::vertex::Vertex;

pub fn empty_pixel_shader(_vertex: &Vertex) -> FColor {
    FColor::BLACK
}

pub fn ambient_pixel_shader(vertex: &Vertex) -> FColor {
    vertex.ambient
}

/// Samples `sampler` at the interpolated UV and adds the ambient term,
/// clamped to `[0, 1]`. When the shape has no diffuse texture bound, renders
/// ambient-only (mirrors the source's `data == nullptr` short-circuit,
/// which returns `vertex.ambient` before the sampler is ever touched).
pub fn texture_pixel_shader(vertex: &Vertex, sampler: &Sampler<'_>) -> FColor {
    match sampler {
        Sampler::None => vertex.ambient,
        Sampler::Texture(_) => (sampler.sample(vertex.uv.x, vertex.uv.y) + vertex.ambient).clamp(0.0, 1.0),
    }
}

/// Darkens ambient color with view-space depth; `bias`/`fade` control the
/// falloff (`--lps_bias`/`--lps_fade`).
pub fn depth_pixel_shader(bias: f32, fade: f32) -> impl Fn(&Vertex) -> FColor {
    move |vertex: &Vertex| {
        let z = vertex.pos.z * vertex.pos.w;
        vertex.ambient * (1.0 + (bias - fade * z).clamp(-1.0, 0.0))
    }
}

/// Blends ambient color toward a grey fog color with view-space depth.
pub fn fog_pixel_shader(bias: f32, fade: f32) -> impl Fn(&Vertex) -> FColor {
    move |vertex: &Vertex| {
        let z = vertex.pos.z * vertex.pos.w;
        vertex.ambient + FColor::splat(0.7) * (fade * z - bias).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Vector2, Vector4};

    fn test_vertex(ambient: FColor) -> Vertex {
        Vertex {
            pos: Vector4::new(0.0, 0.0, 0.5, 1.0),
            norm: Default::default(),
            uv: Vector2::new(0.0, 0.0),
            ambient,
            diffuse: FColor::BLACK,
            emissive: FColor::BLACK,
        }
    }

    #[test]
    fn texture_shader_falls_back_to_ambient_without_texture() {
        let v = test_vertex(FColor::new(0.2, 0.3, 0.4));
        let sampler = Sampler::None;
        let color = texture_pixel_shader(&v, &sampler);
        assert_eq!(color, FColor::new(0.2, 0.3, 0.4));
    }

    #[test]
    fn depth_shader_never_brightens() {
        let v = test_vertex(FColor::splat(0.5));
        let shade = depth_pixel_shader(0.0, 1.0);
        let color = shade(&v);
        assert!(color.r <= 0.5 && color.g <= 0.5 && color.b <= 0.5);
    }
}
