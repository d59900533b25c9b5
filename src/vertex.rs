//! Per-vertex data shared by the rasterizer and the ray tracer.

use nalgebra::{Vector2, Vector3, Vector4};

use crate::color::FColor;

/// Position (mesh-local on load; overwritten with clip-space `(x, y, z, w)`
/// by the rasterizer's vertex shader), normal, UV, and material colors.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub pos: Vector4<f32>,
    pub norm: Vector3<f32>,
    pub uv: Vector2<f32>,
    pub ambient: FColor,
    pub diffuse: FColor,
    pub emissive: FColor,
}

impl Vertex {
    pub fn new(position: Vector3<f32>) -> Vertex {
        Vertex {
            pos: position.to_homogeneous(),
            norm: Vector3::zeros(),
            uv: Vector2::zeros(),
            ambient: FColor::BLACK,
            diffuse: FColor::BLACK,
            emissive: FColor::BLACK,
        }
    }
}
