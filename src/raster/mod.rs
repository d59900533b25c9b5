//! Triangle rasterizer: viewport transform, edge test, perspective-correct
//! interpolation, depth test, and pixel shader invocation.
//!
//! Grounded line-for-line in `renderer/rasterizer/rasterizer.h`. Generic
//! over the render-target pixel type `R` (the vertex type is the crate's
//! single concrete `Vertex`, where the source parameterizes over `VB` too —
//! this crate has only one vertex shape, so that axis of genericity was
//! dropped; see DESIGN.md).

pub mod shaders;

use crate::color::FColor;
use crate::resource::Resource;
use crate::vertex::Vertex;

pub type VertexShader = Box<dyn Fn(Vertex) -> Vertex + Send + Sync>;
pub type PixelShader<'a> = dyn Fn(&Vertex) -> FColor + Send + Sync + 'a;

/// CPU triangle rasterizer.
///
/// `R` is the render-target pixel type (normally [`crate::color::UColor`]).
pub struct Rasterizer<R> {
    width: usize,
    height: usize,

    color_target: Option<Resource<R>>,
    depth_target: Option<Resource<f32>>,

    vertex_buffer: Vec<Vertex>,
    index_buffer: Vec<u32>,

    pub vertex_shader: Option<VertexShader>,
}

impl<R: Clone + Default + Send + From<FColor>> Rasterizer<R> {
    pub fn new() -> Rasterizer<R> {
        Rasterizer {
            width: 1920,
            height: 1080,
            color_target: None,
            depth_target: None,
            vertex_buffer: Vec::new(),
            index_buffer: Vec::new(),
            vertex_shader: None,
        }
    }

    pub fn set_viewport(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    pub fn set_render_target(&mut self, color: Resource<R>, depth: Option<Resource<f32>>) {
        self.color_target = Some(color);
        self.depth_target = depth;
    }

    pub fn set_vertex_buffer(&mut self, vertices: Vec<Vertex>) {
        self.vertex_buffer = vertices;
    }

    pub fn set_index_buffer(&mut self, indices: Vec<u32>) {
        self.index_buffer = indices;
    }

    pub fn color_target(&self) -> &Resource<R> {
        self.color_target.as_ref().expect("render target not set")
    }

    pub fn depth_target(&self) -> Option<&Resource<f32>> {
        self.depth_target.as_ref()
    }

    pub fn into_color_target(self) -> Resource<R> {
        self.color_target.expect("render target not set")
    }

    /// Fills the color buffer with `color_value` and, if present, the depth
    /// buffer with `depth_value` (default `+inf`).
    pub fn clear(&mut self, color_value: R, depth_value: Option<f32>) {
        if let Some(color) = self.color_target.as_mut() {
            color.clear(color_value);
        }
        if let Some(depth) = self.depth_target.as_mut() {
            depth.clear(depth_value.unwrap_or(f32::INFINITY));
        }
    }

    #[inline]
    fn edge(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> f32 {
        (c.0 - a.0) * (b.1 - a.1) - (c.1 - a.1) * (b.0 - a.0)
    }

    /// Rasterizes `num_indices` indices starting at `index_offset`, three at
    /// a time (one triangle per group), invoking `pixel_shader` for every
    /// covered, depth-passing pixel.
    pub fn draw(&mut self, num_indices: usize, index_offset: usize, pixel_shader: &PixelShader<'_>) {
        let vertex_shader = self
            .vertex_shader
            .as_ref()
            .expect("vertex shader must be set before draw");

        let (w, h) = (self.width, self.height);
        let mut i = index_offset;

        while i < index_offset + num_indices {
            let tri_indices = [self.index_buffer[i], self.index_buffer[i + 1], self.index_buffer[i + 2]];
            i += 3;

            let mut verts = tri_indices.map(|idx| vertex_shader(self.vertex_buffer[idx as usize]));

            // Perspective divide, in place: `pos.xyz` becomes NDC, `pos.w`
            // is left holding the original clip-space `w` for the
            // perspective-correct interpolation below.
            for v in verts.iter_mut() {
                let inv_w = 1.0 / v.pos.w;
                v.pos.x *= inv_w;
                v.pos.y *= inv_w;
                v.pos.z *= inv_w;
            }

            let mut screen = [(0.0f32, 0.0f32); 3];
            for (k, v) in verts.iter().enumerate() {
                screen[k] = (
                    (1.0 + v.pos.x) * w as f32 / 2.0,
                    (1.0 - v.pos.y) * h as f32 / 2.0,
                );
            }

            let area = Self::edge(screen[0], screen[1], screen[2]);
            if area <= 0.0 {
                continue; // back-facing or degenerate: skip
            }

            let min_x = screen.iter().map(|p| p.0).fold(f32::INFINITY, f32::min).floor().max(0.0) as usize;
            let min_y = screen.iter().map(|p| p.1).fold(f32::INFINITY, f32::min).floor().max(0.0) as usize;
            let max_x = (screen.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max).ceil() as isize)
                .clamp(0, w as isize) as usize;
            let max_y = (screen.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max).ceil() as isize)
                .clamp(0, h as isize) as usize;

            for y in min_y..max_y {
                for x in min_x..max_x {
                    let p = (x as f32, y as f32);
                    let e1 = Self::edge(screen[0], screen[1], p);
                    let e2 = Self::edge(screen[1], screen[2], p);
                    let e3 = Self::edge(screen[2], screen[0], p);

                    if e1 < 0.0 || e2 < 0.0 || e3 < 0.0 || e1 > area || e2 > area || e3 > area {
                        continue;
                    }

                    let (wa, wb, wc) = (e2 / area, e3 / area, e1 / area);

                    // `pos.xyz` already holds per-vertex NDC after the
                    // in-place divide above, so this is a screen-linear
                    // interpolation of NDC z, not a second perspective divide.
                    let clip_pos = verts[0].pos * wa + verts[1].pos * wb + verts[2].pos * wc;
                    let z = clip_pos.z;
                    if !(0.0..=1.0).contains(&z) {
                        continue;
                    }

                    if let Some(depth) = &self.depth_target {
                        if *depth.at(x, y) <= z {
                            continue;
                        }
                    }

                    // Perspective-correct UV interpolation.
                    let inv_wa = wa / (verts[0].pos.z * verts[0].pos.w);
                    let inv_wb = wb / (verts[1].pos.z * verts[1].pos.w);
                    let inv_wc = wc / (verts[2].pos.z * verts[2].pos.w);
                    let uv_sum = inv_wa + inv_wb + inv_wc;
                    let uv = (verts[0].uv * inv_wa + verts[1].uv * inv_wb + verts[2].uv * inv_wc) / uv_sum;

                    let ambient = verts[0].ambient * wa + verts[1].ambient * wb + verts[2].ambient * wc;

                    let mut interpolated = verts[0];
                    interpolated.pos = clip_pos;
                    interpolated.uv = uv;
                    interpolated.ambient = ambient;

                    let color = pixel_shader(&interpolated);

                    if let Some(depth) = self.depth_target.as_mut() {
                        *depth.at_mut(x, y) = z;
                    }
                    *self.color_target.as_mut().unwrap().at_mut(x, y) = R::from(color);
                }
            }
        }
    }
}

impl<R: Clone + Default + Send + From<FColor>> Default for Rasterizer<R> {
    fn default() -> Self {
        Rasterizer::new()
    }
}
