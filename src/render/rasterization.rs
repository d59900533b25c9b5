//! Wires a loaded mesh, camera, and [`crate::raster::Rasterizer`] together.
//!
//! Grounded in `rasterizer_renderer.cpp`: one MVP vertex shader shared by
//! every shape, a pixel shader chosen once per render from the CLI flags,
//! and a per-shape draw call with an optionally-bound diffuse texture.

use nalgebra::Vector3;

use crate::camera::Camera;
use crate::color::UColor;
use crate::error::RenderResult;
use crate::mesh::{self, Mesh};
use crate::raster::{shaders, Rasterizer};
use crate::resource::Resource;
use crate::settings::Settings;
use crate::texture::{Sampler, Texture};
use crate::timing::time_it;
use crate::vertex::Vertex;

use super::camera_from_settings;

pub struct RasterRenderer {
    camera: Camera,
    mesh: Mesh,
    rasterizer: Rasterizer<UColor>,
}

impl RasterRenderer {
    pub fn new(settings: &Settings) -> RenderResult<RasterRenderer> {
        let mesh = mesh::load_obj(&settings.model_path)?;
        let camera = camera_from_settings(settings);

        let (width, height) = (settings.width as usize, settings.height as usize);
        let mut rasterizer = Rasterizer::new();
        rasterizer.set_viewport(width, height);

        let color_target = Resource::new_2d(width, height);
        let depth_target = if settings.disable_depth {
            None
        } else {
            Some(Resource::new_2d(width, height))
        };
        rasterizer.set_render_target(color_target, depth_target);

        Ok(RasterRenderer { camera, mesh, rasterizer })
    }

    pub fn render(&mut self, settings: &Settings) {
        let mvp = self.camera.projection_matrix() * self.camera.view_matrix();
        self.rasterizer.vertex_shader = Some(Box::new(move |mut vertex: Vertex| {
            vertex.pos = mvp * vertex.pos;
            vertex
        }));

        self.rasterizer.clear(UColor::BLACK, None);

        let fade = settings.lps_fade;
        let bias = settings
            .lps_bias
            .unwrap_or_else(|| fade * (self.camera.position() - Vector3::repeat(0.5)).norm());

        for shape in &self.mesh.shapes {
            self.rasterizer.set_vertex_buffer(shape.vertices.clone());
            self.rasterizer.set_index_buffer(shape.indices.clone());

            let texture = shape.diffuse_texture.as_ref().and_then(|path| match Texture::load(path) {
                Ok(texture) => Some(texture),
                Err(err) => {
                    log::warn!("texture load failed, falling back to ambient only: {err}");
                    None
                }
            });

            let num_indices = shape.indices.len();
            time_it(&format!("draw shape ({} triangles)", shape.triangle_count()), || {
                if settings.zshader {
                    let shade = shaders::depth_pixel_shader(bias, fade);
                    self.rasterizer.draw(num_indices, 0, &shade);
                } else if settings.fogshader {
                    let shade = shaders::fog_pixel_shader(bias, fade);
                    self.rasterizer.draw(num_indices, 0, &shade);
                } else {
                    let sampler = match &texture {
                        Some(tex) => Sampler::Texture(tex),
                        None => Sampler::None,
                    };
                    let shade = |v: &Vertex| shaders::texture_pixel_shader(v, &sampler);
                    self.rasterizer.draw(num_indices, 0, &shade);
                }
            });
        }
    }

    pub fn color_target(&self) -> &Resource<UColor> {
        self.rasterizer.color_target()
    }

    pub fn depth_target(&self) -> Option<&Resource<f32>> {
        self.rasterizer.depth_target()
    }
}
