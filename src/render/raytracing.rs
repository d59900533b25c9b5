//! Wires a loaded mesh, camera, and [`crate::trace::RayTracer`] together.
//!
//! Grounded in `raytracer_renderer.cpp`: a black miss shader, a Monte-Carlo
//! diffuse closest-hit shader, and a single `ray_generation` call per
//! render. The direct-lighting-with-shadows variant is exposed as
//! [`RayTraceRenderer::render_with_lights`],
//! which instantiates a second tracer sharing the same acceleration
//! structure as its shadow sub-tracer (see DESIGN.md: the source shows this
//! pattern architecturally but the sampled renderer only wires the
//! Monte-Carlo path by default).

use std::f32::consts::FRAC_PI_2;

use crate::color::UColor;
use crate::error::RenderResult;
use crate::mesh::{self, Mesh};
use crate::render::camera_from_settings;
use crate::resource::Resource;
use crate::settings::Settings;
use crate::timing::time_it;
use crate::trace::shaders::{black_miss_shader, diffuse_closest_hit_shader, direct_lighting_closest_hit_shader, shadow_any_hit_shader};
use crate::camera::Camera;
use crate::trace::{Light, RayTracer};

pub struct RayTraceRenderer {
    camera: Camera,
    mesh: Mesh,
    tracer: RayTracer<UColor>,
}

impl RayTraceRenderer {
    pub fn new(settings: &Settings) -> RenderResult<RayTraceRenderer> {
        let mesh = mesh::load_obj(&settings.model_path)?;
        let camera = camera_from_settings(settings);

        let (width, height) = (settings.width as usize, settings.height as usize);
        let mut tracer = RayTracer::new();
        tracer.set_viewport(width, height);
        tracer.set_render_target(Resource::new_2d(width, height));
        tracer.set_vertex_buffers(mesh.shapes.iter().map(|s| s.vertices.clone()).collect());
        tracer.set_index_buffers(mesh.shapes.iter().map(|s| s.indices.clone()).collect());
        tracer.build_acceleration_structure();

        Ok(RayTraceRenderer { camera, mesh, tracer })
    }

    fn fov(&self, settings: &Settings) -> f32 {
        if settings.raytracing_use_fov {
            self.camera.field_of_view()
        } else {
            FRAC_PI_2
        }
    }

    /// Monte-Carlo path tracing render, matching the production default.
    pub fn render(&mut self, settings: &Settings) {
        self.tracer.miss_shader = Some(Box::new(black_miss_shader));
        self.tracer.closest_hit_shader = Some(Box::new(diffuse_closest_hit_shader));
        self.tracer.any_hit_shader = None;

        self.tracer.clear(UColor::BLACK);

        let fov = self.fov(settings);
        time_it("ray tracing", || {
            self.tracer.ray_generation(
                self.camera.position(),
                self.camera.forward(),
                self.camera.right(),
                self.camera.up(),
                fov,
                settings.raytracing_depth,
                settings.accumulation_num,
            );
        });
    }

    /// Direct-lighting-with-shadows render: each closest hit queries every
    /// light through a shadow sub-tracer that shares this renderer's
    /// acceleration structure and short-circuits on the first occluder.
    pub fn render_with_lights(&mut self, settings: &Settings, lights: &[Light]) {
        let mut shadow_tracer: RayTracer<UColor> = RayTracer::new();
        shadow_tracer.acceleration_structures = self.tracer.acceleration_structures.clone();
        shadow_tracer.miss_shader = Some(Box::new(black_miss_shader));
        shadow_tracer.any_hit_shader = Some(Box::new(shadow_any_hit_shader));

        self.tracer.miss_shader = Some(Box::new(black_miss_shader));
        self.tracer.closest_hit_shader =
            Some(Box::new(direct_lighting_closest_hit_shader(shadow_tracer, lights.to_vec())));
        self.tracer.any_hit_shader = None;

        self.tracer.clear(UColor::BLACK);

        let fov = self.fov(settings);
        time_it("ray tracing (direct lighting)", || {
            self.tracer.ray_generation(
                self.camera.position(),
                self.camera.forward(),
                self.camera.right(),
                self.camera.up(),
                fov,
                settings.raytracing_depth,
                settings.accumulation_num,
            );
        });
    }

    pub fn render_target(&self) -> &Resource<UColor> {
        self.tracer.render_target()
    }

    pub fn shape_count(&self) -> usize {
        self.mesh.shapes.len()
    }
}
