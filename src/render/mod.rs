//! Renderers: wire a loaded [`crate::mesh::Mesh`], a [`crate::camera::Camera`],
//! and an engine (rasterizer or ray tracer) together, matching
//! `rasterization_renderer`/`ray_tracing_renderer` from the source.

pub mod rasterization;
pub mod raytracing;

use nalgebra::Vector3;

use crate::camera::Camera;
use crate::settings::Settings;

/// Builds a [`Camera`] from the CLI settings, shared by both renderers.
pub fn camera_from_settings(settings: &Settings) -> Camera {
    let mut camera = Camera::default();
    camera.set_width(settings.width as f32);
    camera.set_height(settings.height as f32);
    camera.set_position(Vector3::new(
        settings.camera_position[0],
        settings.camera_position[1],
        settings.camera_position[2],
    ));
    camera.set_theta(settings.camera_theta);
    camera.set_phi(settings.camera_phi);
    camera.set_field_of_view(settings.camera_angle_of_view);
    camera.set_z_near(settings.camera_z_near);
    camera.set_z_far(settings.camera_z_far);
    camera
}
