//! CLI configuration surface, parsed with `clap`'s derive API.
//!
//! Defaults mirror `settings.cpp`. `--zshader`/`--fogshader` and
//! `--lps_bias`/`--lps_fade` were free-form `extra_options` string lookups
//! in the source; here they're first-class typed flags.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Which engine drives the render. Not part of the source's CLI surface
/// directly (there the two engines were separate executables); folded into
/// one binary here since both share this crate's core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderMode {
    Raster,
    Raytrace,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "softrender", about = "CPU rasterizer and path tracer for triangulated meshes")]
pub struct Settings {
    #[arg(long, value_enum, default_value_t = RenderMode::Raster)]
    pub mode: RenderMode,

    #[arg(long, default_value_t = 1080)]
    pub height: u32,

    #[arg(long, default_value_t = 1920)]
    pub width: u32,

    #[arg(long, default_value = "models/cube.obj")]
    pub model_path: PathBuf,

    /// World-space camera position, as `x,y,z`.
    #[arg(long, value_delimiter = ',', num_args = 3, default_values_t = [0.0, 1.0, 5.0])]
    pub camera_position: Vec<f32>,

    #[arg(long, default_value_t = 0.0)]
    pub camera_theta: f32,

    #[arg(long, default_value_t = 0.0)]
    pub camera_phi: f32,

    #[arg(long, default_value_t = 60.0)]
    pub camera_angle_of_view: f32,

    #[arg(long, default_value_t = 0.001)]
    pub camera_z_near: f32,

    #[arg(long, default_value_t = 100.0)]
    pub camera_z_far: f32,

    #[arg(long, default_value_t = false)]
    pub disable_depth: bool,

    #[arg(long, default_value = "result.png")]
    pub result_path: PathBuf,

    /// Optional raw depth dump path; absent by default.
    #[arg(long)]
    pub depth_export_path: Option<PathBuf>,

    #[arg(long, default_value_t = 1)]
    pub raytracing_depth: usize,

    #[arg(long, default_value_t = 1)]
    pub accumulation_num: usize,

    /// Use the camera's configured FOV when generating primary rays.
    /// The source has a variant that instead derives an implicit FOV from
    /// the forward vector's magnitude; this flag keeps that variant
    /// reachable for comparison renders at a fixed reference FOV of 90
    /// degrees, with explicit FOV as the default.
    #[arg(long, default_value_t = true)]
    pub raytracing_use_fov: bool,

    /// Render with the depth-darkening pixel shader instead of texture+ambient.
    #[arg(long, default_value_t = false)]
    pub zshader: bool,

    /// Render with the fog pixel shader instead of texture+ambient.
    #[arg(long, default_value_t = false)]
    pub fogshader: bool,

    /// Depth-shader bias; defaults to `fade * |camera_position - 0.5|` if unset.
    #[arg(long)]
    pub lps_bias: Option<f32>,

    #[arg(long, default_value_t = 0.1)]
    pub lps_fade: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_renderer() {
        let settings = Settings::parse_from(["softrender"]);
        assert_eq!(settings.width, 1920);
        assert_eq!(settings.height, 1080);
        assert_eq!(settings.camera_position, vec![0.0, 1.0, 5.0]);
        assert_eq!(settings.raytracing_depth, 1);
        assert_eq!(settings.accumulation_num, 1);
        assert!(settings.raytracing_use_fov);
        assert!(!settings.zshader);
        assert!(settings.depth_export_path.is_none());
    }
}
