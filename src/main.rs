use clap::Parser;

use softrender::error::RenderResult;
use softrender::io::{save_depth_dump, save_png};
use softrender::render::raytracing::RayTraceRenderer;
use softrender::render::rasterization::RasterRenderer;
use softrender::settings::{RenderMode, Settings};

fn main() -> RenderResult<()> {
    env_logger::init();
    let settings = Settings::parse();

    match settings.mode {
        RenderMode::Raster => {
            let mut renderer = RasterRenderer::new(&settings)?;
            renderer.render(&settings);

            save_png(renderer.color_target(), &settings.result_path)?;

            if let Some(depth_path) = &settings.depth_export_path {
                match renderer.depth_target() {
                    Some(depth) => save_depth_dump(depth, depth_path)?,
                    None => {
                        log::warn!("--depth-export-path given but depth buffer is disabled; nothing written")
                    }
                }
            }
        }
        RenderMode::Raytrace => {
            let mut renderer = RayTraceRenderer::new(&settings)?;
            renderer.render(&settings);
            save_png(renderer.render_target(), &settings.result_path)?;
        }
    }

    Ok(())
}
