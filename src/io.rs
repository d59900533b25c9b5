//! Output writers: PNG image save and raw depth dump.
//!
//! Grounded in `utils/resource_utils`'s `save_resource` overloads: one for
//! `ucolor` (stbi PNG write), one for `float` (raw binary dump, no header).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{ImageBuffer, Rgb};

use crate::color::UColor;
use crate::error::{RenderError, RenderResult};
use crate::resource::Resource;

/// Writes a `UColor` 2D resource as an 8-bit-per-channel RGB PNG.
pub fn save_png<P: AsRef<Path>>(image: &Resource<UColor>, path: P) -> RenderResult<()> {
    let path = path.as_ref();
    let (width, height) = (image.width() as u32, image.height() as u32);

    let mut buffer: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let pixel = image.at(x as usize, y as usize);
            buffer.put_pixel(x, y, Rgb([pixel.r, pixel.g, pixel.b]));
        }
    }

    buffer
        .save(path)
        .map_err(|source| RenderError::ImageSave {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes a depth buffer as little-endian `f32`, row-major, with no header.
pub fn save_depth_dump<P: AsRef<Path>>(depth: &Resource<f32>, path: P) -> RenderResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| RenderError::DepthDump {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    for value in depth.as_slice() {
        writer
            .write_all(&value.to_le_bytes())
            .map_err(|source| RenderError::DepthDump {
                path: path.to_path_buf(),
                source,
            })?;
    }

    writer.flush().map_err(|source| RenderError::DepthDump {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_dump_round_trips_as_le_f32() {
        let mut depth: Resource<f32> = Resource::new_2d(2, 2);
        *depth.at_mut(0, 0) = 1.0;
        *depth.at_mut(1, 0) = 2.5;
        *depth.at_mut(0, 1) = -3.0;
        *depth.at_mut(1, 1) = f32::INFINITY;

        let path = std::env::temp_dir().join(format!("softrender_depth_test_{}.bin", std::process::id()));
        save_depth_dump(&depth, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(bytes.len(), 16);
        let values: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes(c.try_into().unwrap()))
            .collect();
        assert_eq!(values, vec![1.0, 2.5, -3.0, f32::INFINITY]);
    }
}
