//! Diffuse texture loading and nearest-neighbor sampling.
//!
//! Grounded in `rasterizer_renderer.cpp`'s `get_texture_sampler_nn`: the
//! vertical flip in the index computation is intentional, matching the
//! source's top-left UV origin convention.

use std::path::Path;

use image::RgbImage;

use crate::color::FColor;
use crate::error::{RenderError, RenderResult};

pub struct Texture {
    image: RgbImage,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> RenderResult<Texture> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| RenderError::TextureLoad {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgb8();

        Ok(Texture { image })
    }

    /// Nearest-neighbor sample at `(u, v)`, wrapping both axes and flipping
    /// `v` so the origin is the top-left of the image.
    pub fn sample(&self, u: f32, v: f32) -> FColor {
        let (w, h) = (self.image.width() as i32, self.image.height() as i32);
        if w == 0 || h == 0 {
            return FColor::WHITE;
        }

        let px = (((u * w as f32) as i32 % w) + w) % w;
        let py = (((v * h as f32) as i32 % h) + h) % h;
        // Flip vertically: row 0 of the source image is the top row, but
        // `py` is measured from v's origin at the bottom.
        let row = (h - py - 1).clamp(0, h - 1) as u32;

        let pixel = self.image.get_pixel(px as u32, row);
        FColor::new(
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        )
    }
}

/// A pluggable sampler, used so pixel shaders don't need to know whether a
/// shape has a texture. Returns white when no texture is bound.
pub enum Sampler<'a> {
    None,
    Texture(&'a Texture),
}

impl<'a> Sampler<'a> {
    pub fn sample(&self, u: f32, v: f32) -> FColor {
        match self {
            Sampler::None => FColor::WHITE,
            Sampler::Texture(tex) => tex.sample(u, v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn sampler_returns_white_with_no_texture() {
        let sampler = Sampler::None;
        assert_eq!(sampler.sample(0.3, 0.7), FColor::WHITE);
    }

    #[test]
    fn nearest_sample_wraps_and_flips_vertically() {
        // 2x2 checker: top-left red, bottom-right blue (in image-row order).
        let mut img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(2, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));
        img.put_pixel(1, 1, Rgb([255, 255, 0]));

        let texture = Texture { image: img };

        // v=0 should map to the bottom image row (flipped), u=0 -> left column.
        let c = texture.sample(0.1, 0.1);
        assert_eq!(c, FColor::new(0.0, 0.0, 1.0));
    }
}
