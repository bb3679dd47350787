//! Deterministic stand-ins for the benchmark assets.

use crate::error::{Error, Result};
use crate::format::OutputFormat;
use image::{DynamicImage, Rgba, RgbaImage};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Asset name prefix and logical screen size of each standard asset set.
pub const ASSET_SIZES: [(&str, u32, u32); 2] = [("1920", 1920, 1080), ("256", 256, 256)];
pub const ASSET_GIF_FRAMES: usize = 4;

const GIF_FRAME_DELAY: u16 = 10;
const GIF_QUANTIZE_SPEED: i32 = 10;

fn pattern(width: u32, height: u32, phase: u32) -> RgbaImage {
    let w = width.max(1);
    let h = height.max(1);
    RgbaImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / w + phase * 40) % 256;
        let g = (y * 255 / h + phase * 70) % 256;
        let b = ((x ^ y) + phase * 25) % 256;
        Rgba([r as u8, g as u8, b as u8, 255])
    })
}

pub fn gradient(width: u32, height: u32) -> RgbaImage {
    pattern(width, height, 0)
}

pub fn still(format: OutputFormat, width: u32, height: u32) -> Result<Vec<u8>> {
    format.encode(&DynamicImage::ImageRgba8(gradient(width, height)))
}

fn to_u16(width: u32, height: u32) -> Result<(u16, u16)> {
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(Error::Dimensions { width, height }),
    }
}

/// Builds an animation of `frames` frames. The first frame always covers the
/// screen; with `partial` the others only repaint its centered middle half.
pub fn animated_gif(width: u32, height: u32, frames: usize, partial: bool) -> Result<Vec<u8>> {
    let (screen_w, screen_h) = to_u16(width, height)?;

    let mut out = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut out, screen_w, screen_h, &[])?;
        encoder.set_repeat(gif::Repeat::Infinite)?;
        for i in 0..frames {
            let (left, top, w, h) = if partial && i > 0 {
                (width / 4, height / 4, (width / 2).max(1), (height / 2).max(1))
            } else {
                (0, 0, width, height)
            };
            let (w16, h16) = to_u16(w, h)?;
            let (left, top) = to_u16(left, top)?;

            let mut pixels = pattern(w, h, i as u32).into_raw();
            let mut frame = gif::Frame::from_rgba_speed(w16, h16, &mut pixels, GIF_QUANTIZE_SPEED);
            frame.left = left;
            frame.top = top;
            frame.delay = GIF_FRAME_DELAY;
            encoder.write_frame(&frame)?;
        }
    }
    Ok(out)
}

/// Writes `{1920,256}.{jpeg,png,webp,gif}` into `dir`.
pub fn generate_assets(dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for (name, width, height) in ASSET_SIZES {
        for format in OutputFormat::ALL {
            let bytes = match format {
                OutputFormat::Gif => animated_gif(width, height, ASSET_GIF_FRAMES, true)?,
                _ => still(format, width, height)?,
            };
            let path = dir.join(format!("{name}.{}", format.extension()));
            fs::write(&path, &bytes)?;
            info!("wrote {} ({} bytes)", path.display(), bytes.len());
            written.push(path);
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::{animated_gif, gradient, still};
    use crate::error::Error;
    use crate::format::OutputFormat;

    #[test]
    fn test_gradient_deterministic() {
        assert_eq!(gradient(9, 7), gradient(9, 7));
        assert_eq!(gradient(9, 7).dimensions(), (9, 7));
        assert!(gradient(9, 7).pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn test_still_decodes() {
        let blob = still(OutputFormat::Jpeg, 10, 6).unwrap();
        let img = image::load_from_memory(&blob).unwrap();
        assert_eq!((img.width(), img.height()), (10, 6));
    }

    #[test]
    fn test_animated_gif_frame_count() {
        let blob = animated_gif(16, 16, 5, true).unwrap();
        let mut decoder = gif::DecodeOptions::new().read_info(blob.as_slice()).unwrap();
        let mut rects = Vec::new();
        while let Some(f) = decoder.read_next_frame().unwrap() {
            rects.push((f.left, f.top, f.width, f.height));
        }
        assert_eq!(rects.len(), 5);
        assert_eq!(rects[0], (0, 0, 16, 16));
        assert_eq!(rects[1], (4, 4, 8, 8));
    }

    #[test]
    fn test_animated_gif_too_large() {
        assert!(matches!(
            animated_gif(70_000, 4, 1, false),
            Err(Error::Dimensions { .. })
        ));
    }
}
