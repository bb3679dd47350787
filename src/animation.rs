//! Animated GIF resizing.
//!
//! The `image` GIF decoder hands out fully composed frames, which hides how the
//! animation was authored. Frames are read through `gif` directly so partial
//! updates can be detected and stacked onto the previous output frame.

use crate::error::{Error, Result};
use crate::ops::fit;
use gif::{ColorOutput, DecodeOptions};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{imageops, Delay, DynamicImage, Frame, RgbaImage};
use log::debug;

/// NeuQuant speed for re-encoding, 1 (best) to 30 (fastest).
pub const GIF_ENCODE_SPEED: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GifMode {
    /// Every frame repaints the whole logical screen.
    Full,
    /// At least one frame only updates a sub-rectangle.
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GifAnalysis {
    pub width: u32,
    pub height: u32,
    pub mode: GifMode,
}

fn decode_options() -> DecodeOptions {
    let mut options = DecodeOptions::new();
    options.set_color_output(ColorOutput::RGBA);
    options
}

fn covers_screen(frame: &gif::Frame<'_>, width: u16, height: u16) -> bool {
    frame.left == 0 && frame.top == 0 && frame.width == width && frame.height == height
}

pub fn analyze_gif(blob: &[u8]) -> Result<GifAnalysis> {
    let mut decoder = DecodeOptions::new().read_info(blob)?;
    let (width, height) = (decoder.width(), decoder.height());

    // Frame rectangles only; the pixel data is skipped, not decoded.
    let mut mode = GifMode::Full;
    while let Some(frame) = decoder.next_frame_info()? {
        if !covers_screen(frame, width, height) {
            mode = GifMode::Partial;
            break;
        }
    }

    Ok(GifAnalysis {
        width: width.into(),
        height: height.into(),
        mode,
    })
}

/// Puts the frame's pixels at its offset on a transparent, screen-sized canvas.
fn place(frame: &gif::Frame<'_>, screen_w: u32, screen_h: u32) -> Result<RgbaImage> {
    let (w, h) = (u32::from(frame.width), u32::from(frame.height));
    let pixels = RgbaImage::from_raw(w, h, frame.buffer.to_vec())
        .ok_or(Error::Dimensions { width: w, height: h })?;
    if w == screen_w && h == screen_h && frame.left == 0 && frame.top == 0 {
        return Ok(pixels);
    }
    let mut canvas = RgbaImage::new(screen_w, screen_h);
    imageops::replace(
        &mut canvas,
        &pixels,
        i64::from(frame.left),
        i64::from(frame.top),
    );
    Ok(canvas)
}

/// Fits every frame of the animation to `width`x`height` and re-encodes it.
///
/// In [`GifMode::Partial`] each output frame starts from the previous output
/// frame, so regions a frame does not repaint keep their old content.
pub fn resize_gif(blob: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(Error::Dimensions { width, height });
    }
    let analysis = analyze_gif(blob)?;
    debug!(
        "resize_gif: {}x{} {:?} => {}x{}",
        analysis.width, analysis.height, analysis.mode, width, height
    );

    let mut decoder = decode_options().read_info(blob)?;
    let mut frames: Vec<Frame> = Vec::new();
    while let Some(frame) = decoder.read_next_frame()? {
        let layer = place(frame, analysis.width, analysis.height)?;
        let resized = fit(&DynamicImage::ImageRgba8(layer), width, height).into_rgba8();

        let mut canvas = match (analysis.mode, frames.last()) {
            (GifMode::Full, _) => RgbaImage::new(width, height),
            (GifMode::Partial, Some(prev)) => prev.buffer().clone(),
            (GifMode::Partial, None) => resized.clone(),
        };
        imageops::overlay(&mut canvas, &resized, 0, 0);

        // GIF delays are in hundredths of a second.
        let delay = Delay::from_numer_denom_ms(u32::from(frame.delay) * 10, 1);
        frames.push(Frame::from_parts(canvas, 0, 0, delay));
    }

    if frames.is_empty() {
        return Err(Error::NoFrames);
    }
    debug!("resize_gif: {} frames", frames.len());

    let mut out = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut out, GIF_ENCODE_SPEED);
        encoder.set_repeat(Repeat::Infinite)?;
        encoder.encode_frames(frames)?;
    }
    Ok(out)
}
