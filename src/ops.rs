//! One iteration of each benchmarked operation, on an in-memory blob.

use crate::error::{Error, Result};
use crate::format::OutputFormat;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;

pub const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// Reads the image dimensions without decoding any pixels.
pub fn read_header(blob: &[u8]) -> Result<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(blob)).with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

/// Center-crops `img` to the aspect ratio of `width`x`height`, then scales it to
/// exactly that size.
pub fn fit(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    img.resize_to_fill(width, height, RESIZE_FILTER)
}

pub fn resize(blob: &[u8], format: OutputFormat, width: u32, height: u32) -> Result<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(Error::Dimensions { width, height });
    }
    let img = format.working_color(image::load_from_memory(blob)?);
    let img = fit(&img, width, height);
    format.encode(&img)
}

pub fn transcode(blob: &[u8], format: OutputFormat) -> Result<Vec<u8>> {
    let img = image::load_from_memory(blob)?;
    format.encode(&img)
}

#[cfg(test)]
mod tests {
    use super::{read_header, resize, transcode};
    use crate::error::Error;
    use crate::format::OutputFormat;
    use crate::synthetic;

    #[test]
    fn test_read_header() {
        for format in OutputFormat::ALL {
            let blob = synthetic::still(format, 40, 30).unwrap();
            assert_eq!(read_header(&blob).unwrap(), (40, 30), "{format}");
        }
    }

    #[test]
    fn test_read_header_garbage() {
        assert!(read_header(b"definitely not an image").is_err());
    }

    #[test]
    fn test_resize() {
        let blob = synthetic::still(OutputFormat::Png, 64, 48).unwrap();
        for format in OutputFormat::ALL {
            let out = resize(&blob, format, 16, 16).unwrap();
            let img = image::load_from_memory(&out).unwrap();
            assert_eq!((img.width(), img.height()), (16, 16), "{format}");
        }
    }

    #[test]
    fn test_resize_zero_size() {
        let blob = synthetic::still(OutputFormat::Png, 16, 16).unwrap();
        assert!(matches!(
            resize(&blob, OutputFormat::Png, 0, 16),
            Err(Error::Dimensions { width: 0, height: 16 })
        ));
    }

    #[test]
    fn test_transcode_keeps_size() {
        let png = synthetic::still(OutputFormat::Png, 32, 20).unwrap();
        let webp = transcode(&png, OutputFormat::WebP).unwrap();
        assert_eq!(read_header(&webp).unwrap(), (32, 20));

        let gif = synthetic::animated_gif(32, 20, 3, true).unwrap();
        let png = transcode(&gif, OutputFormat::Png).unwrap();
        assert_eq!(read_header(&png).unwrap(), (32, 20));
    }
}
