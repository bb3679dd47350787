use crate::error::{Error, Result};
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, Frame};
use serde::{Deserialize, Serialize};
use std::fmt;
use zenwebp::{EncodeRequest, LossyConfig, PixelLayout};

pub const JPEG_QUALITY: u8 = 85;
/// Lossy (VP8) WebP quality, 0 to 100.
pub const WEBP_QUALITY: f32 = 85.0;
pub const PNG_COMPRESSION: CompressionType = CompressionType::Best;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    #[serde(rename = "JPEG")]
    Jpeg,
    #[serde(rename = "PNG")]
    Png,
    #[serde(rename = "WEBP")]
    WebP,
    #[serde(rename = "GIF")]
    Gif,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [Self::Jpeg, Self::Png, Self::WebP, Self::Gif];

    pub fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::WebP => "WEBP",
            Self::Gif => "GIF",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
            Self::Gif => "gif",
        }
    }

    /// Color type a decoded image is converted to before it is resized.
    pub fn working_color(self, img: DynamicImage) -> DynamicImage {
        match self {
            Self::Jpeg => DynamicImage::ImageRgb8(img.into_rgb8()),
            _ => DynamicImage::ImageRgba8(img.into_rgba8()),
        }
    }

    /// Converts `img` to something the encoder for this format accepts.
    fn encodable(self, img: &DynamicImage) -> Option<DynamicImage> {
        match (self, img) {
            (Self::Jpeg, DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_)) => None,
            (Self::Jpeg, _) => Some(DynamicImage::ImageRgb8(img.to_rgb8())),
            (Self::WebP, DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_)) => None,
            (Self::WebP, _) => Some(DynamicImage::ImageRgba8(img.to_rgba8())),
            (Self::Png, DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_)) => {
                Some(DynamicImage::ImageRgba8(img.to_rgba8()))
            }
            (Self::Png, _) => None,
            (Self::Gif, DynamicImage::ImageRgba8(_)) => None,
            (Self::Gif, _) => Some(DynamicImage::ImageRgba8(img.to_rgba8())),
        }
    }

    /// Encodes a still image into a fresh buffer with this format's save options.
    pub fn encode(self, img: &DynamicImage) -> Result<Vec<u8>> {
        let converted = self.encodable(img);
        let img = converted.as_ref().unwrap_or(img);

        let mut out = Vec::new();
        match self {
            Self::Jpeg => {
                img.write_with_encoder(JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY))?
            }
            Self::Png => img.write_with_encoder(PngEncoder::new_with_quality(
                &mut out,
                PNG_COMPRESSION,
                FilterType::Adaptive,
            ))?,
            Self::WebP => out = encode_webp(img)?,
            Self::Gif => {
                let mut encoder = GifEncoder::new(&mut out);
                encoder.encode_frame(Frame::new(img.to_rgba8()))?;
            }
        }
        Ok(out)
    }
}

fn encode_webp(img: &DynamicImage) -> Result<Vec<u8>> {
    let config = LossyConfig::new().with_quality(WEBP_QUALITY);
    let (width, height) = (img.width(), img.height());
    let encoded = match img {
        DynamicImage::ImageRgb8(rgb) => {
            EncodeRequest::lossy(&config, rgb.as_raw(), PixelLayout::Rgb8, width, height).encode()
        }
        _ => {
            let rgba = img.to_rgba8();
            EncodeRequest::lossy(&config, rgba.as_raw(), PixelLayout::Rgba8, width, height)
                .encode()
        }
    };
    encoded.map_err(|e| Error::WebPEncode(e.to_string()))
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::OutputFormat;
    use crate::synthetic::gradient;
    use image::{DynamicImage, ImageFormat};

    #[test]
    fn test_encode_magic() {
        let img = DynamicImage::ImageRgba8(gradient(24, 16));
        let expected = [
            (OutputFormat::Jpeg, ImageFormat::Jpeg),
            (OutputFormat::Png, ImageFormat::Png),
            (OutputFormat::WebP, ImageFormat::WebP),
            (OutputFormat::Gif, ImageFormat::Gif),
        ];
        for (format, image_format) in expected {
            let bytes = format.encode(&img).unwrap();
            assert_eq!(image::guess_format(&bytes).unwrap(), image_format);
            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (24, 16));
        }
    }

    #[test]
    fn test_jpeg_accepts_rgba() {
        let img = DynamicImage::ImageRgba8(gradient(8, 8));
        assert!(OutputFormat::Jpeg.encode(&img).is_ok());
    }

    #[test]
    fn test_webp_is_lossy() {
        for img in [
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(gradient(32, 32)).to_rgb8()),
            DynamicImage::ImageRgba8(gradient(32, 32)),
        ] {
            let bytes = OutputFormat::WebP.encode(&img).unwrap();
            assert_eq!(&bytes[0..4], b"RIFF");
            assert_eq!(&bytes[8..12], b"WEBP");
            // Lossy WebP starts with a VP8 or, when alpha is stored, a VP8X chunk.
            assert_ne!(&bytes[12..16], b"VP8L");
            assert!(bytes.windows(4).any(|w| w == b"VP8 "));
        }
    }

    #[test]
    fn test_working_color() {
        let img = DynamicImage::ImageRgba8(gradient(4, 4));
        assert!(matches!(
            OutputFormat::Jpeg.working_color(img.clone()),
            DynamicImage::ImageRgb8(_)
        ));
        assert!(matches!(
            OutputFormat::WebP.working_color(img),
            DynamicImage::ImageRgba8(_)
        ));
    }

    #[test]
    fn test_names() {
        assert_eq!(OutputFormat::WebP.to_string(), "WEBP");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpeg");
        let parsed: OutputFormat = serde_json::from_str("\"PNG\"").unwrap();
        assert_eq!(parsed, OutputFormat::Png);
    }
}
