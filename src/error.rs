use image::ImageError;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("image error: {0}")]
    Image(#[from] ImageError),

    #[error("GIF decode error: {0}")]
    GifDecode(#[from] gif::DecodingError),

    #[error("GIF encode error: {0}")]
    GifEncode(#[from] gif::EncodingError),

    #[error("WebP encode error: {0}")]
    WebPEncode(String),

    #[error("{}: invalid suite: {source}", path.display())]
    Suite {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The animation ended before its first frame.
    #[error("animation has no frames")]
    NoFrames,

    #[error("case {0:?} has zero iterations")]
    NoIterations(String),

    #[error("dimensions {width}x{height} out of range")]
    Dimensions { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
