use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("invalid landmark geometry: expected {expected} points, found {found}")]
    InvalidGeometry { expected: usize, found: usize },

    #[error("landmark {index} has a non-finite coordinate")]
    NonFiniteLandmark { index: usize },

    #[error("bitmap has zero dimension ({width}x{height})")]
    EmptyBitmap { width: u32, height: u32 },

    #[error("palette size must be at least 1")]
    ZeroClusters,

    #[error("RGBA buffer of {len} bytes does not match {width}x{height}")]
    BufferSize { width: u32, height: u32, len: usize },

    #[error("image error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("invalid hex color: {0:?}")]
    InvalidHex(String),
}

pub type Result<T> = std::result::Result<T, PaletteError>;
