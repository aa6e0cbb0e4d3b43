//! Tunables for the extraction pipeline.
//!
//! Every field defaults to the value the face-palette pipeline was calibrated
//! with; hosts normally only change `clusters`.

pub const DEFAULT_CLUSTERS: usize = 5;
pub const DEFAULT_MAX_ITERATIONS: usize = 20;
pub const DEFAULT_PADDING: f32 = 10.0;
pub const DEFAULT_MAX_DIMENSION: f32 = 400.0;
pub const DEFAULT_MIN_BRIGHTNESS: u8 = 30;
pub const DEFAULT_MAX_BRIGHTNESS: u8 = 240;
/// Multiplier applied to the brow-to-nose distance to reach the hairline.
pub const DEFAULT_FOREHEAD_FACTOR: f32 = 1.4;

#[derive(Clone, Debug, PartialEq)]
pub struct PaletteConfig {
    /// Number of colors in the palette (`k`).
    pub clusters: usize,
    pub max_iterations: usize,
    /// Margin around the outline's bounding box, in source pixels.
    pub padding: f32,
    /// Longest side of the sampling canvas. The canvas is never upscaled.
    pub max_dimension: f32,
    /// Pixels with average brightness below this are treated as shadow.
    pub min_brightness: u8,
    /// Pixels with average brightness above this are treated as highlight.
    pub max_brightness: u8,
    pub forehead_factor: f32,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            clusters: DEFAULT_CLUSTERS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            padding: DEFAULT_PADDING,
            max_dimension: DEFAULT_MAX_DIMENSION,
            min_brightness: DEFAULT_MIN_BRIGHTNESS,
            max_brightness: DEFAULT_MAX_BRIGHTNESS,
            forehead_factor: DEFAULT_FOREHEAD_FACTOR,
        }
    }
}

impl PaletteConfig {
    pub fn with_clusters(clusters: usize) -> Self {
        Self {
            clusters,
            ..Self::default()
        }
    }
}
