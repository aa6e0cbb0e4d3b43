//! Skin-tone palette extraction from a photographed face.
//!
//! Given an RGBA bitmap and the 68 landmarks a face detector found in it, the
//! pipeline builds a face outline (jaw plus an estimated forehead), samples
//! the skin pixels inside it and reduces them to `k` colors with K-Means++.

use image::{ImageFormat, RgbaImage};
use js_sys::{Array, Object, Reflect, Uint8Array};
use palette::Srgb;
use rand::Rng;
use wasm_bindgen::prelude::*;

pub mod cluster;
pub mod config;
pub mod error;
pub mod geometry;
pub mod hex;
pub mod sampler;
pub mod swatch;

pub use cluster::{Clustering, KMeans, NEUTRAL_GRAY};
pub use config::PaletteConfig;
pub use error::{PaletteError, Result};
pub use geometry::{LandmarkSet, Outline, Point};

/// Everything the pipeline produced for one face.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub outline: Outline,
    /// The clipped, scaled face region the samples were taken from.
    pub cutout: RgbaImage,
    /// Number of pixels that survived filtering.
    pub samples: usize,
    pub clustering: Clustering,
}

impl Extraction {
    pub fn palette(&self) -> &[Srgb<u8>] {
        &self.clustering.centroids
    }

    pub fn hex(&self) -> Vec<String> {
        self.palette().iter().copied().map(hex::encode).collect()
    }
}

/// Run the full pipeline with explicit settings.
///
/// Steps performed:
/// 1. Build the face outline from the landmarks.
/// 2. Cut the outline out of the bitmap (padded, scaled to at most
///    `max_dimension`) and keep the pixels that pass the brightness filter.
/// 3. Cluster the samples into `config.clusters` colors.
pub fn extract_palette_with<R: Rng + ?Sized>(
    bitmap: &RgbaImage,
    landmarks: &LandmarkSet,
    config: &PaletteConfig,
    rng: &mut R,
) -> Result<Extraction> {
    let (width, height) = bitmap.dimensions();
    if width == 0 || height == 0 {
        return Err(PaletteError::EmptyBitmap { width, height });
    }
    let kmeans = KMeans::new(config.clusters)?.with_max_iterations(config.max_iterations);

    let outline = Outline::from_landmarks(landmarks, config.forehead_factor);
    let cutout = sampler::cut_out(bitmap, &outline, config.padding, config.max_dimension);
    let samples = sampler::collect_samples(&cutout, config.min_brightness, config.max_brightness);
    let clustering = kmeans.fit(&samples, rng);

    Ok(Extraction {
        outline,
        cutout,
        samples: samples.len(),
        clustering,
    })
}

/// Extract `k` skin-tone colors as `#rrggbb` strings.
///
/// Fewer than `k` colors come back when fewer than `k` pixels survive
/// filtering; `k` neutral grays come back when none do.
pub fn extract_palette<R: Rng + ?Sized>(
    bitmap: &RgbaImage,
    landmarks: &LandmarkSet,
    k: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    let config = PaletteConfig::with_clusters(k);
    Ok(extract_palette_with(bitmap, landmarks, &config, rng)?.hex())
}

/// Wrap raw canvas RGBA data (four bytes per pixel, row-major).
pub fn bitmap_from_raw(rgba: Vec<u8>, width: u32, height: u32) -> Result<RgbaImage> {
    let len = rgba.len();
    RgbaImage::from_raw(width, height, rgba).ok_or(PaletteError::BufferSize { width, height, len })
}

/// PNG-encode an image (cut-outs, swatch strips).
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

// ------------------------------------------------------------
// JavaScript bindings
// ------------------------------------------------------------

fn to_js(e: PaletteError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn hex_array(colors: &[String]) -> Array {
    let arr = Array::new();
    for hex in colors {
        arr.push(&JsValue::from_str(hex));
    }
    arr
}

/// Extract a palette from raw canvas RGBA data.
///
/// `landmarks` holds the 68 points as interleaved `x, y` coordinates.
#[wasm_bindgen(js_name = extractPalette)]
pub fn extract_palette_rgba(
    rgba: Vec<u8>,
    width: u32,
    height: u32,
    landmarks: Vec<f32>,
    k: usize,
) -> std::result::Result<Array, JsValue> {
    let bitmap = bitmap_from_raw(rgba, width, height).map_err(to_js)?;
    let landmarks = LandmarkSet::from_flat(&landmarks).map_err(to_js)?;

    let palette = extract_palette(&bitmap, &landmarks, k, &mut rand::rng()).map_err(to_js)?;
    Ok(hex_array(&palette))
}

/// Decode an encoded image, extract its palette and return
/// `{ palette: string[], face: Uint8Array }` where `face` is a PNG of the
/// clipped face region.
#[wasm_bindgen(js_name = extractPaletteFromImage)]
pub fn extract_palette_image(
    input: Vec<u8>,
    landmarks: Vec<f32>,
    k: usize,
) -> std::result::Result<Object, JsValue> {
    // ----------------------
    // 1. Decode the image
    // ----------------------
    let bitmap = image::load_from_memory(&input)
        .map_err(|e| JsValue::from_str(&format!("Unable to decode image: {e}")))?
        .to_rgba8();
    let landmarks = LandmarkSet::from_flat(&landmarks).map_err(to_js)?;

    // ----------------------
    // 2. Run the pipeline
    // ----------------------
    let config = PaletteConfig::with_clusters(k);
    let extraction = extract_palette_with(&bitmap, &landmarks, &config, &mut rand::rng()).map_err(to_js)?;

    // ----------------------
    // 3. PNG encode and return
    // ----------------------
    let face_png = encode_png(&extraction.cutout).map_err(to_js)?;

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("palette"), &hex_array(&extraction.hex()))?;
    Reflect::set(&result, &JsValue::from_str("face"), &Uint8Array::from(face_png.as_slice()))?;
    Ok(result)
}

/// Whether dark text should be drawn on top of `color` (`#rrggbb`).
#[wasm_bindgen(js_name = isLightColor)]
pub fn is_light_color(color: &str) -> std::result::Result<bool, JsValue> {
    hex::decode(color).map(hex::is_light).map_err(to_js)
}

// ------------------------------------------------------------
// Native helpers
// ------------------------------------------------------------

/// Decode `input` (any format the `image` crate reads) and run the pipeline.
///
/// A `seed` makes the K-Means++ seeding reproducible.
#[cfg(not(target_arch = "wasm32"))]
pub fn extract_palette_bytes(
    input: &[u8],
    landmarks: &[Point],
    config: &PaletteConfig,
    seed: Option<u64>,
) -> Result<Extraction> {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    let bitmap = image::load_from_memory(input)?.to_rgba8();
    let landmarks = LandmarkSet::new(landmarks.to_vec())?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    extract_palette_with(&bitmap, &landmarks, config, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::fixtures::synthetic_landmarks;
    use image::Rgba;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_uniform_face_gives_uniform_palette() {
        let bitmap = RgbaImage::from_pixel(400, 400, Rgba([200, 150, 120, 255]));
        let mut rng = StdRng::seed_from_u64(42);
        let palette = extract_palette(&bitmap, &synthetic_landmarks(), 3, &mut rng).unwrap();
        assert_eq!(palette, vec!["#c89678"; 3]);
    }

    #[test]
    fn test_zero_dimension_bitmap_is_rejected() {
        let bitmap = RgbaImage::new(0, 10);
        let err = extract_palette(&bitmap, &synthetic_landmarks(), 3, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, PaletteError::EmptyBitmap { width: 0, height: 10 }));
    }

    #[test]
    fn test_zero_k_is_rejected() {
        let bitmap = RgbaImage::from_pixel(10, 10, Rgba([200, 150, 120, 255]));
        let err = extract_palette(&bitmap, &synthetic_landmarks(), 0, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, PaletteError::ZeroClusters));
    }

    #[test]
    fn test_face_outside_bitmap_falls_back_to_gray() {
        // landmarks sit at x >= 100, the bitmap stops at 50
        let bitmap = RgbaImage::from_pixel(50, 50, Rgba([200, 150, 120, 255]));
        let extraction = extract_palette_with(
            &bitmap,
            &synthetic_landmarks(),
            &PaletteConfig::with_clusters(3),
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();
        assert_eq!(extraction.samples, 0);
        assert_eq!(extraction.hex(), vec!["#808080"; 3]);
    }

    #[test]
    fn test_raw_buffer_must_match_dimensions() {
        let bitmap = bitmap_from_raw(vec![7; 2 * 3 * 4], 2, 3).unwrap();
        assert_eq!(bitmap.dimensions(), (2, 3));
        assert_eq!(*bitmap.get_pixel(1, 2), Rgba([7, 7, 7, 7]));

        let err = bitmap_from_raw(vec![0; 10], 2, 3).unwrap_err();
        assert!(matches!(err, PaletteError::BufferSize { width: 2, height: 3, len: 10 }));
    }

    #[test]
    fn test_light_color_binding_on_valid_input() {
        // error path builds a JsValue, which only exists on wasm32
        assert_eq!(is_light_color("#ffffff").ok(), Some(true));
        assert_eq!(is_light_color("#3c281e").ok(), Some(false));
    }

    #[test]
    fn test_encode_png_round_trips() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4]));
        let png = encode_png(&img).unwrap();
        let back = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(back, img);
    }
}
