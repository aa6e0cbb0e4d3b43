//! Pixel sampling inside a face outline.
//!
//! Sampling happens in two passes, mirroring how a browser canvas would clip
//! and redraw the face:
//! 1. [`cut_out`] crops the outline's padded bounding box, scales it down so
//!    the longest side fits `max_dimension`, and clears everything outside
//!    the outline to transparent.
//! 2. [`collect_samples`] walks the cut-out and keeps the pixels that look
//!    like skin rather than lighting artifacts.

use image::{Rgba, RgbaImage, imageops, imageops::FilterType};
use palette::Srgb;

use crate::config::PaletteConfig;
use crate::geometry::{Outline, Point};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Part of a bitmap covered by a box, in bitmap pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Region {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

/// Intersect the box `[x, x + w) × [y, y + h)` with `bitmap`.
fn visible_region(bitmap: &RgbaImage, x: f32, y: f32, w: f32, h: f32) -> Option<Region> {
    let x0 = (x.floor() as i64).max(0);
    let y0 = (y.floor() as i64).max(0);
    let x1 = ((x + w).ceil() as i64).min(bitmap.width() as i64);
    let y1 = ((y + h).ceil() as i64).min(bitmap.height() as i64);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    Some(Region {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    })
}

/// Crop `bitmap` to the outline and mask it.
///
/// The returned image covers the outline's bounding box expanded by
/// `padding` on every side, uniformly scaled by
/// `min(max_dimension / width, max_dimension / height, 1)` and truncated to
/// whole pixels. Pixels whose centre falls outside the (scaled) outline, or
/// outside the source bitmap, are fully transparent.
///
/// Only the part of the box that overlaps the bitmap is copied and
/// resampled, so memory stays bounded by the bitmap and the canvas however
/// far the landmarks reach, and off-frame pixels never bleed into the edge.
pub fn cut_out(bitmap: &RgbaImage, outline: &Outline, padding: f32, max_dimension: f32) -> RgbaImage {
    let Some(bounds) = outline.bounds() else {
        return RgbaImage::new(0, 0);
    };

    let box_w = bounds.width() + padding * 2.0;
    let box_h = bounds.height() + padding * 2.0;
    let scale = (max_dimension / box_w).min(max_dimension / box_h).min(1.0);

    let canvas_w = (box_w * scale).floor().max(1.0) as u32;
    let canvas_h = (box_h * scale).floor().max(1.0) as u32;
    let mut canvas = RgbaImage::new(canvas_w, canvas_h);

    // ----------------------
    // 1. Copy the visible part, down-scaled (never up)
    // ----------------------
    let origin_x = (bounds.min_x - padding).floor();
    let origin_y = (bounds.min_y - padding).floor();
    let visible = visible_region(
        bitmap,
        origin_x,
        origin_y,
        canvas_w as f32 / scale,
        canvas_h as f32 / scale,
    );

    if let Some(region) = visible {
        let crop = imageops::crop_imm(bitmap, region.x, region.y, region.width, region.height).to_image();
        let dest_x = ((region.x as f32 - origin_x) * scale).floor() as i64;
        let dest_y = ((region.y as f32 - origin_y) * scale).floor() as i64;

        if scale < 1.0 {
            let w = (region.width as f32 * scale).round().max(1.0) as u32;
            let h = (region.height as f32 * scale).round().max(1.0) as u32;
            let scaled = imageops::resize(&crop, w, h, FilterType::Triangle);
            imageops::replace(&mut canvas, &scaled, dest_x, dest_y);
        } else {
            imageops::replace(&mut canvas, &crop, dest_x, dest_y);
        }
    }

    // ----------------------
    // 2. Clip to the outline
    // ----------------------
    let local = outline.map_points(|p| Point::new((p.x - origin_x) * scale, (p.y - origin_y) * scale));

    for (x, y, px) in canvas.enumerate_pixels_mut() {
        if !local.contains(Point::new(x as f32 + 0.5, y as f32 + 0.5)) {
            *px = TRANSPARENT;
        }
    }

    tracing::debug!(
        box_w,
        box_h,
        scale,
        width = canvas.width(),
        height = canvas.height(),
        visible = ?visible,
        "clipped face region"
    );

    canvas
}

/// Keep a pixel if it is visible and neither near-black nor near-white.
///
/// Brightness is the plain channel average; the bounds are inclusive.
pub fn keep_pixel(px: Rgba<u8>, min_brightness: u8, max_brightness: u8) -> Option<Srgb<u8>> {
    let [r, g, b, a] = px.0;
    if a == 0 {
        return None;
    }

    let brightness = (r as u16 + g as u16 + b as u16) as f32 / 3.0;
    if brightness < min_brightness as f32 || brightness > max_brightness as f32 {
        return None;
    }

    Some(Srgb::new(r, g, b))
}

/// Filter every pixel of `image` through [`keep_pixel`], dropping alpha.
pub fn collect_samples(image: &RgbaImage, min_brightness: u8, max_brightness: u8) -> Vec<Srgb<u8>> {
    let samples: Vec<Srgb<u8>> = image
        .pixels()
        .filter_map(|&px| keep_pixel(px, min_brightness, max_brightness))
        .collect();

    tracing::debug!(
        kept = samples.len(),
        total = image.width() as usize * image.height() as usize,
        "filtered face pixels"
    );

    samples
}

/// Cut out the outline and collect its samples in one go.
pub fn sample_outline(bitmap: &RgbaImage, outline: &Outline, config: &PaletteConfig) -> Vec<Srgb<u8>> {
    let cutout = cut_out(bitmap, outline, config.padding, config.max_dimension);
    collect_samples(&cutout, config.min_brightness, config.max_brightness)
}
