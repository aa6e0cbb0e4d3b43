//! Render a palette as a strip of square swatches.

use image::{Rgba, RgbaImage};
use palette::Srgb;

use crate::hex::is_light;

const BACKGROUND: Rgba<u8> = Rgba([0xfa, 0xfa, 0xfa, 255]);
const DARK_MARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LIGHT_MARK: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwatchLayout {
    /// Side of one swatch, in pixels.
    pub size: u32,
    pub gap: u32,
    pub padding: u32,
}

impl Default for SwatchLayout {
    fn default() -> Self {
        Self {
            size: 56,
            gap: 8,
            padding: 32,
        }
    }
}

fn fill_rect(img: &mut RgbaImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgba<u8>) {
    let x1 = (x0 + w).min(img.width());
    let y1 = (y0 + h).min(img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, color);
        }
    }
}

/// Lay the colors out left to right on a light background.
///
/// Each swatch carries a short bar just below its centre, black on light
/// colors and white on dark ones, where a label would go.
pub fn render_swatches(colors: &[Srgb<u8>], layout: SwatchLayout) -> RgbaImage {
    let n = colors.len() as u32;
    let width = layout.padding * 2 + n * layout.size + n.saturating_sub(1) * layout.gap;
    let height = layout.padding * 2 + layout.size;
    let mut img = RgbaImage::from_pixel(width, height, BACKGROUND);

    let bar_w = layout.size / 2;
    let bar_h = (layout.size / 28).max(1);
    for (i, &c) in colors.iter().enumerate() {
        let x = layout.padding + i as u32 * (layout.size + layout.gap);
        let y = layout.padding;
        fill_rect(&mut img, x, y, layout.size, layout.size, Rgba([c.red, c.green, c.blue, 255]));

        let mark = if is_light(c) { DARK_MARK } else { LIGHT_MARK };
        fill_rect(
            &mut img,
            x + (layout.size - bar_w) / 2,
            y + layout.size / 2 + 4,
            bar_w,
            bar_h,
            mark,
        );
    }

    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_dimensions() {
        let colors = [Srgb::new(200, 150, 120), Srgb::new(90, 60, 40), Srgb::new(240, 220, 200)];
        let img = render_swatches(&colors, SwatchLayout::default());
        assert_eq!(img.dimensions(), (32 * 2 + 3 * 56 + 2 * 8, 32 * 2 + 56));
    }

    #[test]
    fn test_swatch_colors_and_marks() {
        let colors = [Srgb::new(240, 220, 200), Srgb::new(60, 40, 30)];
        let img = render_swatches(&colors, SwatchLayout::default());

        assert_eq!(*img.get_pixel(0, 0), BACKGROUND);
        assert_eq!(*img.get_pixel(33, 33), Rgba([240, 220, 200, 255]));
        assert_eq!(*img.get_pixel(32 + 64 + 1, 33), Rgba([60, 40, 30, 255]));

        // bar sits at y = padding + size/2 + 4
        assert_eq!(*img.get_pixel(32 + 28, 32 + 28 + 4), DARK_MARK);
        assert_eq!(*img.get_pixel(32 + 64 + 28, 32 + 28 + 4), LIGHT_MARK);
    }

    #[test]
    fn test_empty_palette_is_background_only() {
        let img = render_swatches(&[], SwatchLayout::default());
        assert_eq!(img.dimensions(), (64, 120));
        assert!(img.pixels().all(|&p| p == BACKGROUND));
    }
}
