//! Face outline construction from 68-point landmarks.
//!
//! The detector's jaw contour stops at the brows, so the forehead is
//! approximated by lifting both eyebrows towards the hairline and appending
//! them to the jaw as an arc.

use std::ops::Range;

use crate::error::{PaletteError, Result};

pub const LANDMARK_COUNT: usize = 68;

const JAW: Range<usize> = 0..17;
const LEFT_BROW: Range<usize> = 17..22;
const RIGHT_BROW: Range<usize> = 22..27;
const NOSE_BRIDGE: Range<usize> = 27..31;

/// A 2D point in image pixel coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// The 68 landmarks of one detected face, in detector order.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.len() != LANDMARK_COUNT {
            return Err(PaletteError::InvalidGeometry {
                expected: LANDMARK_COUNT,
                found: points.len(),
            });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(PaletteError::NonFiniteLandmark { index });
        }
        Ok(Self { points })
    }

    /// Build from interleaved `[x0, y0, x1, y1, ...]` coordinates.
    pub fn from_flat(coords: &[f32]) -> Result<Self> {
        if coords.len() != LANDMARK_COUNT * 2 {
            return Err(PaletteError::InvalidGeometry {
                expected: LANDMARK_COUNT,
                found: coords.len() / 2,
            });
        }
        Self::new(
            coords
                .chunks_exact(2)
                .map(|xy| Point::new(xy[0], xy[1]))
                .collect(),
        )
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Jaw contour, left ear to right ear.
    pub fn jaw(&self) -> &[Point] {
        &self.points[JAW]
    }

    pub fn left_brow(&self) -> &[Point] {
        &self.points[LEFT_BROW]
    }

    pub fn right_brow(&self) -> &[Point] {
        &self.points[RIGHT_BROW]
    }

    /// Nose bridge, topmost point first.
    pub fn nose_bridge(&self) -> &[Point] {
        &self.points[NOSE_BRIDGE]
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// A closed polygon. The last point connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    points: Vec<Point>,
}

impl Outline {
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Jaw contour followed by a forehead arc.
    ///
    /// The arc is the right brow reversed then the left brow reversed, lifted
    /// by `forehead_factor` times the distance between the highest brow point
    /// and the top of the nose bridge. Traversal runs left ear, chin, right
    /// ear, forehead right to left, and closes back at the left ear.
    ///
    /// Collapsed brows can make the lift zero or negative. That polygon is
    /// degenerate but still returned as-is.
    pub fn from_landmarks(landmarks: &LandmarkSet, forehead_factor: f32) -> Self {
        let mid_brow_y = landmarks
            .left_brow()
            .iter()
            .chain(landmarks.right_brow())
            .map(|p| p.y)
            .fold(f32::INFINITY, f32::min);
        let brow_to_nose = landmarks.nose_bridge()[0].y - mid_brow_y;
        let forehead_offset = brow_to_nose * forehead_factor;

        if forehead_offset <= 0.0 {
            tracing::warn!(forehead_offset, "degenerate brow landmarks, forehead arc not lifted");
        }

        let forehead_arc = landmarks
            .right_brow()
            .iter()
            .rev()
            .chain(landmarks.left_brow().iter().rev())
            .map(|p| Point::new(p.x, p.y - forehead_offset));

        let points: Vec<Point> = landmarks.jaw().iter().copied().chain(forehead_arc).collect();
        tracing::debug!(points = points.len(), forehead_offset, "built face outline");

        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `None` for an empty outline.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.points.first()?;
        let init = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(self.points.iter().fold(init, |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    /// Even-odd point-in-polygon test. Fewer than three points enclose nothing.
    pub fn contains(&self, p: Point) -> bool {
        let pts = &self.points;
        if pts.len() < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = pts.len() - 1;
        for i in 0..pts.len() {
            let (a, b) = (pts[i], pts[j]);
            if (a.y > p.y) != (b.y > p.y) {
                let cross_x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
                if p.x < cross_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Apply `f` to every vertex, keeping the traversal order.
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Outline {
        Outline {
            points: self.points.iter().map(|&p| f(p)).collect(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use std::f32::consts::PI;

    /// Frontal face centred at x=200: ears at y=200, chin at y=380, brows
    /// topping out at y=160, nose bridge starting at y=200.
    pub(crate) fn synthetic_face() -> Vec<Point> {
        let mut pts = Vec::with_capacity(LANDMARK_COUNT);
        for i in 0..17 {
            let theta = PI * i as f32 / 16.0;
            pts.push(Point::new(200.0 - 100.0 * theta.cos(), 200.0 + 180.0 * theta.sin()));
        }
        for (j, y) in [172.0, 165.0, 162.0, 164.0, 170.0].into_iter().enumerate() {
            pts.push(Point::new(115.0 + 17.5 * j as f32, y));
        }
        for (j, y) in [170.0, 164.0, 160.0, 165.0, 172.0].into_iter().enumerate() {
            pts.push(Point::new(215.0 + 17.5 * j as f32, y));
        }
        for y in [200.0, 215.0, 230.0, 245.0] {
            pts.push(Point::new(200.0, y));
        }
        for j in 0..5 {
            pts.push(Point::new(185.0 + 7.5 * j as f32, 260.0));
        }
        // eyes
        for j in 0..12 {
            let x = (if j < 6 { 140.0 } else { 240.0 }) + 4.0 * (j % 6) as f32;
            pts.push(Point::new(x, 190.0));
        }
        // mouth
        for j in 0..20 {
            pts.push(Point::new(170.0 + 3.0 * j as f32, 300.0));
        }
        assert_eq!(pts.len(), LANDMARK_COUNT);
        pts
    }

    pub(crate) fn synthetic_landmarks() -> LandmarkSet {
        LandmarkSet::new(synthetic_face()).unwrap()
    }
}
