//! Geometry primitives: canvas-space points, percent-space positions,
//! rectangles, and the rotation math used by hit-testing and resize.
//!
//! Two coordinate spaces exist side by side. *Canvas space* is CSS pixels
//! with the origin at the canvas top-left. *Percent space* stores entity
//! centers as 0–100 fractions of the canvas dimensions, so scenes survive
//! canvas resizes without drifting.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point (or free vector) in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// An entity center in percent-of-canvas space (0–100 per axis).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentPoint {
    pub x: f64,
    pub y: f64,
}

impl PercentPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert to canvas pixels for the given canvas size.
    #[must_use]
    pub fn to_canvas(self, canvas: CanvasSize) -> Point {
        Point::new(
            self.x / 100.0 * canvas.width,
            self.y / 100.0 * canvas.height,
        )
    }
}

/// Canvas dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero or negative. Nothing can be
    /// drawn or hit-tested against an empty canvas.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Canvas center in pixels.
    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Convert a canvas-space point to percent space.
    #[must_use]
    pub fn to_percent(self, p: Point) -> PercentPoint {
        PercentPoint::new(p.x / self.width * 100.0, p.y / self.height * 100.0)
    }
}

/// Axis-aligned rectangle in canvas pixels, before any rotation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Build a rect from its center point and full extents.
    #[must_use]
    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[must_use]
    pub fn half_width(self) -> f64 {
        self.width / 2.0
    }

    #[must_use]
    pub fn half_height(self) -> f64 {
        self.height / 2.0
    }

    /// Axis-aligned containment check (ignores rotation).
    #[must_use]
    pub fn contains(self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// The four corners in top-left, top-right, bottom-right, bottom-left
    /// order.
    #[must_use]
    pub fn corners(self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ]
    }
}

/// Map a canvas-space point into an entity's unrotated local frame.
///
/// The local frame has its origin at `center` with the entity's own rotation
/// undone, so rectangular containment and handle checks stay axis-aligned no
/// matter how the entity is rotated on screen.
#[must_use]
pub fn rotate_into_local(p: Point, center: Point, rotation_deg: f64) -> Point {
    let rad = -rotation_deg.to_radians();
    let (sin, cos) = rad.sin_cos();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point::new(dx * cos - dy * sin, dx * sin + dy * cos)
}

/// Normalize an angle in degrees to the range `[0, 360)`.
#[must_use]
pub fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = deg % 360.0;
    if wrapped < 0.0 { wrapped + 360.0 } else { wrapped }
}

/// Percent-space region entity centers are confined to during drags and
/// nudges. Defaults to the whole canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for ImageBounds {
    fn default() -> Self {
        Self { left: 0.0, top: 0.0, right: 100.0, bottom: 100.0 }
    }
}

impl ImageBounds {
    /// Clamp `center` so a box with the given percent-space half-extents
    /// stays inside the bounds. A box larger than the bounds on an axis is
    /// pinned to the bounds midpoint on that axis.
    #[must_use]
    pub fn clamp_center(self, center: PercentPoint, half_w: f64, half_h: f64) -> PercentPoint {
        PercentPoint::new(
            clamp_axis(center.x, self.left, self.right, half_w),
            clamp_axis(center.y, self.top, self.bottom, half_h),
        )
    }
}

fn clamp_axis(value: f64, lo: f64, hi: f64, half: f64) -> f64 {
    let min = lo + half;
    let max = hi - half;
    if min > max {
        (lo + hi) / 2.0
    } else {
        value.clamp(min, max)
    }
}

/// Greatest common divisor, for reducing pixel dimensions to a ratio.
#[must_use]
pub fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Reduce pixel dimensions to a small-integer ratio string such as `16:9`.
#[must_use]
pub fn reduced_aspect(width: u32, height: u32) -> String {
    if width == 0 || height == 0 {
        return "0:0".to_owned();
    }
    let d = gcd(width, height);
    format!("{}:{}", width / d, height / d)
}

/// Failure to interpret a `W:H` aspect-ratio string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AspectError {
    #[error("aspect ratio must look like W:H, got {0:?}")]
    Malformed(String),
    #[error("aspect ratio dimensions must be positive, got {0:?}")]
    NonPositive(String),
}

/// Parse a `W:H` string into a width-over-height ratio.
///
/// # Errors
///
/// Returns [`AspectError`] when the string is not two `:`-separated numbers
/// or when either side is zero, negative, or non-finite.
pub fn parse_aspect(s: &str) -> Result<f64, AspectError> {
    let Some((w, h)) = s.split_once(':') else {
        return Err(AspectError::Malformed(s.to_owned()));
    };
    let w: f64 = w.trim().parse().map_err(|_| AspectError::Malformed(s.to_owned()))?;
    let h: f64 = h.trim().parse().map_err(|_| AspectError::Malformed(s.to_owned()))?;
    if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
        return Err(AspectError::NonPositive(s.to_owned()));
    }
    Ok(w / h)
}
