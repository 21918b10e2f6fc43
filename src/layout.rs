//! Derived geometry: where each entity sits on the canvas.
//!
//! Entities store resolution-independent state (percent positions, percent
//! sizes, font sizes). This module turns that state into concrete pixel
//! rectangles for the current canvas, which the renderer, hit-testing, and
//! the interaction controllers all share. Text extents depend on real glyph
//! metrics, so text layout goes through the [`TextMeasurer`] trait; the
//! renderer implements it over the live 2d context and tests substitute
//! deterministic fakes.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::consts::{TEXT_LINE_HEIGHT_FACTOR, TEXT_PADDING_FACTOR};
use crate::geometry::{CanvasSize, Point, Rect};
use crate::scene::{ImageTransform, Logo, TextOverlay};

/// Natural pixel dimensions of a decoded bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NaturalSize {
    pub width: f64,
    pub height: f64,
}

impl NaturalSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Measures the rendered advance width of a string for a CSS font.
pub trait TextMeasurer {
    fn text_width(&self, font: &str, text: &str) -> f64;
}

/// CSS font shorthand for an overlay, e.g. `italic bold 32px Inter`.
#[must_use]
pub fn font_string(text: &TextOverlay) -> String {
    let italic = if text.is_italic { "italic " } else { "" };
    let bold = if text.is_bold { "bold " } else { "" };
    format!("{italic}{bold}{}px {}", text.font_size, text.font_family)
}

/// Advance width of one line of text.
///
/// With zero letter spacing this is a single measurement. With spacing it
/// is the sum of per-character widths plus `spacing` between each adjacent
/// pair, matching how the renderer advances glyph by glyph.
#[must_use]
pub fn line_advance_width(
    measurer: &dyn TextMeasurer,
    font: &str,
    line: &str,
    spacing: f64,
) -> f64 {
    if spacing == 0.0 {
        return measurer.text_width(font, line);
    }
    let mut width = 0.0;
    let mut chars = 0usize;
    let mut buf = [0u8; 4];
    for ch in line.chars() {
        width += measurer.text_width(font, ch.encode_utf8(&mut buf));
        chars += 1;
    }
    if chars > 1 {
        width += spacing * ((chars - 1) as f64);
    }
    width
}

/// Bounding rectangle of a logo, before rotation.
///
/// Width comes from the logo's percent size; height follows the bitmap's
/// natural aspect ratio. A bitmap with no usable dimensions falls back to
/// a square.
#[must_use]
pub fn logo_rect(canvas: CanvasSize, logo: &Logo, natural: NaturalSize) -> Rect {
    let width = canvas.width * logo.size / 100.0;
    let height = if natural.width > 0.0 && natural.height > 0.0 {
        width * natural.height / natural.width
    } else {
        width
    };
    Rect::from_center(logo.position.to_canvas(canvas), width, height)
}

/// Bounding rectangle of a text overlay, before rotation.
///
/// Returns `None` when there is nothing to draw or hit-test: the overlay is
/// hidden, its text is empty, or the canvas has no extent. The rect wraps
/// the widest line and all lines at `font_size × 1.2` line height, plus
/// `font_size × 0.5` padding on every side.
#[must_use]
pub fn text_rect(
    canvas: CanvasSize,
    measurer: &dyn TextMeasurer,
    text: &TextOverlay,
) -> Option<Rect> {
    if !text.is_visible || text.text.is_empty() || canvas.is_empty() {
        return None;
    }
    let font = font_string(text);
    let mut max_width: f64 = 0.0;
    let mut lines = 0usize;
    for line in text.text.split('\n') {
        max_width = max_width.max(line_advance_width(measurer, &font, line, text.spacing));
        lines += 1;
    }
    let line_height = text.font_size * TEXT_LINE_HEIGHT_FACTOR;
    let pad = text.font_size * TEXT_PADDING_FACTOR;
    let anchor = text.position.to_canvas(canvas);
    let center = Point::new(anchor.x + text.translation.x, anchor.y + text.translation.y);
    Some(Rect::from_center(
        center,
        max_width + pad * 2.0,
        line_height * (lines as f64) + pad * 2.0,
    ))
}

/// Letterboxed fit for the base image: full canvas width, height from the
/// bitmap's aspect ratio, centered vertically.
#[must_use]
pub fn fit_rect(canvas: CanvasSize, natural: NaturalSize) -> Rect {
    let width = canvas.width;
    let height = if natural.width > 0.0 && natural.height > 0.0 {
        width * natural.height / natural.width
    } else {
        canvas.height
    };
    Rect::from_center(canvas.center(), width, height)
}

/// Edit-mode rectangle for the base image: the letterboxed fit size times
/// the user scale, centered at the canvas center plus the user offset.
#[must_use]
pub fn image_rect(canvas: CanvasSize, natural: NaturalSize, transform: ImageTransform) -> Rect {
    let fit = fit_rect(canvas, natural);
    let center = Point::new(
        canvas.width / 2.0 + transform.offset.x,
        canvas.height / 2.0 + transform.offset.y,
    );
    Rect::from_center(center, fit.width * transform.scale, fit.height * transform.scale)
}
