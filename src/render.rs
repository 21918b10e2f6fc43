//! Rendering: draws the full scene to a 2D context.
//!
//! This module is the only place that touches
//! [`web_sys::CanvasRenderingContext2d`]. It receives read-only engine and
//! cache state and produces pixels; it does not mutate any application
//! state. Handle and delete-affordance positions come from [`crate::hit`]
//! so the chrome always sits exactly where the hit zones are.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine`]) handles the result.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::bitmaps::BitmapCache;
use crate::consts::{DELETE_RADIUS_PX, HANDLE_HALF_PX, TEXT_LINE_HEIGHT_FACTOR};
use crate::engine::EngineCore;
use crate::geometry::{CanvasSize, Point, Rect};
use crate::hit;
use crate::layout::{self, TextMeasurer};
use crate::scene::{Logo, TextOverlay};

/// Selection dash segment length in screen pixels.
const SELECTION_DASH_PX: f64 = 4.0;

/// Draw the full scene: base image, logos, text overlays, and selection
/// chrome, in back-to-front order.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    core: &EngineCore,
    bitmaps: &BitmapCache,
) -> Result<(), JsValue> {
    let canvas = core.canvas_size();
    let dpr = core.dpr();

    // Layer 1: clear in backing-store space, then work in CSS pixels.
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, canvas.width, canvas.height);
    if canvas.is_empty() {
        return Ok(());
    }

    // Layer 2: the base image under its color filters.
    draw_base_image(ctx, core, bitmaps)?;

    // Layer 3: logos in z-order (bottom first).
    for logo in &core.scene.logos {
        draw_logo(ctx, core, bitmaps, logo)?;
    }

    // Layer 4: text overlays in z-order.
    let measurer = CtxMeasurer::new(ctx);
    for text in &core.scene.texts {
        draw_text(ctx, canvas, &measurer, text)?;
    }

    Ok(())
}

// =============================================================
// Base image
// =============================================================

fn draw_base_image(
    ctx: &CanvasRenderingContext2d,
    core: &EngineCore,
    bitmaps: &BitmapCache,
) -> Result<(), JsValue> {
    let Some(url) = core.scene.background.as_deref() else {
        return Ok(());
    };
    let Some(bitmap) = bitmaps.ready(url) else {
        return Ok(());
    };
    let Some(natural) = core.naturals().get(url).copied() else {
        return Ok(());
    };
    let canvas = core.canvas_size();
    let rect = if core.ui.edit_mode {
        layout::image_rect(canvas, natural, core.scene.image_transform)
    } else {
        layout::fit_rect(canvas, natural)
    };

    ctx.save();
    ctx.set_filter(&core.scene.filters.css_filter());
    ctx.set_global_alpha(core.scene.filters.opacity / 100.0);
    ctx.draw_image_with_html_image_element_and_dw_and_dh(
        bitmap, rect.x, rect.y, rect.width, rect.height,
    )?;
    ctx.restore();

    if core.ui.edit_mode {
        draw_image_chrome(ctx, rect)?;
    }
    Ok(())
}

/// Edit-mode frame: a border and corner grips at the scaled bounding box.
fn draw_image_chrome(ctx: &CanvasRenderingContext2d, rect: Rect) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_stroke_style_str("#1E90FF");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);

    ctx.set_fill_style_str("#fff");
    draw_handles(ctx, &rect.corners());
    ctx.restore();
    Ok(())
}

// =============================================================
// Logos
// =============================================================

fn draw_logo(
    ctx: &CanvasRenderingContext2d,
    core: &EngineCore,
    bitmaps: &BitmapCache,
    logo: &Logo,
) -> Result<(), JsValue> {
    let Some(bitmap) = bitmaps.ready(&logo.url) else {
        return Ok(());
    };
    let Some(natural) = core.naturals().get(&logo.url).copied() else {
        return Ok(());
    };
    let rect = layout::logo_rect(core.canvas_size(), logo, natural);
    let center = rect.center();

    ctx.save();
    ctx.translate(center.x, center.y)?;
    ctx.rotate(logo.rotation.to_radians())?;
    ctx.draw_image_with_html_image_element_and_dw_and_dh(
        bitmap,
        -rect.half_width(),
        -rect.half_height(),
        rect.width,
        rect.height,
    )?;

    // Chrome shares the rotated transform so it tracks the logo.
    if logo.is_selected {
        draw_logo_chrome(ctx, rect)?;
    } else if core.hovered_logo() == Some(logo.id) {
        draw_hover_outline(ctx, rect)?;
    }
    ctx.restore();
    Ok(())
}

fn draw_logo_chrome(ctx: &CanvasRenderingContext2d, rect: Rect) -> Result<(), JsValue> {
    let hw = rect.half_width();
    let hh = rect.half_height();

    ctx.set_stroke_style_str("#1E90FF");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(-hw, -hh, rect.width, rect.height);

    ctx.set_fill_style_str("#fff");
    draw_handles(ctx, &hit::corner_points(rect));

    draw_delete_button(ctx, hit::delete_center(rect))
}

fn draw_hover_outline(ctx: &CanvasRenderingContext2d, rect: Rect) -> Result<(), JsValue> {
    let dash = js_sys::Array::new();
    dash.push(&SELECTION_DASH_PX.into());
    dash.push(&SELECTION_DASH_PX.into());
    ctx.set_line_dash(&dash)?;
    ctx.set_stroke_style_str("#9e9e9e");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(-rect.half_width(), -rect.half_height(), rect.width, rect.height);
    ctx.set_line_dash(&js_sys::Array::new())?;
    Ok(())
}

// =============================================================
// Text overlays
// =============================================================

fn draw_text(
    ctx: &CanvasRenderingContext2d,
    canvas: CanvasSize,
    measurer: &CtxMeasurer<'_>,
    text: &TextOverlay,
) -> Result<(), JsValue> {
    let Some(rect) = layout::text_rect(canvas, measurer, text) else {
        return Ok(());
    };
    let center = rect.center();
    let font = layout::font_string(text);

    ctx.save();
    ctx.translate(center.x, center.y)?;
    ctx.rotate(text.rotation.to_radians())?;

    ctx.set_font(&font);
    ctx.set_fill_style_str(&text.color);
    ctx.set_text_baseline("middle");

    let line_height = text.font_size * TEXT_LINE_HEIGHT_FACTOR;
    let lines: Vec<&str> = text.text.split('\n').collect();
    let total_height = line_height * (lines.len() as f64);
    for (idx, line) in lines.iter().enumerate() {
        let y = (idx as f64 + 0.5).mul_add(line_height, -total_height / 2.0);
        draw_text_line(ctx, measurer, &font, line, y, text.spacing)?;
    }

    if text.is_selected {
        draw_text_chrome(ctx, rect)?;
    }
    ctx.restore();
    Ok(())
}

fn draw_text_line(
    ctx: &CanvasRenderingContext2d,
    measurer: &CtxMeasurer<'_>,
    font: &str,
    line: &str,
    y: f64,
    spacing: f64,
) -> Result<(), JsValue> {
    if spacing == 0.0 {
        ctx.set_text_align("center");
        ctx.fill_text(line, 0.0, y)?;
        return Ok(());
    }

    // Canvas has no letter-spacing primitive; advance glyph by glyph with
    // the same widths the layout rectangle was measured with.
    ctx.set_text_align("left");
    let width = layout::line_advance_width(measurer, font, line, spacing);
    let mut x = -width / 2.0;
    let mut buf = [0u8; 4];
    for ch in line.chars() {
        let glyph = ch.encode_utf8(&mut buf);
        ctx.fill_text(glyph, x, y)?;
        x += measurer.text_width(font, glyph) + spacing;
    }
    Ok(())
}

fn draw_text_chrome(ctx: &CanvasRenderingContext2d, rect: Rect) -> Result<(), JsValue> {
    let hw = rect.half_width();
    let hh = rect.half_height();

    ctx.set_stroke_style_str("#1E90FF");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(-hw, -hh, rect.width, rect.height);

    ctx.set_fill_style_str("#fff");
    draw_handles(ctx, &hit::corner_points(rect));
    draw_handles(ctx, &hit::edge_midpoints(rect));

    draw_delete_button(ctx, hit::delete_center(rect))
}

// =============================================================
// Shared chrome
// =============================================================

/// Square grips centered on each point, in the current transform. The
/// caller sets fill and stroke styles.
fn draw_handles(ctx: &CanvasRenderingContext2d, points: &[Point]) {
    for p in points {
        ctx.fill_rect(
            p.x - HANDLE_HALF_PX,
            p.y - HANDLE_HALF_PX,
            HANDLE_HALF_PX * 2.0,
            HANDLE_HALF_PX * 2.0,
        );
        ctx.stroke_rect(
            p.x - HANDLE_HALF_PX,
            p.y - HANDLE_HALF_PX,
            HANDLE_HALF_PX * 2.0,
            HANDLE_HALF_PX * 2.0,
        );
    }
}

fn draw_delete_button(ctx: &CanvasRenderingContext2d, center: Point) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.arc(center.x, center.y, DELETE_RADIUS_PX, 0.0, 2.0 * PI)?;
    ctx.set_fill_style_str("#e5484d");
    ctx.fill();

    let arm = DELETE_RADIUS_PX * 0.45;
    ctx.set_stroke_style_str("#fff");
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.move_to(center.x - arm, center.y - arm);
    ctx.line_to(center.x + arm, center.y + arm);
    ctx.move_to(center.x + arm, center.y - arm);
    ctx.line_to(center.x - arm, center.y + arm);
    ctx.stroke();
    Ok(())
}

// =============================================================
// Measurement
// =============================================================

/// [`TextMeasurer`] backed by the live 2d context.
pub struct CtxMeasurer<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl<'a> CtxMeasurer<'a> {
    #[must_use]
    pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl TextMeasurer for CtxMeasurer<'_> {
    fn text_width(&self, font: &str, text: &str) -> f64 {
        self.ctx.set_font(font);
        self.ctx.measure_text(text).map_or(0.0, |m| m.width())
    }
}
