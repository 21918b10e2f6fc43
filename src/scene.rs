//! Scene model: the base image, logo overlays, text overlays, color
//! filters, and the in-memory store that owns them.
//!
//! This module defines the entity types (`Logo`, `TextOverlay`), sparse
//! update types for incremental edits (`PartialLogo`, `PartialText`), the
//! global per-scene state (`Filters`, `ImageTransform`), and the runtime
//! store (`Scene`). Data flows into this layer from the host (snapshot
//! deserialization, toolbar edits) and from the interaction controllers
//! (drag mutations). The renderer reads from `Scene` in array order, which
//! is also the stacking order.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{
    IMAGE_SCALE_MAX, IMAGE_SCALE_MIN, LOGO_DEFAULT_SIZE_PCT, LOGO_SIZE_MAX_PCT, LOGO_SIZE_MIN_PCT,
    TEXT_DEFAULT_FONT_PX, TEXT_FONT_DRAG_MAX_PX, TEXT_FONT_MIN_PX,
};
use crate::geometry::{PercentPoint, Point, wrap_degrees};

/// Unique identifier for a scene entity.
pub type EntityId = Uuid;

/// A logo overlay as stored in the scene and on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logo {
    /// Unique identifier for this logo.
    pub id: EntityId,
    /// Source URL of the logo bitmap.
    pub url: String,
    /// Width as a percent of canvas width. Height follows the bitmap's
    /// natural aspect ratio.
    pub size: f64,
    /// Center position in percent of canvas.
    pub position: PercentPoint,
    /// Clockwise rotation in degrees around the center.
    pub rotation: f64,
    /// Whether this logo currently holds the logo selection.
    #[serde(default)]
    pub is_selected: bool,
}

impl Logo {
    /// A fresh logo centered on the canvas at the default size.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            size: LOGO_DEFAULT_SIZE_PCT,
            position: PercentPoint::new(50.0, 50.0),
            rotation: 0.0,
            is_selected: false,
        }
    }
}

/// Sparse update for a logo. Only present fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialLogo {
    /// New bitmap URL, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// New width percent, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// New center position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<PercentPoint>,
    /// New rotation in degrees, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// New selection flag, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_selected: Option<bool>,
}

/// A text overlay as stored in the scene and on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextOverlay {
    /// Unique identifier for this overlay.
    pub id: EntityId,
    /// The text content. May contain `\n` for multiple lines.
    pub text: String,
    /// Hidden overlays are neither drawn nor hit-testable.
    pub is_visible: bool,
    /// Fill color as a CSS color string.
    pub color: String,
    /// CSS font family name.
    pub font_family: String,
    /// Font size in CSS pixels.
    pub font_size: f64,
    pub is_bold: bool,
    pub is_italic: bool,
    /// Clockwise rotation in degrees around the block center.
    pub rotation: f64,
    /// Extra advance between adjacent characters, in pixels.
    pub spacing: f64,
    /// Pixel offset applied on top of `position`, accumulated by drags.
    pub translation: Point,
    /// Anchor position in percent of canvas.
    pub position: PercentPoint,
    /// Whether this overlay currently holds the text selection.
    #[serde(default)]
    pub is_selected: bool,
}

impl TextOverlay {
    /// A fresh overlay centered on the canvas with default styling.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            is_visible: true,
            color: "#ffffff".to_owned(),
            font_family: "Arial".to_owned(),
            font_size: TEXT_DEFAULT_FONT_PX,
            is_bold: false,
            is_italic: false,
            rotation: 0.0,
            spacing: 0.0,
            translation: Point::new(0.0, 0.0),
            position: PercentPoint::new(50.0, 50.0),
            is_selected: false,
        }
    }
}

/// Sparse update for a text overlay. Only present fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialText {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<f64>,
    /// Whole-field replacement for the pixel offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<PercentPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_selected: Option<bool>,
}

/// Color filter parameters applied to the base image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    /// Brightness percent; 100 is neutral.
    pub brightness: f64,
    /// Contrast percent; 100 is neutral.
    pub contrast: f64,
    /// Saturation percent; 100 is neutral.
    pub saturation: f64,
    /// Sepia percent; 0 is neutral.
    pub sepia: f64,
    /// Opacity percent; 100 is fully opaque.
    pub opacity: f64,
    /// Blur radius in pixels; 0 is neutral.
    pub blur: f64,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            sepia: 0.0,
            opacity: 100.0,
            blur: 0.0,
        }
    }
}

impl Filters {
    /// A copy with every parameter clamped to its legal range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            brightness: self.brightness.clamp(0.0, 200.0),
            contrast: self.contrast.clamp(0.0, 200.0),
            saturation: self.saturation.clamp(0.0, 200.0),
            sepia: self.sepia.clamp(0.0, 100.0),
            opacity: self.opacity.clamp(0.0, 100.0),
            blur: self.blur.clamp(0.0, 20.0),
        }
    }

    /// The CSS `filter` string for these parameters. Opacity is excluded;
    /// it maps to the context's global alpha instead.
    #[must_use]
    pub fn css_filter(&self) -> String {
        format!(
            "brightness({}%) contrast({}%) saturate({}%) sepia({}%) blur({}px)",
            self.brightness, self.contrast, self.saturation, self.sepia, self.blur
        )
    }
}

/// User-adjusted placement of the base image in edit mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageTransform {
    /// Pixel offset of the image center from the canvas center.
    pub offset: Point,
    /// Scale multiplier on top of the letterboxed fit size.
    pub scale: f64,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self { offset: Point::new(0.0, 0.0), scale: 1.0 }
    }
}

/// The full editable scene.
///
/// Overlay arrays double as stacking order: later entries draw on top.
/// At most one logo and at most one text overlay are selected at a time;
/// every mutation path that sets a selection clears the others.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    /// URL of the base image, if one has been chosen.
    pub background: Option<String>,
    /// Logo overlays in stacking order.
    pub logos: Vec<Logo>,
    /// Text overlays in stacking order. Text always draws above logos.
    pub texts: Vec<TextOverlay>,
    /// Color filters applied to the base image.
    pub filters: Filters,
    /// Edit-mode placement of the base image.
    pub image_transform: ImageTransform,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Logos ───────────────────────────────────────────────────

    /// Append a logo on top of the stack.
    pub fn add_logo(&mut self, logo: Logo) {
        self.logos.push(logo);
    }

    /// Return a reference to a logo by id.
    #[must_use]
    pub fn logo(&self, id: EntityId) -> Option<&Logo> {
        self.logos.iter().find(|l| l.id == id)
    }

    /// Apply a sparse update to a logo. Size is clamped and rotation is
    /// wrapped at assignment. Returns false if the logo doesn't exist.
    pub fn update_logo(&mut self, id: EntityId, partial: &PartialLogo) -> bool {
        let Some(idx) = self.logos.iter().position(|l| l.id == id) else {
            return false;
        };
        {
            let logo = &mut self.logos[idx];
            if let Some(ref url) = partial.url {
                logo.url.clone_from(url);
            }
            if let Some(size) = partial.size {
                logo.size = size.clamp(LOGO_SIZE_MIN_PCT, LOGO_SIZE_MAX_PCT);
            }
            if let Some(position) = partial.position {
                logo.position = position;
            }
            if let Some(rotation) = partial.rotation {
                logo.rotation = wrap_degrees(rotation);
            }
            if partial.is_selected == Some(false) {
                logo.is_selected = false;
            }
        }
        if partial.is_selected == Some(true) {
            self.select_logo(Some(id));
        }
        true
    }

    /// Make `id` the sole selected logo, or clear the logo selection.
    pub fn select_logo(&mut self, id: Option<EntityId>) {
        for logo in &mut self.logos {
            logo.is_selected = Some(logo.id) == id;
        }
    }

    /// Remove a logo by id, returning it if it was present.
    pub fn delete_logo(&mut self, id: EntityId) -> Option<Logo> {
        let idx = self.logos.iter().position(|l| l.id == id)?;
        Some(self.logos.remove(idx))
    }

    /// The currently selected logo, if any.
    #[must_use]
    pub fn selected_logo(&self) -> Option<&Logo> {
        self.logos.iter().find(|l| l.is_selected)
    }

    // ── Text overlays ───────────────────────────────────────────

    /// Append a text overlay on top of the stack.
    pub fn add_text(&mut self, text: TextOverlay) {
        self.texts.push(text);
    }

    /// Return a reference to a text overlay by id.
    #[must_use]
    pub fn text(&self, id: EntityId) -> Option<&TextOverlay> {
        self.texts.iter().find(|t| t.id == id)
    }

    /// Apply a sparse update to a text overlay. Font size is clamped to the
    /// widest legal range at assignment. Returns false if the overlay
    /// doesn't exist.
    pub fn update_text(&mut self, id: EntityId, partial: &PartialText) -> bool {
        let Some(idx) = self.texts.iter().position(|t| t.id == id) else {
            return false;
        };
        {
            let overlay = &mut self.texts[idx];
            if let Some(ref text) = partial.text {
                overlay.text.clone_from(text);
            }
            if let Some(visible) = partial.is_visible {
                overlay.is_visible = visible;
            }
            if let Some(ref color) = partial.color {
                overlay.color.clone_from(color);
            }
            if let Some(ref family) = partial.font_family {
                overlay.font_family.clone_from(family);
            }
            if let Some(size) = partial.font_size {
                overlay.font_size = size.clamp(TEXT_FONT_MIN_PX, TEXT_FONT_DRAG_MAX_PX);
            }
            if let Some(bold) = partial.is_bold {
                overlay.is_bold = bold;
            }
            if let Some(italic) = partial.is_italic {
                overlay.is_italic = italic;
            }
            if let Some(rotation) = partial.rotation {
                overlay.rotation = wrap_degrees(rotation);
            }
            if let Some(spacing) = partial.spacing {
                overlay.spacing = spacing;
            }
            if let Some(translation) = partial.translation {
                overlay.translation = translation;
            }
            if let Some(position) = partial.position {
                overlay.position = position;
            }
            if partial.is_selected == Some(false) {
                overlay.is_selected = false;
            }
        }
        if partial.is_selected == Some(true) {
            self.select_text(Some(id));
        }
        true
    }

    /// Make `id` the sole selected text overlay, or clear the selection.
    pub fn select_text(&mut self, id: Option<EntityId>) {
        for overlay in &mut self.texts {
            overlay.is_selected = Some(overlay.id) == id;
        }
    }

    /// Remove a text overlay by id, returning it if it was present.
    pub fn delete_text(&mut self, id: EntityId) -> Option<TextOverlay> {
        let idx = self.texts.iter().position(|t| t.id == id)?;
        Some(self.texts.remove(idx))
    }

    /// The currently selected text overlay, if any.
    #[must_use]
    pub fn selected_text(&self) -> Option<&TextOverlay> {
        self.texts.iter().find(|t| t.is_selected)
    }

    // ── Global state ────────────────────────────────────────────

    /// Replace the filter parameters, clamping each to its legal range.
    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters.clamped();
    }

    /// Set or clear the base image URL.
    pub fn set_background(&mut self, url: Option<String>) {
        self.background = url;
    }

    /// Replace the base-image transform, clamping scale to its legal range.
    pub fn set_image_transform(&mut self, transform: ImageTransform) {
        self.image_transform = ImageTransform {
            offset: transform.offset,
            scale: transform.scale.clamp(IMAGE_SCALE_MIN, IMAGE_SCALE_MAX),
        };
    }

    /// Replace the whole scene with a snapshot. Selection flags in the
    /// snapshot are discarded; a freshly loaded scene has no selection.
    pub fn load(&mut self, snapshot: Scene) {
        *self = snapshot;
        self.select_logo(None);
        self.select_text(None);
    }

    /// Every bitmap URL the scene references: the base image plus one per
    /// logo. Used to reconcile the bitmap cache.
    #[must_use]
    pub fn bitmap_urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = Vec::with_capacity(self.logos.len() + 1);
        if let Some(ref background) = self.background {
            urls.push(background);
        }
        urls.extend(self.logos.iter().map(|l| l.url.as_str()));
        urls
    }
}
