//! Text overlay interactions: selection, dragging, directional font
//! resizing, and keyboard shortcuts.
//!
//! Dragging accumulates into the overlay's pixel translation on top of its
//! percent anchor. Resizing never changes the box directly; it scales the
//! font size, and the box follows through layout. Resize drags are mapped
//! into the overlay's local frame first so the eight handles keep their
//! meaning on rotated text.

#[cfg(test)]
#[path = "text_control_test.rs"]
mod text_control_test;

use crate::consts::{
    KEY_STEP, KEY_STEP_FAST, TEXT_FONT_DRAG_MAX_PX, TEXT_FONT_KEY_MAX_PX, TEXT_FONT_MIN_PX,
    TEXT_RESIZE_SENSITIVITY_PX, TEXT_ROTATE_STEP_DEG,
};
use crate::engine::Action;
use crate::geometry::{CanvasSize, ImageBounds, Point, rotate_into_local, wrap_degrees};
use crate::hit::{self, ResizeDir, TextPart};
use crate::input::{self, Key, Modifiers};
use crate::layout::{self, TextMeasurer};
use crate::scene::{EntityId, PartialText, Scene};

/// Active gesture on a text overlay.
#[derive(Debug, Clone, Copy)]
enum TextGesture {
    Idle,
    /// Dragging the body; `grab` is the pointer offset from the block
    /// center at pointer-down.
    Dragging { id: EntityId, grab: Point },
    /// Resizing from a handle. The font scales with the pointer's signed
    /// travel along the handle's outward direction, measured in the local
    /// frame captured at pointer-down.
    Resizing { id: EntityId, dir: ResizeDir, start: Point, start_font: f64, rotation: f64 },
}

/// Selection/drag/resize state machine for text overlays.
#[derive(Debug)]
pub struct TextControl {
    gesture: TextGesture,
}

impl Default for TextControl {
    fn default() -> Self {
        Self::new()
    }
}

impl TextControl {
    #[must_use]
    pub fn new() -> Self {
        Self { gesture: TextGesture::Idle }
    }

    /// True while a drag or resize is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.gesture, TextGesture::Idle)
    }

    /// Offer a pointer-down. Claims the event when a text part is hit.
    /// A miss deselects any selected overlay but does not claim, leaving
    /// the event for the logo layer underneath.
    pub fn on_pointer_down(
        &mut self,
        point: Point,
        scene: &mut Scene,
        canvas: CanvasSize,
        measurer: &dyn TextMeasurer,
    ) -> (bool, Vec<Action>) {
        let Some((id, part)) = hit::hit_text(point, canvas, measurer, &scene.texts) else {
            let had_selection = scene.selected_text().is_some();
            scene.select_text(None);
            let actions = if had_selection {
                vec![Action::TextSelected { id: None }, Action::RenderNeeded { urgent: true }]
            } else {
                Vec::new()
            };
            return (false, actions);
        };

        match part {
            TextPart::DeleteButton => (true, delete(scene, id)),
            TextPart::Edge(dir) | TextPart::Corner(dir) => {
                let Some(overlay) = scene.text(id) else {
                    return (false, Vec::new());
                };
                self.gesture = TextGesture::Resizing {
                    id,
                    dir,
                    start: point,
                    start_font: overlay.font_size,
                    rotation: overlay.rotation,
                };
                (true, Vec::new())
            }
            TextPart::Body => {
                let Some(rect) = scene.text(id).and_then(|t| layout::text_rect(canvas, measurer, t))
                else {
                    return (false, Vec::new());
                };
                let center = rect.center();
                let newly_selected = scene.selected_text().map(|t| t.id) != Some(id);
                scene.select_text(Some(id));
                self.gesture = TextGesture::Dragging {
                    id,
                    grab: Point::new(point.x - center.x, point.y - center.y),
                };
                let actions = if newly_selected {
                    vec![
                        Action::TextSelected { id: Some(id) },
                        Action::RenderNeeded { urgent: true },
                    ]
                } else {
                    Vec::new()
                };
                (true, actions)
            }
        }
    }

    /// Advance the active gesture.
    pub fn on_pointer_move(
        &mut self,
        point: Point,
        scene: &mut Scene,
        canvas: CanvasSize,
        measurer: &dyn TextMeasurer,
        bounds: ImageBounds,
    ) -> Vec<Action> {
        match self.gesture {
            TextGesture::Idle => Vec::new(),
            TextGesture::Dragging { id, grab } => {
                let Some(overlay) = scene.text(id) else {
                    return Vec::new();
                };
                let Some(rect) = layout::text_rect(canvas, measurer, overlay) else {
                    return Vec::new();
                };
                let anchor = overlay.position.to_canvas(canvas);
                let desired = Point::new(point.x - grab.x, point.y - grab.y);
                let half_w = rect.half_width() / canvas.width * 100.0;
                let half_h = rect.half_height() / canvas.height * 100.0;
                let clamped = bounds
                    .clamp_center(canvas.to_percent(desired), half_w, half_h)
                    .to_canvas(canvas);
                let translation = Point::new(clamped.x - anchor.x, clamped.y - anchor.y);
                apply(
                    scene,
                    id,
                    PartialText { translation: Some(translation), ..PartialText::default() },
                    false,
                )
            }
            TextGesture::Resizing { id, dir, start, start_font, rotation } => {
                let local = rotate_into_local(point, start, rotation);
                let factor = 1.0 + signed_travel(dir, local) / TEXT_RESIZE_SENSITIVITY_PX;
                let font = (start_font * factor).clamp(TEXT_FONT_MIN_PX, TEXT_FONT_DRAG_MAX_PX);
                apply(
                    scene,
                    id,
                    PartialText { font_size: Some(font), ..PartialText::default() },
                    false,
                )
            }
        }
    }

    /// End the active gesture.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        if !self.is_active() {
            return Vec::new();
        }
        self.gesture = TextGesture::Idle;
        vec![Action::RenderNeeded { urgent: true }]
    }

    /// Offer a key-down. Claims the event only when an overlay is selected
    /// and the key maps to a text shortcut.
    pub fn on_key_down(
        &mut self,
        key: &Key,
        modifiers: Modifiers,
        scene: &mut Scene,
        canvas: CanvasSize,
        measurer: &dyn TextMeasurer,
        bounds: ImageBounds,
    ) -> (bool, Vec<Action>) {
        let Some(selected) = scene.selected_text() else {
            return (false, Vec::new());
        };
        let id = selected.id;
        let step = if modifiers.shift { KEY_STEP_FAST } else { KEY_STEP };

        if input::is_rotate_chord(key, modifiers) {
            let rotation = wrap_degrees(selected.rotation + TEXT_ROTATE_STEP_DEG);
            return (
                true,
                apply(scene, id, PartialText { rotation: Some(rotation), ..PartialText::default() }, true),
            );
        }
        if input::is_delete_key(key) {
            return (true, delete(scene, id));
        }
        if let Some((dx, dy)) = input::arrow_delta(key) {
            let translation = Point::new(
                selected.translation.x + dx * step / 100.0 * canvas.width,
                selected.translation.y + dy * step / 100.0 * canvas.height,
            );
            let clamped = clamp_translation(scene, id, translation, canvas, measurer, bounds);
            return (
                true,
                apply(scene, id, PartialText { translation: Some(clamped), ..PartialText::default() }, true),
            );
        }
        if input::is_grow_key(key) {
            // The keyboard ceiling is lower than the drag ceiling; a font
            // already above it stays put rather than snapping down.
            let font = selected.font_size;
            let target = (font + step).min(TEXT_FONT_KEY_MAX_PX);
            if target <= font {
                return (true, Vec::new());
            }
            return (
                true,
                apply(scene, id, PartialText { font_size: Some(target), ..PartialText::default() }, true),
            );
        }
        if input::is_shrink_key(key) {
            let font = (selected.font_size - step).max(TEXT_FONT_MIN_PX);
            return (
                true,
                apply(scene, id, PartialText { font_size: Some(font), ..PartialText::default() }, true),
            );
        }
        (false, Vec::new())
    }
}

/// Signed travel along a handle's outward direction: positive grows the
/// font. Diagonals average their two axes.
fn signed_travel(dir: ResizeDir, local: Point) -> f64 {
    match dir {
        ResizeDir::E => local.x,
        ResizeDir::W => -local.x,
        ResizeDir::S => local.y,
        ResizeDir::N => -local.y,
        ResizeDir::Se => (local.x + local.y) / 2.0,
        ResizeDir::Nw => (-local.x - local.y) / 2.0,
        ResizeDir::Ne => (local.x - local.y) / 2.0,
        ResizeDir::Sw => (-local.x + local.y) / 2.0,
    }
}

/// Clamp a prospective translation so the block center stays in bounds.
fn clamp_translation(
    scene: &Scene,
    id: EntityId,
    translation: Point,
    canvas: CanvasSize,
    measurer: &dyn TextMeasurer,
    bounds: ImageBounds,
) -> Point {
    let Some(overlay) = scene.text(id) else {
        return translation;
    };
    let Some(rect) = layout::text_rect(canvas, measurer, overlay) else {
        return translation;
    };
    let anchor = overlay.position.to_canvas(canvas);
    let desired = Point::new(anchor.x + translation.x, anchor.y + translation.y);
    let half_w = rect.half_width() / canvas.width * 100.0;
    let half_h = rect.half_height() / canvas.height * 100.0;
    let clamped = bounds
        .clamp_center(canvas.to_percent(desired), half_w, half_h)
        .to_canvas(canvas);
    Point::new(clamped.x - anchor.x, clamped.y - anchor.y)
}

/// Remove a text overlay.
fn delete(scene: &mut Scene, id: EntityId) -> Vec<Action> {
    if scene.delete_text(id).is_none() {
        return Vec::new();
    }
    vec![Action::TextDeleted { id }, Action::RenderNeeded { urgent: true }]
}

/// Write a sparse update and report it. Continuous drag paths pass
/// `urgent = false` so repaints coalesce; discrete keyboard edits repaint
/// immediately.
fn apply(scene: &mut Scene, id: EntityId, partial: PartialText, urgent: bool) -> Vec<Action> {
    if !scene.update_text(id, &partial) {
        return Vec::new();
    }
    vec![
        Action::TextUpdated { id, fields: partial },
        Action::RenderNeeded { urgent },
    ]
}
