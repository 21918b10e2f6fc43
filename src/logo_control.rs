//! Logo interactions: selection, dragging, two resize styles, hover
//! feedback, and keyboard shortcuts.
//!
//! All gestures work on the currently hit logo; the hit priority itself
//! lives in [`crate::hit`]. Positions are written back in percent space so
//! a drag survives canvas resizes, and every position write is clamped to
//! the permitted bounds.

#[cfg(test)]
#[path = "logo_control_test.rs"]
mod logo_control_test;

use std::collections::HashMap;

use crate::consts::{
    KEY_STEP, KEY_STEP_FAST, LOGO_ROTATE_STEP_DEG, LOGO_SIZE_MAX_PCT, LOGO_SIZE_MIN_PCT,
};
use crate::engine::Action;
use crate::geometry::{CanvasSize, ImageBounds, PercentPoint, Point, Rect, wrap_degrees};
use crate::hit::{self, LogoPart};
use crate::input::{self, Key, Modifiers};
use crate::layout::{self, NaturalSize};
use crate::scene::{EntityId, PartialLogo, Scene};

/// Active gesture on a logo.
#[derive(Debug, Clone, Copy)]
enum LogoGesture {
    Idle,
    /// Dragging the body; `grab` is the pointer offset from the logo
    /// center at pointer-down.
    Dragging { id: EntityId, grab: Point },
    /// Resizing from the bottom-right handle; size follows the ratio of
    /// the pointer-to-center distance to the starting one.
    Resizing { id: EntityId, start_size: f64, start_dist: f64 },
    /// Resizing from a corner; size follows the dominant axis distance
    /// from the center.
    CornerResizing { id: EntityId },
}

/// Selection/drag/resize state machine for logo overlays.
#[derive(Debug)]
pub struct LogoControl {
    gesture: LogoGesture,
    hovered: Option<EntityId>,
}

impl Default for LogoControl {
    fn default() -> Self {
        Self::new()
    }
}

impl LogoControl {
    #[must_use]
    pub fn new() -> Self {
        Self { gesture: LogoGesture::Idle, hovered: None }
    }

    /// True while a drag or resize is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.gesture, LogoGesture::Idle)
    }

    /// The logo currently under the pointer, if any. Drives the hover
    /// outline.
    #[must_use]
    pub fn hovered(&self) -> Option<EntityId> {
        self.hovered
    }

    /// Offer a pointer-down. Claims the event when a logo part is hit.
    /// A miss deselects any selected logo but does not claim, so lower
    /// layers can still look at the event.
    pub fn on_pointer_down(
        &mut self,
        point: Point,
        scene: &mut Scene,
        canvas: CanvasSize,
        naturals: &HashMap<String, NaturalSize>,
    ) -> (bool, Vec<Action>) {
        let Some((id, part)) = hit::hit_logo(point, canvas, &scene.logos, naturals) else {
            let had_selection = scene.selected_logo().is_some();
            scene.select_logo(None);
            let actions = if had_selection {
                vec![Action::LogoSelected { id: None }, Action::RenderNeeded { urgent: true }]
            } else {
                Vec::new()
            };
            return (false, actions);
        };

        match part {
            LogoPart::DeleteButton => (true, self.delete(scene, id)),
            LogoPart::ResizeHandle => {
                let Some(rect) = rect_for(scene, canvas, naturals, id) else {
                    return (false, Vec::new());
                };
                let Some(logo) = scene.logo(id) else {
                    return (false, Vec::new());
                };
                self.gesture = LogoGesture::Resizing {
                    id,
                    start_size: logo.size,
                    start_dist: point.distance_to(rect.center()).max(1.0),
                };
                (true, Vec::new())
            }
            LogoPart::Corner => {
                self.gesture = LogoGesture::CornerResizing { id };
                (true, Vec::new())
            }
            LogoPart::Body => {
                let Some(rect) = rect_for(scene, canvas, naturals, id) else {
                    return (false, Vec::new());
                };
                let center = rect.center();
                let newly_selected = scene.selected_logo().map(|l| l.id) != Some(id);
                scene.select_logo(Some(id));
                self.gesture = LogoGesture::Dragging {
                    id,
                    grab: Point::new(point.x - center.x, point.y - center.y),
                };
                let actions = if newly_selected {
                    vec![
                        Action::LogoSelected { id: Some(id) },
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
        naturals: &HashMap<String, NaturalSize>,
        bounds: ImageBounds,
    ) -> Vec<Action> {
        match self.gesture {
            LogoGesture::Idle => Vec::new(),
            LogoGesture::Dragging { id, grab } => {
                let Some(rect) = rect_for(scene, canvas, naturals, id) else {
                    return Vec::new();
                };
                let center = Point::new(point.x - grab.x, point.y - grab.y);
                let half_w = rect.half_width() / canvas.width * 100.0;
                let half_h = rect.half_height() / canvas.height * 100.0;
                let position = bounds.clamp_center(canvas.to_percent(center), half_w, half_h);
                apply(scene, id, PartialLogo { position: Some(position), ..PartialLogo::default() }, false)
            }
            LogoGesture::Resizing { id, start_size, start_dist } => {
                let Some(rect) = rect_for(scene, canvas, naturals, id) else {
                    return Vec::new();
                };
                let size = (start_size * point.distance_to(rect.center()) / start_dist)
                    .clamp(LOGO_SIZE_MIN_PCT, LOGO_SIZE_MAX_PCT);
                apply(scene, id, PartialLogo { size: Some(size), ..PartialLogo::default() }, false)
            }
            LogoGesture::CornerResizing { id } => {
                let Some(rect) = rect_for(scene, canvas, naturals, id) else {
                    return Vec::new();
                };
                let center = rect.center();
                let dominant = (point.x - center.x).abs().max((point.y - center.y).abs());
                let size = (dominant * 2.0 / canvas.width * 100.0)
                    .clamp(LOGO_SIZE_MIN_PCT, LOGO_SIZE_MAX_PCT);
                apply(scene, id, PartialLogo { size: Some(size), ..PartialLogo::default() }, false)
            }
        }
    }

    /// End the active gesture.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        if !self.is_active() {
            return Vec::new();
        }
        self.gesture = LogoGesture::Idle;
        vec![Action::RenderNeeded { urgent: true }]
    }

    /// Update hover feedback while no gesture is in progress anywhere.
    /// Returns the cursor hint for the hit part and whether the hovered
    /// logo changed (which requires a repaint for the hover outline).
    pub fn on_hover(
        &mut self,
        point: Point,
        scene: &Scene,
        canvas: CanvasSize,
        naturals: &HashMap<String, NaturalSize>,
    ) -> (&'static str, bool) {
        let hit = hit::hit_logo(point, canvas, &scene.logos, naturals);
        let hovered = hit.map(|(id, _)| id);
        let changed = hovered != self.hovered;
        self.hovered = hovered;
        let cursor = match hit {
            Some((_, LogoPart::Body)) => "move",
            Some((_, LogoPart::DeleteButton)) => "pointer",
            Some((_, LogoPart::ResizeHandle | LogoPart::Corner)) => "nwse-resize",
            None => "default",
        };
        (cursor, changed)
    }

    /// Offer a key-down. Claims the event only when a logo is selected and
    /// the key maps to a logo shortcut.
    pub fn on_key_down(
        &mut self,
        key: &Key,
        modifiers: Modifiers,
        scene: &mut Scene,
        canvas: CanvasSize,
        naturals: &HashMap<String, NaturalSize>,
        bounds: ImageBounds,
    ) -> (bool, Vec<Action>) {
        let Some(selected) = scene.selected_logo() else {
            return (false, Vec::new());
        };
        let id = selected.id;
        let step = if modifiers.shift { KEY_STEP_FAST } else { KEY_STEP };

        if input::is_rotate_chord(key, modifiers) {
            let rotation = wrap_degrees(selected.rotation + LOGO_ROTATE_STEP_DEG);
            return (
                true,
                apply(scene, id, PartialLogo { rotation: Some(rotation), ..PartialLogo::default() }, true),
            );
        }
        if input::is_delete_key(key) {
            return (true, self.delete(scene, id));
        }
        if let Some((dx, dy)) = input::arrow_delta(key) {
            let natural = naturals.get(&selected.url).copied().unwrap_or_default();
            let rect = layout::logo_rect(canvas, selected, natural);
            let half_w = rect.half_width() / canvas.width * 100.0;
            let half_h = rect.half_height() / canvas.height * 100.0;
            let nudged = PercentPoint::new(
                selected.position.x + dx * step,
                selected.position.y + dy * step,
            );
            let position = bounds.clamp_center(nudged, half_w, half_h);
            return (
                true,
                apply(scene, id, PartialLogo { position: Some(position), ..PartialLogo::default() }, true),
            );
        }
        if input::is_grow_key(key) {
            let size = (selected.size + step).clamp(LOGO_SIZE_MIN_PCT, LOGO_SIZE_MAX_PCT);
            return (
                true,
                apply(scene, id, PartialLogo { size: Some(size), ..PartialLogo::default() }, true),
            );
        }
        if input::is_shrink_key(key) {
            let size = (selected.size - step).clamp(LOGO_SIZE_MIN_PCT, LOGO_SIZE_MAX_PCT);
            return (
                true,
                apply(scene, id, PartialLogo { size: Some(size), ..PartialLogo::default() }, true),
            );
        }
        (false, Vec::new())
    }

    /// Remove a logo and drop any hover reference to it.
    fn delete(&mut self, scene: &mut Scene, id: EntityId) -> Vec<Action> {
        if scene.delete_logo(id).is_none() {
            return Vec::new();
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        vec![Action::LogoDeleted { id }, Action::RenderNeeded { urgent: true }]
    }
}

/// Pixel rect of a logo, when its bitmap dimensions are known.
fn rect_for(
    scene: &Scene,
    canvas: CanvasSize,
    naturals: &HashMap<String, NaturalSize>,
    id: EntityId,
) -> Option<Rect> {
    let logo = scene.logo(id)?;
    let natural = naturals.get(&logo.url).copied()?;
    Some(layout::logo_rect(canvas, logo, natural))
}

/// Write a sparse update and report it. Continuous drag paths pass
/// `urgent = false` so repaints coalesce; discrete keyboard edits repaint
/// immediately.
fn apply(scene: &mut Scene, id: EntityId, partial: PartialLogo, urgent: bool) -> Vec<Action> {
    if !scene.update_logo(id, &partial) {
        return Vec::new();
    }
    vec![
        Action::LogoUpdated { id, fields: partial },
        Action::RenderNeeded { urgent },
    ]
}
