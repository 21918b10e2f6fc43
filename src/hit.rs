//! Hit-testing against scene entities and their selection chrome.
//!
//! All tests run in the entity's local frame: the pointer is mapped through
//! the inverse of the entity's rotation first, then checked against
//! axis-aligned zones. Handle positions are shared with the renderer so the
//! zones always sit exactly where the chrome is drawn.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use std::collections::HashMap;

use crate::consts::{
    CORNER_GRAB_PX, DELETE_RADIUS_PX, HANDLE_HALF_PX, TEXT_CORNER_ZONE_PX, TEXT_EDGE_BAND_PX,
};
use crate::geometry::{CanvasSize, Point, Rect, rotate_into_local};
use crate::layout::{self, NaturalSize, TextMeasurer};
use crate::scene::{EntityId, Logo, TextOverlay};

/// Which part of a logo the pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoPart {
    /// The circular delete affordance (selected logos only).
    DeleteButton,
    /// The bottom-right square handle (selected logos only).
    ResizeHandle,
    /// A left corner within grab range (selected logos only).
    Corner,
    /// The logo bitmap itself.
    Body,
}

/// Which part of a text overlay the pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPart {
    /// The circular delete affordance (selected overlays only).
    DeleteButton,
    /// A resize band along one edge (selected overlays only).
    Edge(ResizeDir),
    /// A resize square on one corner (selected overlays only).
    Corner(ResizeDir),
    /// The text block itself.
    Body,
}

/// Compass direction of a resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeDir {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

/// Corner handle centers in the local frame, NW/NE/SE/SW order.
#[must_use]
pub fn corner_points(rect: Rect) -> [Point; 4] {
    let hw = rect.half_width();
    let hh = rect.half_height();
    [
        Point::new(-hw, -hh),
        Point::new(hw, -hh),
        Point::new(hw, hh),
        Point::new(-hw, hh),
    ]
}

/// Edge-midpoint handle centers in the local frame, N/E/S/W order.
#[must_use]
pub fn edge_midpoints(rect: Rect) -> [Point; 4] {
    let hw = rect.half_width();
    let hh = rect.half_height();
    [
        Point::new(0.0, -hh),
        Point::new(hw, 0.0),
        Point::new(0.0, hh),
        Point::new(-hw, 0.0),
    ]
}

/// Local-frame center of the delete affordance (the top-right corner).
#[must_use]
pub fn delete_center(rect: Rect) -> Point {
    Point::new(rect.half_width(), -rect.half_height())
}

/// Hit-test a single logo in its local frame.
///
/// Affordances are only live on the selected logo; unselected logos expose
/// just their body. Affordance priority is delete, then the bottom-right
/// handle, then grabs on the two remaining left corners.
#[must_use]
pub fn logo_part_at(
    point: Point,
    canvas: CanvasSize,
    logo: &Logo,
    natural: NaturalSize,
    selected: bool,
) -> Option<LogoPart> {
    let rect = layout::logo_rect(canvas, logo, natural);
    let local = rotate_into_local(point, rect.center(), logo.rotation);
    let hw = rect.half_width();
    let hh = rect.half_height();

    if selected {
        if local.distance_to(delete_center(rect)) <= DELETE_RADIUS_PX {
            return Some(LogoPart::DeleteButton);
        }
        if (local.x - hw).abs() <= HANDLE_HALF_PX && (local.y - hh).abs() <= HANDLE_HALF_PX {
            return Some(LogoPart::ResizeHandle);
        }
        // Grab zones only on the corners without an affordance of their
        // own; past the delete circle or the handle, the pointer falls
        // back to the body.
        let [nw, _, _, sw] = corner_points(rect);
        for corner in [nw, sw] {
            if (local.x - corner.x).abs() <= CORNER_GRAB_PX
                && (local.y - corner.y).abs() <= CORNER_GRAB_PX
            {
                return Some(LogoPart::Corner);
            }
        }
    }

    if local.x.abs() <= hw && local.y.abs() <= hh {
        return Some(LogoPart::Body);
    }
    None
}

/// Topmost logo under the pointer, with the part hit.
///
/// The selected logo's affordances are checked before any body so chrome
/// wins overlaps; bodies are then walked topmost-first. Logos whose bitmap
/// has no recorded natural size are skipped entirely.
#[must_use]
pub fn hit_logo(
    point: Point,
    canvas: CanvasSize,
    logos: &[Logo],
    naturals: &HashMap<String, NaturalSize>,
) -> Option<(EntityId, LogoPart)> {
    if let Some(selected) = logos.iter().find(|l| l.is_selected) {
        if let Some(natural) = naturals.get(&selected.url) {
            if let Some(part) = logo_part_at(point, canvas, selected, *natural, true) {
                if part != LogoPart::Body {
                    return Some((selected.id, part));
                }
            }
        }
    }
    for logo in logos.iter().rev() {
        let Some(natural) = naturals.get(&logo.url) else {
            continue;
        };
        if logo_part_at(point, canvas, logo, *natural, false) == Some(LogoPart::Body) {
            return Some((logo.id, LogoPart::Body));
        }
    }
    None
}

/// Hit-test a single text overlay in its local frame.
#[must_use]
pub fn text_part_at(
    point: Point,
    canvas: CanvasSize,
    measurer: &dyn TextMeasurer,
    text: &TextOverlay,
    selected: bool,
) -> Option<TextPart> {
    let rect = layout::text_rect(canvas, measurer, text)?;
    let local = rotate_into_local(point, rect.center(), text.rotation);
    let hw = rect.half_width();
    let hh = rect.half_height();

    if selected {
        if local.distance_to(delete_center(rect)) <= DELETE_RADIUS_PX {
            return Some(TextPart::DeleteButton);
        }
        if let Some(part) = resize_zone(local, hw, hh) {
            return Some(part);
        }
    }

    if local.x.abs() <= hw && local.y.abs() <= hh {
        return Some(TextPart::Body);
    }
    None
}

/// Resize zones around a local-frame rect: squares centered on the corners
/// carve out of the bands straddling each edge.
fn resize_zone(local: Point, hw: f64, hh: f64) -> Option<TextPart> {
    let corner = TEXT_CORNER_ZONE_PX / 2.0;
    let corners = [
        (-hw, -hh, ResizeDir::Nw),
        (hw, -hh, ResizeDir::Ne),
        (hw, hh, ResizeDir::Se),
        (-hw, hh, ResizeDir::Sw),
    ];
    for (cx, cy, dir) in corners {
        if (local.x - cx).abs() <= corner && (local.y - cy).abs() <= corner {
            return Some(TextPart::Corner(dir));
        }
    }

    let band = TEXT_EDGE_BAND_PX / 2.0;
    let along_x = local.x.abs() <= hw + band;
    let along_y = local.y.abs() <= hh + band;
    if (local.x + hw).abs() <= band && along_y {
        return Some(TextPart::Edge(ResizeDir::W));
    }
    if (local.x - hw).abs() <= band && along_y {
        return Some(TextPart::Edge(ResizeDir::E));
    }
    if (local.y + hh).abs() <= band && along_x {
        return Some(TextPart::Edge(ResizeDir::N));
    }
    if (local.y - hh).abs() <= band && along_x {
        return Some(TextPart::Edge(ResizeDir::S));
    }
    None
}

/// Topmost text overlay under the pointer, with the part hit.
///
/// Mirrors [`hit_logo`]: the selected overlay's affordances are checked
/// first, then bodies topmost-first. Hidden and empty overlays never hit.
#[must_use]
pub fn hit_text(
    point: Point,
    canvas: CanvasSize,
    measurer: &dyn TextMeasurer,
    texts: &[TextOverlay],
) -> Option<(EntityId, TextPart)> {
    if let Some(selected) = texts.iter().find(|t| t.is_selected) {
        if let Some(part) = text_part_at(point, canvas, measurer, selected, true) {
            if part != TextPart::Body {
                return Some((selected.id, part));
            }
        }
    }
    for text in texts.iter().rev() {
        if text_part_at(point, canvas, measurer, text, false) == Some(TextPart::Body) {
            return Some((text.id, TextPart::Body));
        }
    }
    None
}
