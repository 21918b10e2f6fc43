#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

use crate::geometry::PercentPoint;

struct FixedWidth {
    per_char: f64,
}

impl TextMeasurer for FixedWidth {
    fn text_width(&self, _font: &str, text: &str) -> f64 {
        self.per_char * (text.chars().count() as f64)
    }
}

fn measurer() -> FixedWidth {
    FixedWidth { per_char: 10.0 }
}

/// Core sized to exactly 800x600 via a 4:3 design ratio.
fn core() -> EngineCore {
    let mut core = EngineCore::new();
    core.set_design_aspect("4:3").expect("aspect");
    core.set_viewport(800.0, 1.0);
    core
}

/// Adds a square logo: 160x160 centered at (400, 300).
fn add_logo(core: &mut EngineCore, url: &str) -> EntityId {
    let logo = Logo::new(url);
    let id = logo.id;
    core.add_logo(logo);
    core.record_natural(url, NaturalSize::new(100.0, 100.0));
    id
}

/// Adds a "hello" overlay: an 82x70.4 block centered at (400, 300) under
/// the 10px-per-char measurer.
fn add_text(core: &mut EngineCore) -> EntityId {
    let overlay = TextOverlay::new("hello");
    let id = overlay.id;
    core.add_text(overlay);
    id
}

/// Base image filling the whole 800x600 canvas at scale 1.
fn add_background(core: &mut EngineCore) {
    core.set_background(Some("bg.png".to_owned()));
    core.record_natural("bg.png", NaturalSize::new(1600.0, 1200.0));
}

fn has_render(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::RenderNeeded { .. }))
}

fn has_urgent_render(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::RenderNeeded { urgent: true }))
}

fn has_transform_change(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::ImageTransformChanged { .. }))
}

// --- Viewport & aspect ---

#[test]
fn viewport_follows_the_default_design_aspect() {
    let mut core = EngineCore::new();
    core.set_viewport(800.0, 1.0);

    let size = core.canvas_size();
    assert_eq!(size.width, 800.0);
    assert_eq!(size.height, 450.0);
    assert_eq!(core.dpr(), 1.0);
}

#[test]
fn design_aspect_change_resizes_the_canvas() {
    let core = core();
    assert_eq!(core.canvas_size().height, 600.0);
}

#[test]
fn background_natural_overrides_the_design_aspect() {
    let mut core = core();
    core.set_background(Some("bg.png".to_owned()));
    core.record_natural("bg.png", NaturalSize::new(1600.0, 800.0));

    assert_eq!(core.canvas_size().height, 400.0);
}

#[test]
fn set_design_aspect_rejects_malformed_input() {
    let mut core = core();
    assert!(core.set_design_aspect("wide").is_err());
    assert!(core.set_design_aspect("0:3").is_err());
    assert_eq!(core.canvas_size().height, 600.0);
}

#[test]
fn naturals_for_other_urls_leave_the_canvas_alone() {
    let mut core = core();
    core.record_natural("logo.png", NaturalSize::new(1000.0, 1000.0));
    assert_eq!(core.canvas_size().height, 600.0);
}

#[test]
fn background_aspect_reduces_the_natural_ratio() {
    let mut core = core();
    assert_eq!(core.background_aspect(), None);

    core.set_background(Some("bg.png".to_owned()));
    assert_eq!(core.background_aspect(), None);

    core.record_natural("bg.png", NaturalSize::new(1920.0, 1080.0));
    assert_eq!(core.background_aspect().as_deref(), Some("16:9"));
}

// --- Pointer dispatch ---

#[test]
fn secondary_button_is_ignored() {
    let mut core = core();
    let _id = add_logo(&mut core, "mark.png");

    let actions =
        core.on_pointer_down(Point::new(400.0, 300.0), Button::Secondary, &measurer(), 0.0);

    assert!(actions.is_empty());
    assert!(core.selected_logo().is_none());
}

#[test]
fn body_click_selects_a_logo_with_an_urgent_paint() {
    let mut core = core();
    let id = add_logo(&mut core, "mark.png");

    let actions =
        core.on_pointer_down(Point::new(400.0, 300.0), Button::Primary, &measurer(), 0.0);

    assert!(actions.iter().any(|a| matches!(a, Action::LogoSelected { id: Some(got) } if *got == id)));
    assert!(has_urgent_render(&actions));
    assert_eq!(core.selected_logo(), Some(id));
}

#[test]
fn image_layer_claims_first_in_edit_mode() {
    let mut core = core();
    add_background(&mut core);
    let logo = add_logo(&mut core, "mark.png");
    core.set_edit_mode(true);

    let down = core.on_pointer_down(Point::new(400.0, 300.0), Button::Primary, &measurer(), 0.0);
    let moved = core.on_pointer_move(Point::new(500.0, 300.0), &measurer(), 100.0);

    assert!(down.is_empty());
    assert!(core.selected_logo().is_none());
    assert!(has_transform_change(&moved));
    assert_eq!(core.scene.logo(logo).map(|l| l.position.x), Some(50.0));
}

#[test]
fn image_layer_is_inert_outside_edit_mode() {
    let mut core = core();
    add_background(&mut core);
    let id = add_logo(&mut core, "mark.png");

    core.on_pointer_down(Point::new(400.0, 300.0), Button::Primary, &measurer(), 0.0);

    assert_eq!(core.selected_logo(), Some(id));
}

#[test]
fn text_claims_before_logos() {
    let mut core = core();
    let _logo = add_logo(&mut core, "mark.png");
    let text = add_text(&mut core);

    let actions =
        core.on_pointer_down(Point::new(400.0, 300.0), Button::Primary, &measurer(), 0.0);

    assert!(actions.iter().any(|a| matches!(a, Action::TextSelected { id: Some(got) } if *got == text)));
    assert_eq!(core.selected_text(), Some(text));
    assert!(core.selected_logo().is_none());
}

#[test]
fn text_miss_deselects_while_a_logo_claims() {
    let mut core = core();
    let mut logo = Logo::new("mark.png");
    logo.position = PercentPoint::new(25.0, 50.0);
    let logo_id = logo.id;
    core.add_logo(logo);
    core.record_natural("mark.png", NaturalSize::new(100.0, 100.0));
    let text = add_text(&mut core);
    core.scene.select_text(Some(text));

    let actions =
        core.on_pointer_down(Point::new(200.0, 300.0), Button::Primary, &measurer(), 0.0);

    assert!(actions.iter().any(|a| matches!(a, Action::TextSelected { id: None })));
    assert!(actions.iter().any(|a| matches!(a, Action::LogoSelected { id: Some(got) } if *got == logo_id)));
    assert!(core.selected_text().is_none());
    assert_eq!(core.selected_logo(), Some(logo_id));
}

#[test]
fn empty_space_click_clears_both_selections() {
    let mut core = core();
    let logo = add_logo(&mut core, "mark.png");
    let text = add_text(&mut core);
    core.scene.select_logo(Some(logo));
    core.scene.select_text(Some(text));

    let actions = core.on_pointer_down(Point::new(10.0, 10.0), Button::Primary, &measurer(), 0.0);

    assert!(actions.iter().any(|a| matches!(a, Action::TextSelected { id: None })));
    assert!(actions.iter().any(|a| matches!(a, Action::LogoSelected { id: None })));
    assert!(core.selected_logo().is_none());
    assert!(core.selected_text().is_none());
}

// --- Keyboard dispatch ---

#[test]
fn selected_text_gets_keys_before_logos() {
    let mut core = core();
    let logo = add_logo(&mut core, "mark.png");
    let text = add_text(&mut core);
    core.scene.select_logo(Some(logo));
    core.scene.select_text(Some(text));

    core.on_key_down(&Key::new("+"), Modifiers::default(), &measurer(), 0.0);

    assert_eq!(core.scene.text(text).map(|t| t.font_size), Some(33.0));
    assert_eq!(core.scene.logo(logo).map(|l| l.size), Some(20.0));
}

#[test]
fn keys_fall_through_to_the_selected_logo() {
    let mut core = core();
    let logo = add_logo(&mut core, "mark.png");
    let _text = add_text(&mut core);
    core.scene.select_logo(Some(logo));

    core.on_key_down(&Key::new("+"), Modifiers::default(), &measurer(), 0.0);

    assert_eq!(core.scene.logo(logo).map(|l| l.size), Some(21.0));
}

#[test]
fn keys_without_any_selection_do_nothing() {
    let mut core = core();
    let _logo = add_logo(&mut core, "mark.png");

    let actions = core.on_key_down(&Key::new("+"), Modifiers::default(), &measurer(), 0.0);

    assert!(actions.is_empty());
}

// --- Paint scheduling ---

#[test]
fn continuous_drag_paints_coalesce() {
    let mut core = core();
    let id = add_logo(&mut core, "mark.png");
    core.on_pointer_down(Point::new(400.0, 300.0), Button::Primary, &measurer(), 0.0);

    let first = core.on_pointer_move(Point::new(410.0, 300.0), &measurer(), 10.0);
    let second = core.on_pointer_move(Point::new(420.0, 300.0), &measurer(), 20.0);
    let third = core.on_pointer_move(Point::new(430.0, 300.0), &measurer(), 40.0);

    // State always lands; only the paints are coalesced.
    assert!(first.iter().any(|a| matches!(a, Action::LogoUpdated { id: got, .. } if *got == id)));
    assert!(!has_render(&first));
    assert!(!has_render(&second));
    assert!(third.iter().any(|a| matches!(a, Action::RenderNeeded { urgent: false })));
}

#[test]
fn trailing_paint_is_owed_after_a_swallowed_move() {
    let mut core = core();
    let _id = add_logo(&mut core, "mark.png");
    core.on_pointer_down(Point::new(400.0, 300.0), Button::Primary, &measurer(), 0.0);
    core.on_pointer_move(Point::new(410.0, 300.0), &measurer(), 10.0);

    assert!(!core.take_trailing_paint(20.0));
    assert!(core.take_trailing_paint(33.0));
    assert!(!core.take_trailing_paint(34.0));
}

#[test]
fn urgent_paints_always_pass() {
    let mut core = core();
    let logo = add_logo(&mut core, "mark.png");
    core.scene.select_logo(Some(logo));

    let first = core.on_key_down(&Key::new("ArrowRight"), Modifiers::default(), &measurer(), 0.0);
    let second = core.on_key_down(&Key::new("ArrowRight"), Modifiers::default(), &measurer(), 1.0);

    assert!(has_urgent_render(&first));
    assert!(has_urgent_render(&second));
}

#[test]
fn pointer_up_paints_immediately() {
    let mut core = core();
    let _id = add_logo(&mut core, "mark.png");
    core.on_pointer_down(Point::new(400.0, 300.0), Button::Primary, &measurer(), 0.0);
    core.on_pointer_move(Point::new(410.0, 300.0), &measurer(), 10.0);

    let actions = core.on_pointer_up(11.0);

    assert!(has_urgent_render(&actions));
}

#[test]
fn throttle_blocks_within_the_window_and_reopens() {
    let mut throttle = RenderThrottle::new();
    assert!(throttle.request(0.0, false));
    assert!(!throttle.request(10.0, false));
    assert!(throttle.request(33.0, false));
}

#[test]
fn urgent_request_resets_the_window() {
    let mut throttle = RenderThrottle::new();
    assert!(throttle.request(0.0, false));
    assert!(throttle.request(30.0, true));
    assert!(!throttle.request(40.0, false));
    assert!(throttle.request(63.0, false));
}

#[test]
fn urgent_request_clears_any_pending_trailing_paint() {
    let mut throttle = RenderThrottle::new();
    assert!(throttle.request(0.0, false));
    assert!(!throttle.request(5.0, false));
    assert!(throttle.request(6.0, true));
    assert!(!throttle.take_pending(100.0));
}

// --- Hover ---

#[test]
fn hover_emits_cursor_hints_on_transitions_only() {
    let mut core = core();
    let _id = add_logo(&mut core, "mark.png");

    let over = core.on_pointer_move(Point::new(400.0, 300.0), &measurer(), 0.0);
    let still_over = core.on_pointer_move(Point::new(410.0, 300.0), &measurer(), 50.0);
    let off = core.on_pointer_move(Point::new(10.0, 10.0), &measurer(), 100.0);

    assert!(over.iter().any(|a| matches!(a, Action::SetCursor(c) if c == "move")));
    assert!(has_urgent_render(&over));
    assert_eq!(core.ui.cursor, "default");
    assert!(still_over.is_empty());
    assert!(off.iter().any(|a| matches!(a, Action::SetCursor(c) if c == "default")));
}

// --- Scenarios ---

#[test]
fn logo_drag_pins_at_the_image_bounds() {
    let mut core = core();
    let id = add_logo(&mut core, "mark.png");
    core.on_pointer_down(Point::new(400.0, 300.0), Button::Primary, &measurer(), 0.0);

    core.on_pointer_move(Point::new(10.0, 10.0), &measurer(), 100.0);

    // Half the 160px square is 10% of the width and 80/600 of the height.
    let expected_y = 80.0 / 600.0 * 100.0;
    let logo = core.scene.logo(id).expect("logo");
    assert_eq!(logo.position.x, 10.0);
    assert_eq!(logo.position.y, expected_y);
}

#[test]
fn later_logo_wins_pointer_down_in_overlap() {
    let mut core = core();
    let _first = add_logo(&mut core, "a.png");
    let second = add_logo(&mut core, "b.png");

    core.on_pointer_down(Point::new(400.0, 300.0), Button::Primary, &measurer(), 0.0);

    assert_eq!(core.selected_logo(), Some(second));
}

#[test]
fn image_reset_is_idempotent() {
    let mut core = core();
    add_background(&mut core);
    core.set_edit_mode(true);
    core.on_pointer_down(Point::new(400.0, 300.0), Button::Primary, &measurer(), 0.0);
    core.on_pointer_move(Point::new(500.0, 340.0), &measurer(), 100.0);
    core.on_pointer_up(101.0);
    assert_ne!(core.scene.image_transform, ImageTransform::default());

    let first = core.reset_image_transform(102.0);
    let second = core.reset_image_transform(103.0);

    assert_eq!(core.scene.image_transform, ImageTransform::default());
    assert!(has_transform_change(&first));
    assert!(has_urgent_render(&first));
    assert!(has_transform_change(&second));
}

#[test]
fn load_scene_drops_gestures_and_selections() {
    let mut core = core();
    let _id = add_logo(&mut core, "mark.png");
    core.on_pointer_down(Point::new(400.0, 300.0), Button::Primary, &measurer(), 0.0);

    core.load_scene(Scene::new());

    let actions = core.on_pointer_move(Point::new(500.0, 300.0), &measurer(), 100.0);
    assert!(actions.is_empty());
    assert!(core.scene.logos.is_empty());
    assert!(core.selected_logo().is_none());
}

#[test]
fn leaving_edit_mode_abandons_the_image_gesture() {
    let mut core = core();
    add_background(&mut core);
    core.set_edit_mode(true);
    core.on_pointer_down(Point::new(400.0, 300.0), Button::Primary, &measurer(), 0.0);

    core.set_edit_mode(false);
    let actions = core.on_pointer_move(Point::new(500.0, 300.0), &measurer(), 100.0);

    assert!(!has_transform_change(&actions));
    assert_eq!(core.scene.image_transform, ImageTransform::default());
}
