#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

fn make_logo(url: &str) -> Logo {
    Logo::new(url)
}

fn make_text(content: &str) -> TextOverlay {
    TextOverlay::new(content)
}

// --- Defaults ---

#[test]
fn new_logo_defaults() {
    let logo = make_logo("https://cdn.example.com/mark.png");
    assert_eq!(logo.size, 20.0);
    assert_eq!(logo.position, PercentPoint::new(50.0, 50.0));
    assert_eq!(logo.rotation, 0.0);
    assert!(!logo.is_selected);
}

#[test]
fn new_logos_get_distinct_ids() {
    let a = make_logo("a.png");
    let b = make_logo("b.png");
    assert_ne!(a.id, b.id);
}

#[test]
fn new_text_defaults() {
    let text = make_text("Summer Sale");
    assert_eq!(text.text, "Summer Sale");
    assert!(text.is_visible);
    assert_eq!(text.font_size, 32.0);
    assert_eq!(text.font_family, "Arial");
    assert!(!text.is_bold);
    assert!(!text.is_italic);
    assert_eq!(text.spacing, 0.0);
    assert_eq!(text.translation, Point::new(0.0, 0.0));
    assert!(!text.is_selected);
}

#[test]
fn default_filters_are_neutral() {
    let f = Filters::default();
    assert_eq!(f.brightness, 100.0);
    assert_eq!(f.contrast, 100.0);
    assert_eq!(f.saturation, 100.0);
    assert_eq!(f.sepia, 0.0);
    assert_eq!(f.opacity, 100.0);
    assert_eq!(f.blur, 0.0);
}

#[test]
fn default_transform_is_neutral() {
    let t = ImageTransform::default();
    assert_eq!(t.offset, Point::new(0.0, 0.0));
    assert_eq!(t.scale, 1.0);
}

// --- Logo store operations ---

#[test]
fn add_and_get_logo() {
    let mut scene = Scene::new();
    let logo = make_logo("a.png");
    let id = logo.id;
    scene.add_logo(logo);
    assert_eq!(scene.logo(id).map(|l| l.url.as_str()), Some("a.png"));
}

#[test]
fn get_missing_logo_returns_none() {
    let scene = Scene::new();
    assert!(scene.logo(Uuid::new_v4()).is_none());
}

#[test]
fn update_logo_applies_present_fields_only() {
    let mut scene = Scene::new();
    let logo = make_logo("a.png");
    let id = logo.id;
    scene.add_logo(logo);

    let partial = PartialLogo { size: Some(42.0), ..PartialLogo::default() };
    assert!(scene.update_logo(id, &partial));

    let logo = scene.logo(id).expect("logo should exist");
    assert_eq!(logo.size, 42.0);
    assert_eq!(logo.position, PercentPoint::new(50.0, 50.0));
    assert_eq!(logo.url, "a.png");
}

#[test]
fn update_missing_logo_returns_false() {
    let mut scene = Scene::new();
    assert!(!scene.update_logo(Uuid::new_v4(), &PartialLogo::default()));
}

#[test]
fn update_logo_clamps_size_low() {
    let mut scene = Scene::new();
    let logo = make_logo("a.png");
    let id = logo.id;
    scene.add_logo(logo);
    scene.update_logo(id, &PartialLogo { size: Some(1.0), ..PartialLogo::default() });
    assert_eq!(scene.logo(id).map(|l| l.size), Some(5.0));
}

#[test]
fn update_logo_clamps_size_high() {
    let mut scene = Scene::new();
    let logo = make_logo("a.png");
    let id = logo.id;
    scene.add_logo(logo);
    scene.update_logo(id, &PartialLogo { size: Some(250.0), ..PartialLogo::default() });
    assert_eq!(scene.logo(id).map(|l| l.size), Some(100.0));
}

#[test]
fn update_logo_wraps_rotation() {
    let mut scene = Scene::new();
    let logo = make_logo("a.png");
    let id = logo.id;
    scene.add_logo(logo);
    scene.update_logo(id, &PartialLogo { rotation: Some(450.0), ..PartialLogo::default() });
    assert_eq!(scene.logo(id).map(|l| l.rotation), Some(90.0));
}

#[test]
fn delete_logo_returns_removed() {
    let mut scene = Scene::new();
    let logo = make_logo("a.png");
    let id = logo.id;
    scene.add_logo(logo);
    let removed = scene.delete_logo(id);
    assert_eq!(removed.map(|l| l.id), Some(id));
    assert!(scene.logo(id).is_none());
}

#[test]
fn delete_missing_logo_returns_none() {
    let mut scene = Scene::new();
    assert!(scene.delete_logo(Uuid::new_v4()).is_none());
}

// --- Selection invariants ---

#[test]
fn select_logo_clears_previous_selection() {
    let mut scene = Scene::new();
    let a = make_logo("a.png");
    let b = make_logo("b.png");
    let (id_a, id_b) = (a.id, b.id);
    scene.add_logo(a);
    scene.add_logo(b);

    scene.select_logo(Some(id_a));
    scene.select_logo(Some(id_b));

    assert_eq!(scene.selected_logo().map(|l| l.id), Some(id_b));
    assert_eq!(scene.logos.iter().filter(|l| l.is_selected).count(), 1);
}

#[test]
fn select_logo_none_clears_all() {
    let mut scene = Scene::new();
    let logo = make_logo("a.png");
    let id = logo.id;
    scene.add_logo(logo);
    scene.select_logo(Some(id));
    scene.select_logo(None);
    assert!(scene.selected_logo().is_none());
}

#[test]
fn update_logo_selection_true_is_exclusive() {
    let mut scene = Scene::new();
    let a = make_logo("a.png");
    let b = make_logo("b.png");
    let (id_a, id_b) = (a.id, b.id);
    scene.add_logo(a);
    scene.add_logo(b);
    scene.select_logo(Some(id_a));

    scene.update_logo(id_b, &PartialLogo { is_selected: Some(true), ..PartialLogo::default() });

    assert_eq!(scene.selected_logo().map(|l| l.id), Some(id_b));
    assert_eq!(scene.logos.iter().filter(|l| l.is_selected).count(), 1);
}

#[test]
fn logo_and_text_selections_are_independent() {
    let mut scene = Scene::new();
    let logo = make_logo("a.png");
    let text = make_text("hello");
    let (logo_id, text_id) = (logo.id, text.id);
    scene.add_logo(logo);
    scene.add_text(text);

    scene.select_logo(Some(logo_id));
    scene.select_text(Some(text_id));

    assert_eq!(scene.selected_logo().map(|l| l.id), Some(logo_id));
    assert_eq!(scene.selected_text().map(|t| t.id), Some(text_id));
}

// --- Text store operations ---

#[test]
fn update_text_applies_present_fields_only() {
    let mut scene = Scene::new();
    let text = make_text("hello");
    let id = text.id;
    scene.add_text(text);

    let partial = PartialText {
        color: Some("#ff0000".to_owned()),
        is_bold: Some(true),
        ..PartialText::default()
    };
    assert!(scene.update_text(id, &partial));

    let overlay = scene.text(id).expect("overlay should exist");
    assert_eq!(overlay.color, "#ff0000");
    assert!(overlay.is_bold);
    assert_eq!(overlay.text, "hello");
    assert_eq!(overlay.font_size, 32.0);
}

#[test]
fn update_text_clamps_font_size() {
    let mut scene = Scene::new();
    let text = make_text("hello");
    let id = text.id;
    scene.add_text(text);

    scene.update_text(id, &PartialText { font_size: Some(2.0), ..PartialText::default() });
    assert_eq!(scene.text(id).map(|t| t.font_size), Some(8.0));

    scene.update_text(id, &PartialText { font_size: Some(500.0), ..PartialText::default() });
    assert_eq!(scene.text(id).map(|t| t.font_size), Some(120.0));
}

#[test]
fn update_text_wraps_rotation() {
    let mut scene = Scene::new();
    let text = make_text("hello");
    let id = text.id;
    scene.add_text(text);
    scene.update_text(id, &PartialText { rotation: Some(-15.0), ..PartialText::default() });
    assert_eq!(scene.text(id).map(|t| t.rotation), Some(345.0));
}

#[test]
fn update_text_replaces_translation_whole() {
    let mut scene = Scene::new();
    let mut text = make_text("hello");
    text.translation = Point::new(5.0, 5.0);
    let id = text.id;
    scene.add_text(text);
    scene.update_text(
        id,
        &PartialText { translation: Some(Point::new(-3.0, 12.0)), ..PartialText::default() },
    );
    assert_eq!(scene.text(id).map(|t| t.translation), Some(Point::new(-3.0, 12.0)));
}

#[test]
fn delete_text_clears_it_from_store() {
    let mut scene = Scene::new();
    let text = make_text("hello");
    let id = text.id;
    scene.add_text(text);
    assert!(scene.delete_text(id).is_some());
    assert!(scene.text(id).is_none());
    assert!(scene.delete_text(id).is_none());
}

// --- Global state ---

#[test]
fn set_filters_clamps_out_of_range() {
    let mut scene = Scene::new();
    scene.set_filters(Filters {
        brightness: 300.0,
        contrast: -20.0,
        saturation: 150.0,
        sepia: 140.0,
        opacity: 120.0,
        blur: 99.0,
    });
    assert_eq!(scene.filters.brightness, 200.0);
    assert_eq!(scene.filters.contrast, 0.0);
    assert_eq!(scene.filters.saturation, 150.0);
    assert_eq!(scene.filters.sepia, 100.0);
    assert_eq!(scene.filters.opacity, 100.0);
    assert_eq!(scene.filters.blur, 20.0);
}

#[test]
fn css_filter_string_shape() {
    let f = Filters::default();
    assert_eq!(
        f.css_filter(),
        "brightness(100%) contrast(100%) saturate(100%) sepia(0%) blur(0px)"
    );
}

#[test]
fn set_image_transform_clamps_scale() {
    let mut scene = Scene::new();
    scene.set_image_transform(ImageTransform { offset: Point::new(10.0, -5.0), scale: 9.0 });
    assert_eq!(scene.image_transform.scale, 3.0);
    assert_eq!(scene.image_transform.offset, Point::new(10.0, -5.0));

    scene.set_image_transform(ImageTransform { offset: Point::new(0.0, 0.0), scale: 0.01 });
    assert_eq!(scene.image_transform.scale, 0.1);
}

#[test]
fn load_replaces_scene_and_clears_selection() {
    let mut scene = Scene::new();
    scene.add_logo(make_logo("old.png"));

    let mut snapshot = Scene::new();
    snapshot.background = Some("https://cdn.example.com/base.jpg".to_owned());
    let mut incoming = make_logo("new.png");
    incoming.is_selected = true;
    snapshot.add_logo(incoming);
    let mut incoming_text = make_text("hi");
    incoming_text.is_selected = true;
    snapshot.add_text(incoming_text);

    scene.load(snapshot);

    assert_eq!(scene.logos.len(), 1);
    assert_eq!(scene.logos[0].url, "new.png");
    assert!(scene.selected_logo().is_none());
    assert!(scene.selected_text().is_none());
}

#[test]
fn bitmap_urls_cover_background_and_logos() {
    let mut scene = Scene::new();
    scene.set_background(Some("base.jpg".to_owned()));
    scene.add_logo(make_logo("a.png"));
    scene.add_logo(make_logo("b.png"));
    assert_eq!(scene.bitmap_urls(), vec!["base.jpg", "a.png", "b.png"]);
}

#[test]
fn bitmap_urls_skip_missing_background() {
    let mut scene = Scene::new();
    scene.add_logo(make_logo("a.png"));
    assert_eq!(scene.bitmap_urls(), vec!["a.png"]);
}

// --- Serialization ---

#[test]
fn partial_logo_serializes_sparse() {
    let partial = PartialLogo { size: Some(30.0), ..PartialLogo::default() };
    let json = serde_json::to_string(&partial).expect("serialize");
    assert_eq!(json, r#"{"size":30.0}"#);
}

#[test]
fn partial_text_serializes_sparse() {
    let partial = PartialText { is_visible: Some(false), ..PartialText::default() };
    let json = serde_json::to_string(&partial).expect("serialize");
    assert_eq!(json, r#"{"is_visible":false}"#);
}

#[test]
fn logo_deserializes_without_selection_flag() {
    let json = format!(
        r#"{{"id":"{}","url":"a.png","size":20.0,"position":{{"x":50.0,"y":50.0}},"rotation":0.0}}"#,
        Uuid::new_v4()
    );
    let logo: Logo = serde_json::from_str(&json).expect("deserialize");
    assert!(!logo.is_selected);
}

#[test]
fn scene_round_trips_through_json() {
    let mut scene = Scene::new();
    scene.set_background(Some("base.jpg".to_owned()));
    scene.add_logo(make_logo("a.png"));
    scene.add_text(make_text("hello"));
    scene.set_filters(Filters { sepia: 40.0, ..Filters::default() });

    let json = serde_json::to_string(&scene).expect("serialize");
    let back: Scene = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(back.background.as_deref(), Some("base.jpg"));
    assert_eq!(back.logos.len(), 1);
    assert_eq!(back.texts.len(), 1);
    assert_eq!(back.filters.sepia, 40.0);
}
