//! Canvas compositing and direct-manipulation engine for the brand-kit
//! editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! full lifecycle of the design canvas: compositing the base image, logo
//! overlays, and text overlays, hit-testing pointer input against them, and
//! turning drags and keyboard shortcuts into scene mutations. The host UI
//! layer is responsible only for wiring DOM events to the engine and
//! persisting the resulting [`engine::Action`]s to its own store.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`scene`] | Scene model: logos, text overlays, filters, transform |
//! | [`geometry`] | Points, rects, percent coordinates, rotation math |
//! | [`layout`] | Derived bounding rectangles and text measurement |
//! | [`hit`] | Hit-testing against scene entities and their handles |
//! | [`input`] | Pointer/keyboard primitives shared by the controllers |
//! | [`image_control`] | Main-image drag/scale state machine (edit mode) |
//! | [`logo_control`] | Logo select/drag/resize/hover state machine |
//! | [`text_control`] | Text select/drag/resize state machine |
//! | [`render`] | Scene rendering onto the 2d context |
//! | [`bitmaps`] | Bitmap loading and caching for image URLs |
//! | [`fonts`] | Font readiness detection |
//! | [`consts`] | Shared numeric constants (size limits, hit zones, etc.) |

pub mod bitmaps;
pub mod consts;
pub mod engine;
pub mod fonts;
pub mod geometry;
pub mod hit;
pub mod image_control;
pub mod input;
pub mod layout;
pub mod logo_control;
pub mod render;
pub mod scene;
pub mod text_control;

/// Install the panic hook and console logger. Call once at host startup;
/// repeat calls keep the first logger.
pub fn init_diagnostics() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::debug!("console logging initialized");
    }
}
