//! Shared numeric constants for the engine.

// ── Logo sizing ─────────────────────────────────────────────────

/// Smallest logo width, as a percent of canvas width.
pub const LOGO_SIZE_MIN_PCT: f64 = 5.0;

/// Largest logo width, as a percent of canvas width.
pub const LOGO_SIZE_MAX_PCT: f64 = 100.0;

/// Width newly placed logos start at, as a percent of canvas width.
pub const LOGO_DEFAULT_SIZE_PCT: f64 = 20.0;

// ── Text sizing ─────────────────────────────────────────────────

/// Smallest text font size in CSS pixels.
pub const TEXT_FONT_MIN_PX: f64 = 8.0;

/// Font size ceiling reachable by drag-resizing.
pub const TEXT_FONT_DRAG_MAX_PX: f64 = 120.0;

/// Font size ceiling reachable by keyboard `+`.
pub const TEXT_FONT_KEY_MAX_PX: f64 = 72.0;

/// Font size newly placed text overlays start at.
pub const TEXT_DEFAULT_FONT_PX: f64 = 32.0;

/// Line height as a multiple of font size.
pub const TEXT_LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Bounding-box padding on each side, as a multiple of font size.
pub const TEXT_PADDING_FACTOR: f64 = 0.5;

/// Pixels of resize drag that scale the font by one whole factor step.
pub const TEXT_RESIZE_SENSITIVITY_PX: f64 = 100.0;

// ── Main image ──────────────────────────────────────────────────

/// Smallest user scale for the base image in edit mode.
pub const IMAGE_SCALE_MIN: f64 = 0.1;

/// Largest user scale for the base image in edit mode.
pub const IMAGE_SCALE_MAX: f64 = 3.0;

/// Aspect ratio assumed before any base image has loaded.
pub const DEFAULT_ASPECT: &str = "16:9";

// ── Hit-testing ─────────────────────────────────────────────────

/// Radius of the circular delete affordance, in screen pixels.
pub const DELETE_RADIUS_PX: f64 = 10.0;

/// Half-extent of the square resize handles (8×8 px squares).
pub const HANDLE_HALF_PX: f64 = 4.0;

/// Per-axis grab slop around a corner, in screen pixels.
pub const CORNER_GRAB_PX: f64 = 12.0;

/// Total thickness of the resize band straddling each text edge.
pub const TEXT_EDGE_BAND_PX: f64 = 24.0;

/// Side length of the square resize zones centered on text corners.
pub const TEXT_CORNER_ZONE_PX: f64 = 16.0;

// ── Keyboard ────────────────────────────────────────────────────

/// Step shared by arrow nudges and `+`/`-` resizes: percent for positions
/// and logo sizes, CSS pixels for font sizes.
pub const KEY_STEP: f64 = 1.0;

/// Keyboard step with Shift held.
pub const KEY_STEP_FAST: f64 = 10.0;

/// Rotation applied per Ctrl/Cmd+R press on a logo, in degrees.
pub const LOGO_ROTATE_STEP_DEG: f64 = 90.0;

/// Rotation applied per Ctrl/Cmd+R press on a text overlay, in degrees.
pub const TEXT_ROTATE_STEP_DEG: f64 = 15.0;

// ── Rendering ───────────────────────────────────────────────────

/// Minimum interval between throttled repaints, in milliseconds.
pub const RENDER_THROTTLE_MS: f64 = 33.0;

/// How long to wait for `document.fonts.ready` before painting anyway.
pub const FONT_READY_TIMEOUT_MS: u32 = 3000;
