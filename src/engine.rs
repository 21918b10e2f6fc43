//! The compositing engine: input dispatch, paint scheduling, and the
//! browser-facing facade.
//!
//! `EngineCore` holds every piece of state that does not depend on the
//! canvas element, so the full interaction model runs in plain unit tests.
//! `Engine` wraps it with the 2d context, the bitmap cache, and the async
//! load queue, and is the only type the host needs to talk to.

use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::bitmaps::{BitmapCache, LoadOutcome, LoadQueue};
use crate::consts::{DEFAULT_ASPECT, RENDER_THROTTLE_MS};
use crate::fonts;
use crate::geometry::{AspectError, CanvasSize, ImageBounds, Point, parse_aspect, reduced_aspect};
use crate::image_control::ImageControl;
use crate::input::{Button, Key, Modifiers, UiState};
use crate::layout::{NaturalSize, TextMeasurer};
use crate::logo_control::LogoControl;
use crate::render::{self, CtxMeasurer};
use crate::scene::{
    EntityId, Filters, ImageTransform, Logo, PartialLogo, PartialText, Scene, TextOverlay,
};
use crate::text_control::TextControl;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from engine entry points for the host to process.
///
/// Entity actions report state the host may want to persist; `SetCursor`
/// and `SetStatus` are UI hints; `RenderNeeded` appears only when the
/// paint scheduler has admitted a repaint for this batch.
#[derive(Debug, Clone)]
pub enum Action {
    LogoSelected { id: Option<EntityId> },
    LogoUpdated { id: EntityId, fields: PartialLogo },
    LogoDeleted { id: EntityId },
    TextSelected { id: Option<EntityId> },
    TextUpdated { id: EntityId, fields: PartialText },
    TextDeleted { id: EntityId },
    ImageTransformChanged { transform: ImageTransform },
    SetCursor(String),
    SetStatus(String),
    RenderNeeded { urgent: bool },
}

/// Paint scheduler: continuous updates coalesce to one paint per window,
/// urgent updates always pass. Timestamps are injected so the policy is
/// testable without a clock.
#[derive(Debug)]
struct RenderThrottle {
    last_paint_ms: f64,
    pending: bool,
}

impl RenderThrottle {
    fn new() -> Self {
        Self { last_paint_ms: f64::NEG_INFINITY, pending: false }
    }

    /// Ask to paint now. Urgent requests always pass and reset the window;
    /// non-urgent requests pass only when the window has elapsed, otherwise
    /// they are remembered as a trailing paint.
    fn request(&mut self, now_ms: f64, urgent: bool) -> bool {
        if urgent || now_ms - self.last_paint_ms >= RENDER_THROTTLE_MS {
            self.last_paint_ms = now_ms;
            self.pending = false;
            true
        } else {
            self.pending = true;
            false
        }
    }

    /// Claim the trailing paint owed from swallowed requests, once the
    /// window has reopened.
    fn take_pending(&mut self, now_ms: f64) -> bool {
        if self.pending && now_ms - self.last_paint_ms >= RENDER_THROTTLE_MS {
            self.last_paint_ms = now_ms;
            self.pending = false;
            true
        } else {
            false
        }
    }
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser
/// dependencies. Text measurement is the one browser service the core
/// needs, so entry points that measure take a [`TextMeasurer`].
pub struct EngineCore {
    pub scene: Scene,
    pub ui: UiState,
    image: ImageControl,
    logos: LogoControl,
    texts: TextControl,
    throttle: RenderThrottle,
    bounds: ImageBounds,
    viewport_width: f64,
    dpr: f64,
    canvas: CanvasSize,
    naturals: HashMap<String, NaturalSize>,
    design_aspect: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            scene: Scene::new(),
            ui: UiState::default(),
            image: ImageControl::new(),
            logos: LogoControl::new(),
            texts: TextControl::new(),
            throttle: RenderThrottle::new(),
            bounds: ImageBounds::default(),
            viewport_width: 0.0,
            dpr: 1.0,
            canvas: CanvasSize::new(0.0, 0.0),
            naturals: HashMap::new(),
            design_aspect: parse_aspect(DEFAULT_ASPECT).unwrap_or(16.0 / 9.0),
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Viewport & configuration ---

    /// Adopt a new container width and device pixel ratio. The backing
    /// height always follows the active aspect ratio.
    pub fn set_viewport(&mut self, container_width: f64, dpr: f64) {
        self.viewport_width = container_width.max(0.0);
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
        self.refresh_canvas();
    }

    /// Change the design aspect ratio used while no base image is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`AspectError`] when the string is not a positive `W:H` pair.
    pub fn set_design_aspect(&mut self, aspect: &str) -> Result<(), AspectError> {
        self.design_aspect = parse_aspect(aspect)?;
        self.refresh_canvas();
        Ok(())
    }

    /// The base image's natural ratio wins once known; the design ratio
    /// covers the gap before load and scenes with no base image.
    fn refresh_canvas(&mut self) {
        let aspect = self
            .background_natural()
            .filter(|n| n.width > 0.0 && n.height > 0.0)
            .map_or(self.design_aspect, |n| n.width / n.height);
        self.canvas = CanvasSize::new(self.viewport_width, self.viewport_width / aspect);
    }

    fn background_natural(&self) -> Option<NaturalSize> {
        let url = self.scene.background.as_deref()?;
        self.naturals.get(url).copied()
    }

    /// Record a loaded bitmap's natural dimensions. A background arrival
    /// re-derives the canvas size.
    pub fn record_natural(&mut self, url: &str, natural: NaturalSize) {
        self.naturals.insert(url.to_owned(), natural);
        if self.scene.background.as_deref() == Some(url) {
            self.refresh_canvas();
        }
    }

    // --- Data inputs ---

    /// Hydrate the scene from a saved snapshot, dropping any gesture or
    /// hover state that referred to the old scene.
    pub fn load_scene(&mut self, snapshot: Scene) {
        self.scene.load(snapshot);
        self.image.cancel();
        self.logos = LogoControl::new();
        self.texts = TextControl::new();
        self.refresh_canvas();
    }

    pub fn add_logo(&mut self, logo: Logo) {
        self.scene.add_logo(logo);
    }

    pub fn apply_logo_update(&mut self, id: EntityId, fields: &PartialLogo) {
        self.scene.update_logo(id, fields);
    }

    pub fn apply_logo_delete(&mut self, id: EntityId) {
        if self.scene.delete_logo(id).is_none() {
            log::debug!("delete for unknown logo {id}");
        }
    }

    pub fn add_text(&mut self, overlay: TextOverlay) {
        self.scene.add_text(overlay);
    }

    pub fn apply_text_update(&mut self, id: EntityId, fields: &PartialText) {
        self.scene.update_text(id, fields);
    }

    pub fn apply_text_delete(&mut self, id: EntityId) {
        if self.scene.delete_text(id).is_none() {
            log::debug!("delete for unknown text {id}");
        }
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.scene.set_filters(filters);
    }

    pub fn set_background(&mut self, url: Option<String>) {
        self.scene.set_background(url);
        self.refresh_canvas();
    }

    /// Toggle base-image edit mode. Leaving edit mode abandons any image
    /// gesture in progress.
    pub fn set_edit_mode(&mut self, on: bool) {
        self.ui.edit_mode = on;
        if !on {
            self.image.cancel();
        }
    }

    /// Snap the base image back to offset (0,0), scale 1.
    pub fn reset_image_transform(&mut self, now_ms: f64) -> Vec<Action> {
        let actions = ImageControl::reset(&mut self.scene);
        self.gate(actions, now_ms)
    }

    // --- Input events ---

    /// Dispatch a pointer-down to the controllers in claim priority order:
    /// base image (edit mode only), then text, then logos.
    pub fn on_pointer_down(
        &mut self,
        point: Point,
        button: Button,
        measurer: &dyn TextMeasurer,
        now_ms: f64,
    ) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        if self.ui.edit_mode {
            if let Some(natural) = self.background_natural() {
                if self.image.on_pointer_down(point, self.canvas, natural, self.scene.image_transform) {
                    return Vec::new();
                }
            }
        }
        let (claimed, mut actions) =
            self.texts.on_pointer_down(point, &mut self.scene, self.canvas, measurer);
        if claimed {
            return self.gate(actions, now_ms);
        }
        let (_, logo_actions) =
            self.logos.on_pointer_down(point, &mut self.scene, self.canvas, &self.naturals);
        actions.extend(logo_actions);
        self.gate(actions, now_ms)
    }

    /// Advance the active gesture, or update hover feedback when idle.
    pub fn on_pointer_move(
        &mut self,
        point: Point,
        measurer: &dyn TextMeasurer,
        now_ms: f64,
    ) -> Vec<Action> {
        if self.image.is_active() {
            let actions = self.image.on_pointer_move(point, self.canvas, &mut self.scene);
            return self.gate(actions, now_ms);
        }
        if self.texts.is_active() {
            let actions = self.texts.on_pointer_move(
                point,
                &mut self.scene,
                self.canvas,
                measurer,
                self.bounds,
            );
            return self.gate(actions, now_ms);
        }
        if self.logos.is_active() {
            let actions = self.logos.on_pointer_move(
                point,
                &mut self.scene,
                self.canvas,
                &self.naturals,
                self.bounds,
            );
            return self.gate(actions, now_ms);
        }
        let (cursor, changed) = self.logos.on_hover(point, &self.scene, self.canvas, &self.naturals);
        if !changed {
            return Vec::new();
        }
        self.ui.cursor = cursor.to_owned();
        let actions = vec![
            Action::SetCursor(cursor.to_owned()),
            Action::RenderNeeded { urgent: true },
        ];
        self.gate(actions, now_ms)
    }

    /// End every active gesture.
    pub fn on_pointer_up(&mut self, now_ms: f64) -> Vec<Action> {
        let mut actions = self.image.on_pointer_up();
        actions.extend(self.texts.on_pointer_up());
        actions.extend(self.logos.on_pointer_up());
        self.gate(actions, now_ms)
    }

    /// Dispatch a key-down: the selected text overlay gets first claim,
    /// then the selected logo.
    pub fn on_key_down(
        &mut self,
        key: &Key,
        modifiers: Modifiers,
        measurer: &dyn TextMeasurer,
        now_ms: f64,
    ) -> Vec<Action> {
        let (claimed, actions) = self.texts.on_key_down(
            key,
            modifiers,
            &mut self.scene,
            self.canvas,
            measurer,
            self.bounds,
        );
        if claimed {
            return self.gate(actions, now_ms);
        }
        let (_, actions) = self.logos.on_key_down(
            key,
            modifiers,
            &mut self.scene,
            self.canvas,
            &self.naturals,
            self.bounds,
        );
        self.gate(actions, now_ms)
    }

    // --- Paint scheduling ---

    /// Collapse a batch's repaint requests through the throttle: state
    /// actions pass through untouched, and at most one `RenderNeeded`
    /// survives, only when the scheduler admits a paint now.
    fn gate(&mut self, actions: Vec<Action>, now_ms: f64) -> Vec<Action> {
        let mut wanted = false;
        let mut urgent = false;
        let mut out = Vec::with_capacity(actions.len());
        for action in actions {
            if let Action::RenderNeeded { urgent: u } = action {
                wanted = true;
                urgent |= u;
            } else {
                out.push(action);
            }
        }
        if wanted && self.throttle.request(now_ms, urgent) {
            out.push(Action::RenderNeeded { urgent });
        }
        out
    }

    /// Ask the scheduler for an immediate paint outside the event flow.
    pub fn request_paint(&mut self, now_ms: f64, urgent: bool) -> bool {
        self.throttle.request(now_ms, urgent)
    }

    /// Claim the trailing paint owed from a swallowed continuous update.
    pub fn take_trailing_paint(&mut self, now_ms: f64) -> bool {
        self.throttle.take_pending(now_ms)
    }

    // --- Queries ---

    /// Backing canvas size in CSS pixels.
    #[must_use]
    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas
    }

    /// Device pixel ratio the backing store is scaled by.
    #[must_use]
    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    /// Natural sizes for every bitmap that has finished loading.
    #[must_use]
    pub fn naturals(&self) -> &HashMap<String, NaturalSize> {
        &self.naturals
    }

    /// Reduced ratio label of the loaded base image, such as `16:9`, for
    /// the host to display. `None` until the bitmap lands.
    #[must_use]
    pub fn background_aspect(&self) -> Option<String> {
        self.background_natural()
            .filter(|n| n.width > 0.0 && n.height > 0.0)
            .map(|n| reduced_aspect(n.width as u32, n.height as u32))
    }

    /// The logo under the cursor, selected or not.
    #[must_use]
    pub fn hovered_logo(&self) -> Option<EntityId> {
        self.logos.hovered()
    }

    /// The currently selected logo, if any.
    #[must_use]
    pub fn selected_logo(&self) -> Option<EntityId> {
        self.scene.selected_logo().map(|l| l.id)
    }

    /// The currently selected text overlay, if any.
    #[must_use]
    pub fn selected_text(&self) -> Option<EntityId> {
        self.scene.selected_text().map(|t| t.id)
    }
}

/// The full engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
    bitmaps: BitmapCache,
    loads: LoadQueue,
}

impl Engine {
    /// Create a new engine bound to the given canvas element and start
    /// watching for font readiness.
    ///
    /// # Errors
    ///
    /// Fails when the element cannot produce a 2d rendering context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas 2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let engine = Self {
            canvas,
            ctx,
            core: EngineCore::new(),
            bitmaps: BitmapCache::new(),
            loads: LoadQueue::default(),
        };
        engine.watch_fonts();
        Ok(engine)
    }

    /// Re-render once the document's fonts settle, so text measured against
    /// a fallback font is corrected.
    fn watch_fonts(&self) {
        let queue = Rc::clone(&self.loads);
        wasm_bindgen_futures::spawn_local(async move {
            fonts::fonts_ready().await;
            queue.borrow_mut().push(LoadOutcome::FontsReady);
        });
    }

    // --- Delegated data inputs ---

    pub fn load_scene(&mut self, snapshot: Scene) {
        self.core.load_scene(snapshot);
        let now = now_ms();
        self.ensure_bitmaps(now);
        self.sync_surface();
        self.paint_now();
    }

    pub fn add_logo(&mut self, logo: Logo) {
        self.core.add_logo(logo);
        let now = now_ms();
        self.ensure_bitmaps(now);
        self.paint_now();
    }

    pub fn apply_logo_update(&mut self, id: EntityId, fields: &PartialLogo) {
        self.core.apply_logo_update(id, fields);
        if fields.url.is_some() {
            let now = now_ms();
            self.ensure_bitmaps(now);
        }
        self.paint_throttled();
    }

    pub fn apply_logo_delete(&mut self, id: EntityId) {
        self.core.apply_logo_delete(id);
        self.paint_now();
    }

    pub fn add_text(&mut self, overlay: TextOverlay) {
        self.core.add_text(overlay);
        self.paint_now();
    }

    pub fn apply_text_update(&mut self, id: EntityId, fields: &PartialText) {
        self.core.apply_text_update(id, fields);
        self.paint_throttled();
    }

    pub fn apply_text_delete(&mut self, id: EntityId) {
        self.core.apply_text_delete(id);
        self.paint_now();
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.core.set_filters(filters);
        self.paint_throttled();
    }

    pub fn set_background(&mut self, url: Option<String>) {
        self.core.set_background(url);
        let now = now_ms();
        self.ensure_bitmaps(now);
        self.sync_surface();
        self.paint_now();
    }

    pub fn set_edit_mode(&mut self, on: bool) {
        self.core.set_edit_mode(on);
        self.paint_now();
    }

    pub fn reset_image_transform(&mut self) -> Vec<Action> {
        let now = now_ms();
        let actions = self.core.reset_image_transform(now);
        self.finish(&actions);
        actions
    }

    /// Change the design aspect ratio used while no base image is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`AspectError`] when the string is not a positive `W:H` pair.
    pub fn set_design_aspect(&mut self, aspect: &str) -> Result<(), AspectError> {
        self.core.set_design_aspect(aspect)?;
        self.sync_surface();
        self.paint_now();
        Ok(())
    }

    // --- Viewport ---

    /// Adopt the container's CSS width and device pixel ratio, resizing
    /// the backing store to match.
    pub fn set_viewport(&mut self, container_width: f64, dpr: f64) {
        self.core.set_viewport(container_width, dpr);
        self.sync_surface();
        self.paint_now();
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, point: Point, button: Button) -> Vec<Action> {
        let now = now_ms();
        let measurer = CtxMeasurer::new(&self.ctx);
        let actions = self.core.on_pointer_down(point, button, &measurer, now);
        self.finish(&actions);
        actions
    }

    pub fn on_pointer_move(&mut self, point: Point) -> Vec<Action> {
        let now = now_ms();
        let measurer = CtxMeasurer::new(&self.ctx);
        let actions = self.core.on_pointer_move(point, &measurer, now);
        self.finish(&actions);
        actions
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        let now = now_ms();
        let actions = self.core.on_pointer_up(now);
        self.finish(&actions);
        actions
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let now = now_ms();
        let measurer = CtxMeasurer::new(&self.ctx);
        let actions = self.core.on_key_down(key, modifiers, &measurer, now);
        self.finish(&actions);
        actions
    }

    // --- Frame tick ---

    /// Per-animation-frame housekeeping: drain finished loads, reconcile
    /// the bitmap cache against the live URL set, and perform any owed
    /// trailing paint.
    pub fn tick(&mut self) {
        let now = now_ms();
        let outcomes: Vec<LoadOutcome> = self.loads.borrow_mut().drain(..).collect();
        let mut landed = false;
        for outcome in outcomes {
            match outcome {
                LoadOutcome::Bitmap { url, natural: Some(natural) } => {
                    self.bitmaps.complete(&url);
                    self.core.record_natural(&url, natural);
                    landed = true;
                }
                LoadOutcome::Bitmap { url, natural: None } => {
                    log::warn!("bitmap load failed: {url}");
                    self.bitmaps.fail(&url);
                }
                LoadOutcome::FontsReady => landed = true,
            }
        }
        self.ensure_bitmaps(now);
        self.bitmaps.retain_urls(&self.core.scene.bitmap_urls());
        if landed {
            self.sync_surface();
            self.paint_now();
        } else if self.core.take_trailing_paint(now) {
            self.paint_logged();
        }
    }

    // --- Bitmap lifecycle ---

    /// Start loads for any scene URL that has no cache slot yet.
    fn ensure_bitmaps(&mut self, now_ms: f64) {
        for url in self.core.scene.bitmap_urls() {
            if !self.bitmaps.contains(url) {
                self.bitmaps.begin_load(url, &self.loads, now_ms);
            }
        }
    }

    /// Whether a bitmap load ended in failure, for retry affordances.
    #[must_use]
    pub fn bitmap_failed(&self, url: &str) -> bool {
        self.bitmaps.is_failed(url)
    }

    /// Clear a failed slot and start a fresh load for it.
    pub fn retry_bitmap(&mut self, url: &str) {
        if self.bitmaps.retry(url) {
            let now = now_ms();
            self.ensure_bitmaps(now);
        }
    }

    // --- Render ---

    /// Unthrottled paint. The export path calls this to guarantee the
    /// surface reflects the latest committed state before capture.
    pub fn render_now(&mut self) {
        self.paint_now();
    }

    /// The drawing surface, for collaborators that capture it.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn paint_now(&mut self) {
        let now = now_ms();
        self.core.request_paint(now, true);
        self.paint_logged();
    }

    fn paint_throttled(&mut self) {
        let now = now_ms();
        if self.core.request_paint(now, false) {
            self.paint_logged();
        }
    }

    fn paint_logged(&self) {
        if let Err(err) = render::draw(&self.ctx, &self.core, &self.bitmaps) {
            log::warn!("canvas paint failed: {err:?}");
        }
    }

    fn finish(&mut self, actions: &[Action]) {
        if actions.iter().any(|a| matches!(a, Action::RenderNeeded { .. })) {
            self.paint_logged();
        }
    }

    /// Grow the backing store to the core's CSS size times the pixel ratio.
    fn sync_surface(&self) {
        let size = self.core.canvas_size();
        let dpr = self.core.dpr();
        self.canvas.set_width((size.width * dpr).max(0.0) as u32);
        self.canvas.set_height((size.height * dpr).max(0.0) as u32);
    }
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or(0.0, |p| p.now())
}
