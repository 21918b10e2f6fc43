//! Async bitmap slots for the base image and logo artwork.
//!
//! Loads are fire-and-forget: [`BitmapCache::begin_load`] kicks off a
//! decode and the result lands on the shared [`LoadQueue`], which the
//! engine drains on its frame tick. A slot whose URL has left the scene
//! is evicted on the next reconciliation, so a stale in-flight outcome is
//! simply ignored. Failed slots stay in the cache (they are not retried
//! automatically) until the host asks for a retry or the URL goes away.

#[cfg(test)]
#[path = "bitmaps_test.rs"]
mod bitmaps_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

use crate::layout::NaturalSize;

/// A finished load, pushed from the load future for the engine to drain.
#[derive(Debug)]
pub enum LoadOutcome {
    /// A bitmap load settled; `natural` is `None` when it failed.
    Bitmap { url: String, natural: Option<NaturalSize> },
    /// The document's fonts finished loading.
    FontsReady,
}

/// Shared queue between the load futures and the engine's frame tick.
pub type LoadQueue = Rc<RefCell<Vec<LoadOutcome>>>;

#[derive(Debug)]
enum Slot {
    /// Decode in flight; the element is already wired to its source.
    Loading(HtmlImageElement),
    /// Decoded and safe to draw.
    Ready(HtmlImageElement),
    /// Load failed; held so the slot is not re-requested every tick.
    Failed,
}

/// One slot per referenced URL, keyed by the URL as stored in the scene
/// (cache-busting applies only to the fetch, never to the key).
#[derive(Debug, Default)]
pub struct BitmapCache {
    slots: HashMap<String, Slot>,
}

impl BitmapCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any slot exists for the URL, in any state.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.slots.contains_key(url)
    }

    /// The decoded image for a URL, if its load has completed.
    #[must_use]
    pub fn ready(&self, url: &str) -> Option<&HtmlImageElement> {
        match self.slots.get(url) {
            Some(Slot::Ready(element)) => Some(element),
            _ => None,
        }
    }

    /// Whether the URL's load ended in failure.
    #[must_use]
    pub fn is_failed(&self, url: &str) -> bool {
        matches!(self.slots.get(url), Some(Slot::Failed))
    }

    /// Start a load for the URL and park a `Loading` slot for it. The
    /// outcome is pushed onto `queue` when the decode settles.
    pub fn begin_load(&mut self, url: &str, queue: &LoadQueue, now_ms: f64) {
        let Ok(element) = HtmlImageElement::new() else {
            log::warn!("image element creation failed for {url}");
            self.slots.insert(url.to_owned(), Slot::Failed);
            return;
        };
        // crossOrigin must be set before src or the fetch is not a CORS
        // request and the canvas would be tainted for export.
        element.set_cross_origin(Some("anonymous"));
        element.set_src(&cache_busted_url(url, now_ms));
        self.slots.insert(url.to_owned(), Slot::Loading(element.clone()));
        let queue = Rc::clone(queue);
        let url = url.to_owned();
        wasm_bindgen_futures::spawn_local(async move {
            let natural = decoded_natural(&element).await;
            queue.borrow_mut().push(LoadOutcome::Bitmap { url, natural });
        });
    }

    /// Promote a loading slot to ready. Outcomes for evicted or failed
    /// slots are stale and ignored.
    pub fn complete(&mut self, url: &str) {
        if let Some(slot) = self.slots.get_mut(url) {
            if let Slot::Loading(element) = slot {
                *slot = Slot::Ready(element.clone());
            }
        }
    }

    /// Record a failed load. Always writes the slot so the host can offer
    /// a retry even when the failure raced an eviction.
    pub fn fail(&mut self, url: &str) {
        self.slots.insert(url.to_owned(), Slot::Failed);
    }

    /// Clear a failed slot so the next reconciliation starts a fresh
    /// load. Returns false when the slot is missing or not failed.
    pub fn retry(&mut self, url: &str) -> bool {
        if self.is_failed(url) {
            self.slots.remove(url);
            true
        } else {
            false
        }
    }

    /// Drop every slot whose URL is no longer referenced by the scene.
    pub fn retain_urls(&mut self, live: &[&str]) {
        self.slots.retain(|url, _| live.contains(&url.as_str()));
    }
}

async fn decoded_natural(element: &HtmlImageElement) -> Option<NaturalSize> {
    match JsFuture::from(element.decode()).await {
        Ok(_) => Some(NaturalSize::new(
            f64::from(element.natural_width()),
            f64::from(element.natural_height()),
        )),
        Err(_) => None,
    }
}

/// Append a timestamp query parameter to Cloudinary-hosted URLs so a
/// refreshed asset is never served from a stale CDN cache. Other hosts
/// pass through untouched.
#[must_use]
pub fn cache_busted_url(url: &str, now_ms: f64) -> String {
    if !url.contains("cloudinary.com") {
        return url.to_owned();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}cb={}", now_ms as u64)
}
