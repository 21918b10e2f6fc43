//! Font readiness for the first correct text paint.
//!
//! Text measured before the document's fonts finish loading uses a
//! fallback font's metrics; once loading settles, a re-render corrects
//! the layout. The wait is capped so a hung font download can never hold
//! that repaint hostage.

use futures::future::{Either, select};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::JsFuture;

use crate::consts::FONT_READY_TIMEOUT_MS;

/// Resolve once `document.fonts` settles, or after the timeout.
pub async fn fonts_ready() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let promise = match document.fonts().ready() {
        Ok(promise) => promise,
        Err(err) => {
            log::debug!("font readiness unavailable: {err:?}");
            return;
        }
    };
    let settled = JsFuture::from(promise);
    let cap = TimeoutFuture::new(FONT_READY_TIMEOUT_MS);
    match select(Box::pin(settled), Box::pin(cap)).await {
        Either::Left((Ok(_), _)) => {}
        Either::Left((Err(err), _)) => log::debug!("font readiness rejected: {err:?}"),
        Either::Right(((), _)) => {
            log::debug!("font readiness timed out after {FONT_READY_TIMEOUT_MS}ms");
        }
    }
}
