//! Cartpump Web - browser bindings for the harness
//!
//! Wires a [`cartpump_core::Session`] to browser APIs:
//!
//! - [`JsEngine`] - the engine is a JS object handed over by the page
//! - [`WebAudioDevice`] - one `AudioBufferSourceNode` per flushed unit
//! - [`CanvasPresenter`] - blits the pixel buffer into a 2D canvas
//! - [`AnimationFrame`] - `requestAnimationFrame` as the refresh source
//! - [`WebHarness`] - the class exported to JS
//!
//! Everything here only builds for `wasm32`; the harness logic itself lives
//! in `cartpump-core` and is tested natively.
#![forbid(unsafe_code)]

#[cfg(target_arch = "wasm32")]
mod audio;
#[cfg(target_arch = "wasm32")]
mod canvas;
#[cfg(target_arch = "wasm32")]
mod engine;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod harness;
#[cfg(target_arch = "wasm32")]
pub mod logging;

#[cfg(target_arch = "wasm32")]
pub use audio::WebAudioDevice;
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPresenter;
#[cfg(target_arch = "wasm32")]
pub use engine::{EngineHandle, JsEngine};
#[cfg(target_arch = "wasm32")]
pub use frame::AnimationFrame;
#[cfg(target_arch = "wasm32")]
pub use harness::WebHarness;

/// Best-effort text for a thrown JS value
#[cfg(target_arch = "wasm32")]
pub(crate) fn describe_js(value: &wasm_bindgen::JsValue) -> String {
    use wasm_bindgen::JsCast;

    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{value:?}")
}
