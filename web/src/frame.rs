//! `requestAnimationFrame` refresh source

use std::cell::RefCell;
use std::rc::Rc;

use cartpump_core::RefreshSource;
use tracing::error;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::describe_js;

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Re-arms one JS callback through `requestAnimationFrame`.
///
/// The callback is installed after construction because it usually needs a
/// handle to whatever owns this source. Dropping the source cancels a pending
/// request.
pub struct AnimationFrame {
    window: Window,
    callback: Rc<RefCell<Option<FrameCallback>>>,
    pending: Option<i32>,
}

impl AnimationFrame {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            callback: Rc::new(RefCell::new(None)),
            pending: None,
        }
    }

    /// Set the function called with the refresh timestamp (ms)
    pub fn set_callback(&mut self, callback: impl FnMut(f64) + 'static) {
        let callback: FrameCallback = Closure::new(callback);
        *self.callback.borrow_mut() = Some(callback);
    }

    /// Forget the outstanding request id once its callback has fired
    pub fn fired(&mut self) {
        self.pending = None;
    }
}

impl RefreshSource for AnimationFrame {
    fn request_refresh(&mut self) {
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => self.pending = Some(id),
            Err(e) => error!("requestAnimationFrame failed: {}", describe_js(&e)),
        }
    }
}

impl Drop for AnimationFrame {
    fn drop(&mut self) {
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}
