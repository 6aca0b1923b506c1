//! Engine bridge to a JS object

use cartpump_core::{ButtonMask, Engine, HarnessError, PixelBuffer, SampleBlock};
use js_sys::{Float32Array, Function, Reflect, Uint32Array, Uint8Array};
use tracing::{error, warn};
use wasm_bindgen::prelude::*;

use crate::describe_js;

#[wasm_bindgen]
extern "C" {
    /// Engine object returned by the page's factory.
    ///
    /// Required methods: `step(elapsed)`, `updateButtons(mask)`,
    /// `swapCart(bytes)`. An optional `frame()` returns the current frame as a
    /// `Uint32Array` of packed ARGB pixels.
    pub type EngineHandle;

    #[wasm_bindgen(method, catch)]
    fn step(this: &EngineHandle, elapsed: f64) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = updateButtons)]
    fn update_buttons(this: &EngineHandle, mask: u8) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = swapCart)]
    fn swap_cart(this: &EngineHandle, bytes: &Uint8Array) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn frame(this: &EngineHandle) -> Result<JsValue, JsValue>;
}

/// [`Engine`] implemented by calling into a JS engine object.
///
/// A throwing `step` yields an empty block and a throwing `updateButtons` is
/// logged; neither interrupts the frame loop.
pub struct JsEngine {
    handle: EngineHandle,
    has_frame: bool,
    frame_scratch: Vec<u32>,
}

impl JsEngine {
    /// Call `factory(sample_rate)` and wrap the returned object
    pub fn create(factory: &Function, sample_rate: u32) -> Result<Self, JsValue> {
        let value = factory.call1(&JsValue::NULL, &JsValue::from(sample_rate))?;
        if !value.is_object() {
            return Err(JsValue::from_str("engine factory did not return an object"));
        }
        Ok(Self::from_handle(value.unchecked_into()))
    }

    pub fn from_handle(handle: EngineHandle) -> Self {
        let has_frame = Reflect::get(&handle, &JsValue::from_str("frame"))
            .map(|f| f.is_function())
            .unwrap_or(false);
        Self {
            handle,
            has_frame,
            frame_scratch: Vec::new(),
        }
    }

    pub fn handle(&self) -> &EngineHandle {
        &self.handle
    }
}

impl Engine for JsEngine {
    fn step(&mut self, elapsed: f64) -> SampleBlock {
        match self.handle.step(elapsed) {
            Ok(value) if value.is_undefined() || value.is_null() => Vec::new(),
            Ok(value) => match value.dyn_into::<Float32Array>() {
                Ok(samples) => samples.to_vec(),
                Err(other) => {
                    warn!("engine step returned {:?}, expected Float32Array", other);
                    Vec::new()
                }
            },
            Err(e) => {
                error!("engine step threw: {}", describe_js(&e));
                Vec::new()
            }
        }
    }

    fn update_buttons(&mut self, mask: ButtonMask) {
        if let Err(e) = self.handle.update_buttons(mask.bits()) {
            error!(mask = mask.bits(), "engine updateButtons threw: {}", describe_js(&e));
        }
    }

    fn swap_cart(&mut self, bytes: &[u8]) -> cartpump_core::Result<()> {
        self.handle
            .swap_cart(&Uint8Array::from(bytes))
            .map_err(|e| HarnessError::Engine(describe_js(&e)))
    }

    fn render(&mut self, pixels: &mut PixelBuffer) {
        if !self.has_frame {
            return;
        }
        let frame = match self.handle.frame() {
            Ok(value) => value,
            Err(e) => {
                error!("engine frame threw: {}", describe_js(&e));
                return;
            }
        };
        let Ok(frame) = frame.dyn_into::<Uint32Array>() else {
            return;
        };
        self.frame_scratch.resize(frame.length() as usize, 0);
        frame.copy_to(&mut self.frame_scratch);
        pixels.blit_argb(&self.frame_scratch);
    }
}
