//! Canvas presentation

use anyhow::{Context, anyhow};
use cartpump_core::PixelBuffer;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::describe_js;

/// Draws a [`PixelBuffer`] onto a 2D canvas at native resolution.
///
/// Scaling is left to CSS; smoothing is disabled so pixels stay sharp.
pub struct CanvasPresenter {
    context: CanvasRenderingContext2d,
    presented: u64,
}

impl CanvasPresenter {
    /// Size `canvas` to the buffer and take its 2D context
    pub fn new(canvas: &HtmlCanvasElement, pixels: &PixelBuffer) -> anyhow::Result<Self> {
        canvas.set_width(pixels.width() as u32);
        canvas.set_height(pixels.height() as u32);
        let context = canvas
            .get_context("2d")
            .map_err(|e| anyhow!("getContext(\"2d\") threw: {}", describe_js(&e)))?
            .context("canvas has no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| anyhow!("2d context is not a CanvasRenderingContext2d"))?;
        context.set_image_smoothing_enabled(false);
        Ok(Self {
            context,
            presented: 0,
        })
    }

    /// Put the buffer on screen if a new frame was rendered since last time
    pub fn present(&mut self, pixels: &PixelBuffer) -> Result<bool, JsValue> {
        if pixels.frame_count() == self.presented {
            return Ok(false);
        }
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(pixels.rgba()),
            pixels.width() as u32,
            pixels.height() as u32,
        )?;
        self.context.put_image_data(&image, 0.0, 0.0)?;
        self.presented = pixels.frame_count();
        Ok(true)
    }
}
