//! Engine trait
//!
//! The emulation engine is an external collaborator. The harness only ever
//! talks to it through this surface.

use crate::error::Result;
use crate::input::ButtonMask;
use crate::video::PixelBuffer;

/// Screen width of the emulated console in pixels
pub const SCREEN_WIDTH: usize = 256;
/// Screen height of the emulated console in pixels
pub const SCREEN_HEIGHT: usize = 240;

/// Raw mono audio produced by one engine step, at the device sample rate.
pub type SampleBlock = Vec<f32>;

/// Trait implemented by an emulation core driven by the harness.
///
/// Implementations are constructed by the host with the device sample rate so
/// that every [`SampleBlock`] is already at the playback rate.
pub trait Engine {
    /// Advance emulation by `elapsed` engine time units and return the audio
    /// produced meanwhile. An empty block is valid.
    fn step(&mut self, elapsed: f64) -> SampleBlock;

    /// Replace the held-button state. Fire-and-forget.
    fn update_buttons(&mut self, mask: ButtonMask);

    /// Replace the loaded program image. Safe to call at any time.
    fn swap_cart(&mut self, bytes: &[u8]) -> Result<()>;

    /// Write the current frame into `pixels`.
    ///
    /// Engines that draw to their own surface leave the default no-op.
    fn render(&mut self, _pixels: &mut PixelBuffer) {}
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn step(&mut self, elapsed: f64) -> SampleBlock {
        (**self).step(elapsed)
    }

    fn update_buttons(&mut self, mask: ButtonMask) {
        (**self).update_buttons(mask)
    }

    fn swap_cart(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).swap_cart(bytes)
    }

    fn render(&mut self, pixels: &mut PixelBuffer) {
        (**self).render(pixels)
    }
}
