//! Session: one instance of every harness component
//!
//! The host owns a `Session` and routes its events into it: refresh
//! callbacks, key transitions, settings panel open/close and cartridge loads.
//! Nothing here is global; two sessions on one page are independent.

use tracing::{debug, info};

use crate::audio::{PlaybackDevice, QueueStats, SharedSampleQueue};
use crate::cart::{CartInfo, Cartridge};
use crate::config::HarnessConfig;
use crate::driver::{FrameDriver, RefreshSource, TickOutcome};
use crate::engine::Engine;
use crate::error::Result;
use crate::input::{ButtonEncoder, ButtonMask, KeyBinding};
use crate::pause::PauseGate;
use crate::video::PixelBuffer;

/// Harness session generic over the engine and the playback device.
pub struct Session<E, D> {
    engine: E,
    queue: SharedSampleQueue<D>,
    encoder: ButtonEncoder,
    gate: PauseGate,
    driver: FrameDriver,
    pixels: PixelBuffer,
    discard_on_cart_swap: bool,
    cart: Option<CartInfo>,
}

impl<E: Engine, D: PlaybackDevice + 'static> Session<E, D> {
    /// Build a session from a validated config.
    ///
    /// The engine must already be constructed for `device.sample_rate()`.
    pub fn new(engine: E, device: D, config: &HarnessConfig) -> Result<Self> {
        config.validate()?;
        let queue = SharedSampleQueue::with_flush_rate(device, config.audio.flush_rate_hz);
        info!(
            sample_rate = queue.sample_rate(),
            min_flush_size = queue.min_flush_size(),
            "session created"
        );
        Ok(Self {
            engine,
            queue,
            encoder: ButtonEncoder::new(config.input.bindings.clone()),
            gate: PauseGate::new(),
            driver: FrameDriver::new(config.driver.clone()),
            pixels: PixelBuffer::default(),
            discard_on_cart_swap: config.audio.discard_on_cart_swap,
            cart: None,
        })
    }

    /// Handle a display refresh and re-arm the next one.
    ///
    /// The next refresh is requested whatever happens in this one, including
    /// errors and suspension.
    pub fn on_refresh<R: RefreshSource + ?Sized>(
        &mut self,
        now_ms: f64,
        refresh: &mut R,
    ) -> Result<TickOutcome> {
        let outcome = self.driver.tick(
            now_ms,
            &self.gate,
            &mut self.engine,
            &self.queue,
            &mut self.pixels,
        );
        refresh.request_refresh();
        outcome
    }

    /// Key pressed. Returns `true` if the key is bound.
    pub fn key_down(&mut self, key: &str) -> bool {
        let bound = self.encoder.on_key_down(key);
        if bound {
            self.encoder.publish(&mut self.engine);
        }
        bound
    }

    /// Key released. Returns `true` if the key is bound.
    pub fn key_up(&mut self, key: &str) -> bool {
        let bound = self.encoder.on_key_up(key);
        if bound {
            self.encoder.publish(&mut self.engine);
        }
        bound
    }

    /// Release every button, e.g. when the page loses focus
    pub fn release_all(&mut self) {
        self.encoder.release_all();
        self.encoder.publish(&mut self.engine);
    }

    /// Swap in a new key binding table
    pub fn set_binding(&mut self, binding: KeyBinding) {
        self.encoder.set_binding(binding);
        self.encoder.publish(&mut self.engine);
    }

    /// Settings panel opened; engine steps stop
    pub fn open_settings(&mut self) -> bool {
        self.gate.open_settings()
    }

    /// Settings panel closed; engine steps resume
    pub fn close_settings(&mut self) -> bool {
        self.gate.close_settings()
    }

    /// Hand a cartridge image to the engine.
    ///
    /// Pending and in-flight audio is left alone unless the config asks to
    /// discard pending samples on swap; the in-flight unit always finishes.
    pub fn load_cart(&mut self, bytes: &[u8]) -> Result<()> {
        let cart = Cartridge::from_bytes(bytes)?;
        self.engine.swap_cart(cart.bytes())?;
        if self.discard_on_cart_swap {
            debug!(discarded = self.queue.pending_len(), "pending audio dropped on cart swap");
            self.queue.clear();
        }
        self.cart = cart.info();
        match cart.info() {
            Some(info) => info!(
                len = bytes.len(),
                mapper = info.mapper,
                prg_rom = info.prg_rom_size,
                chr_rom = info.chr_rom_size,
                "cartridge loaded"
            ),
            None => info!(len = bytes.len(), "cartridge loaded"),
        }
        // The new program starts with whatever is held right now
        self.encoder.publish(&mut self.engine);
        Ok(())
    }

    pub fn current_mask(&self) -> ButtonMask {
        self.encoder.current_mask()
    }

    pub fn is_running(&self) -> bool {
        self.gate.is_running()
    }

    /// Header of the loaded cartridge, if it was iNES
    pub fn cart_info(&self) -> Option<CartInfo> {
        self.cart
    }

    pub fn audio_stats(&self) -> QueueStats {
        self.queue.stats()
    }

    pub fn queue(&self) -> &SharedSampleQueue<D> {
        &self.queue
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

#[cfg(test)]
mod tests;
