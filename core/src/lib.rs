//! Cartpump Core - host harness for an opaque emulation engine
//!
//! This crate holds everything between the host page and the engine that
//! does not touch a browser API, so it runs and tests natively.
//!
//! # Architecture
//!
//! - [`Engine`] - Trait implemented by the emulation core
//! - [`SharedSampleQueue`] - Accumulates engine audio and flushes it to a
//!   [`PlaybackDevice`] one unit at a time
//! - [`ButtonEncoder`] - Folds key transitions into an 8-bit [`ButtonMask`]
//! - [`FrameDriver`] - Steps the engine once per display refresh
//! - [`PauseGate`] - Suspends stepping while the settings panel is open
//! - [`Session`] - Owns one of each and routes host events into them

pub mod audio;
pub mod cart;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod input;
pub mod pause;
pub mod session;
#[cfg(test)]
pub mod test_utils;
pub mod video;

// Re-export the host-facing surface
pub use audio::{
    Completion, DEFAULT_FLUSH_RATE_HZ, PlaybackDevice, PlaybackError, PlaybackScheduler,
    QueueStats, SharedSampleQueue, min_flush_size,
};
pub use cart::{CartInfo, Cartridge, Mirroring};
pub use config::{AudioConfig, ConfigError, DriverConfig, HarnessConfig, InputConfig};
pub use driver::{FrameDriver, LoopClock, RefreshSource, TickOutcome};
pub use engine::{Engine, SCREEN_HEIGHT, SCREEN_WIDTH, SampleBlock};
pub use error::{HarnessError, Result};
pub use input::{Button, ButtonEncoder, ButtonMask, KeyBinding};
pub use pause::{PauseGate, PauseState};
pub use session::Session;
pub use video::PixelBuffer;
