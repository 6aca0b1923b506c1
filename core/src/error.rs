//! Harness error types

use crate::audio::PlaybackError;
use crate::config::ConfigError;

/// Errors surfaced to the host by [`Session`](crate::Session) entry points.
///
/// There is no recovery strategy behind any of these: the host reports them
/// and carries on with the next frame.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// A cartridge load was attempted with zero bytes.
    #[error("cartridge image is empty")]
    EmptyCart,

    /// The playback device refused a flushed unit.
    #[error("audio playback failed: {0}")]
    Playback(#[from] PlaybackError),

    /// The engine rejected a call (e.g. an image it cannot parse).
    #[error("engine error: {0}")]
    Engine(String),

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
