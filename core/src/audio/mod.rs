//! Audio streaming from the engine to the playback device
//!
//! The engine hands over one variable-length block per display frame; the
//! device plays fixed units on its own clock and clicks if a unit is too
//! short. [`SharedSampleQueue`] sits in between:
//!
//! - blocks accumulate in a single growable pending buffer
//! - once at least `min_flush_size` samples are pending, the whole buffer is
//!   handed to the device as one unit
//! - only one unit is ever outstanding; its completion callback re-checks the
//!   threshold, so flushing chains itself while audio keeps arriving
//!
//! The device side is the [`PlaybackDevice`] trait, wrapped by
//! [`PlaybackScheduler`].

mod queue;
mod scheduler;
mod stats;

pub use queue::{SharedSampleQueue, min_flush_size};
pub use scheduler::PlaybackScheduler;
pub use stats::QueueStats;

/// Default number of minimum-size units per second (1/120 s units)
pub const DEFAULT_FLUSH_RATE_HZ: u32 = 120;

/// Continuation invoked once by the device when a unit finishes playing.
pub type Completion = Box<dyn FnOnce() + 'static>;

/// Errors reported by a playback device.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    /// A zero-length unit was offered; devices may reject these outright.
    #[error("refusing to play an empty audio unit")]
    EmptyUnit,

    /// The device is not currently producing sound (e.g. a browser audio
    /// context held by the autoplay policy), so the unit would never end.
    #[error("audio device is suspended")]
    Suspended,

    /// The device failed to allocate, fill or start a buffer.
    #[error("audio device error: {0}")]
    Device(String),
}

/// Device-level playback primitive: one call allocates a buffer of
/// `samples.len()` mono samples, copies them in, attaches `on_ended` and
/// starts playback as soon as possible.
///
/// `on_ended` must be called at most once, after the unit has finished. It is
/// dropped uncalled if `play` returns an error. A device that cannot finish a
/// unit in real time must refuse it with [`PlaybackError::Suspended`] rather
/// than hold it, or the queue backs up behind the stalled unit.
pub trait PlaybackDevice {
    /// Device sample rate in Hz
    fn sample_rate(&self) -> u32;

    /// Start playing `samples` immediately
    fn play(&mut self, samples: &[f32], on_ended: Completion) -> Result<(), PlaybackError>;
}
