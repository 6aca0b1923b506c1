//! Thin adapter from a flush to the device primitive

use tracing::trace;

use super::{Completion, PlaybackDevice, PlaybackError};

/// Hands flushed units to a [`PlaybackDevice`].
///
/// Holds no state of its own beyond the device; single-flight ordering is the
/// queue's job.
pub struct PlaybackScheduler<D> {
    device: D,
}

impl<D: PlaybackDevice> PlaybackScheduler<D> {
    pub fn new(device: D) -> Self {
        Self { device }
    }

    /// Play `samples` as one unit with zero scheduling delay.
    ///
    /// Empty units never reach the device.
    pub fn flush(&mut self, samples: &[f32], on_ended: Completion) -> Result<(), PlaybackError> {
        if samples.is_empty() {
            return Err(PlaybackError::EmptyUnit);
        }
        trace!(
            samples = samples.len(),
            millis = samples.len() as f64 * 1000.0 / self.device.sample_rate().max(1) as f64,
            "starting playback unit"
        );
        self.device.play(samples, on_ended)
    }

    pub fn sample_rate(&self) -> u32 {
        self.device.sample_rate()
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}
