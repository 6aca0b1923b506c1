//! WebAudio playback device
//!
//! Each unit becomes its own `AudioBuffer` played through a fresh
//! `AudioBufferSourceNode` started immediately. The node's `onended` event is
//! the unit's completion.
//!
//! Units are refused while the context is not running (autoplay policy before
//! the first user gesture, or a backgrounded page), so no backlog builds up
//! behind a node that will never end.

use cartpump_core::{Completion, PlaybackDevice, PlaybackError};
use tracing::warn;
use wasm_bindgen::prelude::*;
use web_sys::{AudioContext, AudioContextState};

use crate::describe_js;

fn device_error(value: JsValue) -> PlaybackError {
    PlaybackError::Device(describe_js(&value))
}

/// [`PlaybackDevice`] backed by an `AudioContext`.
pub struct WebAudioDevice {
    context: AudioContext,
    sample_rate: u32,
}

impl WebAudioDevice {
    /// Open a context at the browser's preferred rate
    pub fn new() -> Result<Self, JsValue> {
        Ok(Self::from_context(AudioContext::new()?))
    }

    pub fn from_context(context: AudioContext) -> Self {
        let sample_rate = context.sample_rate() as u32;
        Self {
            context,
            sample_rate,
        }
    }

    /// Resume a context the autoplay policy left suspended.
    ///
    /// Only takes effect when called from a user gesture handler.
    pub fn resume(&self) {
        if let Err(e) = self.context.resume() {
            warn!("AudioContext.resume failed: {}", describe_js(&e));
        }
    }

    /// The context is producing sound, so `onended` will fire
    pub fn is_running(&self) -> bool {
        self.context.state() == AudioContextState::Running
    }
}

impl PlaybackDevice for WebAudioDevice {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn play(&mut self, samples: &[f32], on_ended: Completion) -> Result<(), PlaybackError> {
        // A suspended context never ends a node; refuse instead of queueing
        if !self.is_running() {
            return Err(PlaybackError::Suspended);
        }
        let buffer = self
            .context
            .create_buffer(1, samples.len() as u32, self.sample_rate as f32)
            .map_err(device_error)?;
        buffer.copy_to_channel(samples, 0).map_err(device_error)?;

        let source = self.context.create_buffer_source().map_err(device_error)?;
        source.set_buffer(Some(&buffer));
        source
            .connect_with_audio_node(&self.context.destination())
            .map_err(device_error)?;

        // Frees itself after the single call
        let ended = Closure::once_into_js(on_ended);
        source.set_onended(Some(ended.unchecked_ref()));
        source.start().map_err(device_error)
    }
}
