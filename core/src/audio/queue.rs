//! Pending-sample accumulation with single-flight flushing

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, error, trace};

use super::{Completion, PlaybackDevice, PlaybackError, PlaybackScheduler, QueueStats};

/// Minimum unit length for a device running at `sample_rate` when units must
/// last at least `1 / flush_rate_hz` seconds. Rounded up, never zero.
pub fn min_flush_size(sample_rate: u32, flush_rate_hz: u32) -> usize {
    sample_rate.div_ceil(flush_rate_hz.max(1)).max(1) as usize
}

/// Spare buffer capacity is capped at this many minimum units
const SPARE_CAPACITY_UNITS: usize = 4;

struct QueueState {
    /// Samples pushed since the last flush
    pending: Vec<f32>,
    /// Buffer of the last flushed unit, kept for its capacity
    spare: Vec<f32>,
    min_flush_size: usize,
    /// A unit is playing and its completion has not fired yet
    in_flight: bool,
    stats: QueueStats,
}

struct Inner<D> {
    state: RefCell<QueueState>,
    scheduler: RefCell<PlaybackScheduler<D>>,
}

/// Sample queue shared between the frame loop and device callbacks.
///
/// Cloning yields another handle to the same queue. Completion callbacks hold
/// a weak handle, so dropping every clone also stops the flush chain.
pub struct SharedSampleQueue<D> {
    inner: Rc<Inner<D>>,
}

impl<D> Clone for SharedSampleQueue<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<D: PlaybackDevice + 'static> SharedSampleQueue<D> {
    /// Create a queue that flushes units of at least `min_flush_size` samples
    pub fn new(device: D, min_flush_size: usize) -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(QueueState {
                    pending: Vec::new(),
                    spare: Vec::new(),
                    min_flush_size: min_flush_size.max(1),
                    in_flight: false,
                    stats: QueueStats::default(),
                }),
                scheduler: RefCell::new(PlaybackScheduler::new(device)),
            }),
        }
    }

    /// Create a queue whose minimum unit lasts `1 / flush_rate_hz` seconds at
    /// the device's sample rate
    pub fn with_flush_rate(device: D, flush_rate_hz: u32) -> Self {
        let size = min_flush_size(device.sample_rate(), flush_rate_hz);
        Self::new(device, size)
    }

    /// Append a block and flush if no unit is playing.
    ///
    /// Empty blocks are accepted and change nothing.
    pub fn push(&self, block: &[f32]) -> Result<(), PlaybackError> {
        let in_flight = {
            let mut state = self.inner.state.borrow_mut();
            state.pending.extend_from_slice(block);
            state.in_flight
        };
        if in_flight {
            return Ok(());
        }
        self.try_flush()
    }

    /// Hand the whole pending buffer to the device if it has reached the
    /// threshold and nothing is playing.
    pub fn try_flush(&self) -> Result<(), PlaybackError> {
        let mut unit = {
            let mut state = self.inner.state.borrow_mut();
            if state.in_flight || state.pending.len() < state.min_flush_size {
                return Ok(());
            }
            state.in_flight = true;
            let spare = std::mem::take(&mut state.spare);
            std::mem::replace(&mut state.pending, spare)
        };

        let result = self
            .inner
            .scheduler
            .borrow_mut()
            .flush(&unit, self.completion());

        let mut state = self.inner.state.borrow_mut();
        match &result {
            Ok(()) => state.stats.record_flush(unit.len()),
            Err(PlaybackError::Suspended) => {
                state.in_flight = false;
                state.stats.failed_flushes += 1;
                debug!(samples = unit.len(), "device suspended, dropping audio unit");
            }
            Err(e) => {
                state.in_flight = false;
                state.stats.failed_flushes += 1;
                error!(samples = unit.len(), "dropping audio unit: {}", e);
            }
        }
        unit.clear();
        unit.shrink_to(SPARE_CAPACITY_UNITS * state.min_flush_size);
        if unit.capacity() > state.spare.capacity() {
            state.spare = unit;
        }
        result
    }

    /// Discard pending samples. A unit already playing is left alone.
    pub fn clear(&self) {
        self.inner.state.borrow_mut().pending.clear();
    }

    /// Number of samples waiting for the next flush
    pub fn pending_len(&self) -> usize {
        self.inner.state.borrow().pending.len()
    }

    /// Whether a unit is currently playing
    pub fn is_in_flight(&self) -> bool {
        self.inner.state.borrow().in_flight
    }

    pub fn min_flush_size(&self) -> usize {
        self.inner.state.borrow().min_flush_size
    }

    pub fn stats(&self) -> QueueStats {
        self.inner.state.borrow().stats
    }

    pub fn sample_rate(&self) -> u32 {
        self.inner.scheduler.borrow().sample_rate()
    }

    /// Run `f` against the playback device
    pub fn with_device<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        f(self.inner.scheduler.borrow_mut().device_mut())
    }

    /// Capacity held by the pending and spare buffers
    #[cfg(test)]
    pub(crate) fn retained_capacity(&self) -> usize {
        let state = self.inner.state.borrow();
        state.pending.capacity() + state.spare.capacity()
    }

    fn completion(&self) -> Completion {
        let weak: Weak<Inner<D>> = Rc::downgrade(&self.inner);
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                SharedSampleQueue { inner }.on_unit_ended();
            }
        })
    }

    /// Release the playback slot and chain the next flush.
    fn on_unit_ended(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            state.in_flight = false;
            if state.pending.len() < state.min_flush_size {
                state.stats.starved_completions += 1;
                trace!(pending = state.pending.len(), "playback idle until next push");
                return;
            }
        }
        // No caller to report to from a device callback; try_flush already
        // logged and counted the failure.
        let _ = self.try_flush();
    }
}
