//! Shared test utilities for unit tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::audio::{Completion, PlaybackDevice, PlaybackError};
use crate::engine::{Engine, SampleBlock};
use crate::error::{HarnessError, Result};
use crate::input::ButtonMask;
use crate::video::PixelBuffer;

// ============================================================================
// Fake Playback Device
// ============================================================================

#[derive(Default)]
struct DeviceLog {
    units: Vec<Vec<f32>>,
    outstanding: VecDeque<Completion>,
    /// Plays that started while another unit was still outstanding
    overlaps: usize,
    fail_next: bool,
    /// Refuse every unit until resumed
    suspended: bool,
}

/// Playback device that records every unit and holds completions until the
/// test fires them.
pub struct FakeDevice {
    log: Rc<RefCell<DeviceLog>>,
    sample_rate: u32,
}

/// Test-side view of a [`FakeDevice`] after it has been moved into a queue.
#[derive(Clone)]
pub struct DeviceProbe {
    log: Rc<RefCell<DeviceLog>>,
}

impl FakeDevice {
    pub fn new(sample_rate: u32) -> (Self, DeviceProbe) {
        let log = Rc::new(RefCell::new(DeviceLog::default()));
        (
            Self {
                log: Rc::clone(&log),
                sample_rate,
            },
            DeviceProbe { log },
        )
    }
}

impl PlaybackDevice for FakeDevice {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn play(&mut self, samples: &[f32], on_ended: Completion) -> std::result::Result<(), PlaybackError> {
        let mut log = self.log.borrow_mut();
        if log.fail_next {
            log.fail_next = false;
            return Err(PlaybackError::Device("buffer allocation failed".into()));
        }
        if log.suspended {
            return Err(PlaybackError::Suspended);
        }
        if !log.outstanding.is_empty() {
            log.overlaps += 1;
        }
        log.units.push(samples.to_vec());
        log.outstanding.push_back(on_ended);
        Ok(())
    }
}

impl DeviceProbe {
    /// Lengths of every unit played so far
    pub fn unit_lengths(&self) -> Vec<usize> {
        self.log.borrow().units.iter().map(Vec::len).collect()
    }

    /// Every played sample, in play order
    pub fn played(&self) -> Vec<f32> {
        self.log.borrow().units.concat()
    }

    pub fn unit_count(&self) -> usize {
        self.log.borrow().units.len()
    }

    /// Units started but not yet completed
    pub fn outstanding(&self) -> usize {
        self.log.borrow().outstanding.len()
    }

    pub fn overlaps(&self) -> usize {
        self.log.borrow().overlaps
    }

    /// Make the next `play` call fail
    pub fn fail_next(&self) {
        self.log.borrow_mut().fail_next = true;
    }

    /// Suspend or resume the device
    pub fn set_suspended(&self, suspended: bool) {
        self.log.borrow_mut().suspended = suspended;
    }

    /// Fire the oldest outstanding completion. Returns `false` if none.
    pub fn complete_next(&self) -> bool {
        let completion = self.log.borrow_mut().outstanding.pop_front();
        match completion {
            Some(done) => {
                done();
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// Fake Engine
// ============================================================================

/// Engine that replays scripted sample blocks and records every call.
#[derive(Default)]
pub struct FakeEngine {
    /// Blocks returned by successive `step` calls; empty once exhausted
    pub script: VecDeque<SampleBlock>,
    /// `elapsed` argument of every `step` call
    pub steps: Vec<f64>,
    /// Every mask published
    pub masks: Vec<ButtonMask>,
    /// Every cartridge image loaded
    pub carts: Vec<Vec<u8>>,
    /// Reject the next cartridge
    pub reject_cart: bool,
    /// Pixel written by `render` into the whole frame
    pub fill: u32,
}

impl FakeEngine {
    pub fn with_blocks<I: IntoIterator<Item = SampleBlock>>(blocks: I) -> Self {
        Self {
            script: blocks.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl Engine for FakeEngine {
    fn step(&mut self, elapsed: f64) -> SampleBlock {
        self.steps.push(elapsed);
        self.script.pop_front().unwrap_or_default()
    }

    fn update_buttons(&mut self, mask: ButtonMask) {
        self.masks.push(mask);
    }

    fn swap_cart(&mut self, bytes: &[u8]) -> Result<()> {
        if self.reject_cart {
            self.reject_cart = false;
            return Err(HarnessError::Engine("unsupported mapper".into()));
        }
        self.carts.push(bytes.to_vec());
        Ok(())
    }

    fn render(&mut self, pixels: &mut PixelBuffer) {
        let frame = vec![self.fill; pixels.width() * pixels.height()];
        pixels.blit_argb(&frame);
    }
}

/// A block of `len` samples whose values continue from `start`, so
/// concatenations can be checked for order.
pub fn ramp(start: usize, len: usize) -> SampleBlock {
    (start..start + len).map(|i| i as f32).collect()
}
