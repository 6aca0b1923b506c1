//! Per-refresh frame loop
//!
//! Converts host refresh timestamps into engine time, steps the engine unless
//! the session is suspended, and forwards the produced audio to the queue.
//!
//! When the audio device ran dry since the previous refresh, the driver can
//! run a few extra short steps to refill the queue (`max_catchup_steps`).

use tracing::{debug, warn};

use crate::audio::{PlaybackDevice, SharedSampleQueue};
use crate::config::DriverConfig;
use crate::engine::Engine;
use crate::error::Result;
use crate::pause::PauseGate;
use crate::video::PixelBuffer;

/// Host hook that schedules the next refresh callback
/// (`requestAnimationFrame` in a browser).
pub trait RefreshSource {
    fn request_refresh(&mut self);
}

/// Remembers the previous refresh timestamp.
#[derive(Debug, Clone, Default)]
pub struct LoopClock {
    previous: Option<f64>,
}

impl LoopClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `now_ms` and return the time since the previous call, clamped
    /// to `0..=max_delta_ms`.
    ///
    /// The first call has no previous timestamp and returns 0. A NaN
    /// timestamp returns 0 and is not recorded.
    pub fn advance(&mut self, now_ms: f64, max_delta_ms: f64) -> f64 {
        if now_ms.is_nan() {
            return 0.0;
        }
        let previous = self.previous.replace(now_ms);
        let Some(previous) = previous else {
            return 0.0;
        };
        let delta = now_ms - previous;
        if delta > max_delta_ms {
            warn!(delta_ms = delta, max_delta_ms, "frame delta clamped");
            max_delta_ms
        } else if delta < 0.0 {
            0.0
        } else {
            delta
        }
    }

    /// Timestamp of the last refresh, if any
    pub fn previous(&self) -> Option<f64> {
        self.previous
    }
}

/// Result of one refresh
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickOutcome {
    /// The engine was stepped
    pub stepped: bool,
    /// Engine time units covered by this refresh (0 when suspended)
    pub elapsed: f64,
    /// Samples the engine produced, catch-up steps included
    pub samples: usize,
    /// Extra steps run to refill a starved queue
    pub catchup_steps: u32,
}

/// Drives the engine once per display refresh.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    clock: LoopClock,
    config: DriverConfig,
    frames: u64,
    /// Queue starvation count already acted on
    seen_starved: u64,
}

impl FrameDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self {
            clock: LoopClock::new(),
            config,
            frames: 0,
            seen_starved: 0,
        }
    }

    /// Handle one refresh at host time `now_ms`.
    ///
    /// The clock advances even while suspended, so resuming does not produce
    /// one long step covering the whole pause.
    pub fn tick<E, D>(
        &mut self,
        now_ms: f64,
        gate: &PauseGate,
        engine: &mut E,
        queue: &SharedSampleQueue<D>,
        pixels: &mut PixelBuffer,
    ) -> Result<TickOutcome>
    where
        E: Engine + ?Sized,
        D: PlaybackDevice + 'static,
    {
        let delta_ms = self.clock.advance(now_ms, self.config.max_delta_ms);
        self.frames += 1;
        let starved = queue.stats().starved_completions;
        let newly_starved = starved - self.seen_starved;
        self.seen_starved = starved;
        if !gate.is_running() {
            return Ok(TickOutcome::default());
        }

        let elapsed = delta_ms * self.config.time_scale;
        let block = engine.step(elapsed);
        engine.render(pixels);
        queue.push(&block)?;

        let mut outcome = TickOutcome {
            stepped: true,
            elapsed,
            samples: block.len(),
            catchup_steps: 0,
        };
        if newly_starved > 0 {
            self.catch_up(engine, queue, pixels, &mut outcome)?;
        }
        Ok(outcome)
    }

    /// Step in one-unit increments until a flush starts or the step budget
    /// runs out.
    fn catch_up<E, D>(
        &mut self,
        engine: &mut E,
        queue: &SharedSampleQueue<D>,
        pixels: &mut PixelBuffer,
        outcome: &mut TickOutcome,
    ) -> Result<()>
    where
        E: Engine + ?Sized,
        D: PlaybackDevice + 'static,
    {
        let unit_ms = queue.min_flush_size() as f64 * 1000.0 / queue.sample_rate().max(1) as f64;
        let elapsed = unit_ms * self.config.time_scale;
        while outcome.catchup_steps < self.config.max_catchup_steps && !queue.is_in_flight() {
            let block = engine.step(elapsed);
            engine.render(pixels);
            outcome.catchup_steps += 1;
            outcome.samples += block.len();
            queue.push(&block)?;
        }
        if outcome.catchup_steps > 0 {
            debug!(
                steps = outcome.catchup_steps,
                refilled = queue.is_in_flight(),
                "audio underrun catch-up"
            );
        }
        Ok(())
    }

    /// Refreshes handled so far, suspended ones included
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clock(&self) -> &LoopClock {
        &self.clock
    }
}
