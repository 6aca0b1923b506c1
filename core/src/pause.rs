//! Pause gate driven by the settings panel
//!
//! The frame loop keeps ticking while suspended; only engine steps stop.

/// Run state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PauseState {
    #[default]
    Running,
    Suspended,
}

/// Two-state gate consulted by the frame driver.
///
/// Settings-open suspends and settings-close resumes. Both are idempotent and
/// nothing else changes the state.
#[derive(Debug, Clone, Default)]
pub struct PauseGate {
    state: PauseState,
}

impl PauseGate {
    /// Create a gate in the running state
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings panel opened. Returns `true` if this suspended the session.
    pub fn open_settings(&mut self) -> bool {
        self.transition(PauseState::Suspended)
    }

    /// Settings panel closed. Returns `true` if this resumed the session.
    pub fn close_settings(&mut self) -> bool {
        self.transition(PauseState::Running)
    }

    pub fn state(&self) -> PauseState {
        self.state
    }

    /// Check if engine steps should run this frame
    pub fn is_running(&self) -> bool {
        self.state == PauseState::Running
    }

    fn transition(&mut self, to: PauseState) -> bool {
        if self.state == to {
            return false;
        }
        tracing::debug!(from = ?self.state, ?to, "pause gate");
        self.state = to;
        true
    }
}
