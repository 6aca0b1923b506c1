//! Audio queue counters

/// Snapshot of queue activity since creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Units handed to the device
    pub flushes: u64,
    /// Total samples across all flushed units
    pub samples_flushed: u64,
    /// Length of the longest unit flushed
    pub largest_unit: usize,
    /// Completions that found too little audio pending, leaving the device
    /// idle until the next push
    pub starved_completions: u64,
    /// Units the device refused
    pub failed_flushes: u64,
}

impl QueueStats {
    pub(crate) fn record_flush(&mut self, len: usize) {
        self.flushes += 1;
        self.samples_flushed += len as u64;
        self.largest_unit = self.largest_unit.max(len);
    }

    /// Average unit length in samples
    pub fn average_unit(&self) -> f64 {
        if self.flushes == 0 {
            0.0
        } else {
            self.samples_flushed as f64 / self.flushes as f64
        }
    }
}
