//! Progress reporting for batch imports.

/// Snapshot sent after every batch, success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// 1-based index of the batch just finished.
    pub batch: usize,
    pub batches: usize,
    /// Rows in a terminal state so far.
    pub processed: usize,
    pub total: usize,
}

impl ProgressUpdate {
    /// Fraction complete in `0.0..=1.0`. An empty import is complete.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }

    pub fn percent(&self) -> u8 {
        (self.fraction() * 100.0).round() as u8
    }
}

/// Receiver of import progress.
pub trait ImportProgress {
    fn on_batch(&mut self, update: ProgressUpdate);
}

impl<F: FnMut(ProgressUpdate)> ImportProgress for F {
    fn on_batch(&mut self, update: ProgressUpdate) {
        self(update);
    }
}

/// Discards progress updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ImportProgress for NoProgress {
    fn on_batch(&mut self, _update: ProgressUpdate) {}
}
