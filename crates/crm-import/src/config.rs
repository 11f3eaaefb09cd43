use std::fmt;
use std::num::NonZeroUsize;

/// Number of rows sent per bulk-upsert call.
///
/// Smaller batches give finer progress feedback and a smaller blast radius
/// when one call fails, since every row of a failed call counts as failed.
/// Larger batches cut request overhead and total latency on very large
/// files, at the cost of a bigger unit of re-work per failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchSize(NonZeroUsize);

impl BatchSize {
    /// Preset for interactive imports with frequent progress updates.
    pub const FINE_GRAINED: Self = Self::preset(50);

    /// Preset for very large files.
    pub const BULK: Self = Self::preset(2500);

    const fn preset(rows: usize) -> Self {
        match NonZeroUsize::new(rows) {
            Some(rows) => Self(rows),
            None => panic!("batch size preset must be non-zero"),
        }
    }

    /// Returns `None` for zero.
    pub fn new(rows: usize) -> Option<Self> {
        NonZeroUsize::new(rows).map(Self)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self::FINE_GRAINED
    }
}

impl fmt::Display for BatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Settings for one import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub batch_size: BatchSize,
    /// Run the custom field auto-registrar after the last batch.
    pub register_custom_fields: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: BatchSize::default(),
            register_custom_fields: true,
        }
    }
}

impl ImportOptions {
    pub fn with_batch_size(mut self, batch_size: BatchSize) -> Self {
        self.batch_size = batch_size;
        self
    }
}
