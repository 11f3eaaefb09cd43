//! Terminal progress bar for imports.

use indicatif::{ProgressBar, ProgressStyle};

use crm_import::{ImportProgress, ProgressUpdate};

const TEMPLATE: &str = "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows {msg}";

pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(total_rows: usize) -> Self {
        let bar = ProgressBar::new(total_rows as u64);
        let style = ProgressStyle::with_template(TEMPLATE)
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ImportProgress for BarProgress {
    fn on_batch(&mut self, update: ProgressUpdate) {
        self.bar.set_position(update.processed as u64);
        self.bar
            .set_message(format!("batch {}/{}", update.batch, update.batches));
    }
}
