//! CLI-specific progress handling for butterfly-arcflags
//!
//! Provides the preprocessing progress bar for the command-line interface.

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} roots ({percent}%) ETA: {eta}";

/// Creates a progress bar counting reverse searches
pub fn create_progress_bar(total_roots: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_roots);
    let style = ProgressStyle::default_bar()
        .template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Progress manager for arc-flag preprocessing
pub struct ProgressManager {
    pub pb: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager, printing `message` to stderr
    pub fn new(total_roots: u64, message: &str) -> Self {
        let pb = create_progress_bar(total_roots);
        eprintln!("{message}");
        Self { pb }
    }

    /// Callback for `preprocess_with_progress`
    pub fn callback(&self) -> impl FnMut(usize, usize) + '_ {
        move |done, total| {
            if self.pb.length() != Some(total as u64) {
                self.pb.set_length(total as u64);
            }
            self.pb.set_position(done as u64);
            if done >= total {
                self.pb.finish_with_message("✅ Arc flags computed");
            }
        }
    }
}
