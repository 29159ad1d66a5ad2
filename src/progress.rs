//! Progress reporting using indicatif.
//!
//! A single bar counts duplicate sets as they are resolved. It is hidden
//! unless progress display is requested, so callers can drive it
//! unconditionally.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress over the duplicate sets of a run.
pub struct GroupProgress {
    bar: ProgressBar,
}

impl GroupProgress {
    /// Create a bar for `total` sets. When `visible` is false nothing is drawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupe_sidecar::progress::GroupProgress;
    ///
    /// let progress = GroupProgress::new(10, false);
    /// progress.inc();
    /// assert_eq!(progress.position(), 1);
    /// ```
    #[must_use]
    pub fn new(total: usize, visible: bool) -> Self {
        let bar = ProgressBar::new(total as u64);
        if visible {
            bar.set_style(Self::style());
            bar.set_message("Processing duplicates");
            bar.enable_steady_tick(Duration::from_millis(200));
        } else {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        Self { bar }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    /// One more set handled.
    pub fn inc(&self) {
        self.bar.inc(1);
    }

    /// Sets handled so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Finish and remove the bar.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
