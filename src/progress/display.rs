//! Progress bar display management and coordination.
//!
//! [`ProgressDisplay`] owns the main bar, which counts the bytes of the whole
//! file, and hands out one child bar per segment.
//!
//! # Examples
//!
//! ```rust
//! use segdl::progress::{ProgressDisplay, StyleOptions};
//!
//! let display = ProgressDisplay::new(StyleOptions::hidden(), Some(1024), "file.bin");
//! let child = display.create_child_progress(512, 0, "segment 00");
//! child.inc(512);
//! display.inc_main(512);
//! display.finish_child(child);
//! display.finish();
//! ```

use crate::progress::StyleOptions;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};

/// Progress display manager that coordinates the download progress bars.
pub struct ProgressDisplay {
    /// The multi-progress instance for coordinating multiple progress bars.
    multi: MultiProgress,
    /// The main progress bar for overall progress.
    main: ProgressBar,
    /// Style options for progress bars.
    style_options: StyleOptions,
}

impl ProgressDisplay {
    /// Create a new progress display manager.
    ///
    /// # Arguments
    /// * `style_options` - Style configuration for progress bars
    /// * `total_size` - Size of the file, if known
    /// * `label` - Message shown next to the main bar, usually the filename
    pub fn new(style_options: StyleOptions, total_size: Option<u64>, label: &str) -> Self {
        let multi = match style_options.is_enabled() {
            true => MultiProgress::new(),
            false => MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
        };

        let main = multi.add(
            style_options
                .main()
                .clone()
                .to_progress_bar(total_size.unwrap_or(0)),
        );
        main.set_message(label.to_string());
        main.tick();

        Self {
            multi,
            main,
            style_options,
        }
    }

    /// Get the main progress bar.
    pub fn main(&self) -> ProgressBar {
        self.main.clone()
    }

    /// Advance the main progress bar by `len` bytes.
    pub fn inc_main(&self, len: u64) {
        self.main.inc(len);
    }

    /// Create a child progress bar for one segment.
    ///
    /// # Arguments
    /// * `size` - Length of the segment
    /// * `position` - Bytes already transferred
    /// * `name` - Segment label
    pub fn create_child_progress(&self, size: u64, position: u64, name: &str) -> ProgressBar {
        let pb = self.multi.add(
            self.style_options
                .child()
                .clone()
                .to_progress_bar(size)
                .with_position(position),
        );
        pb.set_message(name.to_string());
        pb
    }

    /// Finish a child progress bar based on configuration.
    pub fn finish_child(&self, pb: ProgressBar) {
        if self.style_options.child().clear {
            pb.finish_and_clear();
        } else {
            pb.finish();
        }
    }

    /// Stop a child progress bar whose segment did not complete.
    pub fn abandon_child(&self, pb: ProgressBar) {
        pb.abandon();
    }

    /// Finish the progress display, clearing or keeping the main bar based on
    /// configuration.
    pub fn finish(self) {
        if self.style_options.main().clear {
            self.main.finish_and_clear();
        } else {
            self.main.finish();
        }
    }

    /// Stop the display after a failure, leaving the main bar where it stopped.
    pub fn abandon(self) {
        self.main.abandon();
    }
}
