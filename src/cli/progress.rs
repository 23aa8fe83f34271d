//! Transfer progress display
//!
//! A single indicatif bar fed by the download engine's progress signals.
//! Purely observational: it renders bytes transferred against the reported
//! content length (or a spinner when the server does not report one) and
//! never affects transfer correctness.

use std::sync::atomic::{AtomicBool, Ordering};

use indicatif::{ProgressBar, ProgressStyle};

use crate::app::client::TransferObserver;
use crate::constants::progress;

/// Progress bar for one streaming download
pub struct TransferBar {
    bar: ProgressBar,
    sized: AtomicBool,
}

impl TransferBar {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        // A template error degrades to the default rendering
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} {bytes} transferred ({bytes_per_sec})")
        {
            bar.set_style(style);
        }
        bar.enable_steady_tick(progress::UPDATE_INTERVAL);
        Self {
            bar,
            sized: AtomicBool::new(false),
        }
    }

    /// Switch from spinner to a sized bar once the total is known
    fn promote_to_sized(&self, total_bytes: u64) {
        if self.sized.swap(true, Ordering::Relaxed) {
            return;
        }
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
        {
            self.bar.set_style(style);
        }
        self.bar.set_length(total_bytes);
    }

    /// Clear the bar after the transfer ends, successfully or not
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for TransferBar {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferObserver for TransferBar {
    fn on_progress(&self, bytes_written: u64, total_bytes: Option<u64>) {
        if let Some(total) = total_bytes {
            self.promote_to_sized(total);
        }
        self.bar.set_position(bytes_written);
    }
}
