//! Progress reporting for file transfers.

/// Progress information for uploads and downloads.
#[derive(Debug, Clone)]
pub struct TransferProgress {
    /// Bytes transferred so far
    pub done: u64,
    /// Total bytes to transfer (0 when the size is unknown)
    pub total: u64,
    /// Name of the file being transferred
    pub filename: String,
}

impl TransferProgress {
    /// Create a new progress report.
    pub fn new(done: u64, total: u64, filename: impl Into<String>) -> Self {
        Self {
            done,
            total,
            filename: filename.into(),
        }
    }

    /// Get progress as a percentage (0.0 to 100.0).
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.done as f64 / self.total as f64) * 100.0
    }

    /// Check if transfer is complete. Always false while the total is unknown.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.done >= self.total
    }
}

/// Type alias for progress callback function.
///
/// The callback receives progress information and can return `false` to cancel the transfer.
pub type ProgressCallback = Box<dyn FnMut(&TransferProgress) -> bool + Send>;

/// Running byte count for one transfer.
pub(crate) struct ProgressTracker {
    callback: Option<ProgressCallback>,
    progress: TransferProgress,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Option<ProgressCallback>, total: u64, filename: &str) -> Self {
        Self {
            callback,
            progress: TransferProgress::new(0, total, filename),
        }
    }

    /// Record `bytes` more; returns `false` if the callback asked to stop.
    pub(crate) fn advance(&mut self, bytes: u64) -> bool {
        self.progress.done += bytes;
        match self.callback.as_mut() {
            Some(callback) => callback(&self.progress),
            None => true,
        }
    }

    pub(crate) fn done(&self) -> u64 {
        self.progress.done
    }
}

/// Create a simple progress callback that prints to stdout.
///
/// # Example
/// ```no_run
/// use openfiles::progress::make_progress_bar;
///
/// let callback = make_progress_bar();
/// ```
pub fn make_progress_bar() -> ProgressCallback {
    Box::new(|progress: &TransferProgress| {
        let percent = progress.percent();
        let bar_width = 40;
        let filled = ((percent / 100.0 * bar_width as f64) as usize).min(bar_width);
        let empty = bar_width - filled;

        if progress.total == 0 {
            print!("\r{} - {} bytes", progress.filename, progress.done);
        } else {
            print!(
                "\r[{}{}] {:.1}% {} - {}/{} bytes",
                "=".repeat(filled),
                " ".repeat(empty),
                percent,
                progress.filename,
                progress.done,
                progress.total
            );
        }

        if progress.is_complete() {
            println!();
        }

        use std::io::Write;
        let _ = std::io::stdout().flush();

        true // Continue transfer
    })
}
