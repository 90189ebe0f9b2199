// SPDX-FileCopyrightText: The usdbdl authors
// SPDX-License-Identifier: MPL-2.0

/// Receives the progress of a batch.
///
/// All methods are infallible and only cause side effects, e.g. console output.
pub trait Reporter {
    /// Number of songs found before processing starts.
    fn report_count(&mut self, count: usize);

    /// Start of processing a song.
    ///
    /// `index` is 1-based.
    fn report_item_start(&mut self, index: usize, total: usize, name: &str);

    /// A long-running step of the current song has been started.
    ///
    /// Ends with the next progress, success, or failure report.
    fn report_item_pending(&mut self, message: &str) {
        let _ = message;
    }

    /// A step of the current song has been finished.
    fn report_item_progress(&mut self, message: &str);

    /// The current song has been processed successfully.
    fn report_item_success(&mut self);

    /// Processing the current song failed.
    fn report_item_failure(&mut self, message: &str);

    /// All songs have been processed.
    fn report_summary(&mut self, processed: usize, failed: usize);
}

impl<R> Reporter for &mut R
where
    R: Reporter + ?Sized,
{
    fn report_count(&mut self, count: usize) {
        (**self).report_count(count);
    }

    fn report_item_start(&mut self, index: usize, total: usize, name: &str) {
        (**self).report_item_start(index, total, name);
    }

    fn report_item_pending(&mut self, message: &str) {
        (**self).report_item_pending(message);
    }

    fn report_item_progress(&mut self, message: &str) {
        (**self).report_item_progress(message);
    }

    fn report_item_success(&mut self) {
        (**self).report_item_success();
    }

    fn report_item_failure(&mut self, message: &str) {
        (**self).report_item_failure(message);
    }

    fn report_summary(&mut self, processed: usize, failed: usize) {
        (**self).report_summary(processed, failed);
    }
}
