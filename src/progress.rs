//! Progress-callback trait for per-page conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline processes each page.
//!
//! The callback is also the out-of-band channel for teardown diagnostics:
//! failures while releasing the document or the engine never change the
//! conversion's result, but they are reported through
//! [`ConversionProgressCallback::on_teardown_error`].
//!
//! # Example
//!
//! ```rust
//! use pdfium_markdown::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Page {}/{} done ({} bytes of text)", page_num, total_pages, text_len);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Which native handle a teardown diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownStage {
    Document,
    Engine,
}

impl std::fmt::Display for TeardownStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeardownStage::Document => f.write_str("document"),
            TeardownStage::Engine => f.write_str("engine"),
        }
    }
}

/// Called by the conversion pipeline as it processes each page.
///
/// Implementations must be `Send + Sync`: the pipeline runs on tokio's
/// blocking pool, not on the caller's thread. All methods have default no-op
/// implementations so callers only override what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once the document is open and its page count is known.
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called before a page's text is extracted.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages in the document
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after a page's image has been written.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages
    /// * `text_len`    — byte length of the page text (fallback included)
    fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
        let _ = (page_num, total_pages, text_len);
    }

    /// Called once after the Markdown document has been written.
    fn on_conversion_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called when releasing a native handle failed.
    fn on_teardown_error(&self, stage: TeardownStage, error: &str) {
        let _ = (stage, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        started_total: AtomicUsize,
        teardown: Mutex<Vec<(TeardownStage, String)>>,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_conversion_start(&self, total_pages: usize) {
            self.started_total.store(total_pages, Ordering::SeqCst);
        }

        fn on_page_start(&self, _page_num: usize, _total_pages: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_complete(&self, _page_num: usize, _total_pages: usize, _text_len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_teardown_error(&self, stage: TeardownStage, error: &str) {
            self.teardown.lock().unwrap().push((stage, error.to_string()));
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(5);
        cb.on_page_start(1, 5);
        cb.on_page_complete(1, 5, 42);
        cb.on_conversion_complete(5);
        cb.on_teardown_error(TeardownStage::Engine, "boom");
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_conversion_start(2);
        tracker.on_page_start(1, 2);
        tracker.on_page_complete(1, 2, 15);
        tracker.on_page_start(2, 2);
        tracker.on_page_complete(2, 2, 0);
        tracker.on_teardown_error(TeardownStage::Document, "close failed");

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        let teardown = tracker.teardown.lock().unwrap();
        assert_eq!(teardown.len(), 1);
        assert_eq!(teardown[0].0, TeardownStage::Document);
    }

    #[test]
    fn stage_display() {
        assert_eq!(TeardownStage::Document.to_string(), "document");
        assert_eq!(TeardownStage::Engine.to_string(), "engine");
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn ConversionProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_conversion_start(10);
        cb.on_page_start(1, 10);
        cb.on_page_complete(1, 10, 512);
    }
}
