//! Progress-callback trait for per-image extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the batch processes each image. The web server uses
//! [`TracingProgressCallback`]; library users can forward events anywhere.
//!
//! # Example
//!
//! ```rust
//! use edgequake_img2xlsx::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for CountingCallback {
//!     fn on_image_complete(&self, index: usize, total: usize, file_name: &str) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} {} done", index, total, file_name);
//!     }
//! }
//!
//! let config = ExtractionConfig::builder()
//!     .api_key("sk-test")
//!     .progress_callback(Arc::new(CountingCallback { completed: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;
use tracing::{info, warn};

/// Called by the batch runner as it processes each image.
///
/// Images are processed one at a time, so events for one batch never
/// interleave. The trait is still `Send + Sync` because the callback lives in
/// a config shared across server tasks. All methods default to no-ops.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once before the first image.
    fn on_batch_start(&self, total_images: usize) {
        let _ = total_images;
    }

    /// Called before an image is decoded and sent.
    ///
    /// `index` is 1-based.
    fn on_image_start(&self, index: usize, total_images: usize, file_name: &str) {
        let _ = (index, total_images, file_name);
    }

    /// Called when an image produced a parsed result.
    fn on_image_complete(&self, index: usize, total_images: usize, file_name: &str) {
        let _ = (index, total_images, file_name);
    }

    /// Called when an image fell back to a sentinel result.
    fn on_image_error(&self, index: usize, total_images: usize, file_name: &str, error: &str) {
        let _ = (index, total_images, file_name, error);
    }

    /// Called once after every image has been attempted.
    fn on_batch_complete(&self, total_images: usize, success_count: usize) {
        let _ = (total_images, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Emits every event as a `tracing` record.
pub struct TracingProgressCallback;

impl ExtractionProgressCallback for TracingProgressCallback {
    fn on_batch_start(&self, total_images: usize) {
        info!("Batch started: {} images", total_images);
    }

    fn on_image_complete(&self, index: usize, total_images: usize, file_name: &str) {
        info!("Image {}/{} '{}' extracted", index, total_images, file_name);
    }

    fn on_image_error(&self, index: usize, total_images: usize, file_name: &str, error: &str) {
        warn!("Image {}/{} '{}' failed — {}", index, total_images, file_name, error);
    }

    fn on_batch_complete(&self, total_images: usize, success_count: usize) {
        info!("Batch complete: {}/{} images extracted", success_count, total_images);
    }
}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
