//! Batch extraction entry points.
//!
//! An [`Extractor`] owns one session: the configuration, the API key and the
//! backend built from it. Images go through it strictly one at a time in
//! upload order, and every image yields exactly one [`ResultRecord`], failed
//! or not, so the [`ResultSet`] always matches the upload list.

use crate::config::ExtractionConfig;
use crate::error::{Img2XlsxError, ItemError};
use crate::output::{ExtractionResult, ResultRecord, ResultSet};
use crate::pipeline::decode::{decode_upload, Upload};
use crate::pipeline::encode::{encode_image, EncodedPayload};
use crate::pipeline::llm::{build_request, resolve_backend, VisionBackend};
use crate::pipeline::parse::parse_first;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Reads text from images and translates it through a vision model.
pub struct Extractor {
    config: ExtractionConfig,
    backend: Arc<dyn VisionBackend>,
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Extractor {
    /// Create an extractor for one session.
    ///
    /// # Errors
    /// [`Img2XlsxError::MissingCredential`] when neither an API key nor a
    /// backend is configured. No image is touched in that case.
    pub fn new(config: ExtractionConfig) -> Result<Self, Img2XlsxError> {
        let backend = resolve_backend(&config)?;
        Ok(Self { config, backend })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract and translate the text in one encoded image.
    ///
    /// Never fails: a reply outside the grammar becomes
    /// (`"extraction failed"`, `"translation unavailable"`) and a provider
    /// error becomes (`"error occurred: <message>"`, `"translation unavailable"`).
    pub async fn extract(&self, payload: EncodedPayload) -> ExtractionResult {
        match self.try_extract(payload).await {
            Ok(result) => result,
            Err(e) => e.fallback(),
        }
    }

    /// Like [`Extractor::extract`], but keeps the failure kind.
    pub async fn try_extract(&self, payload: EncodedPayload) -> Result<ExtractionResult, ItemError> {
        let request = build_request(&self.config, payload);
        let reply = self.backend.complete(request).await?;
        debug!("Reply: {} chars", reply.len());
        parse_first(&reply).ok_or(ItemError::NoMatch)
    }

    /// Decode, encode and extract one upload.
    pub async fn process_image(&self, upload: &Upload) -> ResultRecord {
        let start = Instant::now();
        let outcome = match prepare(upload).await {
            Ok(payload) => self.try_extract(payload).await,
            Err(e) => Err(e),
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(result) => ResultRecord::succeeded(&upload.file_name, result, duration_ms),
            Err(e) => {
                warn!("'{}': {}", upload.file_name, e);
                ResultRecord::failed(&upload.file_name, e, duration_ms)
            }
        }
    }

    /// Process every upload in order, one at a time.
    ///
    /// The returned set has exactly `uploads.len()` records.
    pub async fn process_batch(&self, uploads: &[Upload]) -> ResultSet {
        let total = uploads.len();
        info!("Starting batch: {} images, model {}", total, self.config.model);
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_batch_start(total);
        }

        let mut results = ResultSet::with_capacity(total);
        for (i, upload) in uploads.iter().enumerate() {
            let index = i + 1;
            if let Some(ref cb) = self.config.progress_callback {
                cb.on_image_start(index, total, &upload.file_name);
            }

            let record = self.process_image(upload).await;

            if let Some(ref cb) = self.config.progress_callback {
                match &record.error {
                    None => cb.on_image_complete(index, total, &upload.file_name),
                    Some(e) => cb.on_image_error(index, total, &upload.file_name, &e.to_string()),
                }
            }
            results.push(record);
        }

        let stats = results.stats();
        info!(
            "Batch complete: {}/{} images, {}ms",
            stats.succeeded, stats.total_images, stats.total_duration_ms
        );
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_batch_complete(total, stats.succeeded);
        }
        results
    }
}

/// Decode and PNG-encode one upload.
///
/// Both steps are CPU-bound on inputs up to the upload cap, so they run on
/// tokio's blocking thread pool rather than the async executor.
async fn prepare(upload: &Upload) -> Result<EncodedPayload, ItemError> {
    let owned = upload.clone();
    tokio::task::spawn_blocking(move || {
        let input = decode_upload(&owned)?;
        encode_image(&input.image).map_err(|e| ItemError::InvalidImage {
            detail: format!("'{}': encoding failed: {}", owned.file_name, e),
        })
    })
    .await
    .map_err(|e| ItemError::InvalidImage {
        detail: format!("'{}': decode task failed: {}", upload.file_name, e),
    })?
}

/// Synchronous wrapper around [`Extractor::process_batch`].
///
/// Creates a temporary tokio runtime internally; do not call from inside an
/// async context.
pub fn process_batch_sync(
    config: ExtractionConfig,
    uploads: &[Upload],
) -> Result<ResultSet, Img2XlsxError> {
    let extractor = Extractor::new(config)?;
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| Img2XlsxError::Internal(format!("Failed to create tokio runtime: {}", e)))?;
    Ok(runtime.block_on(extractor.process_batch(uploads)))
}
