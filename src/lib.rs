//! # edgequake-img2xlsx
//!
//! Read the text in images with a Vision Language Model, translate it, and
//! export the results as an Excel sheet.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload (PNG/JPEG)
//!  │
//!  ├─ 1. Decode   sniff format, reject anything but PNG/JPEG
//!  ├─ 2. Encode   re-encode as PNG → base64 payload
//!  ├─ 3. VLM      one call per image: instruction + inline image
//!  ├─ 4. Parse    first <result><text>…</text><translation>…</translation></result>
//!  └─ 5. Output   ordered ResultSet → HTML table + .xlsx download
//! ```
//!
//! Images are processed one at a time in upload order. A failed image never
//! aborts the batch: it keeps its row with a sentinel result. The only fatal
//! error is a missing API key, which stops the batch before any image is read.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_img2xlsx::{to_xlsx_bytes, ExtractionConfig, Extractor, Upload};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::builder().api_key("sk-...").build()?;
//!     let extractor = Extractor::new(config)?;
//!
//!     let uploads = vec![Upload::new("sign.png", std::fs::read("sign.png")?)];
//!     let results = extractor.process_batch(&uploads).await;
//!     for [file, text, translation] in results.rows() {
//!         println!("{file}: {text} → {translation}");
//!     }
//!     std::fs::write("results.xlsx", to_xlsx_bytes(&results)?)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `img2xlsx` web server binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod web;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ApiKey, ExtractionConfig, ExtractionConfigBuilder, LanguagePair};
pub use error::{BackendError, Img2XlsxError, ItemError};
pub use export::{to_xlsx_bytes, EXPORT_FILE_NAME, XLSX_MIME};
pub use extract::{process_batch_sync, Extractor};
pub use output::{BatchStats, ExtractionResult, ResultRecord, ResultSet};
pub use pipeline::decode::Upload;
pub use pipeline::encode::{encode_image, EncodedPayload};
pub use pipeline::llm::{LlmBackend, VisionBackend, VisionRequest};
pub use progress::{
    ExtractionProgressCallback, NoopProgressCallback, ProgressCallback, TracingProgressCallback,
};
