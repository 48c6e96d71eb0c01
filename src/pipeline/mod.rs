//! Pipeline stages for image text extraction.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! decode ──▶ encode ──▶ llm ──▶ parse
//! (bytes)    (base64)   (VLM)   (<result> block)
//! ```
//!
//! 1. [`decode`] — turn uploaded bytes into an [`decode::ImageInput`], PNG/JPEG only
//! 2. [`encode`] — PNG-encode and base64-wrap the image for the request body
//! 3. [`llm`]    — the single network call, behind the [`llm::VisionBackend`] seam
//! 4. [`parse`]  — pull the first `<result>` block out of the reply

pub mod decode;
pub mod encode;
pub mod llm;
pub mod parse;
