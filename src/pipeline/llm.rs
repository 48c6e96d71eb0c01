//! VLM interaction: send one image with the instruction and return the reply.
//!
//! The network call sits behind [`VisionBackend`] so the batch runner never
//! knows which provider it talks to. [`LlmBackend`] is the production
//! implementation on top of `edgequake-llm`; tests plug in scripted backends.
//!
//! Each image gets exactly one attempt. A failed call is reported to the
//! caller as a [`BackendError`] and becomes a sentinel row; nothing here
//! sleeps or retries.

use crate::config::{ApiKey, ExtractionConfig};
use crate::error::{BackendError, Img2XlsxError};
use crate::pipeline::encode::EncodedPayload;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, OpenAIProvider};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// One vision completion request.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub instruction: String,
    pub image: EncodedPayload,
    pub max_tokens: usize,
    pub temperature: Option<f32>,
}

/// A remote model that reads an image and answers in text.
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Send the request and return the raw reply text.
    async fn complete(&self, request: VisionRequest) -> Result<String, BackendError>;
}

/// [`VisionBackend`] over any `edgequake-llm` provider.
pub struct LlmBackend {
    provider: Arc<dyn LLMProvider>,
}

impl LlmBackend {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self { provider }
    }

    /// OpenAI provider authenticated with the session's key.
    pub fn openai(api_key: &ApiKey, model: &str) -> Self {
        let provider = OpenAIProvider::new(api_key.expose()).with_model(model);
        Self::new(Arc::new(provider))
    }
}

#[async_trait]
impl VisionBackend for LlmBackend {
    /// ## Message Layout
    ///
    /// A single user message holding the instruction text and the image as an
    /// inline base64 attachment. No system message: the instruction already
    /// describes the whole task and output grammar.
    async fn complete(&self, request: VisionRequest) -> Result<String, BackendError> {
        let messages = vec![ChatMessage::user_with_images(
            &request.instruction,
            vec![request.image.into_image_data()],
        )];
        let options = CompletionOptions {
            max_tokens: Some(request.max_tokens),
            temperature: request.temperature,
            ..Default::default()
        };

        let start = Instant::now();
        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| BackendError::new(e.to_string()))?;

        debug!(
            "{} input tokens, {} output tokens, {:?}",
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );
        Ok(response.content)
    }
}

/// Resolve the backend for a session.
///
/// An injected backend wins; otherwise the API key builds an OpenAI provider.
pub fn resolve_backend(config: &ExtractionConfig) -> Result<Arc<dyn VisionBackend>, Img2XlsxError> {
    if let Some(ref backend) = config.backend {
        return Ok(Arc::clone(backend));
    }
    let key = config.api_key.as_ref().ok_or(Img2XlsxError::MissingCredential)?;
    Ok(Arc::new(LlmBackend::openai(key, &config.model)))
}

/// Build the request for one image from the session config.
pub fn build_request(config: &ExtractionConfig, image: EncodedPayload) -> VisionRequest {
    VisionRequest {
        instruction: config.instruction_text(),
        image,
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    }
}
