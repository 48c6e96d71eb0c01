//! Configuration types for image text extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. The configuration is an explicit value
//! scoped to one processing session: the API key and the backend built from it
//! live exactly as long as the [`crate::extract::Extractor`] that owns them.
//! Nothing is read from process-wide state.

use crate::error::Img2XlsxError;
use crate::pipeline::llm::VisionBackend;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default vision model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default response-length cap in tokens.
pub const DEFAULT_MAX_TOKENS: usize = 2000;

/// Bearer credential for the vision provider.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, rejecting blank input.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Source and target language names as written into the instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self::new("English", "Korean")
    }
}

/// Configuration for one extraction session.
///
/// Built via [`ExtractionConfig::builder()`].
///
/// # Example
/// ```rust
/// use edgequake_img2xlsx::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .api_key("sk-test")
///     .model("gpt-4o")
///     .max_tokens(2000)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_tokens, 2000);
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Operator-supplied credential. Required unless `backend` is set.
    pub api_key: Option<ApiKey>,

    /// Vision model identifier. Default: `gpt-4o`.
    pub model: String,

    /// Maximum tokens the model may generate per image. Default: 2000.
    ///
    /// The answer is a single `<result>` block, so 2 000 tokens covers a dense
    /// page of text plus its translation.
    pub max_tokens: usize,

    /// Sampling temperature. `None` leaves the provider default.
    pub temperature: Option<f32>,

    /// Languages named in the instruction. Default: English → Korean.
    pub languages: LanguagePair,

    /// Custom instruction. If None, uses the built-in template.
    pub instruction: Option<String>,

    /// Pre-constructed backend. Takes precedence over `api_key`.
    pub backend: Option<Arc<dyn VisionBackend>>,

    /// Per-image progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            languages: LanguagePair::default(),
            instruction: None,
            backend: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("api_key", &self.api_key)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("languages", &self.languages)
            .field("instruction", &self.instruction.as_ref().map(|s| s.len()))
            .field("backend", &self.backend.as_ref().map(|_| "<dyn VisionBackend>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
            raw_api_key: None,
        }
    }

    /// The instruction sent with every image.
    pub fn instruction_text(&self) -> String {
        self.instruction
            .clone()
            .unwrap_or_else(|| crate::prompts::build_instruction(&self.languages))
    }
}

/// Builder for [`ExtractionConfig`].
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
    raw_api_key: Option<String>,
}

impl fmt::Debug for ExtractionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfigBuilder")
            .field("config", &self.config)
            .field("api_key_set", &self.raw_api_key.is_some())
            .finish()
    }
}

impl ExtractionConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.raw_api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = Some(t.clamp(0.0, 2.0));
        self
    }

    pub fn languages(mut self, languages: LanguagePair) -> Self {
        self.config.languages = languages;
        self
    }

    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.config.instruction = Some(instruction.into());
        self
    }

    pub fn backend(mut self, backend: Arc<dyn VisionBackend>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// A missing or blank API key is a fatal [`Img2XlsxError::MissingCredential`]
    /// unless a backend was injected.
    pub fn build(self) -> Result<ExtractionConfig, Img2XlsxError> {
        let mut config = self.config;
        config.api_key = self.raw_api_key.and_then(ApiKey::new);

        if config.api_key.is_none() && config.backend.is_none() {
            return Err(Img2XlsxError::MissingCredential);
        }
        if config.model.trim().is_empty() {
            return Err(Img2XlsxError::InvalidConfig("Model must not be empty".into()));
        }
        if config.max_tokens == 0 {
            return Err(Img2XlsxError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if config.languages.source.trim().is_empty() || config.languages.target.trim().is_empty()
        {
            return Err(Img2XlsxError::InvalidConfig(
                "Source and target languages must not be empty".into(),
            ));
        }
        Ok(config)
    }
}
