//! Configuration types for PDF-to-HTML conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The original pipeline read its knobs
//! out of ambient UI session state; here everything is an explicit
//! request-scoped value so two runs with the same config are reproducible
//! and diffable.

use crate::error::Pdf2HtmlError;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The two mutually exclusive extraction strategies.
///
/// A single conversion uses exactly one approach; the branches never feed
/// into each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Approach {
    /// Extract native page text plus OCR'd text of embedded images into a
    /// page-delimited plain-text stream, then (optionally) reformat it into
    /// restricted-vocabulary HTML via the LLM.
    #[default]
    Ai,
    /// Assemble cleaned HTML directly from per-page structural fragments,
    /// with no LLM involved.
    Direct,
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Approach::Ai => write!(f, "ai"),
            Approach::Direct => write!(f, "direct"),
        }
    }
}

/// Configuration for a single PDF-to-HTML conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2html::{Approach, ConversionConfig};
///
/// let config = ConversionConfig::builder()
///     .approach(Approach::Ai)
///     .batch_size(1)
///     .model("gpt-4.1-nano")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Extraction strategy. Default: [`Approach::Ai`].
    pub approach: Approach,

    /// Pages per LLM request during the HTML transformation. Default: 1.
    ///
    /// One page per request keeps each completion comfortably inside the
    /// output-token bound and makes the "boilerplate on page 1 only"
    /// instruction unambiguous. Larger batches are supported but trade
    /// per-request cost against truncation risk on dense pages.
    pub batch_size: usize,

    /// Sampling temperature for the LLM completion. Default: 0.5.
    ///
    /// A moderate value: the model is restructuring text it was handed, not
    /// transcribing an image, so a little latitude in tag placement is
    /// acceptable and matches the behaviour callers have come to expect.
    pub temperature: f32,

    /// Maximum tokens the LLM may generate per request. Default: 8000.
    ///
    /// A full page of text plus table markup can be large; setting this too
    /// low silently truncates the HTML mid-element.
    pub max_tokens: usize,

    /// LLM model identifier, e.g. "gpt-4.1-nano".
    /// If None, uses provider default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, uses `ProviderFactory::from_env()`.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Run the HTML transformation after AI extraction. Default: true.
    ///
    /// With this off the AI approach stops at the delimited text stream and
    /// no provider (or API key) is needed at all.
    pub transform: bool,

    /// Custom system prompt for the transformer. If None, uses built-in default.
    pub system_prompt: Option<String>,

    /// Tesseract language code for OCR of embedded images. Default: "eng".
    pub ocr_language: String,

    /// Path to the tesseract executable. Default: "tesseract" (uses PATH).
    pub tesseract_path: String,

    /// CSS class appended to each page's top-level container in the Direct
    /// branch. Default: "centered-content".
    pub page_class: String,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            approach: Approach::Ai,
            batch_size: 1,
            temperature: 0.5,
            max_tokens: 8000,
            model: None,
            provider_name: None,
            provider: None,
            transform: true,
            system_prompt: None,
            ocr_language: "eng".to_string(),
            tesseract_path: "tesseract".to_string(),
            page_class: "centered-content".to_string(),
            password: None,
            download_timeout_secs: 120,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("approach", &self.approach)
            .field("batch_size", &self.batch_size)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("transform", &self.transform)
            .field("ocr_language", &self.ocr_language)
            .field("page_class", &self.page_class)
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn approach(mut self, approach: Approach) -> Self {
        self.config.approach = approach;
        self
    }

    pub fn batch_size(mut self, n: usize) -> Self {
        self.config.batch_size = n.max(1);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn transform(mut self, v: bool) -> Self {
        self.config.transform = v;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn tesseract_path(mut self, path: impl Into<String>) -> Self {
        self.config.tesseract_path = path.into();
        self
    }

    pub fn page_class(mut self, class: impl Into<String>) -> Self {
        self.config.page_class = class.into();
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2HtmlError> {
        let c = &self.config;
        if c.batch_size == 0 {
            return Err(Pdf2HtmlError::InvalidConfig(
                "Batch size must be ≥ 1".into(),
            ));
        }
        if c.page_class.trim().is_empty() {
            return Err(Pdf2HtmlError::InvalidConfig(
                "Page class must not be empty".into(),
            ));
        }
        if c.ocr_language.is_empty()
            || !c
                .ocr_language
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '+' || ch == '_')
        {
            return Err(Pdf2HtmlError::InvalidConfig(format!(
                "Invalid OCR language code '{}'",
                c.ocr_language
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = ConversionConfig::default();
        assert_eq!(c.approach, Approach::Ai);
        assert_eq!(c.batch_size, 1);
        assert_eq!(c.temperature, 0.5);
        assert_eq!(c.max_tokens, 8000);
        assert_eq!(c.ocr_language, "eng");
        assert_eq!(c.page_class, "centered-content");
        assert!(c.transform);
    }

    #[test]
    fn builder_clamps_batch_size_to_one() {
        let c = ConversionConfig::builder().batch_size(0).build().unwrap();
        assert_eq!(c.batch_size, 1);
    }

    #[test]
    fn builder_clamps_temperature() {
        let c = ConversionConfig::builder().temperature(5.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
    }

    #[test]
    fn builder_rejects_bad_ocr_language() {
        let err = ConversionConfig::builder()
            .ocr_language("eng; rm -rf /")
            .build();
        assert!(matches!(err, Err(Pdf2HtmlError::InvalidConfig(_))));
    }

    #[test]
    fn builder_accepts_compound_ocr_language() {
        let c = ConversionConfig::builder()
            .ocr_language("eng+deu")
            .build()
            .unwrap();
        assert_eq!(c.ocr_language, "eng+deu");
    }

    #[test]
    fn builder_rejects_empty_page_class() {
        let err = ConversionConfig::builder().page_class("  ").build();
        assert!(matches!(err, Err(Pdf2HtmlError::InvalidConfig(_))));
    }
}
