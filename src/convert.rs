//! Conversion entry points: resolve the input, run the selected extraction
//! branch, and optionally transform the result.
//!
//! Data flows strictly forward — raw bytes, extracted content string,
//! optional transformed HTML — and nothing is retained between invocations.
//! Each call is independent and stateless with respect to prior runs.

use crate::config::{Approach, ConversionConfig};
use crate::error::Pdf2HtmlError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::{extract, html, input};
use crate::transform;
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Convert a PDF file or URL.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str` — Local file path or HTTP/HTTPS URL to a PDF
/// * `config` — Conversion configuration
///
/// # Errors
/// Fatal errors only: unreadable input, corrupt PDF, missing provider, or a
/// failed transformation (which discards all partial output). OCR failures
/// are embedded into the content stream instead of surfacing here.
pub async fn convert(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2HtmlError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting conversion: {} ({})", input_str, config.approach);

    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    convert_resolved(resolved.path(), config, total_start).await
}

/// Convert PDF bytes in memory.
///
/// The buffer is staged through a scoped temporary file that is removed on
/// every exit path. This is the API for PDF data arriving from an upload,
/// database, or network stream rather than a file on disk.
pub async fn convert_from_bytes(
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2HtmlError> {
    let total_start = Instant::now();
    info!(
        "Starting conversion from {} uploaded bytes ({})",
        bytes.len(),
        config.approach
    );

    let staged = input::stage_bytes(bytes)?;
    // `staged` is dropped (and the temp file deleted) when this returns
    convert_resolved(staged.path(), config, total_start).await
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2HtmlError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2HtmlError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(input_str, config))
}

/// Shared tail of the conversion: dispatch on approach, collect stats.
async fn convert_resolved(
    pdf_path: &Path,
    config: &ConversionConfig,
    total_start: Instant,
) -> Result<ConversionOutput, Pdf2HtmlError> {
    match config.approach {
        Approach::Direct => {
            let extract_start = Instant::now();
            let extracted = html::extract_html(pdf_path, config).await?;
            let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

            info!(
                "Direct extraction complete: {} pages in {}ms",
                extracted.page_count, extract_duration_ms
            );

            Ok(ConversionOutput {
                text: None,
                html: Some(extracted.html),
                stats: ConversionStats {
                    total_pages: extracted.page_count,
                    extract_duration_ms,
                    total_duration_ms: total_start.elapsed().as_millis() as u64,
                    ..Default::default()
                },
            })
        }

        Approach::Ai => {
            let extract_start = Instant::now();
            let extracted = extract::extract_text(pdf_path, config).await?;
            let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

            info!(
                "AI extraction complete: {} pages, {} OCR'd images in {}ms",
                extracted.page_count, extracted.ocr_images, extract_duration_ms
            );

            let mut stats = ConversionStats {
                total_pages: extracted.page_count,
                ocr_images: extracted.ocr_images,
                extract_duration_ms,
                ..Default::default()
            };

            let html = if config.transform {
                let provider = resolve_provider(config)?;
                let transform_start = Instant::now();
                let transformed =
                    transform::transform_to_html(&extracted.content, &provider, config).await?;
                stats.transform_duration_ms = transform_start.elapsed().as_millis() as u64;
                stats.llm_requests = transformed.requests;
                stats.total_input_tokens = transformed.input_tokens;
                stats.total_output_tokens = transformed.output_tokens;

                info!(
                    "Transformation complete: {} requests in {}ms",
                    transformed.requests, stats.transform_duration_ms
                );
                Some(transformed.html)
            } else {
                None
            };

            stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
            Ok(ConversionOutput {
                text: Some(extracted.content),
                html,
                stats,
            })
        }
    }
}

/// Write the downloadable artifacts to `dir`.
///
/// `document.txt` (when text is present) and `document.html` (when HTML is
/// present), each via atomic write (temp file + rename) to prevent partial
/// files. Returns the paths written.
pub async fn write_outputs(
    output: &ConversionOutput,
    dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, Pdf2HtmlError> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| Pdf2HtmlError::OutputWriteFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;

    let mut written = Vec::new();

    if let Some(ref text) = output.text {
        let path = dir.join("document.txt");
        write_atomic(&path, text).await?;
        written.push(path);
    }
    if let Some(ref html) = output.html {
        let path = dir.join("document.html");
        write_atomic(&path, html).await?;
        written.push(path);
    }

    Ok(written)
}

async fn write_atomic(path: &Path, contents: &str) -> Result<(), Pdf2HtmlError> {
    let ext = path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    let tmp_path = path.with_extension(ext);
    tokio::fs::write(&tmp_path, contents)
        .await
        .map_err(|e| Pdf2HtmlError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Pdf2HtmlError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

// ── Provider resolution ──────────────────────────────────────────────────

/// Instantiate a named provider with the given model.
fn create_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, Pdf2HtmlError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        Pdf2HtmlError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) — used as-is; lets callers
///    wrap the provider with middleware or supply a test double.
/// 2. **Named provider + model** (`config.provider_name`) — the factory
///    reads the matching API key (`OPENAI_API_KEY`, etc.) from the
///    environment.
/// 3. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`) —
///    a provider and model chosen at the execution-environment level.
/// 4. **Full auto-detection** (`ProviderFactory::from_env`) — first
///    available provider wins, with OpenAI preferred when its key is set.
///
/// The credential is only needed when the AI approach actually transforms;
/// the Direct approach and transform-off extraction never call this.
fn resolve_provider(config: &ConversionConfig) -> Result<Arc<dyn LLMProvider>, Pdf2HtmlError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or("gpt-4.1-nano");
        return create_provider(name, model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    // Prefer OpenAI explicitly when an OpenAI API key is present, so users
    // with multiple provider keys get a deterministic default.
    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            let model = config.model.as_deref().unwrap_or("gpt-4.1-nano");
            return create_provider("openai", model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| Pdf2HtmlError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}
