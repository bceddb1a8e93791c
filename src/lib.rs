//! # pdf2html
//!
//! Convert PDF documents to plain text (with OCR of embedded images) or to
//! semantic HTML, optionally reformatted by an LLM.
//!
//! ## Two approaches
//!
//! * **AI** — pdfium extracts each page's native text, tesseract OCRs every
//!   embedded image, and the result is a page-delimited plain-text stream.
//!   The stream is then (optionally) sent to an LLM page-group by
//!   page-group and reformatted into restricted-vocabulary HTML (`<p>`,
//!   `<h1>`, `<h2>`, table tags).
//! * **Direct** — each page is rendered as a small HTML fragment, a fixed
//!   CSS block is prepended once, and a styling class is appended to every
//!   page container. No LLM involved.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      resolve local file, URL, or uploaded bytes
//!  ├─ 2a. Extract   page text + OCR'd image text, page-delimited   (AI)
//!  ├─ 3a. Transform batched LLM calls, HTML fragments rejoined     (AI)
//!  ├─ 2b. Html      per-page fragments + CSS + class rewrite       (Direct)
//!  └─ 4. Output     document.txt / document.html artifacts
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2html::{convert, write_outputs, Approach, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / …
//!     let config = ConversionConfig::builder()
//!         .approach(Approach::Ai)
//!         .build()?;
//!     let output = convert("document.pdf", &config).await?;
//!     write_outputs(&output, ".").await?;
//!     eprintln!(
//!         "{} pages, {} LLM requests",
//!         output.stats.total_pages, output.stats.llm_requests
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2html` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2html = { version = "0.3", default-features = false }
//! ```
//!
//! ## External requirements
//!
//! * A pdfium shared library (`PDFIUM_LIB_PATH` points at an existing copy).
//! * The `tesseract` CLI on PATH for OCR of embedded images — without it
//!   the pipeline still completes, embedding an error note per image.
//! * An LLM API key for the AI approach's transformation step only.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod transform;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{Approach, ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_from_bytes, convert_sync, write_outputs};
pub use error::Pdf2HtmlError;
pub use output::{ConversionOutput, ConversionStats};
pub use pipeline::extract::PAGE_DELIMITER;
pub use transform::{group_pages, transform_to_html, TransformOutput};
