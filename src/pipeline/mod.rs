//! Pipeline stages for PDF-to-HTML conversion.
//!
//! Each submodule implements exactly one stage. Keeping stages separate
//! makes each independently testable and lets us swap implementations
//! (e.g. a different OCR backend) without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//!           input ──▶ extract ──▶ (transform)     AI approach
//!        (URL/path)  (pdfium+ocr)  (LLM)
//!
//!           input ──▶ html                        Direct approach
//!        (URL/path)  (fragments + rewrite)
//! ```
//!
//! 1. [`input`]   — canonicalise the user-supplied path, URL, or byte buffer
//!    to a local file
//! 2. [`extract`] — AI branch: native page text + OCR of embedded images,
//!    page-delimited; runs in `spawn_blocking` because pdfium is not
//!    async-safe
//! 3. [`ocr`]     — best-effort image-to-text via the tesseract CLI
//! 4. [`html`]    — Direct branch: per-page HTML fragments, a fixed CSS
//!    block, and a class rewrite on each page container
//!
//! The two terminal branches (`extract` and `html`) are selected exclusively
//! by [`crate::config::Approach`]; neither invokes the other.

pub mod extract;
pub mod html;
pub mod input;
pub mod ocr;
