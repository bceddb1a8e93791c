//! Best-effort OCR of embedded images via the tesseract CLI.
//!
//! OCR failure must never abort a document: a corrupt embedded image or a
//! missing tesseract install costs that image's text, nothing more. The
//! extractor therefore returns a plain `String` in all cases — recognised
//! text on success, a fixed marker string on failure — so the content loader
//! can concatenate the result into the page stream without special-casing.
//!
//! Tesseract is driven through its CLI (it reads an image file and writes
//! `<base>.txt`). Both files live in a scoped [`TempDir`] so they are
//! removed on every exit path.

use crate::config::ConversionConfig;
use image::DynamicImage;
use std::process::Command;
use tempfile::TempDir;
use tracing::{debug, warn};

/// Marker prefix embedded into the content stream when recognition fails.
pub const OCR_ERROR_PREFIX: &str = "An error occurred during text extraction: ";

/// Image text extractor backed by the tesseract CLI.
pub struct OcrEngine {
    binary: String,
    language: String,
}

impl OcrEngine {
    pub fn new(config: &ConversionConfig) -> Self {
        Self {
            binary: config.tesseract_path.clone(),
            language: config.ocr_language.clone(),
        }
    }

    /// Recognise text in a decoded raster image.
    ///
    /// Never fails: any internal error is converted to a human-readable
    /// string prefixed with [`OCR_ERROR_PREFIX`] so callers can embed the
    /// result directly in the extracted content.
    pub fn recognize(&self, image: &DynamicImage) -> String {
        match self.try_recognize(image) {
            Ok(text) => text,
            Err(detail) => {
                warn!("OCR failed: {}", detail);
                format!("{OCR_ERROR_PREFIX}{detail}")
            }
        }
    }

    fn try_recognize(&self, image: &DynamicImage) -> Result<String, String> {
        let dir = TempDir::new().map_err(|e| e.to_string())?;
        let input_path = dir.path().join("page_image.png");
        let output_base = dir.path().join("recognized");

        image
            .save_with_format(&input_path, image::ImageFormat::Png)
            .map_err(|e| e.to_string())?;

        let output = Command::new(&self.binary)
            .arg(&input_path)
            .arg(&output_base)
            .arg("-l")
            .arg(&self.language)
            .arg("--oem")
            .arg("3")
            .arg("--psm")
            .arg("3")
            .output()
            .map_err(|e| format!("failed to run {}: {}", self.binary, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("tesseract exited with error: {}", stderr.trim()));
        }

        // Tesseract appends .txt to the output base it is given.
        let text_path = output_base.with_extension("txt");
        let text = std::fs::read_to_string(&text_path).map_err(|e| e.to_string())?;

        debug!(
            "OCR recognised {} bytes from {}x{} image",
            text.len(),
            image.width(),
            image.height()
        );
        Ok(text)
    }
}
