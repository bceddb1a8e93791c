//! AI-branch content loading: native page text plus OCR of embedded images,
//! assembled into a page-delimited plain-text stream.
//!
//! ## Stream Layout
//!
//! For each page, in order, the stream carries a `PAGE {n}` header, the
//! page's native extractable text, then the OCR output for every embedded
//! image on that page, then [`PAGE_DELIMITER`]. Native text always precedes
//! image-derived text for the same page, and the delimiter follows every
//! page including the last — splitting on it and rejoining reproduces the
//! stream exactly.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. The tesseract subprocess blocks too. Both run on a dedicated
//! blocking thread so Tokio workers never stall.
//!
//! The delimiter is not escaped if it happens to occur inside a page's own
//! text; a document whose content literally contains `\n\n----\n\n` will
//! split into more segments than it has pages. Known segmentation gap.

use crate::config::ConversionConfig;
use crate::error::Pdf2HtmlError;
use crate::pipeline::ocr::OcrEngine;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Literal separating page-level content units in the extracted stream.
///
/// The transformer splits on exactly this sequence; emission and parsing
/// must agree on it for the AI approach to function.
pub const PAGE_DELIMITER: &str = "\n\n----\n\n";

/// Result of the AI-branch extraction.
pub struct ExtractedText {
    /// The page-delimited content stream.
    pub content: String,
    /// Number of pages in the source document.
    pub page_count: usize,
    /// Number of embedded images that went through OCR.
    pub ocr_images: usize,
}

/// Extract the page-delimited text stream from a PDF.
///
/// Runs inside `spawn_blocking` since pdfium and tesseract are blocking.
pub async fn extract_text(
    pdf_path: &Path,
    config: &ConversionConfig,
) -> Result<ExtractedText, Pdf2HtmlError> {
    let path = pdf_path.to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || extract_text_blocking(&path, &config))
        .await
        .map_err(|e| Pdf2HtmlError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Blocking implementation of the AI-branch extraction.
fn extract_text_blocking(
    pdf_path: &Path,
    config: &ConversionConfig,
) -> Result<ExtractedText, Pdf2HtmlError> {
    let pdfium = Pdfium::default();
    let document = open_document(&pdfium, pdf_path, config.password.as_deref())?;
    let ocr = OcrEngine::new(config);

    let pages = document.pages();
    let page_count = pages.len() as usize;
    info!("PDF loaded: {} pages", page_count);

    let mut content = String::new();
    let mut ocr_images = 0usize;

    for (idx, page) in pages.iter().enumerate() {
        let page_num = idx + 1;
        content.push_str(&page_header(page_num));

        let text = page
            .text()
            .map_err(|e| Pdf2HtmlError::Extraction {
                page: page_num,
                detail: format!("{:?}", e),
            })?
            .all();
        content.push_str(&text);

        // OCR every embedded image, in object order. A broken image object
        // costs its own text only; the marker string is embedded in place.
        for object in page.objects().iter() {
            if let Some(image_object) = object.as_image_object() {
                ocr_images += 1;
                match image_object.get_raw_image() {
                    Ok(image) => content.push_str(&ocr.recognize(&image)),
                    Err(e) => {
                        warn!("Page {}: undecodable embedded image: {:?}", page_num, e);
                        content.push_str(&format!(
                            "{}{:?}",
                            crate::pipeline::ocr::OCR_ERROR_PREFIX,
                            e
                        ));
                    }
                }
            }
        }

        content.push_str(PAGE_DELIMITER);
        debug!("Extracted page {}/{}", page_num, page_count);
    }

    Ok(ExtractedText {
        content,
        page_count,
        ocr_images,
    })
}

/// Header line emitted before each page's content. 1-based, monotonic.
pub(crate) fn page_header(page_num: usize) -> String {
    format!("PAGE {page_num}\n\n")
}

/// Open a PDF with pdfium, mapping load failures to typed errors.
pub(crate) fn open_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, Pdf2HtmlError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                Pdf2HtmlError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                Pdf2HtmlError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            Pdf2HtmlError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_headers_are_one_based() {
        assert_eq!(page_header(1), "PAGE 1\n\n");
        assert_eq!(page_header(12), "PAGE 12\n\n");
    }

    #[test]
    fn delimiter_split_rejoin_round_trips() {
        // The stream ends with a delimiter, so split/rejoin must be lossless.
        let stream = format!(
            "{}Hello{}{}World{}",
            page_header(1),
            PAGE_DELIMITER,
            page_header(2),
            PAGE_DELIMITER
        );
        let parts: Vec<&str> = stream.split(PAGE_DELIMITER).collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2], "");
        assert_eq!(parts.join(PAGE_DELIMITER), stream);
    }

    #[test]
    fn delimiter_collision_inflates_segment_count() {
        // A page whose own text contains the delimiter splits into extra
        // segments. Documented gap, not silently repaired.
        let stream = format!(
            "{}before{}after{}",
            page_header(1),
            PAGE_DELIMITER,
            PAGE_DELIMITER
        );
        let parts: Vec<&str> = stream.split(PAGE_DELIMITER).collect();
        assert_eq!(parts.len(), 3, "one page, but three segments");
        assert_eq!(parts.join(PAGE_DELIMITER), stream);
    }
}
