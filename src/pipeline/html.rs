//! Direct-branch content loading: cleaned HTML assembled from per-page
//! fragments.
//!
//! Each page's structural text is rendered into a small HTML fragment (one
//! `<p>` per text line inside a page `<div>`), a fixed CSS block is
//! prepended once, and the styling class is appended to every page's
//! top-level container via a `lol_html` rewrite. The rewrite appends to an
//! existing class attribute and creates one when absent — it never replaces
//! classes already present.

use crate::config::ConversionConfig;
use crate::error::Pdf2HtmlError;
use crate::pipeline::extract::open_document;
use lol_html::{element, rewrite_str, RewriteStrSettings};
use pdfium_render::prelude::*;
use std::cell::Cell;
use std::path::Path;
use tracing::{debug, info};

/// Result of the Direct-branch extraction.
pub struct ExtractedHtml {
    /// Styled HTML document: CSS block plus per-page fragments.
    pub html: String,
    /// Number of pages in the source document.
    pub page_count: usize,
}

/// Extract a cleaned HTML document from a PDF.
///
/// Runs inside `spawn_blocking` since pdfium is blocking.
pub async fn extract_html(
    pdf_path: &Path,
    config: &ConversionConfig,
) -> Result<ExtractedHtml, Pdf2HtmlError> {
    let path = pdf_path.to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || extract_html_blocking(&path, &config))
        .await
        .map_err(|e| Pdf2HtmlError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Blocking implementation of the Direct-branch extraction.
fn extract_html_blocking(
    pdf_path: &Path,
    config: &ConversionConfig,
) -> Result<ExtractedHtml, Pdf2HtmlError> {
    let pdfium = Pdfium::default();
    let document = open_document(&pdfium, pdf_path, config.password.as_deref())?;

    let pages = document.pages();
    let page_count = pages.len() as usize;
    info!("PDF loaded: {} pages", page_count);

    // The CSS block comes first, exactly once.
    let mut html = css_block(&config.page_class);

    for (idx, page) in pages.iter().enumerate() {
        let page_num = idx + 1;
        let text = page
            .text()
            .map_err(|e| Pdf2HtmlError::Extraction {
                page: page_num,
                detail: format!("{:?}", e),
            })?
            .all();

        let fragment = page_fragment(&text);
        let tagged = append_page_class(&fragment, &config.page_class)?;
        html.push_str(&tagged);
        html.push_str("\n\n");

        debug!("Rendered page {}/{} as HTML fragment", page_num, page_count);
    }

    Ok(ExtractedHtml { html, page_count })
}

/// The styling block prepended once, ahead of all page fragments.
pub fn css_block(page_class: &str) -> String {
    format!(
        "\
<style>
    .{page_class} {{
        text-align: center;
        margin-left: auto;
        margin-right: auto;
    }}
</style>
"
    )
}

/// Render one page's text as an indented HTML fragment.
///
/// One `<p>` per non-blank line, text escaped. The top-level `<div>` is
/// emitted without a class attribute; [`append_page_class`] adds it.
pub fn page_fragment(page_text: &str) -> String {
    let mut fragment = String::from("<div>\n");
    for line in page_text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        fragment.push_str("  <p>\n   ");
        fragment.push_str(&html_escape::encode_text(line));
        fragment.push_str("\n  </p>\n");
    }
    fragment.push_str("</div>");
    fragment
}

/// Append `page_class` to the fragment's top-level container.
///
/// Creates the class attribute when absent; appends (space-separated) when
/// one already exists. Only the first container element is touched.
pub fn append_page_class(fragment: &str, page_class: &str) -> Result<String, Pdf2HtmlError> {
    let tagged = Cell::new(false);

    macro_rules! container_handler {
        ($selector:literal) => {
            element!($selector, |el| {
                if tagged.get() {
                    return Ok(());
                }
                tagged.set(true);

                let classes = match el.get_attribute("class") {
                    Some(existing) if !existing.trim().is_empty() => {
                        format!("{existing} {page_class}")
                    }
                    _ => page_class.to_string(),
                };
                el.set_attribute("class", &classes)?;
                Ok(())
            })
        };
    }

    let rewritten = rewrite_str(
        fragment,
        RewriteStrSettings {
            // Fragments produced here use a <div> container; <body> covers
            // fragments handed in from full per-page documents.
            element_content_handlers: vec![
                container_handler!("body"),
                container_handler!("div"),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| Pdf2HtmlError::Internal(format!("HTML rewrite failed: {}", e)));
    rewritten
}
