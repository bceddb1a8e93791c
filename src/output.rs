//! Output types returned by the conversion entry points.

use serde::{Deserialize, Serialize};

/// Result of a full conversion.
///
/// Which fields are populated depends on the approach:
///
/// | Approach | `text` | `html` |
/// |----------|--------|--------|
/// | AI, transform on  | delimited text stream | LLM-generated HTML |
/// | AI, transform off | delimited text stream | — |
/// | Direct            | — | styled HTML document |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Page-delimited plain-text stream (AI approach only).
    pub text: Option<String>,
    /// HTML document: direct extraction or the transformed result.
    pub html: Option<String>,
    /// Counters and timings for the run.
    pub stats: ConversionStats,
}

/// Statistics about a conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the source document.
    pub total_pages: usize,
    /// Embedded images that went through OCR (AI approach only).
    pub ocr_images: usize,
    /// Remote requests issued by the transformer.
    pub llm_requests: usize,
    /// Token usage summed across all requests.
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    /// Wall-clock time spent extracting content.
    pub extract_duration_ms: u64,
    /// Wall-clock time spent in the HTML transformation.
    pub transform_duration_ms: u64,
    /// Total end-to-end time.
    pub total_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_round_trips_through_json() {
        let output = ConversionOutput {
            text: Some("PAGE 1\n\nHello\n\n----\n\n".into()),
            html: Some("<p>Hello</p>".into()),
            stats: ConversionStats {
                total_pages: 1,
                llm_requests: 1,
                ..Default::default()
            },
        };

        let json = serde_json::to_string(&output).unwrap();
        let back: ConversionOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.text, output.text);
        assert_eq!(back.stats.total_pages, 1);
    }
}
