//! HTML transformation: send the page-delimited text stream to the LLM in
//! fixed-size batches and concatenate the returned fragments.
//!
//! ## Algorithm
//!
//! 1. Split the AI-branch stream on [`PAGE_DELIMITER`].
//! 2. Partition into consecutive groups of `batch_size` pages, rejoining
//!    group members with the same delimiter.
//! 3. Groups that are empty after trimming are dropped — no request is
//!    issued for them and they contribute no delimiter to the result.
//! 4. One sequential `chat` call per remaining group; each request carries
//!    the restricted-tag system prompt and the group's text. There is no
//!    retry and no concurrency — each request is awaited to completion or
//!    failure before the next begins.
//! 5. Returned fragments are joined with [`PAGE_DELIMITER`], so N emitted
//!    groups yield exactly N−1 internal delimiters and page boundaries
//!    survive for downstream consumers that still split on them.
//!
//! Any request failure aborts the whole transformation: all accumulated
//! fragments are discarded and [`Pdf2HtmlError::Transformation`] is
//! returned in their place.

use crate::config::ConversionConfig;
use crate::error::Pdf2HtmlError;
use crate::pipeline::extract::PAGE_DELIMITER;
use crate::prompts::{user_prompt, DEFAULT_SYSTEM_PROMPT};
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Result of a successful transformation.
pub struct TransformOutput {
    /// Concatenated HTML fragments, delimiter-joined.
    pub html: String,
    /// Number of remote requests issued.
    pub requests: usize,
    /// Token usage summed across requests.
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Transform a page-delimited text stream into HTML via the LLM.
///
/// `content` must be output of the AI-branch loader (or anything sharing
/// its delimiter convention).
pub async fn transform_to_html(
    content: &str,
    provider: &Arc<dyn LLMProvider>,
    config: &ConversionConfig,
) -> Result<TransformOutput, Pdf2HtmlError> {
    let groups = group_pages(content, config.batch_size);
    info!(
        "Transforming {} page group(s), batch size {}",
        groups.len(),
        config.batch_size
    );

    let system_prompt = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);
    let options = build_options(config);

    let mut fragments: Vec<String> = Vec::with_capacity(groups.len());
    let mut input_tokens = 0u64;
    let mut output_tokens = 0u64;

    for (i, group) in groups.iter().enumerate() {
        let start = Instant::now();
        let messages = vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(user_prompt(group)),
        ];

        // First failure wins: partial output is discarded, not returned.
        let response = provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| Pdf2HtmlError::Transformation {
                detail: e.to_string(),
            })?;

        debug!(
            "Group {}/{}: {} in / {} out tokens, {:?}",
            i + 1,
            groups.len(),
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );

        input_tokens += response.prompt_tokens as u64;
        output_tokens += response.completion_tokens as u64;
        fragments.push(clean_response(&response.content));
    }

    let requests = fragments.len();
    Ok(TransformOutput {
        html: fragments.join(PAGE_DELIMITER),
        requests,
        input_tokens,
        output_tokens,
    })
}

/// Split the stream into trimmed, non-empty page groups of `batch_size`.
///
/// Visible to tests: the grouping rules are the contract the end-to-end
/// properties (request count, delimiter count) depend on.
pub fn group_pages(content: &str, batch_size: usize) -> Vec<String> {
    let pages: Vec<&str> = content.split(PAGE_DELIMITER).collect();

    pages
        .chunks(batch_size.max(1))
        .map(|chunk| chunk.join(PAGE_DELIMITER).trim().to_string())
        .filter(|group| !group.is_empty())
        .collect()
}

/// Build `CompletionOptions` from the conversion config.
fn build_options(config: &ConversionConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

// ── Response cleanup ─────────────────────────────────────────────────────
//
// Models occasionally wrap output in ```html fences or emit CRLF line
// endings despite the prompt. These passes are deterministic and never
// touch delimiters or add trailing content, so the fragment-concatenation
// properties above are unaffected.

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:html)?\n(.*)\n```\s*$").unwrap());

fn clean_response(input: &str) -> String {
    let s = strip_html_fences(input);
    let s = s.replace("\r\n", "\n").replace('\r', "\n");
    remove_invisible_chars(&s)
}

fn strip_html_fences(input: &str) -> String {
    if let Some(caps) = RE_OUTER_FENCES.captures(input.trim()) {
        caps[1].to_string()
    } else {
        input.to_string()
    }
}

fn remove_invisible_chars(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}'))
        .collect()
}
