//! Prompts for the text-to-HTML transformation.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the allowed tag vocabulary or the
//!    boilerplate rule requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect prompts directly without a
//!    live LLM, making prompt regressions easy to catch.
//!
//! Callers can override the default via
//! [`crate::config::ConversionConfig::system_prompt`]; the constant here is
//! used only when no override is provided.

/// Default system prompt for converting extracted page text to HTML.
///
/// The tag vocabulary is deliberately minimal — paragraphs, two heading
/// levels, and the table family — so the output renders predictably without
/// any styling. The HTML boilerplate must appear attached to page 1 only;
/// repeating it per page would break concatenation of the per-page fragments
/// into one document.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You will be tasked with converting text content into HTML format across multiple pages. \
Please use only basic HTML tags like <p>, <h1>, <h2>, and <table> without any styling. \
Ensure that you use these tags to structure the content appropriately. USE UTF-8 encoding. \
For any content that needs to be presented in a table format, \
use the <table>, <tr>, and <td> tags to create the tables. \
Make sure the HTML is simple and only uses these tags for structure. \
Start with the following HTML boilerplate on PAGE 1 only, and do not repeat it for subsequent pages:\n\
<!DOCTYPE html>\n<html>\n<head>\n<title></title>\n</head>\n<body>\n\
Ensure consistent HTML structure and syntax for a valid HTML document.";

/// Build the per-group user instruction.
///
/// The group's raw text is embedded verbatim; the trailing sentence nudges
/// the model to render tabular content with table tags rather than
/// flattening it into paragraphs.
pub fn user_prompt(page_group: &str) -> String {
    format!(
        "Transform this Text to structural HTML: {page_group}. \
Each page may contain multiple tables. Focus on transforming the different Tables \
to their correct format they need to be transformed to tables also."
    )
}
