//! CLI binary for pdf2html.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, shows a busy indicator while the pipeline runs, and
//! writes the `document.txt` / `document.html` artifacts.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2html::{convert, write_outputs, Approach, ConversionConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract text + OCR and transform to HTML (writes document.txt, document.html)
  pdf2html report.pdf

  # Direct structural HTML, no LLM and no API key needed
  pdf2html --approach direct report.pdf

  # Extraction only, skip the LLM transformation
  pdf2html --no-transform report.pdf

  # Choose model and provider explicitly
  pdf2html --provider openai --model gpt-4.1-mini report.pdf

  # Convert from URL into a chosen directory
  pdf2html https://example.com/report.pdf -o out/

  # Print the HTML to stdout instead of writing files
  pdf2html --stdout report.pdf

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID
  PDFIUM_LIB_PATH         Path to an existing libpdfium

SETUP:
  1. Install tesseract (embedded-image OCR):  apt install tesseract-ocr
  2. Set an API key (AI approach only):       export OPENAI_API_KEY=sk-...
  3. Convert:                                 pdf2html document.pdf
"#;

/// Convert PDF files and URLs to text and semantic HTML.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2html",
    version,
    about = "Convert PDF files and URLs to plain text (with OCR) or semantic HTML",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Extraction approach: ai (text + OCR + LLM) or direct (structural HTML).
    #[arg(long, env = "PDF2HTML_APPROACH", value_enum, default_value = "ai")]
    approach: ApproachArg,

    /// Directory for document.txt / document.html artifacts.
    #[arg(short, long, env = "PDF2HTML_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Print the result to stdout instead of writing files.
    #[arg(long)]
    stdout: bool,

    /// Skip the LLM transformation (AI approach: extraction only).
    #[arg(long, env = "PDF2HTML_NO_TRANSFORM")]
    no_transform: bool,

    /// LLM model ID (e.g. gpt-4.1-nano, gpt-4.1-mini).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, env = "EDGEQUAKE_PROVIDER")]
    provider: Option<String>,

    /// Pages per LLM request.
    #[arg(long, env = "PDF2HTML_BATCH_SIZE", default_value_t = 1)]
    batch_size: usize,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "PDF2HTML_TEMPERATURE", default_value_t = 0.5)]
    temperature: f32,

    /// Max LLM output tokens per request.
    #[arg(long, env = "PDF2HTML_MAX_TOKENS", default_value_t = 8000)]
    max_tokens: usize,

    /// Tesseract language code for embedded-image OCR.
    #[arg(long, env = "PDF2HTML_OCR_LANG", default_value = "eng")]
    ocr_lang: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2HTML_PASSWORD")]
    password: Option<String>,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF2HTML_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Output the structured result as JSON on stdout.
    #[arg(long, env = "PDF2HTML_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2HTML_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2HTML_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum ApproachArg {
    Ai,
    Direct,
}

impl From<ApproachArg> for Approach {
    fn from(v: ApproachArg) -> Self {
        match v {
            ApproachArg::Ai => Approach::Ai,
            ApproachArg::Direct => Approach::Direct,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_spinner = !cli.quiet && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_spinner {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    // ── Busy indicator ───────────────────────────────────────────────────
    // The pipeline is a single blocking request/response cycle; a spinner
    // is all the feedback there is to give until it returns.
    let spinner = if show_spinner {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message("Processing…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let result = convert(&cli.input, &config).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let output = result.context("Conversion failed")?;

    // ── Emit results ─────────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if cli.stdout {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        let body = output
            .html
            .as_deref()
            .or(output.text.as_deref())
            .unwrap_or_default();
        handle
            .write_all(body.as_bytes())
            .context("Failed to write to stdout")?;
        if !body.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    } else {
        let written = write_outputs(&output, &cli.output_dir)
            .await
            .context("Failed to write output artifacts")?;
        if !cli.quiet {
            for path in &written {
                eprintln!("wrote {}", path.display());
            }
        }
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "{} pages, {} OCR'd images, {} LLM requests, {}ms total",
            output.stats.total_pages,
            output.stats.ocr_images,
            output.stats.llm_requests,
            output.stats.total_duration_ms,
        );
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .approach(cli.approach.clone().into())
        .batch_size(cli.batch_size)
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .transform(!cli.no_transform)
        .ocr_language(cli.ocr_lang.clone())
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(ref password) = cli.password {
        builder = builder.password(password.clone());
    }

    builder.build().context("Invalid configuration")
}
