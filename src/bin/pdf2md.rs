//! CLI binary for mistral-pdf2md.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConverterConfig`, runs one conversion, and reports the result.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mistral_pdf2md::{
    ConversionProgressCallback, ConversionStage, Converter, ConverterConfig, ProgressCallback,
    SubmissionMode, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal spinner that shows which network round-trip is in flight.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style =
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("pdf2md");
        bar.set_message("Starting…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    /// Remove the spinner without a summary (used on failure).
    fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_stage(&self, stage: ConversionStage) {
        self.bar.set_message(stage.describe());
    }

    fn on_conversion_complete(&self, page_count: usize, markdown_len: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages, {} bytes of Markdown",
            green("✔"),
            bold(&page_count.to_string()),
            markdown_len
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Inline conversion, writes report.md next to the input
  pdf2md report.pdf

  # Choose the output file
  pdf2md report.pdf -o notes/report.md

  # Large file: upload first, then OCR via a signed URL
  pdf2md --upload scanned-book.pdf

ENVIRONMENT VARIABLES:
  MISTRAL_API_KEY     Mistral API key (required; may live in a .env file)
  MISTRAL_BASE_URL    Override the API root (proxies, testing)
  MISTRAL_OCR_MODEL   Override the OCR model id
  PDF2MD_TIMEOUT      Whole-request timeout in seconds (0 = none); it also
                      covers the upload body, so raise it for huge files
"#;

/// Convert a PDF to Markdown with the Mistral OCR API.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2md",
    version,
    about = "Convert a PDF to Markdown with the Mistral OCR API",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the input PDF.
    pdf_path: PathBuf,

    /// Output Markdown path. Default: the input path with a .md extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Upload the file and convert via a signed URL (for large files).
    #[arg(short, long)]
    upload: bool,

    /// Mistral API key.
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// API root URL.
    #[arg(long, env = "MISTRAL_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// OCR model id.
    #[arg(long, env = "MISTRAL_OCR_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Whole-request timeout in seconds, upload body included (0 disables).
    ///
    /// Connecting is separately capped at 30 seconds. Raise this for very
    /// large uploads over slow links.
    #[arg(long, env = "PDF2MD_TIMEOUT", default_value_t = 300)]
    timeout: u64,

    /// Disable the progress spinner.
    #[arg(long, env = "PDF2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs (includes upload request/response details).
    #[arg(short, long, env = "PDF2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result line.
    #[arg(short, long, env = "PDF2MD_QUIET")]
    quiet: bool,
}

impl Cli {
    fn mode(&self) -> SubmissionMode {
        if self.upload {
            SubmissionMode::Upload
        } else {
            SubmissionMode::Inline
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before parsing so clap's `env` fallbacks can see it.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner covers what INFO logs would say, so keep the library quiet
    // while it is on.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
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

    let progress = if show_progress && !cli.verbose {
        Some(CliProgressCallback::new())
    } else {
        None
    };

    match run(&cli, progress.clone()).await {
        Ok(path) => {
            println!("Conversion complete. Output file: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            if let Some(cb) = progress {
                cb.clear();
            }
            eprintln!("{} An error occurred: {e:#}", red("✘"));
            ExitCode::from(1)
        }
    }
}

/// Build the converter from CLI args and run one conversion.
async fn run(cli: &Cli, progress: Option<Arc<CliProgressCallback>>) -> Result<PathBuf> {
    let mut builder = ConverterConfig::builder()
        .api_key(cli.api_key.clone().unwrap_or_default())
        .base_url(cli.base_url.as_str())
        .model(cli.model.as_str())
        .timeout_secs(cli.timeout);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb as ProgressCallback);
    }

    let config = builder.build().context("Invalid configuration")?;
    let converter = Converter::new(config).context("Failed to initialise converter")?;

    converter
        .convert_with_mode(&cli.pdf_path, cli.output.as_deref(), cli.mode())
        .await
        .context("Conversion failed")
}
