//! Web server binary for edgequake-img2xlsx.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ServerSettings` and serves the upload UI. The API key is never a flag or
//! an environment variable: each user enters it in the browser.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_img2xlsx::config::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use edgequake_img2xlsx::web::{self, ServerSettings};
use edgequake_img2xlsx::LanguagePair;
use std::io;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on the default address, then open http://127.0.0.1:8501
  img2xlsx

  # Listen on every interface with a cheaper model
  img2xlsx --bind 0.0.0.0:8080 --model gpt-4o-mini

  # Japanese signs → English
  img2xlsx --source-language Japanese --target-language English

USAGE IN THE BROWSER:
  1. Enter your OpenAI API key in the sidebar (it is kept for one request only).
  2. Choose one or more PNG/JPEG images and submit.
  3. Read the result table and download ocr_translation_results.xlsx.

LOGGING:
  RUST_LOG overrides the log filter, e.g. RUST_LOG=edgequake_img2xlsx=debug
"#;

/// Extract and translate text from images with a Vision LLM, export to Excel.
#[derive(Parser, Debug)]
#[command(
    name = "img2xlsx",
    version,
    about = "Web UI: extract and translate text from images with a Vision LLM, export to Excel",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8501")]
    bind: SocketAddr,

    /// Vision model ID.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Max LLM output tokens per image.
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: usize,

    /// Language of the text in the images.
    #[arg(long, default_value = "English")]
    source_language: String,

    /// Language to translate into.
    #[arg(long, default_value = "Korean")]
    target_language: String,

    /// Largest accepted image, in megabytes.
    #[arg(long, default_value_t = 20)]
    max_file_mb: usize,

    /// Largest accepted request (all images together), in megabytes.
    #[arg(long, default_value_t = 100)]
    max_request_mb: usize,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build settings ───────────────────────────────────────────────────
    let settings = build_settings(&cli)?;

    if !cli.quiet {
        eprintln!("Open http://{} in your browser", cli.bind);
    }

    web::serve(cli.bind, settings)
        .await
        .context("Server failed")?;

    Ok(())
}

/// Map CLI args to `ServerSettings`.
fn build_settings(cli: &Cli) -> Result<ServerSettings> {
    if cli.max_tokens == 0 {
        anyhow::bail!("--max-tokens must be at least 1");
    }
    if cli.source_language.trim().is_empty() || cli.target_language.trim().is_empty() {
        anyhow::bail!("--source-language and --target-language must not be empty");
    }
    if cli.max_file_mb == 0 || cli.max_request_mb < cli.max_file_mb {
        anyhow::bail!(
            "--max-file-mb must be ≥ 1 and ≤ --max-request-mb (got {} / {})",
            cli.max_file_mb,
            cli.max_request_mb
        );
    }

    Ok(ServerSettings {
        model: cli.model.clone(),
        max_tokens: cli.max_tokens,
        languages: LanguagePair::new(cli.source_language.trim(), cli.target_language.trim()),
        max_file_mb: cli.max_file_mb,
        max_request_mb: cli.max_request_mb,
        backend: None,
    })
}
