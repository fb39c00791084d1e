//! CLI binary for ocr2md.
//!
//! A thin shim over the library crate that maps CLI flags to `OcrConfig`,
//! builds a `DocumentRequest`, and writes the output triple.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use ocr2md::config::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use ocr2md::{
    extract, is_url, AssemblyResult, DocumentRequest, ExtractedImage, HistoryStore, ImageIssue,
    InputMode, LocalFile, OcrConfig, PipelineProgressCallback, ProgressCallback, Stage,
};
use serde::Serialize;
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner naming the current stage, plus one
/// log line per finished stage.
struct CliProgressCallback {
    bar: ProgressBar,
    stage_start: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("ocr2md");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            stage_start: Mutex::new(None),
        })
    }

    fn elapsed(&self) -> String {
        let ms = self
            .stage_start
            .lock()
            .ok()
            .and_then(|mut s| s.take())
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);
        format!("{:.1}s", ms as f64 / 1000.0)
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl PipelineProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: Stage) {
        if let Ok(mut start) = self.stage_start.lock() {
            *start = Some(Instant::now());
        }
        self.bar.set_message(format!("{stage}…"));
    }

    fn on_stage_complete(&self, stage: Stage) {
        self.bar.println(format!(
            "  {} {:<22} {}",
            green("✓"),
            stage.label(),
            dim(&self.elapsed())
        ));
    }

    fn on_stage_error(&self, stage: Stage, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = match error.char_indices().nth(80) {
            Some((idx, _)) => format!("{}\u{2026}", &error[..idx]),
            None => error.to_string(),
        };
        self.bar.println(format!(
            "  {} {:<22} {}  {}",
            red("✗"),
            stage.label(),
            red(&msg),
            dim(&self.elapsed())
        ));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # OCR a remote PDF, rendered Markdown to stdout
  ocr2md https://arxiv.org/pdf/2201.04234

  # OCR a local PDF (uploaded, then read through a signed URL)
  ocr2md report.pdf -o report.md

  # OCR a local image (inlined as a data URL, no upload)
  ocr2md receipt.jpg --text-output receipt.txt

  # Save every extracted image as PNG
  ocr2md paper.pdf -o paper.md --images-dir paper_images/

  # Structured JSON (plain text, markdown, image list, warnings)
  ocr2md --json https://example.com/scan.png > scan.json

  # Show recently used URLs
  ocr2md --history

SUPPORTED INPUTS:
  URLs     any URL; .jpg/.jpeg/.png are sent as images, anything else as a document
  Files    .pdf (uploaded), .jpg/.jpeg/.png (inlined as PNG)

ENVIRONMENT VARIABLES:
  MISTRAL               Mistral API key (required)
  OCR2MD_MODEL          Override OCR model ID
  OCR2MD_BASE_URL       Override API base URL
  OCR2MD_HISTORY_FILE   Override the URL history file location
"#;

/// Extract text, Markdown, and images from documents with Mistral OCR.
#[derive(Parser, Debug)]
#[command(
    name = "ocr2md",
    version,
    about = "Extract text, Markdown, and images from documents with Mistral OCR",
    long_about = "Send a PDF or image (URL or local file) to the Mistral OCR service and \
rebuild the response into self-contained Markdown with every extracted image inlined \
as a PNG data URL.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Document or image: HTTP/HTTPS URL or local file path.
    #[arg(required_unless_present = "history")]
    input: Option<String>,

    /// Treat INPUT as a URL or a local file (auto-detected when omitted).
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Write rendered Markdown to this file instead of stdout.
    #[arg(short, long, env = "OCR2MD_OUTPUT")]
    output: Option<PathBuf>,

    /// Also write the plain extracted text to this file.
    #[arg(long)]
    text_output: Option<PathBuf>,

    /// Save each extracted image as PNG into this directory.
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Mistral API key.
    #[arg(long, env = "MISTRAL", hide_env_values = true)]
    api_key: Option<String>,

    /// OCR model ID.
    #[arg(long, env = "OCR2MD_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// API base URL.
    #[arg(long, env = "OCR2MD_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request HTTP timeout in seconds.
    #[arg(long, env = "OCR2MD_TIMEOUT", default_value_t = 120)]
    timeout: u64,

    /// Lifetime of the signed URL for uploaded PDFs, in hours.
    #[arg(long, env = "OCR2MD_SIGNED_URL_EXPIRY", default_value_t = 24)]
    signed_url_expiry: u32,

    /// URL history file.
    #[arg(long, env = "OCR2MD_HISTORY_FILE")]
    history_file: Option<PathBuf>,

    /// Do not record the URL in the history file.
    #[arg(long)]
    no_history: bool,

    /// Print recently used URLs and exit.
    #[arg(long)]
    history: bool,

    /// Output structured JSON instead of Markdown.
    #[arg(long)]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "OCR2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "OCR2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "OCR2MD_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Url,
    File,
}

impl From<ModeArg> for InputMode {
    fn from(v: ModeArg) -> Self {
        match v {
            ModeArg::Url => InputMode::Url,
            ModeArg::File => InputMode::FileUpload,
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    plain_text: &'a str,
    markdown: &'a str,
    images: Vec<JsonImage<'a>>,
    warnings: &'a [ImageIssue],
}

#[derive(Serialize)]
struct JsonImage<'a> {
    id: &'a str,
    page: usize,
    width: u32,
    height: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner already narrates every stage; INFO logs would only
    // interleave with it.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
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

    let mut config = build_config(&cli)?;
    let history = HistoryStore::new(
        cli.history_file
            .clone()
            .unwrap_or_else(HistoryStore::default_path),
        config.history_capacity,
    );

    // ── History-only mode ────────────────────────────────────────────────
    if cli.history {
        let entries = history.load().await;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&entries).context("Failed to serialise history")?
            );
        } else if entries.is_empty() {
            if !cli.quiet {
                eprintln!("{}", dim("No URLs in history."));
            }
        } else {
            for (i, url) in entries.iter().enumerate() {
                println!("{:>2}. {}", i + 1, url);
            }
        }
        return Ok(());
    }

    let Some(input) = cli.input.as_deref() else {
        anyhow::bail!("No input given");
    };

    // ── Build request ────────────────────────────────────────────────────
    let mode = cli
        .mode
        .map(InputMode::from)
        .unwrap_or_else(|| if is_url(input) { InputMode::Url } else { InputMode::FileUpload });

    let request = match mode {
        InputMode::Url => DocumentRequest::url(input),
        InputMode::FileUpload => DocumentRequest::file(
            LocalFile::read(input)
                .await
                .with_context(|| format!("Failed to read {input}"))?,
        ),
    };

    let progress = show_progress.then(CliProgressCallback::new);
    if let Some(ref cb) = progress {
        config.progress_callback = Some(Arc::clone(cb) as ProgressCallback);
    }

    // ── Run pipeline ─────────────────────────────────────────────────────
    let history_ref = (!cli.no_history).then_some(&history);
    let outcome = extract(request, &config, history_ref).await;
    if let Some(ref cb) = progress {
        cb.finish();
    }
    let result = outcome.context("OCR failed")?;

    // ── Write outputs ────────────────────────────────────────────────────
    if let Some(ref path) = cli.text_output {
        write_atomic(path, &result.plain_text).await?;
    }
    if let Some(ref dir) = cli.images_dir {
        save_images(dir, &result)?;
    }

    if cli.json {
        let json = JsonOutput {
            plain_text: &result.plain_text,
            markdown: &result.rendered_markdown,
            images: result
                .images
                .iter()
                .map(|img| JsonImage {
                    id: &img.id,
                    page: img.page,
                    width: img.image.width(),
                    height: img.image.height(),
                })
                .collect(),
            warnings: &result.warnings,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&json).context("Failed to serialise output")?
        );
    } else if let Some(ref path) = cli.output {
        write_atomic(path, &result.rendered_markdown).await?;
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(result.rendered_markdown.as_bytes())
            .context("Failed to write to stdout")?;
        if !result.rendered_markdown.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    // ── Summary ──────────────────────────────────────────────────────────
    if !cli.quiet {
        for issue in &result.warnings {
            eprintln!("{} {}", cyan("⚠"), issue);
        }
        let target = cli
            .output
            .as_ref()
            .filter(|_| !cli.json)
            .map(|p| format!("  →  {}", bold(&p.display().to_string())))
            .unwrap_or_default();
        eprintln!(
            "{}  {} chars  {} images{}",
            if result.warnings.is_empty() {
                green("✔")
            } else {
                cyan("⚠")
            },
            result.plain_text.chars().count(),
            result.images.len(),
            target,
        );
    }

    Ok(())
}

/// Map CLI args to `OcrConfig`.
fn build_config(cli: &Cli) -> Result<OcrConfig> {
    let mut builder = OcrConfig::builder()
        .model(cli.model.clone())
        .base_url(cli.base_url.clone())
        .request_timeout_secs(cli.timeout)
        .signed_url_expiry_hours(cli.signed_url_expiry);

    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.clone());
    }
    builder.build().context("Invalid configuration")
}

/// Write via a temp file and rename so a failed run never leaves half a file.
async fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("tmp");
    tokio::fs::write(&tmp_path, content)
        .await
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Save every image under the names from [`image_file_names`].
fn save_images(dir: &Path, result: &AssemblyResult) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    for (img, name) in result.images.iter().zip(image_file_names(&result.images)) {
        let path = dir.join(name);
        img.image
            .save_with_format(&path, image::ImageFormat::Png)
            .with_context(|| format!("Failed to save image {}", path.display()))?;
    }
    Ok(())
}

/// `<page>-<id>.png` per image, page 1-based and zero-padded.
///
/// Path separators in the id become `_`. A name already taken gets a `-2`,
/// `-3`, … suffix so no image overwrites another.
fn image_file_names(images: &[ExtractedImage]) -> Vec<String> {
    let mut taken = HashSet::new();
    images
        .iter()
        .map(|img| {
            let id = img.id.replace(['/', '\\'], "_");
            let base = format!("{:03}-{}", img.page + 1, id);
            let mut name = format!("{base}.png");
            let mut n = 2;
            while !taken.insert(name.clone()) {
                name = format!("{base}-{n}.png");
                n += 1;
            }
            name
        })
        .collect()
}
