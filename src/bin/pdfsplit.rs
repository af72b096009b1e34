//! CLI binary for edgequake-pdfsplit.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `SplitConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdfsplit::config::bytes_to_mb;
use edgequake_pdfsplit::{
    split_batch, BatchReport, DocumentOutcome, Fragment, LazyPdfiumBackend, PdfSplitError,
    ProgressCallback, SplitConfig, SplitProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
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
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal reporter: one line per document and per written part, with an
/// optional spinner showing the document currently being processed.
struct CliProgressCallback {
    /// Spinner anchored at the bottom of the terminal; `None` with `--no-progress`.
    bar: Option<ProgressBar>,
    /// Ceiling shown in "already under" lines.
    max_size_mb: f64,
    /// Only errors are printed.
    quiet: bool,
}

impl CliProgressCallback {
    fn new(max_size_mb: f64, show_spinner: bool, quiet: bool) -> Self {
        let bar = show_spinner.then(|| {
            let bar = ProgressBar::new(0);
            let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
            bar.set_style(style);
            bar.set_prefix("Scanning");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });

        Self {
            bar,
            max_size_mb,
            quiet,
        }
    }

    fn emit(&self, line: String) {
        if self.quiet {
            return;
        }
        match self.bar {
            Some(ref bar) => bar.println(line),
            None => println!("{line}"),
        }
    }

    fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

impl SplitProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_documents: usize) {
        self.emit(format!(
            "{} {}\n",
            cyan("◆"),
            bold(&format!("Found {total_documents} PDF file(s) to process"))
        ));
    }

    fn on_document_start(&self, path: &Path, index: usize, total_documents: usize) {
        if let Some(ref bar) = self.bar {
            bar.set_prefix(format!("{index}/{total_documents}"));
            bar.set_message(display_name(path));
        }
    }

    fn on_under_ceiling(&self, path: &Path, size_bytes: u64) {
        self.emit(format!(
            "{} {} is already under {}MB {}",
            green("✓"),
            display_name(path),
            self.max_size_mb,
            dim(&format!("({:.2}MB)", bytes_to_mb(size_bytes)))
        ));
    }

    fn on_split_start(&self, path: &Path, size_bytes: u64, total_pages: usize) {
        self.emit(format!(
            "{} Splitting {} {}",
            cyan("⚡"),
            bold(&display_name(path)),
            dim(&format!(
                "({:.2}MB, {total_pages} pages)",
                bytes_to_mb(size_bytes)
            ))
        ));
    }

    fn on_fragment_rejected(
        &self,
        path: &Path,
        page_count: usize,
        size_bytes: u64,
        next_page_count: usize,
    ) {
        if let Some(ref bar) = self.bar {
            bar.set_message(format!(
                "{} too large ({page_count} pages, {:.2}MB), retrying with {next_page_count}",
                display_name(path),
                bytes_to_mb(size_bytes)
            ));
        }
    }

    fn on_fragment_accepted(&self, fragment: &Fragment) {
        let range = fragment.page_range();
        let pages = if range.len() == 1 {
            format!("page {}", range.end)
        } else {
            format!("pages {}-{}", range.start + 1, range.end)
        };
        self.emit(format!(
            "  → Created {} {}  {}",
            display_name(&fragment.path),
            dim(&format!("({:.2}MB)", fragment.size_mb())),
            dim(&pages)
        ));
        if let Some(ref bar) = self.bar {
            bar.set_message(display_name(&fragment.path));
        }
    }

    fn on_oversized_page(&self, fragment: &Fragment) {
        self.emit(format!(
            "    {} page {} alone exceeds {}MB and cannot be split further",
            cyan("⚠"),
            fragment.first_page + 1,
            self.max_size_mb
        ));
    }

    fn on_document_error(&self, path: &Path, error: &str) {
        let line = format!(
            "{} Error processing {}: {}",
            red("✗"),
            display_name(path),
            red(error)
        );
        match (self.quiet, self.bar.as_ref()) {
            (false, Some(bar)) => bar.println(line),
            _ => eprintln!("{line}"),
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Process all PDFs in the current directory
  pdfsplit "*.pdf"

  # Process a single PDF
  pdfsplit document.pdf

  # Process all PDFs in a directory
  pdfsplit /path/to/pdfs/

  # Split PDFs larger than 2 MB
  pdfsplit "*.pdf" --max-size 2

  # Machine-readable report
  pdfsplit scans/ --json > report.json

OUTPUT:
  Parts are written next to their source as {name}_part1.pdf, {name}_part2.pdf, …
  Files already under the limit are left untouched. A single page larger than
  the limit is written as its own part and flagged with ⚠.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH     Path to libpdfium (file or directory)
  PDFSPLIT_MAX_SIZE   Default for --max-size
  RUST_LOG            Override log filtering (e.g. RUST_LOG=edgequake_pdfsplit=debug)
"#;

/// Split PDF files larger than a specified size.
#[derive(Parser, Debug)]
#[command(
    name = "pdfsplit",
    version,
    about = "Split PDF files larger than a specified size",
    long_about = "Split PDF files into parts that stay under a maximum size. Pages are never \
divided: the tool estimates how many pages fit, writes each part, measures it, and retries \
with fewer pages when a part comes out too large.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file(s) to process (file, directory, or glob pattern).
    input: String,

    /// Maximum file size in MB.
    #[arg(
        short,
        long,
        env = "PDFSPLIT_MAX_SIZE",
        default_value_t = 4.0,
        allow_negative_numbers = true
    )]
    max_size: f64,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDFSPLIT_PASSWORD")]
    password: Option<String>,

    /// Path to libpdfium, or the directory containing it.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Output the batch report as JSON instead of text.
    #[arg(long, env = "PDFSPLIT_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "PDFSPLIT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFSPLIT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFSPLIT_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO lines would tear through the spinner, so they are only shown
    // when it is off. --verbose always wins.
    let show_spinner = !cli.quiet && !cli.no_progress && !cli.verbose && !cli.json;
    let filter = if cli.quiet || show_spinner {
        "error"
    } else {
        "info"
    };
    let filter = if cli.verbose { "debug" } else { filter };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    // Validated before anything is drawn or bound so a bad --max-size
    // processes nothing.
    let mut config = build_config(&cli)?;

    let reporter = if cli.json {
        None
    } else {
        Some(Arc::new(CliProgressCallback::new(
            config.max_size_mb,
            show_spinner,
            cli.quiet,
        )))
    };
    config.progress_callback = reporter.clone().map(|r| r as ProgressCallback);

    // ── PDFium ───────────────────────────────────────────────────────────
    // Bound on the first document over the ceiling; a binding failure
    // aborts the batch from there.
    let backend = LazyPdfiumBackend::new(cli.pdfium_lib.clone(), config.password.clone());

    // ── Run ──────────────────────────────────────────────────────────────
    let result = split_batch(&backend, &cli.input, &config);
    if let Some(ref r) = reporter {
        r.finish();
    }

    let report = match result {
        Ok(report) => report,
        Err(PdfSplitError::NoInputFound { .. }) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&BatchReport::default())
                        .context("Failed to serialise report")?
                );
            } else if !cli.quiet {
                println!("No PDF files found!");
            }
            return Ok(());
        }
        Err(e) => return Err(e).context("Cannot process input"),
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet {
        print_summary(&report);
    }

    Ok(())
}

/// Map CLI args to `SplitConfig`.
fn build_config(cli: &Cli) -> Result<SplitConfig> {
    let mut builder = SplitConfig::builder().max_size_mb(cli.max_size);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(report: &BatchReport) {
    let split = report.split_count();
    let failed = report.failed_count();
    let oversized = report
        .documents
        .iter()
        .filter_map(|d| match &d.outcome {
            DocumentOutcome::Split { fragments, .. } => Some(fragments),
            _ => None,
        })
        .flatten()
        .filter(|f| f.oversized)
        .count();

    println!();
    println!(
        "{} Processing complete! Split {} file(s) into {} part(s).",
        if failed == 0 { green("✔") } else { cyan("⚠") },
        bold(&split.to_string()),
        report.fragment_count()
    );
    if failed > 0 {
        println!("   {} file(s) failed", red(&failed.to_string()));
    }
    if oversized > 0 {
        println!(
            "   {}",
            dim(&format!(
                "{oversized} single-page part(s) exceed the limit on their own"
            ))
        );
    }
}
