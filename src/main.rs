//! PII Redaction CLI Application.
//!
//! This binary provides a command-line interface for the pii_redactor
//! library: single documents, whole directories, and text/entity inspection.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use pii_redactor::domain::{AuditEntry, EntitySummary};
use pii_redactor::{
    ByteSource, EntityDetector, FileSource, MatchMode, MatchPolicy, NoOcr, OcrEngine,
    PrecomputedDetector, RecognizerSet, RedactionConfig, RedactionOutcome, RedactionService,
    TesseractOcr,
};

/// PDF PII Redaction Tool
///
/// Detects personal information in PDF documents and physically removes it.
/// By default, redacts one document. Use the subcommands for batches and
/// inspection.
#[derive(Parser)]
#[command(name = "pii-redactor")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input PDF file path
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Use entity spans from a JSON file instead of the built-in recognizers
    #[arg(long, value_name = "JSON")]
    entities: Option<PathBuf>,

    /// Write a JSON report of the redaction
    #[arg(long, value_name = "JSON")]
    report: Option<PathBuf>,

    /// Load settings from a JSON file (flags override it)
    #[arg(long, value_name = "JSON", global = true)]
    config: Option<PathBuf>,

    /// Never run OCR on pages without a text layer
    #[arg(long, global = true)]
    no_ocr: bool,

    /// Match target text ignoring letter case
    #[arg(long, global = true)]
    case_insensitive: bool,

    /// Map entity offsets to glyphs instead of searching for the text
    #[arg(long, global = true)]
    offsets: bool,

    /// Detection language
    #[arg(long, value_name = "LANG", global = true)]
    language: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from a PDF (for debugging and verification)
    Extract {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output text file (optional, defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print the entities that would be redacted, as JSON
    Detect {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },

    /// Redact every PDF in a directory
    Batch {
        /// Directory to read PDFs from
        #[arg(long, value_name = "DIR")]
        input_dir: PathBuf,

        /// Directory to write redacted_<name> files to
        #[arg(long, value_name = "DIR")]
        output_dir: PathBuf,
    },
}

/// JSON report written with `--report`.
#[derive(Serialize)]
struct Report<'a> {
    document: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detection_failure: Option<&'a str>,
    audit: Vec<String>,
    entries: &'a [AuditEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a EntitySummary>,
    ocr_pages: &'a [usize],
}

impl<'a> Report<'a> {
    fn new(document: &Path, outcome: &'a RedactionOutcome) -> Self {
        let mut report = Self {
            document: document.display().to_string(),
            status: "redacted",
            detection_failure: None,
            audit: Vec::new(),
            entries: &[],
            summary: None,
            ocr_pages: &[],
        };
        match outcome {
            RedactionOutcome::Redacted(doc) => {
                report.audit = doc.audit.lines();
                report.entries = doc.audit.entries();
                report.summary = Some(&doc.summary);
                report.ocr_pages = &doc.ocr_pages;
            }
            RedactionOutcome::NoEntities { detection_failure } => {
                report.status = "no_entities";
                report.detection_failure = detection_failure.as_deref();
            }
            RedactionOutcome::NoTextExtracted => report.status = "no_text_extracted",
        }
        report
    }
}

/// Redaction command handler with dependency injection.
struct RedactionHandler {
    service: RedactionService,
    verbose: bool,
}

impl RedactionHandler {
    /// Creates a handler with the configured detector and OCR engine.
    fn new(
        config: RedactionConfig,
        entities: Option<&Path>,
        no_ocr: bool,
        verbose: bool,
    ) -> Result<Self> {
        let detector: Box<dyn EntityDetector> = match entities {
            Some(path) => Box::new(
                PrecomputedDetector::from_json_file(path)
                    .with_context(|| format!("Failed to load entities from {}", path.display()))?,
            ),
            None => Box::new(RecognizerSet::builtin()?.with_min_score(config.min_score)),
        };
        let ocr: Box<dyn OcrEngine> = if no_ocr {
            Box::new(NoOcr)
        } else {
            Box::new(TesseractOcr::new(config.ocr_language.clone()))
        };

        Ok(Self {
            service: RedactionService::new(detector, ocr, config),
            verbose,
        })
    }

    /// Executes a redaction operation.
    fn redact(&self, input: &Path, output: &Path, report: Option<&Path>) -> Result<()> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }

        if self.verbose {
            println!("Input:  {}", input.display());
            println!("Output: {}", output.display());
        }

        let outcome = self
            .service
            .redact_source(&FileSource::new(input))
            .with_context(|| "Redaction failed")?;

        self.write_outcome(input, output, &outcome)?;

        if let Some(report_path) = report {
            let json = serde_json::to_string_pretty(&Report::new(input, &outcome))?;
            std::fs::write(report_path, json)
                .with_context(|| format!("Failed to write to {}", report_path.display()))?;
        }

        Ok(())
    }

    /// Writes the output file for one outcome and reports it.
    fn write_outcome(&self, input: &Path, output: &Path, outcome: &RedactionOutcome) -> Result<()> {
        match outcome {
            RedactionOutcome::Redacted(doc) => {
                std::fs::write(output, &doc.bytes)
                    .with_context(|| format!("Failed to write to {}", output.display()))?;

                if self.verbose {
                    println!("\nRedaction Summary:");
                    println!("  Pages processed: {}", doc.pages_processed);
                    println!("  Pages OCR'd:     {}", doc.ocr_pages.len());
                    for (category, values) in &doc.summary.categories {
                        println!("  {}: {}", category, values.len());
                    }
                }

                for line in doc.audit.lines() {
                    println!("{}", line);
                }
                if doc.audit.is_empty() {
                    println!("⚠ No instances found to redact → {}", output.display());
                } else {
                    println!(
                        "✓ Successfully redacted {} instance(s) → {}",
                        doc.audit.total(),
                        output.display()
                    );
                }
            }
            RedactionOutcome::NoEntities { detection_failure } => {
                if let Some(reason) = detection_failure {
                    eprintln!("⚠ Entity detection failed: {}", reason);
                }
                std::fs::copy(input, output)
                    .with_context(|| format!("Failed to write to {}", output.display()))?;
                println!("⚠ No sensitive entities found; copied unchanged → {}", output.display());
            }
            RedactionOutcome::NoTextExtracted => {
                println!("⚠ No text extracted from {}; nothing written", input.display());
            }
        }
        Ok(())
    }

    /// Extracts text from a PDF.
    fn extract(&self, input: &Path, output: Option<&Path>) -> Result<()> {
        let bytes = read_input(input)?;
        let extracted = self
            .service
            .extract_text(&bytes)
            .with_context(|| "Text extraction failed")?;
        let text = extracted.flattened().as_str();

        if self.verbose {
            let ocr_pages = extracted.ocr_pages();
            eprintln!(
                "{} page(s), {} from OCR",
                extracted.pages().len(),
                ocr_pages.len()
            );
        }

        if let Some(output_path) = output {
            std::fs::write(output_path, text)
                .with_context(|| format!("Failed to write to {}", output_path.display()))?;
            println!(
                "✓ Extracted {} characters → {}",
                extracted.flattened().char_len(),
                output_path.display()
            );
        } else {
            println!("{}", text);
        }

        Ok(())
    }

    /// Prints detected entities and their label-stripped targets.
    fn detect(&self, input: &Path) -> Result<()> {
        let bytes = read_input(input)?;
        let report = self
            .service
            .detect(&bytes)
            .with_context(|| "Entity detection failed")?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }

    /// Redacts every PDF in a directory, continuing past failures.
    fn batch(&self, input_dir: &Path, output_dir: &Path) -> Result<()> {
        let inputs = pdf_files(input_dir)?;
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;

        let sources: Vec<FileSource> = inputs.iter().map(|p| FileSource::new(p.clone())).collect();
        let items = self
            .service
            .redact_batch(sources.iter().map(|s| s as &dyn ByteSource));

        // Each output is on disk before the next document is read.
        let mut failed = 0;
        for (input, item) in inputs.iter().zip(items) {
            let output = output_dir.join(redacted_name(input));
            let written = item
                .result
                .map_err(anyhow::Error::from)
                .and_then(|outcome| self.write_outcome(input, &output, &outcome));
            if let Err(err) = written {
                failed += 1;
                eprintln!("✗ {}: {:#}", item.document, err);
            }
        }

        println!(
            "Processed {} document(s), {} failed",
            inputs.len(),
            failed
        );
        if failed > 0 {
            anyhow::bail!("{} of {} documents failed", failed, inputs.len());
        }
        Ok(())
    }
}

fn read_input(input: &Path) -> Result<Vec<u8>> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))
}

/// All `*.pdf` files directly inside a directory, sorted by name.
fn pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if path.is_file() && is_pdf {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn redacted_name(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("redacted_{}", name)
}

/// Builds the run configuration: file (if any), then flags.
fn build_config(cli: &Cli) -> Result<RedactionConfig> {
    let mut config = match &cli.config {
        Some(path) => RedactionConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RedactionConfig::default(),
    };

    if cli.case_insensitive {
        config = config.with_match_policy(MatchPolicy::CaseInsensitive);
    }
    if cli.offsets {
        config = config.with_match_mode(MatchMode::Offsets);
    }
    if let Some(language) = &cli.language {
        config = config.with_language(language.clone());
    }

    config.validate()?;
    Ok(config)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = build_config(&cli)?;
    let handler = RedactionHandler::new(config, cli.entities.as_deref(), cli.no_ocr, cli.verbose)?;

    match &cli.command {
        Some(Commands::Extract { input, output }) => {
            handler.extract(input, output.as_deref())?;
        }
        Some(Commands::Detect { input }) => {
            handler.detect(input)?;
        }
        Some(Commands::Batch {
            input_dir,
            output_dir,
        }) => {
            handler.batch(input_dir, output_dir)?;
        }
        None => {
            // Default: redaction mode
            let input = cli
                .input
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--input is required"))?;
            let output = cli
                .output
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--output is required"))?;

            handler.redact(input, output, cli.report.as_deref())?;
        }
    }

    Ok(())
}
