//! Directory batch processing.
//!
//! Every `*.pdf` in an input directory becomes `<stem>.json` in the output
//! directory. Files are processed in parallel; each worker owns its parser
//! and document, so a failing file never affects the others.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;

use crate::analysis::OutlineOptions;
use crate::error::Result;
use crate::parser::ParseOptions;
use crate::render::{self, OutputFormat, RenderOptions};
use crate::Outliner;

/// Options for [`process_dir`].
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Per-document time after which a warning is logged
    pub time_budget: Duration,

    /// Outline pipeline options
    pub outline: OutlineOptions,

    /// PDF parsing options
    pub parse: ParseOptions,

    /// JSON layout and page base of the written files
    pub render: RenderOptions,
}

impl BatchOptions {
    /// Create batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-document time budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Set the outline options.
    pub fn with_outline_options(mut self, options: OutlineOptions) -> Self {
        self.outline = options;
        self
    }

    /// Set the parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set the render options; the format is always JSON.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs(10),
            outline: OutlineOptions::default(),
            parse: ParseOptions::new().lenient(),
            render: RenderOptions::default(),
        }
    }
}

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// The outline was written
    Processed {
        /// Number of outline entries
        entries: usize,
        /// Wall time spent on the file
        elapsed_ms: u64,
    },
    /// The file could not be read or written
    Failed {
        /// Error description
        error: String,
    },
}

impl FileOutcome {
    /// Check if the file was processed.
    pub fn is_processed(&self) -> bool {
        matches!(self, FileOutcome::Processed { .. })
    }
}

/// Outcome for one input file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Input PDF
    pub input: PathBuf,
    /// JSON file written (or that would have been written)
    pub output: PathBuf,
    /// Result
    pub outcome: FileOutcome,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Total wall time
    pub elapsed_ms: u64,
    /// One report per input file, sorted by file name
    pub files: Vec<FileReport>,
}

impl BatchReport {
    /// Number of input files.
    pub fn total(&self) -> usize {
        self.files.len()
    }

    /// Number of files whose outline was written.
    pub fn processed(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_processed()).count()
    }

    /// Number of files that failed.
    pub fn failed(&self) -> usize {
        self.total() - self.processed()
    }
}

/// Process every PDF in `input_dir`, writing outlines to `output_dir`.
///
/// The output directory is created if needed. A missing or unreadable input
/// directory is an error; failures of individual files are recorded in the
/// report instead.
pub fn process_dir(input_dir: &Path, output_dir: &Path, options: &BatchOptions) -> Result<BatchReport> {
    process_dir_with_progress(input_dir, output_dir, options, |_| {})
}

/// Like [`process_dir`], calling `on_file` as each file finishes.
///
/// `on_file` runs on worker threads, in completion order.
pub fn process_dir_with_progress<F>(
    input_dir: &Path,
    output_dir: &Path,
    options: &BatchOptions,
    on_file: F,
) -> Result<BatchReport>
where
    F: Fn(&FileReport) + Sync,
{
    let started_at = Utc::now();
    let start = Instant::now();

    let inputs = list_pdfs(input_dir)?;
    fs::create_dir_all(output_dir)?;
    log::info!(
        "Processing {} PDF(s) from {}",
        inputs.len(),
        input_dir.display()
    );

    let files: Vec<FileReport> = inputs
        .into_par_iter()
        .map(|input| {
            let report = process_file(input, output_dir, options);
            on_file(&report);
            report
        })
        .collect();

    let report = BatchReport {
        started_at,
        elapsed_ms: start.elapsed().as_millis() as u64,
        files,
    };
    log::info!(
        "Batch finished: {} processed, {} failed in {} ms",
        report.processed(),
        report.failed(),
        report.elapsed_ms
    );
    Ok(report)
}

/// `*.pdf` files (any case) directly inside `dir`, sorted by name.
fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}

fn process_file(input: PathBuf, output_dir: &Path, options: &BatchOptions) -> FileReport {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let output = output_dir.join(format!("{}.json", stem));

    let start = Instant::now();
    let outcome = match outline_to_file(&input, &output, options) {
        Ok(entries) => {
            let elapsed = start.elapsed();
            if elapsed > options.time_budget {
                log::warn!(
                    "{} took {:.1}s, over the {:.1}s budget",
                    input.display(),
                    elapsed.as_secs_f64(),
                    options.time_budget.as_secs_f64()
                );
            }
            log::info!("Processed {} ({} entries)", input.display(), entries);
            FileOutcome::Processed {
                entries,
                elapsed_ms: elapsed.as_millis() as u64,
            }
        }
        Err(e) => {
            log::warn!("Failed to process {}: {}", input.display(), e);
            FileOutcome::Failed {
                error: e.to_string(),
            }
        }
    };

    FileReport {
        input,
        output,
        outcome,
    }
}

fn outline_to_file(input: &Path, output: &Path, options: &BatchOptions) -> Result<usize> {
    let result = Outliner::new()
        .with_parse_options(options.parse.clone())
        .with_outline_options(options.outline.clone())
        .parse(input)?;

    let render_options = options.render.clone().with_format(OutputFormat::Json);
    let json = render::render(&result.document, &render_options)?;
    fs::write(output, json)?;
    Ok(result.document.len())
}
