//! pdf-outline CLI - title and heading outline extraction

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf_outline::render::from_json;
use pdf_outline::{
    analyze, compare, parser::parse_fragments_json, process_dir_with_progress, BatchOptions,
    CompareOptions, FileOutcome, FileReport, JsonFormat, OutlineOptions, Outliner, OutputFormat,
    PageBase, PageSelection, ParseOptions, PdfParser, RenderOptions,
};

#[derive(Parser)]
#[command(name = "pdf-outline")]
#[command(version)]
#[command(about = "Extract the title and heading outline of PDF documents", long_about = None)]
struct Cli {
    /// Input PDF (or fragment JSON) file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: Format,

    /// Output compact JSON
    #[arg(long, global = true)]
    compact: bool,

    /// Number pages from 1 instead of 0
    #[arg(long, global = true)]
    one_based: bool,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long, global = true)]
    pages: Option<String>,

    /// Use the PDF's own bookmarks when it has any
    #[arg(long, global = true)]
    bookmarks: bool,

    /// Maximum heading level
    #[arg(long, global = true, default_value = "6")]
    max_depth: u8,

    /// Body font size in points (inferred if not specified)
    #[arg(long, global = true)]
    body_size: Option<f32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract outlines of every PDF in a directory
    Batch {
        /// Directory containing PDF files
        #[arg(value_name = "INPUT_DIR", env = "INPUT_DIR", default_value = "input")]
        input: PathBuf,

        /// Directory for the JSON outlines
        #[arg(value_name = "OUTPUT_DIR", env = "OUTPUT_DIR", default_value = "output")]
        output: PathBuf,

        /// Seconds per document before a warning is logged
        #[arg(long, default_value = "10")]
        time_budget: f64,

        /// Write a JSON run report to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Compare a predicted outline against a reference outline
    Compare {
        /// Predicted outline JSON
        #[arg(value_name = "PREDICTED")]
        predicted: PathBuf,

        /// Reference outline JSON
        #[arg(value_name = "TRUTH")]
        truth: PathBuf,

        /// Word-overlap threshold for partial matches
        #[arg(long, default_value = "0.5")]
        threshold: f64,

        /// Print the scores as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show document information and style profile
    Info {
        /// Input PDF (or fragment JSON) file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// {"title": ..., "outline": [...]}
    Json,
    /// Indented heading tree
    Text,
    /// Nested Markdown list
    Markdown,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => OutputFormat::Json,
            Format::Text => OutputFormat::Text,
            Format::Markdown => OutputFormat::Markdown,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Batch {
            ref input,
            ref output,
            time_budget,
            ref report,
        }) => cmd_batch(input, output, time_budget, report.as_deref(), &cli),
        Some(Commands::Compare {
            ref predicted,
            ref truth,
            threshold,
            json,
        }) => cmd_compare(predicted, truth, threshold, json),
        Some(Commands::Info { ref input }) => cmd_info(input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(ref input) = cli.input {
                cmd_outline(input, &cli)
            } else {
                println!("{}", "Usage: pdf-outline <FILE> [-o OUTPUT]".yellow());
                println!("       pdf-outline --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn parse_options(cli: &Cli) -> Result<ParseOptions, Box<dyn std::error::Error>> {
    let page_selection = if let Some(ref p) = cli.pages {
        PageSelection::parse(p)?
    } else {
        PageSelection::All
    };

    Ok(ParseOptions::new()
        .lenient()
        .with_pages(page_selection)
        .with_bookmarks(cli.bookmarks))
}

fn outline_options(cli: &Cli) -> OutlineOptions {
    OutlineOptions::new()
        .with_max_depth(cli.max_depth)
        .with_body_font_size(cli.body_size)
}

fn render_options(cli: &Cli) -> RenderOptions {
    let mut options = RenderOptions::new().with_format(cli.format.into());
    if cli.compact {
        options = options.compact();
    }
    if cli.one_based {
        options = options.with_page_base(PageBase::One);
    }
    options
}

fn cmd_outline(input: &Path, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let result = Outliner::new()
        .with_parse_options(parse_options(cli)?)
        .with_outline_options(outline_options(cli))
        .with_render_options(render_options(cli))
        .parse(input)?;

    for warning in &result.warnings {
        log::warn!("{}", warning);
    }

    let rendered = result.render()?;

    if let Some(ref path) = cli.output {
        fs::write(path, &rendered)?;
        println!(
            "{} {} ({} entries)",
            "Saved to".green(),
            path.display(),
            result.document.len()
        );
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    time_budget: f64,
    report_path: Option<&Path>,
    cli: &Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    let budget = Duration::try_from_secs_f64(time_budget)
        .map_err(|_| format!("Invalid time budget: {}", time_budget))?;

    let mut render = RenderOptions::new();
    if cli.compact {
        render = render.compact();
    }
    if cli.one_based {
        render = render.one_based();
    }

    let options = BatchOptions::new()
        .with_time_budget(budget)
        .with_parse_options(parse_options(cli)?)
        .with_outline_options(outline_options(cli))
        .with_render_options(render);

    let pdf_count = fs::read_dir(input)?
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .count();

    let pb = ProgressBar::new(pdf_count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = process_dir_with_progress(input, output, &options, |file: &FileReport| {
        if let Some(name) = file.input.file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }
        pb.inc(1);
    })?;
    pb.finish_with_message("Done!");

    println!();
    for file in &report.files {
        let name = file.input.file_name().unwrap_or_default().to_string_lossy();
        match &file.outcome {
            FileOutcome::Processed {
                entries,
                elapsed_ms,
            } => println!(
                "  {} {} ({} entries, {} ms)",
                "✓".green(),
                name,
                entries,
                elapsed_ms
            ),
            FileOutcome::Failed { error } => {
                println!("  {} {}: {}", "✗".red(), name, error.dimmed())
            }
        }
    }

    println!(
        "\n{} {} processed, {} failed in {} ms",
        "Batch complete:".green().bold(),
        report.processed(),
        report.failed(),
        report.elapsed_ms
    );

    if let Some(path) = report_path {
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        println!("{} {}", "Report saved to".green(), path.display());
    }

    Ok(())
}

fn cmd_compare(
    predicted: &Path,
    truth: &Path,
    threshold: f64,
    as_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let predicted = from_json(&fs::read_to_string(predicted)?)?;
    let truth = from_json(&fs::read_to_string(truth)?)?;

    let options = CompareOptions::new().with_threshold(threshold);
    let eval = compare(&predicted, &truth, &options);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&eval)?);
        return Ok(());
    }

    println!("{}", "Outline Comparison".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!(
        "{}: {} (similarity {:.2})",
        "Title".bold(),
        if eval.title_match {
            "match".green()
        } else {
            "differs".yellow()
        },
        eval.title_similarity
    );
    println!(
        "{}: {} predicted / {} expected",
        "Entries".bold(),
        eval.predicted,
        eval.expected
    );
    println!("{}: {}", "Exact matches".bold(), eval.exact_matches);
    println!("{}: {}", "Partial matches".bold(), eval.partial_matches);
    println!("{}: {:.3}", "Precision".bold(), eval.precision);
    println!("{}: {:.3}", "Recall".bold(), eval.recall);
    println!("{}: {:.3}", "F1".bold(), eval.f1);

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let is_json = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let (fragments, frames, metadata) = if is_json {
        let parsed = parse_fragments_json(&fs::read_to_string(input)?)?;
        (parsed.fragments, parsed.frames, None)
    } else {
        // Lenient: show metadata even if some pages cannot be decoded
        let parser = PdfParser::open_with_options(input, ParseOptions::new().lenient())?;
        let extracted = parser.extract()?;
        (extracted.fragments, extracted.frames, Some(extracted.metadata))
    };

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());

    if let Some(ref metadata) = metadata {
        println!("{}: PDF {}", "Format".bold(), metadata.pdf_version);
        for (label, value) in metadata.summary() {
            println!("{}: {}", label.bold(), value);
        }
    } else {
        println!("{}: fragment JSON", "Format".bold());
        println!("{}: {}", "Pages".bold(), frames.len());
    }
    println!("{}: {}", "Fragments".bold(), fragments.len());

    let analysis = analyze(&fragments, &frames, &OutlineOptions::default());

    println!();
    println!("{}", "Style Profile".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    match analysis.profile.body_font_size {
        Some(size) => println!("{}: {:.1} pt", "Body size".bold(), size),
        None => println!("{}: {}", "Body size".bold(), "unknown".dimmed()),
    }
    println!(
        "{}: {}",
        "Distinct sizes".bold(),
        analysis.profile.distinct_sizes
    );
    for candidate in &analysis.profile.candidates {
        println!(
            "  {} {:.1} pt{} ({} uses)",
            format!("#{}", candidate.rank).dimmed(),
            candidate.font_size,
            if candidate.is_bold { " bold" } else { "" },
            candidate.occurrences
        );
    }

    println!();
    println!(
        "{}: {}",
        "Title".bold(),
        if analysis.document.title.is_empty() {
            "(none)".dimmed().to_string()
        } else {
            analysis.document.title.clone()
        }
    );
    println!("{}: {}", "Headings".bold(), analysis.document.len());
    println!("{}: {}", "Max depth".bold(), analysis.document.max_depth());
    for warning in &analysis.warnings {
        println!("{}: {}", "Warning".yellow(), warning);
    }

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "pdf-outline".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("PDF title and heading outline extraction tool");
    println!();
    println!("License: MIT");
}
