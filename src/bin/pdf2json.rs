use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use monograph_clean::{
    CellLineBreaks, ExtractOptions, ExtractionReport, chapter_map_for_pdf, extract_pdf_to_json,
    load_chapter_seeds,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pdf2json",
    version,
    about = "Clean a PDF report and split it into chapter-level JSON"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Clean every chapter and write the JSON document.
    Extract(ExtractArgs),
    /// Print the computed chapter page ranges.
    Chapters(ChapterArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Input PDF path.
    #[arg(short, long)]
    input: PathBuf,

    /// JSON file with [{"chapter", "title", "start_page"}] entries.
    #[arg(long)]
    chapters: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output JSON path (overwritten).
    #[arg(short, long)]
    output: PathBuf,

    /// Pages sampled when looking for running headers and footers.
    #[arg(long, default_value_t = 20)]
    sample_pages: usize,

    /// Fraction of sampled pages a line must top or end to count as running.
    #[arg(long, default_value_t = 0.5)]
    threshold: f64,

    /// Minimum cells per row for text-aligned table detection.
    #[arg(long = "min-cols", default_value_t = 2)]
    min_cols: usize,

    /// Collapse real line breaks in table cells instead of the legacy rule.
    #[arg(long)]
    fix_cell_newlines: bool,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Args)]
struct ChapterArgs {
    #[command(flatten)]
    source: SourceArgs,
}

fn base_options(source: &SourceArgs) -> Result<ExtractOptions> {
    let mut options = ExtractOptions {
        input: source.input.clone(),
        ..ExtractOptions::default()
    };
    if let Some(path) = &source.chapters {
        options.chapters = load_chapter_seeds(path)
            .with_context(|| format!("failed to read --chapters '{}'", path.display()))?;
    }
    Ok(options)
}

fn parse_options(args: &ExtractArgs) -> Result<ExtractOptions> {
    let options = ExtractOptions {
        output: args.output.clone(),
        sample_pages: args.sample_pages,
        threshold: args.threshold,
        min_table_cols: args.min_cols,
        cell_line_breaks: if args.fix_cell_newlines {
            CellLineBreaks::Newlines
        } else {
            CellLineBreaks::Legacy
        },
        ..base_options(&args.source)?
    };
    options.validate().context("invalid extraction options")?;
    Ok(options)
}

fn log_report(report: &ExtractionReport, verbose: bool) {
    eprintln!(
        "{} chapters, {} pages, {} tables",
        report.chapter_count, report.page_count, report.table_count
    );
    if report.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", report.warnings.len());
    if verbose {
        for warning in &report.warnings {
            eprintln!(
                "  - {:?} chapter={:?} page={:?}: {}",
                warning.code, warning.chapter, warning.page, warning.message
            );
        }
    }
}

fn run_extract(args: &ExtractArgs) -> Result<ExtractionReport> {
    let options = parse_options(args)?;
    extract_pdf_to_json(&options).with_context(|| {
        format!(
            "failed to extract chapters from '{}'",
            args.source.input.display()
        )
    })
}

fn run_chapters(args: &ChapterArgs) -> Result<()> {
    let options = base_options(&args.source)?;
    let chapters = chapter_map_for_pdf(&options)
        .with_context(|| format!("failed to read '{}'", args.source.input.display()))?;
    for chapter in chapters {
        println!(
            "{}\t{}-{}\t{}",
            chapter.chapter, chapter.start_page, chapter.end_page, chapter.title
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("monograph_clean=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Extract(args) => run_extract(args).map(|report| log_report(&report, args.verbose)),
        Commands::Chapters(args) => run_chapters(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
