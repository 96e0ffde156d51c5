use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};

use cardscan::assembly::card::banner_region;
use cardscan::config::ExtractConfig;
use cardscan::core::grid::{compute_grid, GridShape};
use cardscan::curation::{apply_age_map, AgeMap};
use cardscan::export::json_export::{read_collection, write_collection};
use cardscan::export::Extraction;
use cardscan::ocr::{JsonOcrEngine, OcrBridge, OcrEngine};
use cardscan::pipeline::{build_collection, export_collection, read_page_list, run_with_report};

#[derive(Parser, Debug)]
#[command(name = "cardscan")]
#[command(version, about = "Rebuild card records from scanned card-grid pages and OCR output", long_about = None)]
struct Cli {
    /// Log debug details (discarded cells, color counts)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract cards from page images, in the order given
    Extract {
        /// Page image files
        pages: Vec<PathBuf>,

        /// File listing page images, one per line, appended after PAGES
        #[arg(long)]
        page_list: Option<PathBuf>,

        /// Directory of recorded OCR results (<page stem>.json)
        #[arg(long, conflicts_with = "ocr_script")]
        ocr_dir: Option<PathBuf>,

        /// OCR bridge script printing detections as JSON
        #[arg(long)]
        ocr_script: Option<PathBuf>,

        /// Language passed to the OCR bridge
        #[arg(long, default_value = "fr")]
        ocr_lang: String,

        /// Output directory
        #[arg(short, long, default_value = "cards_output")]
        output: PathBuf,

        /// JSON settings file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Grid rows per page
        #[arg(long)]
        rows: Option<u32>,

        /// Grid columns per page
        #[arg(long)]
        columns: Option<u32>,

        /// Minimum card name length in characters
        #[arg(long)]
        min_name_length: Option<usize>,

        /// Record each card's page file and cell (needed by `curate`)
        #[arg(long)]
        with_source: bool,

        /// Also write a per-page review report
        #[arg(long)]
        review: bool,
    },

    /// Show a page image's size and grid cells
    Info {
        /// Page image file
        input: PathBuf,

        #[arg(long, default_value_t = 4)]
        rows: u32,

        #[arg(long, default_value_t = 2)]
        columns: u32,
    },

    /// Assign ages to an extracted collection from a page-to-age mapping
    Curate {
        /// Collection written by `extract --with-source`
        #[arg(long)]
        collection: PathBuf,

        /// JSON object mapping page file names to ages
        #[arg(long)]
        ages: PathBuf,

        /// Output file (default: overwrite the collection)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cardscan::logging::init(cli.verbose)?;

    match cli.command {
        Commands::Extract {
            pages,
            page_list,
            ocr_dir,
            ocr_script,
            ocr_lang,
            output,
            config,
            rows,
            columns,
            min_name_length,
            with_source,
            review,
        } => {
            let mut settings = ExtractConfig::load(config.as_deref())?;
            if let Some(rows) = rows {
                settings.rows = rows;
            }
            if let Some(columns) = columns {
                settings.columns = columns;
            }
            if let Some(min_name_length) = min_name_length {
                settings.min_name_length = min_name_length;
            }

            let mut pages = pages;
            if let Some(list) = page_list {
                pages.extend(read_page_list(&list)?);
            }

            let engine: Box<dyn OcrEngine> = match (ocr_dir, ocr_script) {
                (Some(dir), _) => Box::new(JsonOcrEngine::new(dir)),
                (None, Some(script)) => Box::new(OcrBridge::new(script).with_lang(ocr_lang)),
                (None, None) => Box::new(OcrBridge::default().with_lang(ocr_lang)),
            };

            extract(pages, engine.as_ref(), &settings, &output, with_source, review)
        }
        Commands::Info {
            input,
            rows,
            columns,
        } => show_info(input, GridShape::new(rows, columns)),
        Commands::Curate {
            collection,
            ages,
            output,
        } => curate(collection, ages, output),
    }
}

fn extract(
    pages: Vec<PathBuf>,
    engine: &dyn OcrEngine,
    settings: &ExtractConfig,
    output: &Path,
    with_source: bool,
    review: bool,
) -> Result<()> {
    if pages.is_empty() {
        anyhow::bail!("No page images specified");
    }

    println!("[*] Processing {} page(s)", pages.len());
    println!("[*] Output: {}", output.display());

    let run = run_with_report(&pages, engine, &settings.pipeline())
        .with_context(|| "invalid extraction settings")?;

    let created = Local::now().format("%Y-%m-%d").to_string();
    let collection = build_collection(
        &run.cards,
        &settings.placeholders,
        &settings.metadata,
        created,
        with_source,
    );
    let extraction = Extraction {
        collection,
        pages: run.pages,
        cells_per_page: settings.grid().cell_count(),
    };

    export_collection(&extraction, output, review)
        .with_context(|| format!("Failed to export to: {}", output.display()))?;

    let skipped = extraction
        .pages
        .iter()
        .filter(|p| !matches!(p.outcome, cardscan::core::model::PageOutcome::Processed { .. }))
        .count();
    println!(
        "\n[✓] Done! Extracted {} card(s) from {} page(s), {} skipped",
        extraction.collection.cards.len(),
        extraction.pages.len(),
        skipped
    );

    Ok(())
}

fn show_info(input: PathBuf, grid: GridShape) -> Result<()> {
    let image = image::open(&input)
        .with_context(|| format!("Failed to open image: {}", input.display()))?;
    let cells = compute_grid(image.width(), image.height(), grid)?;
    let defaults = ExtractConfig::default();

    println!("Page Information");
    println!("================");
    println!("File: {}", input.display());
    println!("Size: {}x{}", image.width(), image.height());
    println!("Grid: {} rows x {} columns", grid.rows, grid.columns);
    for cell in &cells {
        let banner = banner_region(cell, defaults.banner_fraction, defaults.banner_margin);
        println!(
            "  cell ({}, {}): x={} y={} w={} h={}  banner x={} y={} w={} h={}",
            cell.row,
            cell.column,
            cell.x,
            cell.y,
            cell.width,
            cell.height,
            banner.x,
            banner.y,
            banner.width,
            banner.height
        );
    }

    Ok(())
}

fn curate(collection_path: PathBuf, ages_path: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let mut collection = read_collection(&collection_path)?;
    let ages = AgeMap::load(&ages_path)?;

    let summary = apply_age_map(&mut collection, &ages);

    let output = output.unwrap_or(collection_path);
    write_collection(&output, &collection)?;

    println!(
        "[✓] {} card(s) updated, {} without a mapped page, {} without source -> {}",
        summary.updated,
        summary.unmapped,
        summary.without_source,
        output.display()
    );
    Ok(())
}
