use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::assembly::{GridPageAssembler, PageAssembler};
use crate::config::{MetadataSettings, Placeholders};
use crate::core::color::ColorBands;
use crate::core::grid::GridShape;
use crate::core::model::{
    CardCollection, CardDraft, CardRecord, CollectionMetadata, Dogma, PageOutcome, PageReport,
    RunOutput,
};
use crate::error::ConfigError;
use crate::export::{Exporter, Extraction, JsonExporter, ReviewExporter};
use crate::ocr::OcrEngine;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub grid: GridShape,
    pub min_name_length: usize,
    pub banner_fraction: f32,
    pub banner_margin: u32,
    pub color_bands: ColorBands,
}

impl PipelineConfig {
    pub fn new(grid: GridShape) -> Self {
        Self {
            grid,
            min_name_length: 3,
            banner_fraction: 0.25,
            banner_margin: 20,
            color_bands: ColorBands::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        if !(self.banner_fraction > 0.0 && self.banner_fraction <= 1.0) {
            return Err(ConfigError::InvalidBannerFraction(self.banner_fraction));
        }
        self.color_bands.validate()
    }

    fn assembler(&self) -> GridPageAssembler {
        GridPageAssembler::new(self.grid)
            .with_min_name_length(self.min_name_length)
            .with_banner(self.banner_fraction, self.banner_margin)
            .with_bands(self.color_bands.clone())
    }
}

/// Extracts card drafts from `pages`, in the order given.
pub fn run(pages: &[PathBuf], ocr: &dyn OcrEngine, config: &PipelineConfig) -> Result<Vec<CardDraft>, ConfigError> {
    Ok(run_with_report(pages, ocr, config)?.cards)
}

/// Like [`run`], also reporting what happened to each page.
///
/// Unreadable images and pages without OCR output are skipped and reported;
/// only a structurally invalid configuration fails the run.
pub fn run_with_report(
    pages: &[PathBuf],
    ocr: &dyn OcrEngine,
    config: &PipelineConfig,
) -> Result<RunOutput, ConfigError> {
    config.validate()?;
    let assembler = config.assembler();
    let mut output = RunOutput::default();

    for (idx, page) in pages.iter().enumerate() {
        tracing::info!(page = idx + 1, total = pages.len(), file = %page.display(), "processing page");
        let (outcome, cards) = process_page(page, ocr, &assembler)?;
        if let PageOutcome::Processed { cards: found, .. } = &outcome {
            tracing::info!(file = %page.display(), cards = *found, "page done");
        }
        output.cards.extend(cards);
        output.pages.push(PageReport {
            file: page.clone(),
            outcome,
        });
    }

    tracing::info!(pages = pages.len(), cards = output.cards.len(), "extraction finished");
    Ok(output)
}

fn process_page(
    page: &Path,
    ocr: &dyn OcrEngine,
    assembler: &dyn PageAssembler,
) -> Result<(PageOutcome, Vec<CardDraft>), ConfigError> {
    let image = match image::open(page) {
        Ok(image) => image.to_rgb8(),
        Err(err) => {
            tracing::warn!(file = %page.display(), error = %err, "unreadable page image, skipping");
            return Ok((
                PageOutcome::Unreadable {
                    reason: err.to_string(),
                },
                Vec::new(),
            ));
        }
    };

    let detections = match ocr.recognize(page) {
        Ok(Some(detections)) if !detections.is_empty() => detections,
        Ok(_) => {
            tracing::warn!(file = %page.display(), "no OCR result, skipping");
            return Ok((PageOutcome::NoOcrResult, Vec::new()));
        }
        Err(err) => {
            tracing::warn!(file = %page.display(), error = %format!("{err:#}"), "OCR failed, skipping");
            return Ok((PageOutcome::NoOcrResult, Vec::new()));
        }
    };

    let file = page
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| page.display().to_string());
    let assembled = assembler.assemble_page(&image, &detections, &file)?;
    let outcome = PageOutcome::Processed {
        detections: detections.len(),
        cells_with_text: assembled.cells_with_text,
        cards: assembled.cards.len(),
    };
    Ok((outcome, assembled.cards))
}

/// Reads an ordered page list: one path per line, `#` comments and blank
/// lines ignored, relative paths resolved against the list's directory.
pub fn read_page_list(path: &Path) -> Result<Vec<PathBuf>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read page list {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let entry = PathBuf::from(line);
            if entry.is_absolute() {
                entry
            } else {
                base.join(entry)
            }
        })
        .collect())
}

pub fn to_record(card: &CardDraft, placeholders: &Placeholders, with_source: bool) -> CardRecord {
    CardRecord {
        name: card.name.clone(),
        age: placeholders.age,
        color: card.color,
        icons: placeholders.icons.clone(),
        dogmas: vec![Dogma {
            symbol: placeholders.dogma_symbol.clone(),
            text: card.body.clone(),
        }],
        source: with_source.then(|| card.source.clone()),
    }
}

pub fn build_collection(
    cards: &[CardDraft],
    placeholders: &Placeholders,
    metadata: &MetadataSettings,
    created: String,
    with_source: bool,
) -> CardCollection {
    let mut collection = CardCollection {
        schema: metadata.schema.clone(),
        version: metadata.version.clone(),
        metadata: CollectionMetadata {
            created,
            source: metadata.source.clone(),
            card_count: 0,
            language: metadata.language.clone(),
        },
        cards: cards
            .iter()
            .map(|card| to_record(card, placeholders, with_source))
            .collect(),
    };
    collection.refresh_count();
    collection
}

pub fn export_collection(extraction: &Extraction, output: &Path, review: bool) -> Result<()> {
    let json_exporter = JsonExporter::new(output.to_path_buf());
    json_exporter.export(extraction)?;

    if review {
        let review_exporter = ReviewExporter::new(output.to_path_buf());
        review_exporter.export(extraction)?;
    }

    Ok(())
}
