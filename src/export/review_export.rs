use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::model::{PageOutcome, PageReport};
use crate::export::{Exporter, Extraction};

/// Plain-text yield report so a reviewer can find pages that lost cards.
#[derive(Debug, Clone)]
pub struct ReviewExporter {
    out_dir: PathBuf,
}

impl ReviewExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    fn format_page(page: &PageReport, cells_per_page: usize) -> String {
        let name = page.file.display();
        match &page.outcome {
            PageOutcome::Processed {
                detections,
                cells_with_text,
                cards,
            } => {
                let flag = if *cards < cells_per_page { "  [LOW YIELD]" } else { "" };
                format!(
                    "{name}: {cards}/{cells_per_page} cards ({cells_with_text} cells with text, {detections} detections){flag}"
                )
            }
            PageOutcome::Unreadable { reason } => format!("{name}: SKIPPED, unreadable image ({reason})"),
            PageOutcome::NoOcrResult => format!("{name}: SKIPPED, no OCR result"),
        }
    }

    pub fn render(extraction: &Extraction) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Extraction review ===\n");
        for page in &extraction.pages {
            out.push_str(&Self::format_page(page, extraction.cells_per_page));
            out.push('\n');
        }

        let low_yield = extraction
            .pages
            .iter()
            .filter(|p| p.cards() < extraction.cells_per_page)
            .count();
        let _ = writeln!(
            out,
            "\n{} pages, {} cards, {} pages to review",
            extraction.pages.len(),
            extraction.collection.cards.len(),
            low_yield
        );
        out
    }
}

impl Exporter for ReviewExporter {
    fn export(&self, extraction: &Extraction) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        fs::write(self.out_dir.join("review.txt"), Self::render(extraction))?;
        Ok(())
    }
}
