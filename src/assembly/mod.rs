pub mod card;
pub mod cluster;

use image::RgbImage;

use crate::core::color::{classify_color, ColorBands};
use crate::core::grid::{compute_grid, GridShape};
use crate::core::model::{CardDraft, CardSource, TextDetection};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub struct PageCards {
    pub cards: Vec<CardDraft>,
    pub cells_with_text: usize,
}

pub trait PageAssembler {
    fn assemble_page(
        &self,
        image: &RgbImage,
        detections: &[TextDetection],
        file: &str,
    ) -> Result<PageCards, ConfigError>;
}

#[derive(Debug, Clone)]
pub struct GridPageAssembler {
    grid: GridShape,
    min_name_length: usize,
    banner_fraction: f32,
    banner_margin: u32,
    bands: ColorBands,
}

impl GridPageAssembler {
    pub fn new(grid: GridShape) -> Self {
        Self {
            grid,
            min_name_length: 3,
            banner_fraction: 0.25,
            banner_margin: 20,
            bands: ColorBands::default(),
        }
    }

    pub fn with_min_name_length(mut self, min_name_length: usize) -> Self {
        self.min_name_length = min_name_length;
        self
    }

    pub fn with_banner(mut self, fraction: f32, margin: u32) -> Self {
        self.banner_fraction = fraction;
        self.banner_margin = margin;
        self
    }

    pub fn with_bands(mut self, bands: ColorBands) -> Self {
        self.bands = bands;
        self
    }
}

impl PageAssembler for GridPageAssembler {
    fn assemble_page(
        &self,
        image: &RgbImage,
        detections: &[TextDetection],
        file: &str,
    ) -> Result<PageCards, ConfigError> {
        let cells = compute_grid(image.width(), image.height(), self.grid)?;
        let clusters = cluster::cluster_by_cell(detections, &cells);

        let cards = clusters
            .iter()
            .filter_map(|cluster| {
                let banner = card::banner_region(&cluster.cell, self.banner_fraction, self.banner_margin);
                let color = classify_color(image, banner, &self.bands);
                let source = CardSource {
                    file: file.to_string(),
                    row: cluster.cell.row,
                    column: cluster.cell.column,
                };
                card::assemble_card(&cluster.detections, color, self.min_name_length, source)
            })
            .collect();

        Ok(PageCards {
            cards,
            cells_with_text: clusters.len(),
        })
    }
}
