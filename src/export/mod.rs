pub mod json_export;
pub mod review_export;

use anyhow::Result;

use crate::core::model::{CardCollection, PageReport};

pub use json_export::JsonExporter;
pub use review_export::ReviewExporter;

/// Result of one extraction run, ready to be written out.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub collection: CardCollection,
    pub pages: Vec<PageReport>,
    pub cells_per_page: usize,
}

pub trait Exporter {
    fn export(&self, extraction: &Extraction) -> Result<()>;
}
