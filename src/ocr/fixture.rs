use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::model::TextDetection;
use crate::ocr::{parse_detections, OcrEngine};

/// Replays OCR results recorded as `<dir>/<image stem>.json`.
///
/// A missing file means the page has no OCR result.
#[derive(Debug, Clone)]
pub struct JsonOcrEngine {
    dir: PathBuf,
}

impl JsonOcrEngine {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn result_path(&self, image_path: &Path) -> PathBuf {
        let stem = image_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.dir.join(format!("{stem}.json"))
    }
}

impl OcrEngine for JsonOcrEngine {
    fn recognize(&self, image_path: &Path) -> Result<Option<Vec<TextDetection>>> {
        let path = self.result_path(image_path);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed to read OCR result {}", path.display()))?;
        parse_detections(&data).with_context(|| format!("failed to parse OCR result {}", path.display()))
    }
}
