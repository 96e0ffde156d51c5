use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::model::CardCollection;
use crate::export::{Exporter, Extraction};

#[derive(Debug, Clone)]
pub struct JsonExporter {
    out_dir: PathBuf,
}

impl JsonExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.out_dir.join("cards.json")
    }
}

impl Exporter for JsonExporter {
    fn export(&self, extraction: &Extraction) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        write_collection(&self.path(), &extraction.collection)
    }
}

/// Writes a collection as 4-space indented UTF-8 JSON.
pub fn write_collection(path: &Path, collection: &CardCollection) -> Result<()> {
    let mut data = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut data, formatter);
    collection.serialize(&mut serializer)?;
    data.push(b'\n');
    fs::write(path, data).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

pub fn read_collection(path: &Path) -> Result<CardCollection> {
    let data = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("failed to parse card collection {}", path.display()))
}
