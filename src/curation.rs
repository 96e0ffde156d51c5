//! Age assignment for an already extracted collection.
//!
//! A card's age depends on which scanned document its page came from, which no
//! single page can tell. The mapping is therefore supplied by hand, keyed by
//! page file name, and applied here as a separate pass.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::model::CardCollection;

pub const MAX_AGE: u8 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgeMap {
    ages: BTreeMap<String, u8>,
}

impl AgeMap {
    pub fn from_entries(entries: impl IntoIterator<Item = (String, u8)>) -> Result<Self> {
        let ages: BTreeMap<String, u8> = entries.into_iter().collect();
        if let Some((file, age)) = ages.iter().find(|(_, age)| !(1..=MAX_AGE).contains(*age)) {
            anyhow::bail!("age for {file} must be between 1 and {MAX_AGE}, got {age}");
        }
        Ok(Self { ages })
    }

    /// Reads a JSON object mapping page file names to ages.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read age map {}", path.display()))?;
        let entries: BTreeMap<String, u8> = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse age map {}", path.display()))?;
        Self::from_entries(entries)
    }

    pub fn get(&self, file: &str) -> Option<u8> {
        self.ages.get(file).copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurationSummary {
    pub updated: usize,
    pub unmapped: usize,
    pub without_source: usize,
}

pub fn apply_age_map(collection: &mut CardCollection, ages: &AgeMap) -> CurationSummary {
    let mut summary = CurationSummary::default();

    for card in &mut collection.cards {
        let Some(source) = &card.source else {
            summary.without_source += 1;
            continue;
        };
        match ages.get(&source.file) {
            Some(age) => {
                card.age = age;
                summary.updated += 1;
            }
            None => summary.unmapped += 1,
        }
    }

    if summary.without_source > 0 {
        tracing::warn!(
            cards = summary.without_source,
            "cards without source left untouched; extract with --with-source to curate them"
        );
    }
    collection.refresh_count();
    summary
}
