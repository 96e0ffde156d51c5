use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::color::ColorLabel;
use crate::core::geometry::Quad;

/// One OCR-recognized fragment, as returned by the OCR collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextDetection {
    pub boundary: Quad,
    pub text: String,
    #[serde(default)]
    pub confidence: f32,
}

impl TextDetection {
    pub fn new(boundary: Quad, text: impl Into<String>, confidence: f32) -> Self {
        Self {
            boundary,
            text: text.into(),
            confidence,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardSource {
    pub file: String,
    pub row: u32,
    pub column: u32,
}

/// Card reconstructed from one grid cell, before any curation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardDraft {
    pub name: String,
    pub body: String,
    pub color: ColorLabel,
    pub source: CardSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dogma {
    pub symbol: String,
    pub text: String,
}

/// Persisted card shape. `age`, `icons` and dogma symbols are placeholders
/// until a curation pass fills them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardRecord {
    pub name: String,
    pub age: u8,
    pub color: ColorLabel,
    pub icons: Vec<String>,
    pub dogmas: Vec<Dogma>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<CardSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMetadata {
    pub created: String,
    pub source: String,
    pub card_count: usize,
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardCollection {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub metadata: CollectionMetadata,
    pub cards: Vec<CardRecord>,
}

impl CardCollection {
    pub fn refresh_count(&mut self) {
        self.metadata.card_count = self.cards.len();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageOutcome {
    Processed {
        detections: usize,
        cells_with_text: usize,
        cards: usize,
    },
    Unreadable {
        reason: String,
    },
    NoOcrResult,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageReport {
    pub file: PathBuf,
    pub outcome: PageOutcome,
}

impl PageReport {
    pub fn cards(&self) -> usize {
        match self.outcome {
            PageOutcome::Processed { cards, .. } => cards,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutput {
    pub cards: Vec<CardDraft>,
    pub pages: Vec<PageReport>,
}
