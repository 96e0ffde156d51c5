pub mod bridge;
pub mod fixture;

use anyhow::Result;
use std::path::Path;

use crate::core::model::TextDetection;

pub use bridge::OcrBridge;
pub use fixture::JsonOcrEngine;

/// Text recognition for one page image.
///
/// `Ok(None)` means the engine produced no result for the page; an empty
/// `Vec` is treated the same way by the pipeline.
pub trait OcrEngine {
    fn recognize(&self, image_path: &Path) -> Result<Option<Vec<TextDetection>>>;
}

/// Parses the detection list shared by the bridge script and recorded results.
/// `null` parses to `None`.
pub fn parse_detections(json: &str) -> Result<Option<Vec<TextDetection>>> {
    let detections: Option<Vec<TextDetection>> = serde_json::from_str(json)?;
    Ok(detections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_null_and_lists() {
        assert_eq!(parse_detections("null").unwrap(), None);
        assert_eq!(parse_detections("[]").unwrap(), Some(vec![]));
        let parsed = parse_detections(
            r#"[{"boundary": [[0,0],[10,0],[10,5],[0,5]], "text": "Outils", "confidence": 0.5}]"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(parsed[0].text, "Outils");
    }

    #[test]
    fn rejects_malformed_boundary() {
        assert!(parse_detections(r#"[{"boundary": [[0,0]], "text": "x"}]"#).is_err());
    }
}
