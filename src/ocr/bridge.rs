use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::model::TextDetection;
use crate::ocr::{parse_detections, OcrEngine};

/// Runs an external OCR script per page and reads its JSON detections from stdout.
///
/// The script is invoked as `<python> <script> --image <path> --lang <lang>`.
#[derive(Debug, Clone)]
pub struct OcrBridge {
    interpreter: PathBuf,
    script_path: PathBuf,
    lang: String,
}

impl OcrBridge {
    pub fn new(script_path: PathBuf) -> Self {
        Self {
            interpreter: PathBuf::from("python3"),
            script_path,
            lang: "fr".to_string(),
        }
    }

    pub fn with_interpreter(mut self, interpreter: PathBuf) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn with_lang(mut self, lang: String) -> Self {
        self.lang = lang;
        self
    }
}

impl Default for OcrBridge {
    fn default() -> Self {
        Self::new(PathBuf::from("ocr/bridge/paddle_bridge.py"))
    }
}

impl OcrEngine for OcrBridge {
    fn recognize(&self, image_path: &Path) -> Result<Option<Vec<TextDetection>>> {
        let output = Command::new(&self.interpreter)
            .arg(&self.script_path)
            .arg("--image")
            .arg(image_path)
            .arg("--lang")
            .arg(&self.lang)
            .output()
            .with_context(|| format!("failed to invoke OCR bridge {}", self.script_path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("OCR bridge failed on {}: {stderr}", image_path.display());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Ok(None);
        }
        parse_detections(&stdout).with_context(|| "failed to parse OCR JSON response")
    }
}
