use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use image::{Rgb, RgbImage};
use pretty_assertions::assert_eq;

use cardscan::config::{ExtractConfig, MetadataSettings, Placeholders};
use cardscan::core::color::ColorLabel;
use cardscan::core::geometry::Quad;
use cardscan::core::grid::GridShape;
use cardscan::core::model::{CardDraft, PageOutcome, TextDetection};
use cardscan::curation::{apply_age_map, AgeMap};
use cardscan::export::json_export::read_collection;
use cardscan::export::Extraction;
use cardscan::ocr::{JsonOcrEngine, OcrEngine};
use cardscan::pipeline::{build_collection, export_collection, run, run_with_report, PipelineConfig};

const PAPER: Rgb<u8> = Rgb([245, 243, 235]);
const YELLOW: Rgb<u8> = Rgb([232, 196, 48]);
const PURPLE: Rgb<u8> = Rgb([118, 48, 160]);

/// OCR results keyed by page file name, as if produced by the external engine.
struct StubOcr {
    pages: HashMap<String, Vec<TextDetection>>,
}

impl StubOcr {
    fn new() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }

    fn with_page(mut self, file: &str, detections: Vec<TextDetection>) -> Self {
        self.pages.insert(file.to_string(), detections);
        self
    }
}

impl OcrEngine for StubOcr {
    fn recognize(&self, image_path: &Path) -> Result<Option<Vec<TextDetection>>> {
        let name = image_path.file_name().unwrap().to_string_lossy().into_owned();
        Ok(self.pages.get(&name).cloned())
    }
}

fn temp_dir(prefix: &str) -> PathBuf {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("{prefix}-{pid}-{now}"));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn centered(cx: f32, cy: f32, text: &str) -> TextDetection {
    TextDetection::new(Quad::from_rect(cx - 30.0, cy - 10.0, 60.0, 20.0), text, 0.93)
}

/// 800x1600 page, 4 rows x 2 columns, with the banner of one cell painted.
fn write_page(dir: &Path, file: &str, banners: &[(u32, u32, Rgb<u8>)]) -> PathBuf {
    let mut image = RgbImage::from_pixel(800, 1600, PAPER);
    for &(row, column, color) in banners {
        let (x0, y0) = (column * 400, row * 400);
        for y in y0..y0 + 100 {
            for x in x0..x0 + 400 {
                image.put_pixel(x, y, color);
            }
        }
    }
    let path = dir.join(file);
    image.save(&path).unwrap();
    path
}

fn card_page_config() -> PipelineConfig {
    PipelineConfig::new(GridShape::new(4, 2))
}

#[test]
fn single_card_page_end_to_end() -> Result<()> {
    let dir = temp_dir("cardscan-e2e");
    let page = write_page(&dir, "page_1.png", &[(0, 0, YELLOW)]);
    let ocr = StubOcr::new().with_page(
        "page_1.png",
        vec![centered(60.0, 80.0, "Mettez en jeu..."), centered(50.0, 20.0, "Élevage")],
    );

    let output = run_with_report(&[page], &ocr, &card_page_config())?;

    assert_eq!(output.cards.len(), 1);
    let card = &output.cards[0];
    assert_eq!(card.name, "Élevage");
    assert_eq!(card.body, "Mettez en jeu...");
    assert_eq!(card.color, ColorLabel::Yellow);
    assert_eq!((card.source.row, card.source.column), (0, 0));
    assert_eq!(card.source.file, "page_1.png");
    assert_eq!(
        output.pages[0].outcome,
        PageOutcome::Processed {
            detections: 2,
            cells_with_text: 1,
            cards: 1,
        }
    );

    let _ = fs::remove_dir_all(&dir);
    Ok(())
}

#[test]
fn noisy_name_is_discarded() -> Result<()> {
    let dir = temp_dir("cardscan-noise");
    let page = write_page(&dir, "page_1.png", &[(1, 1, PURPLE)]);
    let ocr = StubOcr::new().with_page("page_1.png", vec![centered(600.0, 420.0, "1")]);

    let cards = run(&[page], &ocr, &card_page_config())?;
    assert!(cards.is_empty());

    let _ = fs::remove_dir_all(&dir);
    Ok(())
}

#[test]
fn pages_are_processed_in_given_order_and_failures_skipped() -> Result<()> {
    let dir = temp_dir("cardscan-order");
    let second = write_page(&dir, "scan_10.png", &[(0, 1, PURPLE)]);
    let first = write_page(&dir, "scan_2.png", &[(0, 0, YELLOW)]);
    let blank = write_page(&dir, "scan_3.png", &[]);
    let broken = dir.join("broken.png");
    fs::write(&broken, b"not an image")?;

    let ocr = StubOcr::new()
        .with_page("scan_2.png", vec![centered(100.0, 30.0, "Agriculture")])
        .with_page(
            "scan_10.png",
            vec![centered(500.0, 30.0, "Mysticisme"), centered(500.0, 70.0, "Piochez une 1.")],
        )
        .with_page("scan_3.png", vec![]);

    let pages = vec![second, broken, first, blank];
    let output = run_with_report(&pages, &ocr, &card_page_config())?;

    let names: Vec<(&str, ColorLabel)> = output
        .cards
        .iter()
        .map(|c| (c.name.as_str(), c.color))
        .collect();
    assert_eq!(
        names,
        vec![("Mysticisme", ColorLabel::Purple), ("Agriculture", ColorLabel::Yellow)]
    );
    assert!(matches!(output.pages[1].outcome, PageOutcome::Unreadable { .. }));
    assert_eq!(output.pages[3].outcome, PageOutcome::NoOcrResult);
    assert_eq!(output.pages.len(), 4);

    let _ = fs::remove_dir_all(&dir);
    Ok(())
}

#[test]
fn rerunning_same_inputs_is_identical() -> Result<()> {
    let dir = temp_dir("cardscan-idempotent");
    let page = write_page(&dir, "page_1.png", &[(0, 0, YELLOW), (3, 1, PURPLE)]);
    let ocr = StubOcr::new().with_page(
        "page_1.png",
        vec![
            centered(100.0, 30.0, "Écriture"),
            centered(100.0, 90.0, "Piochez une 2."),
            centered(600.0, 1230.0, "Mysticisme"),
            centered(600.0, 1290.0, "Piochez une 1"),
            centered(600.0, 1290.0, "et montrez-la."),
        ],
    );

    let first: Vec<CardDraft> = run(&[page.clone()], &ocr, &card_page_config())?;
    let second: Vec<CardDraft> = run(&[page], &ocr, &card_page_config())?;
    assert_eq!(
        serde_json::to_string(&first)?,
        serde_json::to_string(&second)?
    );
    assert_eq!(first[1].body, "Piochez une 1 et montrez-la.");

    let _ = fs::remove_dir_all(&dir);
    Ok(())
}

/// Fails for one page file and delegates the rest.
struct FlakyOcr {
    failing: String,
    inner: StubOcr,
}

impl OcrEngine for FlakyOcr {
    fn recognize(&self, image_path: &Path) -> Result<Option<Vec<TextDetection>>> {
        if image_path.file_name().unwrap().to_string_lossy() == self.failing {
            anyhow::bail!("OCR bridge failed: exit status 1");
        }
        self.inner.recognize(image_path)
    }
}

#[test]
fn ocr_error_skips_page_and_run_continues() -> Result<()> {
    let dir = temp_dir("cardscan-ocr-error");
    let failing = write_page(&dir, "scan_1.png", &[(0, 0, YELLOW)]);
    let healthy = write_page(&dir, "scan_2.png", &[(0, 1, PURPLE)]);
    let ocr = FlakyOcr {
        failing: "scan_1.png".to_string(),
        inner: StubOcr::new()
            .with_page("scan_1.png", vec![centered(100.0, 30.0, "Agriculture")])
            .with_page("scan_2.png", vec![centered(500.0, 30.0, "Mysticisme")]),
    };

    let output = run_with_report(&[failing, healthy], &ocr, &card_page_config())?;

    assert_eq!(output.pages[0].outcome, PageOutcome::NoOcrResult);
    assert_eq!(output.cards.len(), 1);
    assert_eq!(output.cards[0].name, "Mysticisme");
    assert_eq!(output.cards[0].color, ColorLabel::Purple);
    assert_eq!(output.cards[0].source.file, "scan_2.png");

    let _ = fs::remove_dir_all(&dir);
    Ok(())
}

#[test]
fn invalid_grid_aborts_the_run() {
    let config = PipelineConfig::new(GridShape::new(0, 0));
    let ocr = StubOcr::new();
    assert!(run(&[PathBuf::from("missing.png")], &ocr, &config).is_err());
}

#[test]
fn recorded_ocr_export_and_curation() -> Result<()> {
    let dir = temp_dir("cardscan-export");
    let page = write_page(&dir, "CCF_000029_page_1.png", &[(2, 0, PURPLE)]);
    let ocr_dir = dir.join("ocr");
    fs::create_dir_all(&ocr_dir)?;
    fs::write(
        ocr_dir.join("CCF_000029_page_1.json"),
        r#"[
            {"boundary": [[40, 810], [200, 810], [200, 840], [40, 840]], "text": "Philosophie", "confidence": 0.98},
            {"boundary": [[40, 900], [360, 900], [360, 930], [40, 930]], "text": "Vous pouvez mettre en jeu", "confidence": 0.91}
        ]"#,
    )?;

    let settings = ExtractConfig::default();
    let engine = JsonOcrEngine::new(ocr_dir);
    let output = run_with_report(&[page], &engine, &settings.pipeline())?;

    let collection = build_collection(
        &output.cards,
        &Placeholders::default(),
        &MetadataSettings::default(),
        "2025-12-29".to_string(),
        true,
    );
    let extraction = Extraction {
        collection,
        pages: output.pages,
        cells_per_page: settings.grid().cell_count(),
    };
    let out_dir = dir.join("out");
    export_collection(&extraction, &out_dir, true)?;

    let mut written = read_collection(&out_dir.join("cards.json"))?;
    assert_eq!(written.metadata.card_count, 1);
    assert_eq!(written.cards[0].name, "Philosophie");
    assert_eq!(written.cards[0].color, ColorLabel::Purple);
    assert_eq!(written.cards[0].dogmas[0].text, "Vous pouvez mettre en jeu");

    let review = fs::read_to_string(out_dir.join("review.txt"))?;
    assert!(review.contains("1/8 cards"));

    let ages = AgeMap::from_entries([("CCF_000029_page_1.png".to_string(), 2)])?;
    let summary = apply_age_map(&mut written, &ages);
    assert_eq!(summary.updated, 1);
    assert_eq!(written.cards[0].age, 2);

    let _ = fs::remove_dir_all(&dir);
    Ok(())
}
