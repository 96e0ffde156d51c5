use crate::core::color::ColorLabel;
use crate::core::geometry::{CellRect, PixelRect};
use crate::core::model::{CardDraft, CardSource, TextDetection};

/// Top slice of a cell that carries the card's colored banner.
///
/// The slice starts `margin` pixels in from the cell's left and top edges and
/// stops `margin` pixels before its right edge, skipping the printed border.
/// Its height is `floor(cell height * fraction)`.
pub fn banner_region(cell: &CellRect, fraction: f32, margin: u32) -> PixelRect {
    let banner_height = (cell.height as f32 * fraction) as u32;
    PixelRect::new(
        cell.x + margin,
        cell.y + margin,
        cell.width.saturating_sub(margin.saturating_mul(2)),
        banner_height,
    )
}

/// Builds a draft from a cell's ordered detections.
///
/// The first detection is the name, the rest joined by single spaces form the
/// body. Returns `None` for an empty cell or when the name is shorter than
/// `min_name_length` characters, which filters stray numerals and icon glyphs.
pub fn assemble_card(
    detections: &[&TextDetection],
    color: ColorLabel,
    min_name_length: usize,
    source: CardSource,
) -> Option<CardDraft> {
    let (first, rest) = detections.split_first()?;
    let name = first.text.trim();

    if name.chars().count() < min_name_length {
        tracing::debug!(
            card_name = name,
            min_name_length,
            file = %source.file,
            row = source.row,
            column = source.column,
            "discarding cell with short name"
        );
        return None;
    }

    let body = rest
        .iter()
        .map(|d| d.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    Some(CardDraft {
        name: name.to_string(),
        body,
        color,
        source,
    })
}
