//! Banner color classification in HSV space.
//!
//! Hue, saturation and value follow the 8-bit convention used by most vision
//! toolkits: hue is halved into `[0, 180]`, saturation and value span `[0, 255]`.

use std::fmt;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::core::geometry::PixelRect;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColorLabel {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Unknown,
}

impl fmt::Display for ColorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorLabel::Red => "RED",
            ColorLabel::Green => "GREEN",
            ColorLabel::Blue => "BLUE",
            ColorLabel::Yellow => "YELLOW",
            ColorLabel::Purple => "PURPLE",
            ColorLabel::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvPixel {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl HsvPixel {
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
        let max = rf.max(gf).max(bf);
        let min = rf.min(gf).min(bf);
        let delta = max - min;

        let s = if max > 0.0 { 255.0 * delta / max } else { 0.0 };

        let mut hue = if delta == 0.0 {
            0.0
        } else if max == rf {
            60.0 * (gf - bf) / delta
        } else if max == gf {
            120.0 + 60.0 * (bf - rf) / delta
        } else {
            240.0 + 60.0 * (rf - gf) / delta
        };
        if hue < 0.0 {
            hue += 360.0;
        }

        Self {
            h: (hue / 2.0).round() as u8,
            s: s.round() as u8,
            v: max as u8,
        }
    }
}

/// Inclusive HSV box `[lower, upper]` on every channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, pixel: HsvPixel) -> bool {
        let channels = [pixel.h, pixel.s, pixel.v];
        channels
            .iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(c, (lo, hi))| c >= lo && c <= hi)
    }
}

/// Per-label HSV ranges. A band matches a pixel when any of its ranges does,
/// which is how red covers both ends of the circular hue axis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorBands {
    pub red: Vec<HsvRange>,
    pub green: Vec<HsvRange>,
    pub blue: Vec<HsvRange>,
    pub yellow: Vec<HsvRange>,
    pub purple: Vec<HsvRange>,
}

impl Default for ColorBands {
    fn default() -> Self {
        Self {
            red: vec![
                HsvRange::new([0, 70, 50], [10, 255, 255]),
                HsvRange::new([170, 70, 50], [180, 255, 255]),
            ],
            green: vec![HsvRange::new([35, 50, 50], [85, 255, 255])],
            blue: vec![HsvRange::new([100, 50, 50], [130, 255, 255])],
            yellow: vec![HsvRange::new([20, 50, 50], [35, 255, 255])],
            purple: vec![HsvRange::new([130, 50, 50], [160, 255, 255])],
        }
    }
}

impl ColorBands {
    /// Bands in tie-break order.
    pub fn iter(&self) -> impl Iterator<Item = (ColorLabel, &[HsvRange])> {
        [
            (ColorLabel::Red, self.red.as_slice()),
            (ColorLabel::Green, self.green.as_slice()),
            (ColorLabel::Blue, self.blue.as_slice()),
            (ColorLabel::Yellow, self.yellow.as_slice()),
            (ColorLabel::Purple, self.purple.as_slice()),
        ]
        .into_iter()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (label, ranges) in self.iter() {
            for range in ranges {
                if range.lower.iter().zip(range.upper.iter()).any(|(lo, hi)| lo > hi) {
                    return Err(ConfigError::InvalidHsvRange {
                        band: label.to_string(),
                        lower: range.lower,
                        upper: range.upper,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Masked pixel count for every band, in tie-break order.
pub fn count_band_pixels(image: &RgbImage, rect: PixelRect, bands: &ColorBands) -> Vec<(ColorLabel, usize)> {
    let rect = rect.clamp_to(image.width(), image.height());
    let mut counts: Vec<(ColorLabel, usize)> = bands.iter().map(|(label, _)| (label, 0)).collect();

    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            let [r, g, b] = image.get_pixel(x, y).0;
            let hsv = HsvPixel::from_rgb(r, g, b);
            for ((_, ranges), (_, count)) in bands.iter().zip(counts.iter_mut()) {
                if ranges.iter().any(|range| range.contains(hsv)) {
                    *count += 1;
                }
            }
        }
    }

    counts
}

/// Dominant band of `rect`. Equal counts go to the earlier band; an empty
/// crop or a crop with no masked pixel at all is `Unknown`.
pub fn classify_color(image: &RgbImage, rect: PixelRect, bands: &ColorBands) -> ColorLabel {
    if rect.clamp_to(image.width(), image.height()).is_empty() {
        return ColorLabel::Unknown;
    }

    let counts = count_band_pixels(image, rect, bands);
    tracing::debug!(?rect, ?counts, "banner color counts");

    let mut best = (ColorLabel::Unknown, 0usize);
    for (label, count) in counts {
        if count > best.1 {
            best = (label, count);
        }
    }
    best.0
}
