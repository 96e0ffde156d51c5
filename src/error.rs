use thiserror::Error;

/// Structural misconfiguration. These abort a run; data-quality problems never do.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid grid shape: {rows} rows x {columns} columns (both must be positive)")]
    InvalidGrid { rows: u32, columns: u32 },

    #[error("invalid page dimensions: {width}x{height} (both must be positive)")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("banner fraction must be in (0, 1], got {0}")]
    InvalidBannerFraction(f32),

    #[error("invalid HSV range for {band}: lower {lower:?} exceeds upper {upper:?}")]
    InvalidHsvRange {
        band: String,
        lower: [u8; 3],
        upper: [u8; 3],
    },
}
