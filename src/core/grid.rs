use serde::{Deserialize, Serialize};

use crate::core::geometry::CellRect;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridShape {
    pub rows: u32,
    pub columns: u32,
}

impl GridShape {
    pub fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::InvalidGrid {
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(())
    }
}

/// Splits a `width` x `height` page into `rows * columns` cells, row-major.
///
/// Band edges are `floor(i * extent / count)`, so the bands tile the page
/// exactly and the last band absorbs any truncation remainder.
pub fn compute_grid(width: u32, height: u32, shape: GridShape) -> Result<Vec<CellRect>, ConfigError> {
    shape.validate()?;
    if width == 0 || height == 0 {
        return Err(ConfigError::InvalidDimensions { width, height });
    }

    let edge = |index: u32, extent: u32, count: u32| -> u32 {
        (u64::from(index) * u64::from(extent) / u64::from(count)) as u32
    };

    let mut cells = Vec::with_capacity(shape.cell_count());
    for row in 0..shape.rows {
        let y1 = edge(row, height, shape.rows);
        let y2 = edge(row + 1, height, shape.rows);
        for column in 0..shape.columns {
            let x1 = edge(column, width, shape.columns);
            let x2 = edge(column + 1, width, shape.columns);
            cells.push(CellRect {
                row,
                column,
                x: x1,
                y: y1,
                width: x2 - x1,
                height: y2 - y1,
            });
        }
    }
    Ok(cells)
}
