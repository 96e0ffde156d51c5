use crate::core::geometry::CellRect;
use crate::core::model::TextDetection;

/// Detections owned by one cell, top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct CellCluster<'a> {
    pub cell: CellRect,
    pub detections: Vec<&'a TextDetection>,
}

/// Index of the cell owning `detection`, by centroid.
///
/// Cells are scanned in the order given (row-major from `compute_grid`), so a
/// centroid on a shared edge goes to the lower-indexed row, then column. The
/// page's right and bottom edges are exclusive: a centroid at `x == width` or
/// `y == height` belongs to no cell.
pub fn owning_cell(detection: &TextDetection, cells: &[CellRect]) -> Option<usize> {
    let centroid = detection.boundary.centroid();
    let (width, height) = cells
        .iter()
        .fold((0, 0), |(w, h), cell| (w.max(cell.x2()), h.max(cell.y2())));
    if centroid.x >= width as f32 || centroid.y >= height as f32 {
        return None;
    }
    cells.iter().position(|cell| cell.contains_point(centroid))
}

/// Groups detections by owning cell. Cells without detections are absent;
/// detections outside every cell are dropped.
///
/// Within a cell detections are sorted by the top edge of their box. The sort
/// is stable, so equal tops keep their input order.
pub fn cluster_by_cell<'a>(detections: &'a [TextDetection], cells: &[CellRect]) -> Vec<CellCluster<'a>> {
    let mut buckets: Vec<Vec<&TextDetection>> = vec![Vec::new(); cells.len()];

    for detection in detections {
        match owning_cell(detection, cells) {
            Some(idx) => buckets[idx].push(detection),
            None => {
                let c = detection.boundary.centroid();
                tracing::debug!(text = %detection.text, x = c.x, y = c.y, "detection outside grid dropped");
            }
        }
    }

    cells
        .iter()
        .zip(buckets)
        .filter(|(_, bucket)| !bucket.is_empty())
        .map(|(cell, mut bucket)| {
            bucket.sort_by(|a, b| a.boundary.top().total_cmp(&b.boundary.top()));
            CellCluster {
                cell: *cell,
                detections: bucket,
            }
        })
        .collect()
}
