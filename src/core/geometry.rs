use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// OCR boundary polygon, serialized as `[[x, y], [x, y], [x, y], [x, y]]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(from = "[[f32; 2]; 4]", into = "[[f32; 2]; 4]")]
pub struct Quad {
    pub points: [Point; 4],
}

impl Quad {
    pub fn new(points: [Point; 4]) -> Self {
        Self { points }
    }

    /// Axis-aligned rectangle given as its top-left corner and size, corners clockwise.
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new([
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ])
    }

    /// Arithmetic mean of the four corners.
    pub fn centroid(&self) -> Point {
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / 4.0, sy / 4.0)
    }

    pub fn bbox(&self) -> BBox {
        let first = self.points[0];
        self.points[1..].iter().fold(
            BBox::new(first.x, first.y, first.x, first.y),
            |acc, p| BBox::new(acc.x0.min(p.x), acc.y0.min(p.y), acc.x1.max(p.x), acc.y1.max(p.y)),
        )
    }

    pub fn top(&self) -> f32 {
        self.bbox().y0
    }
}

impl From<[[f32; 2]; 4]> for Quad {
    fn from(raw: [[f32; 2]; 4]) -> Self {
        Self::new(raw.map(|[x, y]| Point::new(x, y)))
    }
}

impl From<Quad> for [[f32; 2]; 4] {
    fn from(quad: Quad) -> Self {
        quad.points.map(|p| [p.x, p.y])
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

/// Integer pixel region `[x, x + width) × [y, y + height)` used for cropping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersects with `[0, width) × [0, height)`.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }
}

/// One grid position on a page, in integer pixel coordinates.
///
/// Pixel ownership is half-open: the cell covers `[x, x + width) × [y, y + height)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CellRect {
    pub row: u32,
    pub column: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CellRect {
    pub fn x2(&self) -> u32 {
        self.x + self.width
    }

    pub fn y2(&self) -> u32 {
        self.y + self.height
    }

    pub fn rect(&self) -> PixelRect {
        PixelRect::new(self.x, self.y, self.width, self.height)
    }

    pub fn contains_pixel(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.x2() && py >= self.y && py < self.y2()
    }

    /// Closed containment for sub-pixel points such as detection centroids.
    ///
    /// Points on a shared edge match both neighbours; callers resolve that by
    /// taking the first cell in row-major order.
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x as f32
            && point.x <= self.x2() as f32
            && point.y >= self.y as f32
            && point.y <= self.y2() as f32
    }
}
