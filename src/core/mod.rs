pub mod color;
pub mod geometry;
pub mod grid;
pub mod model;
