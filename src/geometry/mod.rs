pub mod area;
pub mod drawing;

pub use area::estimate_area_hectares;
pub use drawing::rings_from_drawings;

/// `[longitude, latitude]`, the GeoJSON axis order used for storage, area and validation.
pub type Position = [f64; 2];

/// Ordered polygon outline. The closing vertex may or may not be repeated.
pub type Ring = Vec<Position>;
