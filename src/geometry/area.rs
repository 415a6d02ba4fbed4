use super::Position;
use geo::{Area, Coord, LineString, Polygon};

const METERS_PER_DEGREE_LAT: f64 = 111_000.0;
const SQ_METERS_PER_HECTARE: f64 = 10_000.0;

/// Planar area estimate of a drawn field, in hectares.
///
/// The ring is treated as a flat Cartesian shape in degrees (shoelace formula), then
/// scaled by 111 km per degree of latitude and `111 km * cos(lat)` per degree of
/// longitude. `lat` is `reference_latitude` when given, otherwise the arithmetic mean
/// of every latitude in `ring` as supplied.
///
/// Local approximation for small fields, not a geodesic area. Stored estimates use
/// this exact formula and are never recomputed.
///
/// Rings with fewer than 3 points, or containing non-finite values, yield `0.0`.
pub fn estimate_area_hectares(ring: &[Position], reference_latitude: Option<f64>) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    if ring.iter().flatten().any(|v| !v.is_finite()) {
        return 0.0;
    }

    let area_sq_degrees = planar_area_sq_degrees(ring);

    let lat = match reference_latitude {
        Some(lat) if lat.is_finite() => lat,
        _ => mean_latitude(ring),
    };
    let meters_per_degree_lon = METERS_PER_DEGREE_LAT * lat.to_radians().cos();

    let area_sq_meters = area_sq_degrees * METERS_PER_DEGREE_LAT * meters_per_degree_lon;
    let hectares = area_sq_meters / SQ_METERS_PER_HECTARE;

    // cos() is non-negative in [-90, 90]; out-of-range references are clamped here.
    hectares.max(0.0)
}

fn planar_area_sq_degrees(ring: &[Position]) -> f64 {
    let exterior: LineString<f64> = ring
        .iter()
        .map(|[lon, lat]| Coord { x: *lon, y: *lat })
        .collect::<Vec<_>>()
        .into();
    Polygon::new(exterior, vec![]).unsigned_area()
}

fn mean_latitude(ring: &[Position]) -> f64 {
    ring.iter().map(|[_, lat]| lat).sum::<f64>() / ring.len() as f64
}
