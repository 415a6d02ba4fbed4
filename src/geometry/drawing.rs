use geojson::{GeoJson, Geometry, Value as GeometryValue};
use log::debug;
use serde_json::Value;

/// Exterior rings of every polygon the map widget returned, in drawing order.
///
/// Other shapes (markers, lines, multi-polygons) are skipped. Rings are handed back
/// as raw JSON so they still go through coordinate validation before use.
pub fn rings_from_drawings(drawings: &GeoJson) -> Vec<Value> {
    let mut rings = Vec::new();
    match drawings {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(geometry) = &feature.geometry {
                    push_exterior_ring(geometry, &mut rings);
                }
            }
        }
        GeoJson::Feature(feature) => {
            if let Some(geometry) = &feature.geometry {
                push_exterior_ring(geometry, &mut rings);
            }
        }
        GeoJson::Geometry(geometry) => push_exterior_ring(geometry, &mut rings),
    }
    rings
}

fn push_exterior_ring(geometry: &Geometry, out: &mut Vec<Value>) {
    match &geometry.value {
        GeometryValue::Polygon(polygon) => match polygon.first() {
            Some(exterior) => out.push(Value::from(exterior.clone())),
            None => debug!("skipping polygon drawing without an exterior ring"),
        },
        _ => debug!("skipping non-polygon drawing"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygons_are_extracted_in_order() {
        let raw = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {}, "geometry": {"type": "Polygon", "coordinates": [[[171.75, -13.9], [171.76, -13.9], [171.76, -13.91], [171.75, -13.9]]]}},
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [171.75, -13.9]}},
                {"type": "Feature", "properties": {}, "geometry": {"type": "Polygon", "coordinates": [[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]]}}
            ]
        }"#;
        let drawings: GeoJson = raw.parse().unwrap();
        let rings = rings_from_drawings(&drawings);
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0][0], serde_json::json!([171.75, -13.9]));
        assert_eq!(rings[0].as_array().unwrap().len(), 4);
        assert_eq!(rings[1][2], serde_json::json!([5.0, 6.0]));
    }

    #[test]
    fn bare_geometry_is_accepted() {
        let raw = r#"{"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]]}"#;
        let drawings: GeoJson = raw.parse().unwrap();
        assert_eq!(rings_from_drawings(&drawings).len(), 1);
    }
}
