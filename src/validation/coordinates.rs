use super::ValidationReport;
use crate::geometry::{Position, Ring};
use serde_json::Value;

pub const MIN_POINTS: usize = 3;
pub const MAX_POINTS: usize = 1000;

const SUCCESS: &str = "Coordinates are valid";

/// Structural and range checks on a raw ring from the drawing widget.
///
/// Points are `[longitude, latitude]`. Stops at the first failure.
pub fn validate_coordinates(raw: &Value) -> ValidationReport {
    match parse_ring(raw) {
        Ok(_) => ValidationReport::with_success_message(SUCCESS),
        Err(report) => report,
    }
}

/// Same checks as [`validate_coordinates`], returning the typed ring on success.
pub fn parse_ring(raw: &Value) -> Result<Ring, ValidationReport> {
    let fail = |msg: &str| {
        let mut r = ValidationReport::with_success_message(SUCCESS);
        r.push(msg);
        r
    };

    let points = match raw.as_array() {
        Some(points) if !points.is_empty() => points,
        _ => return Err(fail("Invalid coordinates format")),
    };
    if points.len() < MIN_POINTS {
        return Err(fail("Minimum 3 coordinate points required"));
    }
    if points.len() > MAX_POINTS {
        return Err(fail("Too many coordinate points (max 1000)"));
    }

    let mut ring = Vec::with_capacity(points.len());
    for point in points {
        let pair = match point.as_array() {
            Some(pair) if pair.len() == 2 => pair,
            _ => return Err(fail("Each coordinate must have longitude and latitude")),
        };
        let (Some(lon), Some(lat)) = (as_number(&pair[0]), as_number(&pair[1])) else {
            return Err(fail("Coordinates must be valid numbers"));
        };
        if !in_range([lon, lat]) {
            return Err(fail("Coordinates out of valid range"));
        }
        ring.push([lon, lat]);
    }
    Ok(ring)
}

/// Numbers, or numeric strings as some widgets emit them.
fn as_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

pub(crate) fn in_range([lon, lat]: Position) -> bool {
    (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_samoa_ring() {
        let raw = json!([[171.75, -13.9], [171.76, -13.9], [171.76, -13.91]]);
        let report = validate_coordinates(&raw);
        assert!(report.is_ok());
        assert_eq!(report.message(), "Coordinates are valid");
        assert_eq!(parse_ring(&raw).unwrap()[0], [171.75, -13.9]);
    }

    #[test]
    fn rejects_latitude_out_of_range() {
        let raw = json!([[171.75, 95.0], [171.76, -13.9], [171.76, -13.91]]);
        let report = validate_coordinates(&raw);
        assert!(!report.is_ok());
        assert_eq!(report.message(), "Coordinates out of valid range");
    }

    #[test]
    fn rejects_longitude_out_of_range() {
        let raw = json!([[181.0, 0.0], [0.0, 0.0], [0.0, 1.0]]);
        assert!(!validate_coordinates(&raw).is_ok());
    }

    #[test]
    fn structural_failures_are_reported_not_raised() {
        let cases = [
            (json!(null), "Invalid coordinates format"),
            (json!({"lat": 1}), "Invalid coordinates format"),
            (json!([[0.0, 0.0], [1.0, 1.0]]), "Minimum 3 coordinate points required"),
            (
                json!([[0.0, 0.0], [1.0], [1.0, 1.0]]),
                "Each coordinate must have longitude and latitude",
            ),
            (
                json!([[0.0, 0.0], ["x", 1.0], [1.0, 1.0]]),
                "Coordinates must be valid numbers",
            ),
        ];
        for (raw, msg) in cases {
            assert_eq!(validate_coordinates(&raw).message(), msg, "input {raw}");
        }
    }

    #[test]
    fn too_many_points() {
        let raw = Value::Array((0..1001).map(|i| json!([0.0, i as f64 / 100.0])).collect());
        assert_eq!(
            validate_coordinates(&raw).message(),
            "Too many coordinate points (max 1000)"
        );
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let raw = json!([["171.75", "-13.9"], [171.76, -13.9], [171.76, -13.91]]);
        assert!(validate_coordinates(&raw).is_ok());
    }
}
