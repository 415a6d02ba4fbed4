use super::coordinates::{in_range, MIN_POINTS};
use super::production::check_farmer_id_format;
use super::{is_unset, ValidationReport};
use crate::survey::model::BoundarySubmission;
use regex::Regex;
use std::sync::LazyLock;

pub const MAX_FIELD_NAME_LEN: usize = 100;
pub const MAX_NOTES_LEN: usize = 500;
pub const MAX_AREA_HECTARES: f64 = 10_000.0;

static FIELD_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s\-_\.]+$").expect("field name pattern"));

/// Checks one field boundary before it is stored.
pub fn validate_boundary(record: &BoundarySubmission) -> ValidationReport {
    let mut report = ValidationReport::new();

    report.check(record.field_name.trim().is_empty(), "Field name is required");
    report.check(
        is_unset(Some(record.field_type.as_str())),
        "Field type is required",
    );
    report.check(
        record.coordinates.len() < MIN_POINTS,
        "Field boundary must have at least 3 points",
    );

    if !record.field_name.is_empty() {
        report.check(
            record.field_name.chars().count() > MAX_FIELD_NAME_LEN,
            "Field name must be less than 100 characters",
        );
        report.check(
            !FIELD_NAME_RE.is_match(&record.field_name),
            "Field name contains invalid characters",
        );
    }

    if let Some(area) = record.area_estimate {
        report.check(
            area <= 0.0 || area.is_nan(),
            "Area estimate must be greater than 0",
        );
        report.check(
            area > MAX_AREA_HECTARES,
            "Area estimate seems unrealistic (max 10,000 hectares)",
        );
    }

    if let Some(notes) = &record.notes {
        report.check(
            notes.chars().count() > MAX_NOTES_LEN,
            "Notes must be less than 500 characters",
        );
    }

    report.check(is_unset(Some(record.farmer_id.as_str())), "Farmer ID is required");
    check_farmer_id_format(&record.farmer_id, &mut report);

    for (i, point) in record.coordinates.iter().enumerate() {
        report.check(
            !point.iter().all(|v| v.is_finite()) || !in_range(*point),
            format!("Coordinate {i} out of valid range"),
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::model::CropLabel;

    fn field() -> BoundarySubmission {
        BoundarySubmission {
            farmer_id: "EA10208-HH0012".to_string(),
            field_name: "Kava Field 1".to_string(),
            field_type: "Cropland".to_string(),
            crop_type: CropLabel::Kava,
            coordinates: vec![[171.75, -13.9], [171.76, -13.9], [171.76, -13.91]],
            area_estimate: Some(1.5),
            notes: Some(String::new()),
        }
    }

    #[test]
    fn valid_boundary_passes() {
        assert!(validate_boundary(&field()).is_ok());
    }

    #[test]
    fn required_fields() {
        let mut f = field();
        f.field_name = "  ".to_string();
        f.field_type = "Select...".to_string();
        f.coordinates.truncate(2);
        let report = validate_boundary(&f);
        assert_eq!(
            report.errors(),
            [
                "Field name is required",
                "Field type is required",
                "Field boundary must have at least 3 points",
            ]
        );
    }

    #[test]
    fn name_area_and_notes_limits() {
        let mut f = field();
        f.field_name = format!("{}<b>", "x".repeat(101));
        f.area_estimate = Some(0.0);
        f.notes = Some("n".repeat(501));
        let report = validate_boundary(&f);
        assert_eq!(
            report.errors(),
            [
                "Field name must be less than 100 characters",
                "Field name contains invalid characters",
                "Area estimate must be greater than 0",
                "Notes must be less than 500 characters",
            ]
        );
    }

    #[test]
    fn oversized_area_and_missing_estimate() {
        let mut f = field();
        f.area_estimate = Some(10_000.5);
        assert_eq!(
            validate_boundary(&f).message(),
            "Area estimate seems unrealistic (max 10,000 hectares)"
        );
        f.area_estimate = None;
        assert!(validate_boundary(&f).is_ok());
    }

    #[test]
    fn farmer_id_and_vertex_ranges() {
        let mut f = field();
        f.farmer_id = "x".to_string();
        f.coordinates[1] = [171.76, 95.0];
        assert_eq!(
            validate_boundary(&f).errors(),
            [
                "Farmer ID must be at least 3 characters long",
                "Coordinate 1 out of valid range",
            ]
        );
    }
}
