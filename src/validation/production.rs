use super::{is_unset, ValidationReport};
use crate::survey::model::{CropAttributes, CropLabel, ProductionSubmission};
use regex::Regex;
use std::sync::LazyLock;

pub const MAX_QTY_HARVESTED: f64 = 1_000_000.0;
pub const MAX_PRICE_PER_UNIT: f64 = 10_000.0;
pub const MAX_AREA_ACRES: f64 = 10_000.0;

static FARMER_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\-_]+$").expect("farmer id pattern"));
static EA_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("ea code pattern"));
static SEASON_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}/\d{2,4}$").expect("season pattern"));

/// Checks a production questionnaire. Every rule runs; see [`ValidationReport`].
pub fn validate_production(record: &ProductionSubmission) -> ValidationReport {
    let mut report = ValidationReport::new();

    for (value, label) in [
        (record.farmer_id.as_str(), "Farmer ID"),
        (record.district.as_str(), "District"),
        (record.village.as_str(), "Village"),
        (record.season_year.as_str(), "Season/Year"),
    ] {
        report.check(is_unset(Some(value)), format!("{label} is required"));
    }

    report.check(
        record.selected_crops.is_empty(),
        "At least one crop must be selected",
    );

    check_farmer_id_format(&record.farmer_id, &mut report);

    if let Some(ea) = record.ea_code.as_deref().filter(|s| !s.is_empty()) {
        report.check(!EA_CODE_RE.is_match(ea), "EA Code must contain only numbers");
    }

    if !record.season_year.is_empty() {
        report.check(
            !SEASON_YEAR_RE.is_match(&record.season_year),
            "Season/Year must be in format YYYY/YY or YYYY/YYYY (e.g., 2024/25)",
        );
    }

    let empty = CropAttributes::default();
    for crop in &record.selected_crops {
        let info = record.crop_data.get(crop).unwrap_or(&empty);
        check_crop_specific(*crop, info, &mut report);
        check_production_fields(*crop, info, &mut report);
    }

    report
}

/// Length and charset rules shared with boundary records.
pub(crate) fn check_farmer_id_format(farmer_id: &str, report: &mut ValidationReport) {
    if farmer_id.is_empty() {
        return;
    }
    report.check(
        farmer_id.trim().chars().count() < 3,
        "Farmer ID must be at least 3 characters long",
    );
    report.check(
        !FARMER_ID_RE.is_match(farmer_id),
        "Farmer ID can only contain letters, numbers, hyphens, and underscores",
    );
}

fn check_crop_specific(crop: CropLabel, info: &CropAttributes, report: &mut ValidationReport) {
    let growth_mode_missing = is_unset(info.growth_mode.as_deref());
    match crop {
        CropLabel::Coconut | CropLabel::Cocoa | CropLabel::Breadfruit => {
            report.check(growth_mode_missing, format!("Growth mode is required for {crop}"));
        }
        CropLabel::Banana => {
            report.check(
                is_unset(info.banana_type.as_deref()),
                format!("Banana type is required for {crop}"),
            );
            report.check(growth_mode_missing, format!("Growth mode is required for {crop}"));
        }
        CropLabel::Other => {
            report.check(
                info.other_crop_name
                    .as_deref()
                    .map_or(true, |s| s.trim().is_empty()),
                format!("Crop name is required for {crop}"),
            );
        }
        CropLabel::Kava => {}
    }
}

fn check_production_fields(crop: CropLabel, info: &CropAttributes, report: &mut ValidationReport) {
    if let Some(qty) = info.qty_harvested {
        report.check(
            qty < 0.0 || qty.is_nan(),
            format!("Quantity harvested cannot be negative for {crop}"),
        );
        report.check(
            qty > MAX_QTY_HARVESTED,
            format!("Quantity harvested seems unrealistic for {crop} (max 1,000,000)"),
        );
    }

    if let Some(price) = info.price_per_unit {
        report.check(
            price < 0.0 || price.is_nan(),
            format!("Price per unit cannot be negative for {crop}"),
        );
        report.check(
            price > MAX_PRICE_PER_UNIT,
            format!("Price per unit seems unrealistic for {crop} (max $10,000)"),
        );
    }

    if let Some(area) = info.area_acres.filter(|a| *a > 0.0) {
        report.check(
            area > MAX_AREA_ACRES,
            format!("Area in acres seems unrealistic for {crop} (max 10,000 acres)"),
        );
    }

    if info.qty_harvested.is_some_and(|q| q > 0.0) {
        report.check(
            is_unset(info.unit.as_deref()),
            format!("Unit is required when quantity harvested is provided for {crop}"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn attrs(growth: Option<&str>, qty: Option<f64>, unit: Option<&str>) -> CropAttributes {
        CropAttributes {
            growth_mode: growth.map(str::to_string),
            qty_harvested: qty,
            unit: unit.map(str::to_string),
            price_per_unit: Some(2.5),
            ..Default::default()
        }
    }

    fn valid_record() -> ProductionSubmission {
        let mut crop_data = BTreeMap::new();
        crop_data.insert(
            CropLabel::Coconut,
            attrs(Some("Single crop"), Some(120.0), Some("Each")),
        );
        crop_data.insert(
            CropLabel::Banana,
            CropAttributes {
                banana_type: Some("Fa'i Samoa".to_string()),
                ..attrs(Some("Mixed crop"), Some(10.0), Some("Bundle"))
            },
        );
        crop_data.insert(
            CropLabel::Other,
            CropAttributes {
                other_crop_name: Some("Mango".to_string()),
                ..attrs(None, None, None)
            },
        );
        ProductionSubmission {
            farmer_id: "EA10208-HH0012".to_string(),
            district: "Vaimauga 1".to_string(),
            village: "Moataa".to_string(),
            ea_code: Some("10208".to_string()),
            season_year: "2024/25".to_string(),
            selected_crops: vec![
                CropLabel::Coconut,
                CropLabel::Banana,
                CropLabel::Kava,
                CropLabel::Other,
            ],
            crop_data,
        }
    }

    #[test]
    fn well_formed_record_passes() {
        let report = validate_production(&valid_record());
        assert!(report.is_ok(), "{}", report.message());
        assert_eq!(report.message(), "Validation successful");
    }

    #[test]
    fn each_required_field_is_reported() {
        type Clear = fn(&mut ProductionSubmission);
        let cases: [(Clear, &str); 5] = [
            (|r| r.farmer_id.clear(), "Farmer ID is required"),
            (|r| r.district = "Select...".to_string(), "District is required"),
            (|r| r.village.clear(), "Village is required"),
            (|r| r.season_year.clear(), "Season/Year is required"),
            (|r| r.selected_crops.clear(), "At least one crop must be selected"),
        ];
        for (clear, msg) in cases {
            let mut record = valid_record();
            clear(&mut record);
            let report = validate_production(&record);
            assert!(!report.is_ok());
            assert!(report.message().contains(msg), "{}", report.message());
        }
    }

    #[test]
    fn errors_accumulate_in_rule_order() {
        let mut record = valid_record();
        record.farmer_id = "a!".to_string();
        record.season_year = "24/25".to_string();
        let report = validate_production(&record);
        assert_eq!(
            report.errors(),
            [
                "Farmer ID must be at least 3 characters long",
                "Farmer ID can only contain letters, numbers, hyphens, and underscores",
                "Season/Year must be in format YYYY/YY or YYYY/YYYY (e.g., 2024/25)",
            ]
        );
    }

    #[test]
    fn four_digit_season_end_is_accepted() {
        let mut record = valid_record();
        record.season_year = "2024/2025".to_string();
        assert!(validate_production(&record).is_ok());
    }

    #[test]
    fn ea_code_must_be_numeric() {
        let mut record = valid_record();
        record.ea_code = Some("EA-1".to_string());
        assert_eq!(
            validate_production(&record).message(),
            "EA Code must contain only numbers"
        );
    }

    #[test]
    fn crop_specific_requirements() {
        let mut record = valid_record();
        record.crop_data.get_mut(&CropLabel::Coconut).unwrap().growth_mode =
            Some("Select...".to_string());
        record.crop_data.get_mut(&CropLabel::Banana).unwrap().banana_type = None;
        record.crop_data.get_mut(&CropLabel::Other).unwrap().other_crop_name =
            Some("  ".to_string());
        let report = validate_production(&record);
        assert_eq!(
            report.errors(),
            [
                "Growth mode is required for Coconut",
                "Banana type is required for Banana",
                "Crop name is required for Other",
            ]
        );
    }

    #[test]
    fn missing_crop_bag_is_checked_as_empty() {
        let mut record = valid_record();
        record.selected_crops.push(CropLabel::Cocoa);
        let report = validate_production(&record);
        assert_eq!(report.errors(), ["Growth mode is required for Cocoa"]);
    }

    #[test]
    fn production_ranges() {
        let mut record = valid_record();
        let coconut = record.crop_data.get_mut(&CropLabel::Coconut).unwrap();
        coconut.qty_harvested = Some(2_000_000.0);
        coconut.price_per_unit = Some(-1.0);
        coconut.area_acres = Some(20_000.0);
        coconut.unit = Some("Select...".to_string());
        let report = validate_production(&record);
        assert_eq!(
            report.errors(),
            [
                "Quantity harvested seems unrealistic for Coconut (max 1,000,000)",
                "Price per unit cannot be negative for Coconut",
                "Area in acres seems unrealistic for Coconut (max 10,000 acres)",
                "Unit is required when quantity harvested is provided for Coconut",
            ]
        );
    }

    #[test]
    fn zero_quantity_needs_no_unit() {
        let mut record = valid_record();
        let coconut = record.crop_data.get_mut(&CropLabel::Coconut).unwrap();
        coconut.qty_harvested = Some(0.0);
        coconut.unit = None;
        assert!(validate_production(&record).is_ok());
    }
}
