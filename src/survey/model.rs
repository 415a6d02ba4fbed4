use crate::geometry::Ring;
use geojson::GeoJson;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Sentinel the form widgets use for "nothing chosen yet".
pub const PLACEHOLDER: &str = "Select...";

pub const DEFAULT_FIELD_TYPE: &str = "Cropland";

/// Crops the survey asks about. Ordering follows the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CropLabel {
    Coconut,
    Cocoa,
    Breadfruit,
    Banana,
    Kava,
    Other,
}

impl CropLabel {
    pub const ALL: [CropLabel; 6] = [
        CropLabel::Coconut,
        CropLabel::Cocoa,
        CropLabel::Breadfruit,
        CropLabel::Banana,
        CropLabel::Kava,
        CropLabel::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CropLabel::Coconut => "Coconut",
            CropLabel::Cocoa => "Cocoa",
            CropLabel::Breadfruit => "Breadfruit",
            CropLabel::Banana => "Banana",
            CropLabel::Kava => "Kava",
            CropLabel::Other => "Other",
        }
    }
}

impl fmt::Display for CropLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("unknown crop label: {0}")]
pub struct UnknownCropLabel(pub String);

impl FromStr for CropLabel {
    type Err = UnknownCropLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        CropLabel::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(t))
            .ok_or_else(|| UnknownCropLabel(t.to_string()))
    }
}

/// Per-crop answers. Only the keys the core reads are typed; everything else the form
/// collected (age cohorts, pest flags, planting sources...) rides along in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CropAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banana_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_crop_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty_harvested: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_unit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_acres: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Production questionnaire as submitted. Missing strings deserialize as empty so
/// validation can report them instead of failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionSubmission {
    pub farmer_id: String,
    pub district: String,
    pub village: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ea_code: Option<String>,
    pub season_year: String,
    pub selected_crops: Vec<CropLabel>,
    pub crop_data: BTreeMap<CropLabel, CropAttributes>,
}

impl ProductionSubmission {
    /// Value of the `crop_type` display column, e.g. `"Coconut, Kava"`.
    pub fn crop_display(&self) -> String {
        if self.selected_crops.is_empty() {
            return "None".to_string();
        }
        self.selected_crops
            .iter()
            .map(CropLabel::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One field outline ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundarySubmission {
    pub farmer_id: String,
    pub field_name: String,
    pub field_type: String,
    pub crop_type: CropLabel,
    pub coordinates: Ring,
    pub area_estimate: Option<f64>,
    pub notes: Option<String>,
}

/// A field as it comes from the map widget: raw vertices plus optional labels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldDraft {
    #[serde(default)]
    pub field_name: Option<String>,
    #[serde(default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub coordinates: Value,
}

/// Everything the registration form sends in one go.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveySubmission {
    pub production: ProductionSubmission,
    #[serde(default)]
    pub fields: BTreeMap<CropLabel, Vec<FieldDraft>>,
    #[serde(default)]
    pub drawings: BTreeMap<CropLabel, GeoJson>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryWriteFailure {
    pub crop: CropLabel,
    pub field_name: String,
    pub error: String,
}

/// Result of a submission. Boundary writes are independent, so some may fail after the
/// production record was stored.
#[derive(Debug, Clone, Default)]
pub struct SubmissionOutcome {
    pub production_id: i32,
    pub boundary_ids: Vec<i32>,
    pub failed_boundaries: Vec<BoundaryWriteFailure>,
    pub total_area_hectares: f64,
}

impl SubmissionOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed_boundaries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_labels_parse_case_insensitively() {
        assert_eq!("kava".parse::<CropLabel>(), Ok(CropLabel::Kava));
        assert_eq!(" Cocoa ".parse::<CropLabel>(), Ok(CropLabel::Cocoa));
        assert_eq!(
            "Taro".parse::<CropLabel>(),
            Err(UnknownCropLabel("Taro".to_string()))
        );
    }

    #[test]
    fn crop_attributes_keep_unknown_keys() {
        let raw = r#"{"growth_mode":"Single crop","qty_harvested":12,"age_0_5":3,"planting_sources":["Market/shop"]}"#;
        let attrs: CropAttributes = serde_json::from_str(raw).unwrap();
        assert_eq!(attrs.growth_mode.as_deref(), Some("Single crop"));
        assert_eq!(attrs.qty_harvested, Some(12.0));
        assert_eq!(attrs.extra.get("age_0_5"), Some(&serde_json::json!(3)));

        let back: Value = serde_json::to_value(&attrs).unwrap();
        assert_eq!(back["planting_sources"], serde_json::json!(["Market/shop"]));
    }

    #[test]
    fn missing_production_strings_default_to_empty() {
        let p: ProductionSubmission =
            serde_json::from_str(r#"{"selected_crops":["Kava"]}"#).unwrap();
        assert!(p.farmer_id.is_empty());
        assert_eq!(p.crop_display(), "Kava");
        assert_eq!(ProductionSubmission::default().crop_display(), "None");
    }
}
