use crate::storage::repository::BoundaryRecord;
use crate::survey::model::{CropAttributes, CropLabel};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// `(farmer_id, crop)`: the only thing tying production answers to drawn fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LinkKey {
    pub farmer_id: String,
    pub crop: CropLabel,
}

impl LinkKey {
    pub fn new(farmer_id: impl Into<String>, crop: CropLabel) -> Self {
        Self {
            farmer_id: farmer_id.into(),
            crop,
        }
    }
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.farmer_id, self.crop)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    Linked,
    ProductionOnly,
    BoundariesOnly,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LinkStatus::Linked => "linked",
            LinkStatus::ProductionOnly => "production_only",
            LinkStatus::BoundariesOnly => "boundaries_only",
        })
    }
}

/// The crop-specific slice of one production record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropProduction {
    pub record_id: i32,
    pub season_year: String,
    pub submission_date: String,
    pub attributes: CropAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_fields: usize,
    /// Sum of stored estimates (hectares), nulls as zero.
    pub total_area: f64,
    pub quantity_harvested: f64,
    pub harvest_unit: Option<String>,
    /// Quantity over `total_area`. Keeps the survey's reporting name although the
    /// denominator is the stored hectare estimate.
    pub yield_per_acre: Option<f64>,
    pub price_per_unit: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Linkage {
    Linked {
        production: CropProduction,
        boundaries: Vec<BoundaryRecord>,
        metrics: SummaryMetrics,
    },
    ProductionOnly {
        production: Option<CropProduction>,
    },
    BoundariesOnly {
        boundaries: Vec<BoundaryRecord>,
        total_fields: usize,
        total_area: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkResult {
    #[serde(flatten)]
    pub key: LinkKey,
    #[serde(flatten)]
    pub linkage: Linkage,
}

impl LinkResult {
    pub fn status(&self) -> LinkStatus {
        match self.linkage {
            Linkage::Linked { .. } => LinkStatus::Linked,
            Linkage::ProductionOnly { .. } => LinkStatus::ProductionOnly,
            Linkage::BoundariesOnly { .. } => LinkStatus::BoundariesOnly,
        }
    }

    pub fn total_fields(&self) -> usize {
        match &self.linkage {
            Linkage::Linked { metrics, .. } => metrics.total_fields,
            Linkage::ProductionOnly { .. } => 0,
            Linkage::BoundariesOnly { total_fields, .. } => *total_fields,
        }
    }

    pub fn total_area(&self) -> f64 {
        match &self.linkage {
            Linkage::Linked { metrics, .. } => metrics.total_area,
            Linkage::ProductionOnly { .. } => 0.0,
            Linkage::BoundariesOnly { total_area, .. } => *total_area,
        }
    }

    pub fn metrics(&self) -> Option<&SummaryMetrics> {
        match &self.linkage {
            Linkage::Linked { metrics, .. } => Some(metrics),
            _ => None,
        }
    }

    pub fn production(&self) -> Option<&CropProduction> {
        match &self.linkage {
            Linkage::Linked { production, .. } => Some(production),
            Linkage::ProductionOnly { production } => production.as_ref(),
            Linkage::BoundariesOnly { .. } => None,
        }
    }

    pub fn boundaries(&self) -> &[BoundaryRecord] {
        match &self.linkage {
            Linkage::Linked { boundaries, .. } | Linkage::BoundariesOnly { boundaries, .. } => {
                boundaries
            }
            Linkage::ProductionOnly { .. } => &[],
        }
    }
}

/// Per-crop totals over linked keys only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CropRollup {
    pub farmers: usize,
    pub total_area: f64,
    pub total_production: f64,
    pub total_value: f64,
    pub fields: usize,
}

impl CropRollup {
    pub fn average_yield(&self) -> Option<f64> {
        (self.total_area > 0.0).then(|| self.total_production / self.total_area)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkingSummary {
    pub total_combinations: usize,
    pub fully_linked: usize,
    pub production_only: usize,
    pub boundaries_only: usize,
    pub total_production_records: usize,
    pub total_boundary_records: usize,
    pub linking_success_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkingReport {
    pub summary: LinkingSummary,
    pub results: Vec<LinkResult>,
    pub crop_analysis: BTreeMap<CropLabel, CropRollup>,
    /// Stored rows that failed to decode and were left out.
    pub skipped_records: usize,
}

impl LinkingReport {
    pub fn with_status(&self, status: LinkStatus) -> impl Iterator<Item = &LinkResult> {
        self.results.iter().filter(move |r| r.status() == status)
    }

    pub fn linking_success_rate(&self) -> f64 {
        self.summary.linking_success_rate
    }
}
