//! Query-time join of production answers and drawn fields on `(farmer_id, crop)`.
//!
//! Nothing here touches the store; callers hand in whatever rows they loaded. A
//! snapshot with production rows but no boundaries yet simply yields
//! `ProductionOnly` keys.

use super::model::{
    CropProduction, CropRollup, LinkKey, LinkResult, LinkStatus, Linkage, LinkingReport,
    LinkingSummary, SummaryMetrics,
};
use crate::storage::repository::{BoundaryRecord, ProductionRecord};
use crate::survey::model::CropAttributes;
use std::collections::{BTreeMap, BTreeSet};

/// Classifies every key seen in either source and aggregates the linked ones.
pub fn reconcile(
    productions: &[ProductionRecord],
    boundaries: &[BoundaryRecord],
) -> LinkingReport {
    let production_keys: BTreeSet<LinkKey> = productions
        .iter()
        .flat_map(|p| {
            p.selected_crops
                .iter()
                .map(|crop| LinkKey::new(p.farmer_id.clone(), *crop))
        })
        .collect();

    let mut boundaries_by_key: BTreeMap<LinkKey, Vec<&BoundaryRecord>> = BTreeMap::new();
    for b in boundaries {
        boundaries_by_key
            .entry(LinkKey::new(b.farmer_id.clone(), b.crop_type))
            .or_default()
            .push(b);
    }

    let all_keys: BTreeSet<&LinkKey> = production_keys
        .iter()
        .chain(boundaries_by_key.keys())
        .collect();

    let results: Vec<LinkResult> = all_keys
        .into_iter()
        .map(|key| {
            let fields = boundaries_by_key
                .get(key)
                .map(Vec::as_slice)
                .unwrap_or_default();
            classify(key, production_keys.contains(key), productions, fields)
        })
        .collect();

    summarize(results, productions.len(), boundaries.len())
}

/// Classifies a single key against the given rows.
///
/// A key found in neither source comes back as `ProductionOnly` without a slice.
pub fn link_key(
    key: &LinkKey,
    productions: &[ProductionRecord],
    boundaries: &[BoundaryRecord],
) -> LinkResult {
    let has_production = productions
        .iter()
        .any(|p| p.farmer_id == key.farmer_id && p.has_crop(key.crop));
    let fields: Vec<&BoundaryRecord> = boundaries
        .iter()
        .filter(|b| b.farmer_id == key.farmer_id && b.crop_type == key.crop)
        .collect();
    classify(key, has_production, productions, &fields)
}

fn classify(
    key: &LinkKey,
    has_production: bool,
    productions: &[ProductionRecord],
    fields: &[&BoundaryRecord],
) -> LinkResult {
    let total_fields = fields.len();
    let total_area: f64 = fields.iter().map(|b| b.area_or_zero()).sum();
    let boundaries: Vec<BoundaryRecord> = fields.iter().map(|b| (*b).clone()).collect();

    let production = if has_production {
        production_slice(key, productions)
    } else {
        None
    };

    let linkage = match production {
        Some(production) if total_fields > 0 => {
            let metrics = metrics(&production.attributes, total_fields, total_area);
            Linkage::Linked {
                production,
                boundaries,
                metrics,
            }
        }
        production if total_fields == 0 => Linkage::ProductionOnly { production },
        _ => Linkage::BoundariesOnly {
            boundaries,
            total_fields,
            total_area,
        },
    };

    LinkResult {
        key: key.clone(),
        linkage,
    }
}

/// First record (lowest id) of the farmer carrying a bag for the crop; failing that,
/// the first record that merely selected it, with an empty bag. Later duplicates are
/// ignored.
fn production_slice(
    key: &LinkKey,
    productions: &[ProductionRecord],
) -> Option<CropProduction> {
    let of_farmer = || productions.iter().filter(|p| p.farmer_id == key.farmer_id);

    if let Some(p) = of_farmer()
        .filter(|p| p.crop_data.contains_key(&key.crop))
        .min_by_key(|p| p.id)
    {
        return Some(CropProduction {
            record_id: p.id,
            season_year: p.season_year.clone(),
            submission_date: p.submission_date.clone(),
            attributes: p.crop_data[&key.crop].clone(),
        });
    }

    of_farmer()
        .filter(|p| p.has_crop(key.crop))
        .min_by_key(|p| p.id)
        .map(|p| CropProduction {
            record_id: p.id,
            season_year: p.season_year.clone(),
            submission_date: p.submission_date.clone(),
            attributes: CropAttributes::default(),
        })
}

fn metrics(attrs: &CropAttributes, total_fields: usize, total_area: f64) -> SummaryMetrics {
    let qty = attrs.qty_harvested;
    let price = attrs.price_per_unit;

    let yield_per_acre = match qty {
        Some(q) if total_area > 0.0 => Some(q / total_area),
        _ => None,
    };
    let total_value = match (qty, price) {
        (Some(q), Some(p)) => q * p,
        _ => 0.0,
    };

    SummaryMetrics {
        total_fields,
        total_area,
        quantity_harvested: qty.unwrap_or(0.0),
        harvest_unit: attrs.unit.clone(),
        yield_per_acre,
        price_per_unit: price.unwrap_or(0.0),
        total_value,
    }
}

fn summarize(
    results: Vec<LinkResult>,
    total_production_records: usize,
    total_boundary_records: usize,
) -> LinkingReport {
    let count = |status: LinkStatus| results.iter().filter(|r| r.status() == status).count();
    let fully_linked = count(LinkStatus::Linked);
    let production_only = count(LinkStatus::ProductionOnly);
    let boundaries_only = count(LinkStatus::BoundariesOnly);

    let linking_success_rate = if results.is_empty() {
        0.0
    } else {
        fully_linked as f64 / results.len() as f64
    };

    let mut farmers: BTreeMap<_, BTreeSet<&str>> = BTreeMap::new();
    let mut crop_analysis: BTreeMap<_, CropRollup> = BTreeMap::new();
    for r in &results {
        let Some(m) = r.metrics() else { continue };
        let rollup = crop_analysis.entry(r.key.crop).or_default();
        rollup.total_area += m.total_area;
        rollup.total_production += m.quantity_harvested;
        rollup.total_value += m.total_value;
        rollup.fields += m.total_fields;
        farmers
            .entry(r.key.crop)
            .or_default()
            .insert(r.key.farmer_id.as_str());
    }
    for (crop, ids) in farmers {
        if let Some(rollup) = crop_analysis.get_mut(&crop) {
            rollup.farmers = ids.len();
        }
    }

    LinkingReport {
        summary: LinkingSummary {
            total_combinations: results.len(),
            fully_linked,
            production_only,
            boundaries_only,
            total_production_records,
            total_boundary_records,
            linking_success_rate,
        },
        results,
        crop_analysis,
        skipped_records: 0,
    }
}
