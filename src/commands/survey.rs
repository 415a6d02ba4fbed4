use crate::geometry::{estimate_area_hectares, rings_from_drawings};
use crate::survey::model::SurveySubmission;
use crate::survey::SurveyService;
use crate::validation::{parse_ring, validate_coordinates};
use anyhow::{bail, Context};
use geojson::GeoJson;
use serde_json::Value;
use std::fmt::Write;
use std::path::Path;

pub async fn submit(service: &SurveyService, path: &Path) -> anyhow::Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let submission: SurveySubmission = serde_json::from_str(&raw)
        .with_context(|| format!("parsing submission {}", path.display()))?;

    let outcome = service.submit(submission).await?;

    let mut out = format!(
        "✓ production record #{} stored, {} field(s), {:.2} ha",
        outcome.production_id,
        outcome.boundary_ids.len(),
        outcome.total_area_hectares
    );
    for failure in &outcome.failed_boundaries {
        let _ = write!(
            out,
            "\n✗ field '{}' ({}) not stored: {}",
            failure.field_name, failure.crop, failure.error
        );
    }
    Ok(out)
}

/// Raw rings from a bare `[[lon, lat], ...]` array or every polygon in a GeoJSON drawing.
fn load_rings(path: &Path) -> anyhow::Result<Vec<Value>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", path.display()))?;

    let rings = if value.is_array() {
        vec![value]
    } else {
        let drawing = GeoJson::from_json_value(value).context("not a ring or GeoJSON object")?;
        rings_from_drawings(&drawing)
    };
    if rings.is_empty() {
        bail!("no polygons found in {}", path.display());
    }
    Ok(rings)
}

/// Coordinate check result for each ring in the file.
pub fn check(path: &Path) -> anyhow::Result<String> {
    let lines: Vec<String> = load_rings(path)?
        .iter()
        .enumerate()
        .map(|(i, ring)| format!("polygon {}: {}", i + 1, validate_coordinates(ring).message()))
        .collect();
    Ok(lines.join("\n"))
}

pub fn area(path: &Path, reference_latitude: Option<f64>) -> anyhow::Result<String> {
    let rings = load_rings(path)?;

    let mut lines = Vec::with_capacity(rings.len());
    let mut total = 0.0;
    for (i, raw_ring) in rings.iter().enumerate() {
        match parse_ring(raw_ring) {
            Ok(ring) => {
                let ha = estimate_area_hectares(&ring, reference_latitude);
                total += ha;
                lines.push(format!("polygon {}: {} points, {:.4} ha", i + 1, ring.len(), ha));
            }
            Err(report) => lines.push(format!("polygon {}: {}", i + 1, report.message())),
        }
    }
    if rings.len() > 1 {
        lines.push(format!("total: {:.4} ha", total));
    }
    Ok(lines.join("\n"))
}
