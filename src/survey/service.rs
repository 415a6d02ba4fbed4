use super::model::{
    BoundarySubmission, BoundaryWriteFailure, CropLabel, FieldDraft, ProductionSubmission,
    SubmissionOutcome, SurveySubmission, DEFAULT_FIELD_TYPE,
};
use crate::error::SurveyError;
use crate::geometry::{estimate_area_hectares, rings_from_drawings};
use crate::storage::repository::{BoundaryRepository, ProductionRepository};
use crate::validation::{
    is_unset, parse_ring, sanitize_input, validate_boundary, validate_production,
    ValidationReport,
};
use log::{error, info};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub struct SurveyService {
    db: Arc<DatabaseConnection>,
    reference_latitude: Option<f64>,
}

impl SurveyService {
    pub fn new(db: Arc<DatabaseConnection>, reference_latitude: Option<f64>) -> Self {
        Self {
            db,
            reference_latitude,
        }
    }

    /// Validates a whole registration and stores it.
    ///
    /// Nothing is written unless the production answers and every field pass. The
    /// production record goes first; boundaries are then written one by one and any
    /// that fail are reported in the outcome instead of aborting the rest.
    pub async fn submit(
        &self,
        submission: SurveySubmission,
    ) -> Result<SubmissionOutcome, SurveyError> {
        let (production, boundaries) = self.prepare(submission)?;

        let production_id = ProductionRepository::insert(&self.db, &production).await?;
        info!(
            "stored production #{} for {} ({})",
            production_id,
            production.farmer_id,
            production.crop_display()
        );

        let mut outcome = SubmissionOutcome {
            production_id,
            ..Default::default()
        };
        for boundary in boundaries {
            match BoundaryRepository::insert(&self.db, &boundary).await {
                Ok(id) => {
                    outcome.boundary_ids.push(id);
                    outcome.total_area_hectares += boundary.area_estimate.unwrap_or(0.0);
                }
                Err(e) => {
                    error!(
                        "failed to store field '{}' for {} - {}: {}",
                        boundary.field_name, boundary.farmer_id, boundary.crop_type, e
                    );
                    outcome.failed_boundaries.push(BoundaryWriteFailure {
                        crop: boundary.crop_type,
                        field_name: boundary.field_name,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "stored {} field(s), {:.2} ha, {} failed",
            outcome.boundary_ids.len(),
            outcome.total_area_hectares,
            outcome.failed_boundaries.len()
        );
        Ok(outcome)
    }

    /// Sanitises and validates everything, returning the records to write.
    pub fn prepare(
        &self,
        submission: SurveySubmission,
    ) -> Result<(ProductionSubmission, Vec<BoundarySubmission>), ValidationReport> {
        let SurveySubmission {
            production,
            fields,
            drawings,
        } = submission;
        let production = sanitize_production(production);

        let mut report = validate_production(&production);
        let mut boundaries = Vec::new();

        let mut drafts = fields;
        for (crop, drawing) in &drawings {
            let from_map = rings_from_drawings(drawing).into_iter().map(|ring| FieldDraft {
                coordinates: ring,
                ..Default::default()
            });
            drafts.entry(*crop).or_default().extend(from_map);
        }

        for (crop, crop_drafts) in drafts {
            if crop_drafts.is_empty() {
                continue;
            }
            report.check(
                !production.selected_crops.contains(&crop),
                format!("Field boundaries supplied for {crop}, which is not a selected crop"),
            );
            for (i, draft) in crop_drafts.into_iter().enumerate() {
                let default_name = format!("{crop} Field {}", i + 1);
                match self.build_boundary(&production.farmer_id, crop, draft, default_name) {
                    Ok(boundary) => {
                        let checked = validate_boundary(&boundary);
                        report.merge(&boundary.field_name, checked);
                        boundaries.push(boundary);
                    }
                    Err((name, ring_report)) => report.merge(&name, ring_report),
                }
            }
        }

        report.into_result()?;
        Ok((production, boundaries))
    }

    fn build_boundary(
        &self,
        farmer_id: &str,
        crop: CropLabel,
        draft: FieldDraft,
        default_name: String,
    ) -> Result<BoundarySubmission, (String, ValidationReport)> {
        let field_name = draft
            .field_name
            .as_deref()
            .map(sanitize_input)
            .filter(|n| !n.is_empty())
            .unwrap_or(default_name);
        let coordinates = match parse_ring(&draft.coordinates) {
            Ok(ring) => ring,
            Err(report) => return Err((field_name, report)),
        };
        let field_type = match draft.field_type {
            Some(t) if !is_unset(Some(t.as_str())) => t.trim().to_string(),
            _ => DEFAULT_FIELD_TYPE.to_string(),
        };
        let notes = draft.notes.as_deref().map(sanitize_input).unwrap_or_default();
        let area = estimate_area_hectares(&coordinates, self.reference_latitude);

        Ok(BoundarySubmission {
            farmer_id: farmer_id.to_string(),
            field_name,
            field_type,
            crop_type: crop,
            coordinates,
            area_estimate: Some(area),
            notes: Some(notes),
        })
    }
}

fn sanitize_production(mut production: ProductionSubmission) -> ProductionSubmission {
    production.farmer_id = production.farmer_id.trim().to_string();
    production.village = sanitize_input(&production.village);
    for attributes in production.crop_data.values_mut() {
        if let Some(name) = attributes.other_crop_name.as_deref() {
            attributes.other_crop_name = Some(sanitize_input(name));
        }
    }
    production
}
