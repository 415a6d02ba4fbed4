use super::engine;
use super::model::{LinkKey, LinkResult, LinkingReport};
use crate::error::SurveyError;
use crate::storage::repository::{BoundaryRepository, ProductionRepository, RecordFilter};
use crate::survey::model::CropLabel;
use log::{info, warn};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub struct LinkingService {
    db: Arc<DatabaseConnection>,
}

impl LinkingService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Reads both tables and reconciles every key. Undecodable rows are skipped and
    /// counted, never fatal.
    pub async fn reconcile_all(&self) -> Result<LinkingReport, SurveyError> {
        let productions = ProductionRepository::load_all(&self.db).await?;
        let boundaries = BoundaryRepository::load_all(&self.db).await?;

        let skipped = productions.skipped + boundaries.skipped;
        if skipped > 0 {
            warn!("reconcile: {} malformed stored records skipped", skipped);
        }

        let mut report = engine::reconcile(&productions.records, &boundaries.records);
        report.skipped_records = skipped;

        info!(
            "reconcile: {} keys, {} linked, {} production only, {} boundaries only",
            report.summary.total_combinations,
            report.summary.fully_linked,
            report.summary.production_only,
            report.summary.boundaries_only
        );
        Ok(report)
    }

    /// Reconciles one `(farmer_id, crop)` key.
    pub async fn link(&self, farmer_id: &str, crop: CropLabel) -> Result<LinkResult, SurveyError> {
        let productions =
            ProductionRepository::list(&self.db, &RecordFilter::farmer(farmer_id)).await?;
        let boundaries =
            BoundaryRepository::list(&self.db, &RecordFilter::key(farmer_id, crop)).await?;
        let key = LinkKey::new(farmer_id, crop);
        Ok(engine::link_key(&key, &productions.records, &boundaries.records))
    }
}
