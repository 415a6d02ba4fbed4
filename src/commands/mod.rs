pub mod app_command;
pub mod report;
pub mod survey;

pub use app_command::{AppCommand, USAGE};

use crate::config::AppConfig;
use crate::linking::LinkingService;
use crate::storage::repository::{self, BoundaryRepository, ProductionRepository, RecordFilter};
use crate::survey::SurveyService;
use log::info;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Services shared by every command for one invocation.
pub struct AppContext {
    db: Arc<DatabaseConnection>,
    survey: SurveyService,
    linking: LinkingService,
    reference_latitude: Option<f64>,
}

impl AppContext {
    pub fn new(db: Arc<DatabaseConnection>, config: &AppConfig) -> Self {
        Self {
            survey: SurveyService::new(db.clone(), config.reference_latitude),
            linking: LinkingService::new(db.clone()),
            reference_latitude: config.reference_latitude,
            db,
        }
    }

    /// Runs one command and returns the text to print.
    pub async fn execute(&self, command: AppCommand) -> anyhow::Result<String> {
        info!("command: {:?}", command);
        let out = match command {
            AppCommand::Submit { path } => survey::submit(&self.survey, &path).await?,
            AppCommand::Production { farmer_id, crop } => {
                let filter = RecordFilter { farmer_id, crop };
                let loaded = ProductionRepository::list(&self.db, &filter).await?;
                report::production_table(&loaded.records, loaded.skipped)
            }
            AppCommand::Boundaries { farmer_id, crop } => {
                let filter = RecordFilter { farmer_id, crop };
                let loaded = BoundaryRepository::list(&self.db, &filter).await?;
                report::boundary_table(&loaded.records, loaded.skipped)
            }
            AppCommand::Delete { kind, id } => {
                if repository::delete_record(&self.db, kind, id).await? {
                    info!("deleted row {} from {}", id, kind.table_name());
                    format!("✓ deleted {kind} record #{id}")
                } else {
                    format!("no {kind} record #{id}")
                }
            }
            AppCommand::Reconcile => report::linking_report(&self.linking.reconcile_all().await?),
            AppCommand::Link { farmer_id, crop } => {
                report::link_line(&self.linking.link(&farmer_id, crop).await?)
            }
            AppCommand::Area {
                path,
                reference_latitude,
            } => survey::area(&path, reference_latitude.or(self.reference_latitude))?,
            AppCommand::Check { path } => survey::check(&path)?,
            AppCommand::Stats => report::stats(&repository::count_records(&self.db).await?),
            AppCommand::Farmers => {
                let farmers = ProductionRepository::distinct_farmers(&self.db).await?;
                if farmers.is_empty() {
                    "no farmers recorded".to_string()
                } else {
                    farmers.join("\n")
                }
            }
            AppCommand::Recent { n } => {
                let productions = ProductionRepository::recent(&self.db, n).await?;
                let boundaries = BoundaryRepository::recent(&self.db, n).await?;
                format!(
                    "{}\n\n{}",
                    report::production_table(&productions, 0),
                    report::boundary_table(&boundaries, 0)
                )
            }
            AppCommand::Clear => {
                let removed = repository::clear_all(&self.db).await?;
                format!("✓ removed {removed} record(s)")
            }
            AppCommand::Help => USAGE.to_string(),
            AppCommand::Unknown(msg) => msg,
        };
        Ok(out)
    }
}
