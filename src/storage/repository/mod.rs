pub mod boundary_repo;
pub mod production_repo;

pub use boundary_repo::{BoundaryRecord, BoundaryRepository};
pub use production_repo::{ProductionRecord, ProductionRepository};

use crate::survey::model::CropLabel;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Equality filters shared by both record kinds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub farmer_id: Option<String>,
    pub crop: Option<CropLabel>,
}

impl RecordFilter {
    pub fn farmer(farmer_id: impl Into<String>) -> Self {
        Self {
            farmer_id: Some(farmer_id.into()),
            crop: None,
        }
    }

    pub fn key(farmer_id: impl Into<String>, crop: CropLabel) -> Self {
        Self {
            farmer_id: Some(farmer_id.into()),
            crop: Some(crop),
        }
    }
}

/// Rows that decoded, plus how many were skipped as malformed.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Production,
    Boundary,
}

impl RecordKind {
    pub fn table_name(&self) -> &'static str {
        match self {
            RecordKind::Production => "form_responses",
            RecordKind::Boundary => "field_boundaries",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Production => f.write_str("production"),
            RecordKind::Boundary => f.write_str("boundary"),
        }
    }
}

impl FromStr for RecordKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "form" | "form_responses" => Ok(RecordKind::Production),
            "boundary" | "boundaries" | "field" | "field_boundaries" => Ok(RecordKind::Boundary),
            _ => Err(()),
        }
    }
}

/// Removes one row by id. Returns whether a row existed.
pub async fn delete_record(
    db: &DatabaseConnection,
    kind: RecordKind,
    id: i32,
) -> Result<bool, sea_orm::DbErr> {
    match kind {
        RecordKind::Production => ProductionRepository::delete(db, id).await,
        RecordKind::Boundary => BoundaryRepository::delete(db, id).await,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreStats {
    pub form_responses: u64,
    pub field_boundaries: u64,
    pub total_records: u64,
    pub total_mapped_area: f64,
}

pub async fn count_records(db: &DatabaseConnection) -> Result<StoreStats, sea_orm::DbErr> {
    let form_responses = ProductionRepository::count(db).await?;
    let field_boundaries = BoundaryRepository::count(db).await?;
    let total_mapped_area = BoundaryRepository::total_area(db).await?;
    Ok(StoreStats {
        form_responses,
        field_boundaries,
        total_records: form_responses + field_boundaries,
        total_mapped_area,
    })
}

/// Deletes every row in both tables.
pub async fn clear_all(db: &DatabaseConnection) -> Result<u64, sea_orm::DbErr> {
    let a = ProductionRepository::delete_all(db).await?;
    let b = BoundaryRepository::delete_all(db).await?;
    Ok(a + b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_kinds_parse_and_name_their_tables() {
        assert_eq!("Production".parse(), Ok(RecordKind::Production));
        assert_eq!("field".parse(), Ok(RecordKind::Boundary));
        assert_eq!("alpha".parse::<RecordKind>(), Err(()));
        assert_eq!(RecordKind::Production.table_name(), "form_responses");
        assert_eq!(RecordKind::Boundary.table_name(), "field_boundaries");
        assert_eq!(RecordKind::Boundary.to_string(), "boundary");
    }
}
