use super::{Loaded, RecordFilter};
use crate::error::SurveyError;
use crate::geometry::Ring;
use crate::storage::entity::field_boundary::{
    self, ActiveModel as FieldBoundaryActiveModel, Entity as FieldBoundary,
    Model as FieldBoundaryModel,
};
use crate::survey::model::{BoundarySubmission, CropLabel};
use chrono::Utc;
use log::warn;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Serialize;

/// A stored field outline with its ring decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryRecord {
    pub id: i32,
    pub farmer_id: String,
    pub field_name: String,
    pub field_type: String,
    pub crop_type: CropLabel,
    pub coordinates: Ring,
    pub area_estimate: Option<f64>,
    pub notes: Option<String>,
    pub creation_date: String,
}

impl BoundaryRecord {
    /// Stored estimate, null counted as zero.
    pub fn area_or_zero(&self) -> f64 {
        self.area_estimate.unwrap_or(0.0)
    }
}

impl TryFrom<FieldBoundaryModel> for BoundaryRecord {
    type Error = SurveyError;

    fn try_from(model: FieldBoundaryModel) -> Result<Self, Self::Error> {
        let crop_type = model
            .crop_type
            .parse::<CropLabel>()
            .map_err(|e| SurveyError::malformed("field_boundaries", model.id, e.to_string()))?;
        let coordinates: Ring = serde_json::from_str(&model.coordinates)
            .map_err(|e| SurveyError::malformed("field_boundaries", model.id, e.to_string()))?;
        Ok(Self {
            id: model.id,
            farmer_id: model.farmer_id,
            field_name: model.field_name,
            field_type: model.field_type,
            crop_type,
            coordinates,
            area_estimate: model.area_estimate,
            notes: model.notes,
            creation_date: model.creation_date,
        })
    }
}

fn decode_all(models: Vec<FieldBoundaryModel>) -> Loaded<BoundaryRecord> {
    let mut out = Loaded::default();
    for m in models {
        match BoundaryRecord::try_from(m) {
            Ok(r) => out.records.push(r),
            Err(e) => {
                warn!("skipping boundary record: {}", e);
                out.skipped += 1;
            }
        }
    }
    out
}

pub struct BoundaryRepository;

impl BoundaryRepository {
    /// Appends one field outline. `creation_date` is stamped here; the area estimate is
    /// stored as given and never recomputed.
    ///
    /// The ring is not checked here; callers run `validate_boundary` first.
    pub async fn insert(
        db: &DatabaseConnection,
        record: &BoundarySubmission,
    ) -> Result<i32, SurveyError> {
        let coordinates = serde_json::to_string(&record.coordinates)?;
        let active_model = FieldBoundaryActiveModel {
            farmer_id: Set(record.farmer_id.clone()),
            field_name: Set(record.field_name.clone()),
            field_type: Set(record.field_type.clone()),
            crop_type: Set(record.crop_type.to_string()),
            coordinates: Set(coordinates),
            area_estimate: Set(record.area_estimate),
            notes: Set(record.notes.clone()),
            creation_date: Set(Utc::now().to_rfc3339()),
            ..Default::default()
        };
        let result = active_model.insert(db).await?;
        Ok(result.id)
    }

    /// Boundaries matching `filter`, in creation order.
    pub async fn list(
        db: &DatabaseConnection,
        filter: &RecordFilter,
    ) -> Result<Loaded<BoundaryRecord>, sea_orm::DbErr> {
        let mut query = FieldBoundary::find().order_by_asc(field_boundary::Column::Id);
        if let Some(farmer_id) = &filter.farmer_id {
            query = query.filter(field_boundary::Column::FarmerId.eq(farmer_id.clone()));
        }
        if let Some(crop) = filter.crop {
            query = query.filter(field_boundary::Column::CropType.eq(crop.to_string()));
        }
        Ok(decode_all(query.all(db).await?))
    }

    pub async fn load_all(
        db: &DatabaseConnection,
    ) -> Result<Loaded<BoundaryRecord>, sea_orm::DbErr> {
        Self::list(db, &RecordFilter::default()).await
    }

    pub async fn recent(
        db: &DatabaseConnection,
        limit: u64,
    ) -> Result<Vec<BoundaryRecord>, sea_orm::DbErr> {
        let models = FieldBoundary::find()
            .order_by_desc(field_boundary::Column::Id)
            .limit(limit)
            .all(db)
            .await?;
        Ok(decode_all(models).records)
    }

    pub async fn count(db: &DatabaseConnection) -> Result<u64, sea_orm::DbErr> {
        FieldBoundary::find().count(db).await
    }

    /// Sum of stored estimates across all boundaries, hectares.
    pub async fn total_area(db: &DatabaseConnection) -> Result<f64, sea_orm::DbErr> {
        let areas: Vec<Option<f64>> = FieldBoundary::find()
            .select_only()
            .column(field_boundary::Column::AreaEstimate)
            .into_tuple()
            .all(db)
            .await?;
        Ok(areas.into_iter().flatten().sum())
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, sea_orm::DbErr> {
        let res = FieldBoundary::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    pub async fn delete_all(db: &DatabaseConnection) -> Result<u64, sea_orm::DbErr> {
        let res = FieldBoundary::delete_many().exec(db).await?;
        Ok(res.rows_affected)
    }
}
