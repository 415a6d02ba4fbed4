use super::{Loaded, RecordFilter};
use crate::error::SurveyError;
use crate::storage::entity::form_response::{
    self, ActiveModel as FormResponseActiveModel, Entity as FormResponse,
    Model as FormResponseModel,
};
use crate::survey::model::{CropAttributes, CropLabel, ProductionSubmission};
use chrono::Utc;
use log::warn;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// A stored questionnaire with its payload decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionRecord {
    pub id: i32,
    pub farmer_id: String,
    pub district: String,
    pub village: String,
    pub ea_code: Option<String>,
    pub season_year: String,
    pub crop_type: String,
    pub selected_crops: Vec<CropLabel>,
    pub crop_data: BTreeMap<CropLabel, CropAttributes>,
    pub submission_date: String,
}

impl ProductionRecord {
    pub fn has_crop(&self, crop: CropLabel) -> bool {
        self.selected_crops.contains(&crop)
    }
}

impl TryFrom<FormResponseModel> for ProductionRecord {
    type Error = SurveyError;

    fn try_from(model: FormResponseModel) -> Result<Self, Self::Error> {
        let payload: ProductionSubmission = serde_json::from_str(&model.form_data)
            .map_err(|e| SurveyError::malformed("form_responses", model.id, e.to_string()))?;
        Ok(Self {
            id: model.id,
            // columns win over the payload copy; keys are always built from the column
            farmer_id: model.farmer_id,
            district: model.district,
            village: model.village,
            ea_code: model.ea_code,
            season_year: model.season_year,
            crop_type: model.crop_type,
            selected_crops: payload.selected_crops,
            crop_data: payload.crop_data,
            submission_date: model.submission_date,
        })
    }
}

fn decode_all(models: Vec<FormResponseModel>) -> Loaded<ProductionRecord> {
    let mut out = Loaded::default();
    for m in models {
        match ProductionRecord::try_from(m) {
            Ok(r) => out.records.push(r),
            Err(e) => {
                warn!("skipping production record: {}", e);
                out.skipped += 1;
            }
        }
    }
    out
}

pub struct ProductionRepository;

impl ProductionRepository {
    /// Appends one questionnaire. `submission_date` is stamped here.
    pub async fn insert(
        db: &DatabaseConnection,
        record: &ProductionSubmission,
    ) -> Result<i32, SurveyError> {
        let form_data = serde_json::to_string(record)?;
        let active_model = FormResponseActiveModel {
            farmer_id: Set(record.farmer_id.clone()),
            district: Set(record.district.clone()),
            village: Set(record.village.clone()),
            ea_code: Set(record.ea_code.clone().filter(|s| !s.is_empty())),
            season_year: Set(record.season_year.clone()),
            crop_type: Set(record.crop_display()),
            form_data: Set(form_data),
            submission_date: Set(Utc::now().to_rfc3339()),
            ..Default::default()
        };
        let result = active_model.insert(db).await?;
        Ok(result.id)
    }

    /// Records matching `filter`, oldest first. A crop filter matches any record that
    /// selected the crop.
    pub async fn list(
        db: &DatabaseConnection,
        filter: &RecordFilter,
    ) -> Result<Loaded<ProductionRecord>, sea_orm::DbErr> {
        let mut query = FormResponse::find().order_by_asc(form_response::Column::Id);
        if let Some(farmer_id) = &filter.farmer_id {
            query = query.filter(form_response::Column::FarmerId.eq(farmer_id.clone()));
        }
        let mut loaded = decode_all(query.all(db).await?);
        if let Some(crop) = filter.crop {
            loaded.records.retain(|r| r.has_crop(crop));
        }
        Ok(loaded)
    }

    pub async fn load_all(
        db: &DatabaseConnection,
    ) -> Result<Loaded<ProductionRecord>, sea_orm::DbErr> {
        Self::list(db, &RecordFilter::default()).await
    }

    pub async fn recent(
        db: &DatabaseConnection,
        limit: u64,
    ) -> Result<Vec<ProductionRecord>, sea_orm::DbErr> {
        let models = FormResponse::find()
            .order_by_desc(form_response::Column::Id)
            .limit(limit)
            .all(db)
            .await?;
        Ok(decode_all(models).records)
    }

    pub async fn distinct_farmers(db: &DatabaseConnection) -> Result<Vec<String>, sea_orm::DbErr> {
        FormResponse::find()
            .select_only()
            .column(form_response::Column::FarmerId)
            .distinct()
            .order_by_asc(form_response::Column::FarmerId)
            .into_tuple::<String>()
            .all(db)
            .await
    }

    pub async fn count(db: &DatabaseConnection) -> Result<u64, sea_orm::DbErr> {
        FormResponse::find().count(db).await
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, sea_orm::DbErr> {
        let res = FormResponse::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    pub async fn delete_all(db: &DatabaseConnection) -> Result<u64, sea_orm::DbErr> {
        let res = FormResponse::delete_many().exec(db).await?;
        Ok(res.rows_affected)
    }
}
