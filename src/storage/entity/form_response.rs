use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "form_responses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub farmer_id: String,
    pub district: String,
    pub village: String,
    #[sea_orm(nullable)]
    pub ea_code: Option<String>,
    pub season_year: String,
    // display only, e.g. "Coconut, Kava"; selected crops are read from form_data
    pub crop_type: String,
    // JSON: full questionnaire incl. selected_crops and crop_data
    pub form_data: String,
    pub submission_date: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
