use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "field_boundaries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub farmer_id: String,
    pub field_name: String,
    pub field_type: String,
    pub crop_type: String,
    // JSON ring of [lon, lat] pairs
    pub coordinates: String,
    // hectares, computed once at creation
    #[sea_orm(nullable)]
    pub area_estimate: Option<f64>,
    #[sea_orm(nullable)]
    pub notes: Option<String>,
    pub creation_date: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
