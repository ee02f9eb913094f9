use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "temperature_data")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub temperature: f64,
    pub humidity: f64,
    pub timestamp: DateTimeUtc,
    #[sea_orm(column_type = "Text")]
    pub location: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
