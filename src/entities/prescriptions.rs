//! SeaORM Entity for saved eyeglass prescriptions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "prescriptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    /// "single" or "progressive"
    pub power_type: String,
    pub right_sph: Option<Decimal>,
    pub left_sph: Option<Decimal>,
    pub right_cyl: Option<Decimal>,
    pub left_cyl: Option<Decimal>,
    pub axis: Option<i32>,
    pub pd: Option<Decimal>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
