//! SeaORM Entity for the pincode serviceability cache.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const SOURCE_DB: &str = "db";
pub const SOURCE_EXTERNAL: &str = "external";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "delivery_pincodes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// 6-digit postal code, unique
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub delivery_days: i16,
    pub active: bool,
    /// "db" for seeded rows, "external" for directory lookups
    pub source: String,
    pub last_checked: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
