//! SeaORM Entity for server-side sessions.
//!
//! Each row holds the JSON-serialized visitor state (cart slugs, wishlist
//! slugs, selected checkout address, last completed order, pending OTP
//! profile fields) keyed by an opaque session identifier.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Opaque session key handed to the client
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Serialized `SessionData`
    #[sea_orm(column_type = "JsonBinary")]
    pub data: Json,
    pub expiry_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
