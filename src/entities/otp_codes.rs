//! SeaORM Entity for one-time login codes.
//!
//! Rows are never deleted; the most recently created unverified row for an
//! (identifier, channel) pair is the one that counts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const CHANNEL_PHONE: &str = "phone";
pub const CHANNEL_EMAIL: &str = "email";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "otp_codes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Normalized phone number or email address
    pub identifier: String,
    /// "phone" or "email"
    pub channel: String,
    pub code: String,
    pub expires_at: DateTimeWithTimeZone,
    pub verified: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
