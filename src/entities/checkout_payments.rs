//! SeaORM Entity for verified gateway payments.
//!
//! One row per gateway payment id (unique constraint); duplicate callback
//! delivery re-finds the existing row instead of inserting a second one.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const STATUS_CAPTURED: &str = "captured";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "checkout_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub order_id: i32,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    /// One of: captured, failed
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
