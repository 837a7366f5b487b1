//! SeaORM Entity for checkout orders.
//!
//! Status machine: created -> paid | failed, both terminal. `items` is a
//! frozen snapshot of the cart at order-creation time; later cart mutations
//! never touch it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const STATUS_CREATED: &str = "created";
pub const STATUS_PAID: &str = "paid";
pub const STATUS_FAILED: &str = "failed";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "checkout_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<i32>,
    pub session_key: String,
    pub address_id: Option<i32>,
    /// Amount in minor currency units (paise)
    pub amount_paise: i64,
    pub currency: String,
    /// Order id issued by the payment gateway, unique
    pub razorpay_order_id: String,
    /// One of: created, paid, failed
    pub status: String,
    /// Snapshot `[{slug, name, price}]` frozen at creation
    #[sea_orm(column_type = "JsonBinary")]
    pub items: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
