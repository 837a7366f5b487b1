//! SeaORM Entity for catalog products.
//!
//! Facet columns (shape, frame type, gender, material, color, size, weight
//! group) drive the listing filters; empty string means the attribute is not
//! set for the product.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category_id: i32,
    pub brand_id: Option<i32>,
    pub name: String,
    /// URL-safe identifier, unique across the catalog
    pub slug: String,
    pub description: String,
    /// One of: men, women, kids, unisex
    pub gender: String,
    /// One of: round, rectangle, square, oval, aviator, cat-eye, geometric
    pub shape: String,
    /// One of: full-rim, half-rim, rimless
    pub frame_type: String,
    pub frame_material: String,
    pub color: String,
    /// One of: extra-narrow, narrow, medium, wide, extra-wide
    pub size: String,
    /// One of: light, average, heavy
    pub weight_group: String,
    /// Display price, decimal(10,2)
    pub base_price: Decimal,
    pub is_prescription_supported: bool,
    pub is_active: bool,
    pub is_trending: bool,
    pub is_premium: bool,
    pub is_exclusive: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
