//! Cart resolution: session slug lists to product rows and totals.

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use crate::entities::{prelude::*, products};

/// Resolve an ordered slug list to product rows, preserving list order and
/// silently dropping slugs that no longer match an active product. A slug
/// appearing twice resolves twice (cart quantities are modeled by
/// repetition).
pub async fn resolve_slugs(
    db: &DatabaseConnection,
    slugs: &[String],
) -> Result<Vec<products::Model>, DbErr> {
    if slugs.is_empty() {
        return Ok(Vec::new());
    }
    let rows = Products::find()
        .filter(products::Column::Slug.is_in(slugs.to_vec()))
        .filter(products::Column::IsActive.eq(true))
        .all(db)
        .await?;
    Ok(slugs
        .iter()
        .filter_map(|slug| rows.iter().find(|product| &product.slug == slug).cloned())
        .collect())
}

/// Sum of display prices; zero for an empty cart.
pub fn cart_total(products: &[products::Model]) -> Decimal {
    products
        .iter()
        .map(|product| product.base_price)
        .sum::<Decimal>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn product(slug: &str, price: Decimal) -> products::Model {
        products::Model {
            id: 1,
            category_id: 1,
            brand_id: None,
            name: slug.to_string(),
            slug: slug.to_string(),
            description: String::new(),
            gender: "unisex".to_string(),
            shape: String::new(),
            frame_type: String::new(),
            frame_material: String::new(),
            color: String::new(),
            size: String::new(),
            weight_group: String::new(),
            base_price: price,
            is_prescription_supported: true,
            is_active: true,
            is_trending: false,
            is_premium: false,
            is_exclusive: false,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_cart_total_sums_duplicates() {
        let items = vec![
            product("a", dec!(1599.00)),
            product("a", dec!(1599.00)),
            product("b", dec!(2999.00)),
        ];
        assert_eq!(cart_total(&items), dec!(6197.00));
    }

    #[test]
    fn test_cart_total_empty_is_zero() {
        assert_eq!(cart_total(&[]), Decimal::ZERO);
    }
}
