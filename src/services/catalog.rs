//! Catalog filter builder.
//!
//! Narrows a base product query by the facet selections carried in the
//! query string and computes which filter choices remain available. Choice
//! availability is always derived from the pre-narrowing base set so that
//! selecting one facet never makes another facet's options disappear.

use std::collections::HashSet;

use rust_decimal::Decimal;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};

use crate::entities::{brands, categories, prelude::*, product_images, products};
use crate::models::catalog::{BrandChoice, Choice, FacetChoices, FacetSelection, ProductCard};

pub const PAGE_SIZE: u64 = 12;

/// Fixed discrete price buckets, label and inclusive bounds.
pub const PRICE_BUCKETS: [(&str, i64, i64); 5] = [
    ("1500-1999", 1500, 1999),
    ("2500-2999", 2500, 2999),
    ("3500-3999", 3500, 3999),
    ("4500-4999", 4500, 4999),
    ("6500-6999", 6500, 6999),
];

pub const SHAPE_CHOICES: [(&str, &str); 7] = [
    ("round", "Round"),
    ("rectangle", "Rectangle"),
    ("square", "Square"),
    ("oval", "Oval"),
    ("aviator", "Aviator"),
    ("cat-eye", "Cat Eye"),
    ("geometric", "Geometric"),
];

pub const FRAME_TYPE_CHOICES: [(&str, &str); 3] = [
    ("full-rim", "Full Rim"),
    ("half-rim", "Half Rim"),
    ("rimless", "Rimless"),
];

pub const GENDER_CHOICES: [(&str, &str); 4] = [
    ("men", "Men"),
    ("women", "Women"),
    ("kids", "Kids"),
    ("unisex", "Unisex"),
];

pub const SIZE_CHOICES: [(&str, &str); 5] = [
    ("extra-narrow", "Extra Narrow"),
    ("narrow", "Narrow"),
    ("medium", "Medium"),
    ("wide", "Wide"),
    ("extra-wide", "Extra Wide"),
];

pub const WEIGHT_CHOICES: [(&str, &str); 3] = [
    ("light", "Light"),
    ("average", "Average"),
    ("heavy", "Heavy"),
];

/// Base query for products visible in the storefront.
pub fn active_products() -> Select<products::Entity> {
    Products::find().filter(products::Column::IsActive.eq(true))
}

/// OR-combination of the selected price buckets, or None when no selected
/// label matches a known bucket.
pub fn price_condition(selected: &[String]) -> Option<Condition> {
    let mut cond = Condition::any();
    let mut matched = false;
    for key in selected {
        for (label, min, max) in PRICE_BUCKETS {
            if key == label {
                cond = cond.add(
                    products::Column::BasePrice.between(Decimal::from(min), Decimal::from(max)),
                );
                matched = true;
            }
        }
    }
    matched.then_some(cond)
}

/// Keep the enumerated choices whose value actually occurs in the base set.
pub fn retain_choices(all: &[(&str, &str)], available: &HashSet<String>) -> Vec<Choice> {
    all.iter()
        .filter(|(value, _)| available.contains(*value))
        .map(|(value, label)| Choice {
            value: value.to_string(),
            label: label.to_string(),
        })
        .collect()
}

/// Clamp a 1-indexed page request into the valid range for the result set.
pub fn clamp_page(requested: Option<u64>, num_pages: u64) -> u64 {
    requested.unwrap_or(1).max(1).min(num_pages.max(1))
}

fn price_bucket_choices() -> Vec<Choice> {
    PRICE_BUCKETS
        .iter()
        .map(|(label, _, _)| Choice {
            value: label.to_string(),
            label: label.to_string(),
        })
        .collect()
}

/// A narrowed, paginated listing plus the filter choices for the UI.
#[derive(Debug, Clone)]
pub struct FilteredListing {
    pub products: Vec<products::Model>,
    pub page: u64,
    pub num_pages: u64,
    pub total_items: u64,
    pub choices: FacetChoices,
}

/// Apply the facet selections to `base` and page through the result,
/// computing choice availability from the unnarrowed base set.
pub async fn build_filtered_listing(
    db: &DatabaseConnection,
    base: Select<products::Entity>,
    selection: &FacetSelection,
) -> Result<FilteredListing, DbErr> {
    let mut narrowed = base.clone();

    if !selection.brand.is_empty() {
        let brand_ids: Vec<i32> = Brands::find()
            .filter(brands::Column::Slug.is_in(selection.brand.clone()))
            .all(db)
            .await?
            .into_iter()
            .map(|brand| brand.id)
            .collect();
        narrowed = narrowed.filter(products::Column::BrandId.is_in(brand_ids));
    }
    if !selection.shape.is_empty() {
        narrowed = narrowed.filter(products::Column::Shape.is_in(selection.shape.clone()));
    }
    if !selection.frame_type.is_empty() {
        narrowed =
            narrowed.filter(products::Column::FrameType.is_in(selection.frame_type.clone()));
    }
    if !selection.gender.is_empty() {
        narrowed = narrowed.filter(products::Column::Gender.is_in(selection.gender.clone()));
    }
    if !selection.material.is_empty() {
        narrowed =
            narrowed.filter(products::Column::FrameMaterial.is_in(selection.material.clone()));
    }
    if !selection.color.is_empty() {
        narrowed = narrowed.filter(products::Column::Color.is_in(selection.color.clone()));
    }
    if !selection.size.is_empty() {
        narrowed = narrowed.filter(products::Column::Size.is_in(selection.size.clone()));
    }
    if !selection.weight_group.is_empty() {
        narrowed =
            narrowed.filter(products::Column::WeightGroup.is_in(selection.weight_group.clone()));
    }
    if let Some(cond) = price_condition(&selection.price) {
        narrowed = narrowed.filter(cond);
    }

    let paginator = narrowed
        .order_by_asc(products::Column::Id)
        .paginate(db, PAGE_SIZE);
    let total_items = paginator.num_items().await?;
    let num_pages = paginator.num_pages().await?;
    let page = clamp_page(selection.page, num_pages);
    let page_products = paginator.fetch_page(page - 1).await?;

    let choices = facet_choices(db, base).await?;

    Ok(FilteredListing {
        products: page_products,
        page,
        num_pages,
        total_items,
        choices,
    })
}

async fn distinct_values(
    db: &DatabaseConnection,
    base: &Select<products::Entity>,
    column: products::Column,
) -> Result<HashSet<String>, DbErr> {
    let values: Vec<String> = base
        .clone()
        .select_only()
        .column(column)
        .distinct()
        .into_tuple()
        .all(db)
        .await?;
    Ok(values.into_iter().collect())
}

/// Filter choices present in the base set, in the fixed enumeration order.
pub async fn facet_choices(
    db: &DatabaseConnection,
    base: Select<products::Entity>,
) -> Result<FacetChoices, DbErr> {
    let shapes = distinct_values(db, &base, products::Column::Shape).await?;
    let frame_types = distinct_values(db, &base, products::Column::FrameType).await?;
    let genders = distinct_values(db, &base, products::Column::Gender).await?;
    let sizes = distinct_values(db, &base, products::Column::Size).await?;
    let weights = distinct_values(db, &base, products::Column::WeightGroup).await?;

    let mut materials: Vec<String> =
        distinct_values(db, &base, products::Column::FrameMaterial)
            .await?
            .into_iter()
            .filter(|value| !value.is_empty())
            .collect();
    materials.sort();

    let mut colors: Vec<String> = distinct_values(db, &base, products::Column::Color)
        .await?
        .into_iter()
        .filter(|value| !value.is_empty())
        .collect();
    colors.sort();

    let brand_ids: Vec<Option<i32>> = base
        .clone()
        .select_only()
        .column(products::Column::BrandId)
        .distinct()
        .into_tuple()
        .all(db)
        .await?;
    let brand_ids: Vec<i32> = brand_ids.into_iter().flatten().collect();
    let brand_rows = Brands::find()
        .filter(brands::Column::Active.eq(true))
        .filter(brands::Column::Id.is_in(brand_ids))
        .order_by_asc(brands::Column::Name)
        .all(db)
        .await?;

    Ok(FacetChoices {
        brands: brand_rows
            .into_iter()
            .map(|brand| BrandChoice {
                slug: brand.slug,
                name: brand.name,
            })
            .collect(),
        shapes: retain_choices(&SHAPE_CHOICES, &shapes),
        frame_types: retain_choices(&FRAME_TYPE_CHOICES, &frame_types),
        genders: retain_choices(&GENDER_CHOICES, &genders),
        materials,
        colors,
        sizes: retain_choices(&SIZE_CHOICES, &sizes),
        weight_groups: retain_choices(&WEIGHT_CHOICES, &weights),
        price_buckets: price_bucket_choices(),
    })
}

/// Free-text search: every term matches against name, brand, category and
/// the facet columns, all OR-combined.
pub async fn search_condition(db: &DatabaseConnection, query: &str) -> Result<Option<Condition>, DbErr> {
    let terms: Vec<&str> = query.split_whitespace().collect();
    if terms.is_empty() {
        return Ok(None);
    }

    let mut cond = Condition::any();
    for term in terms {
        let pattern = format!("%{}%", term);

        let brand_ids: Vec<i32> = Brands::find()
            .filter(Expr::col(brands::Column::Name).ilike(pattern.clone()))
            .all(db)
            .await?
            .into_iter()
            .map(|brand| brand.id)
            .collect();
        let category_ids: Vec<i32> = Categories::find()
            .filter(Expr::col(categories::Column::Name).ilike(pattern.clone()))
            .all(db)
            .await?
            .into_iter()
            .map(|category| category.id)
            .collect();

        cond = cond
            .add(Expr::col(products::Column::Name).ilike(pattern.clone()))
            .add(Expr::col(products::Column::Shape).ilike(pattern.clone()))
            .add(Expr::col(products::Column::Gender).ilike(pattern.clone()))
            .add(Expr::col(products::Column::FrameType).ilike(pattern.clone()))
            .add(Expr::col(products::Column::FrameMaterial).ilike(pattern.clone()))
            .add(Expr::col(products::Column::Color).ilike(pattern));
        if !brand_ids.is_empty() {
            cond = cond.add(products::Column::BrandId.is_in(brand_ids));
        }
        if !category_ids.is_empty() {
            cond = cond.add(products::Column::CategoryId.is_in(category_ids));
        }
    }
    Ok(Some(cond))
}

/// Resolve product rows into display cards with brand names and the
/// primary/secondary image per product.
pub async fn product_cards(
    db: &DatabaseConnection,
    products_page: &[products::Model],
) -> Result<Vec<ProductCard>, DbErr> {
    let product_ids: Vec<i32> = products_page.iter().map(|product| product.id).collect();
    let images = ProductImages::find()
        .filter(product_images::Column::ProductId.is_in(product_ids))
        .order_by_desc(product_images::Column::IsPrimary)
        .order_by_asc(product_images::Column::Id)
        .all(db)
        .await?;

    let brand_ids: Vec<i32> = products_page
        .iter()
        .filter_map(|product| product.brand_id)
        .collect();
    let brand_rows = Brands::find()
        .filter(brands::Column::Id.is_in(brand_ids))
        .all(db)
        .await?;

    Ok(products_page
        .iter()
        .map(|product| {
            let mut product_images = images
                .iter()
                .filter(|image| image.product_id == product.id);
            let primary_image = product_images.next().map(|image| image.image.clone());
            let secondary_image = product_images.next().map(|image| image.image.clone());
            let brand = product.brand_id.and_then(|brand_id| {
                brand_rows
                    .iter()
                    .find(|brand| brand.id == brand_id)
                    .map(|brand| brand.name.clone())
            });
            ProductCard {
                id: product.id,
                slug: product.slug.clone(),
                name: product.name.clone(),
                brand,
                price: product.base_price,
                primary_image,
                secondary_image,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_condition_ignores_unknown_labels() {
        assert!(price_condition(&[]).is_none());
        assert!(price_condition(&["999-1499".to_string()]).is_none());
        assert!(price_condition(&["1500-1999".to_string()]).is_some());
    }

    #[test]
    fn test_price_condition_ors_multiple_buckets() {
        let cond = price_condition(&["1500-1999".to_string(), "4500-4999".to_string()]).unwrap();
        // Two bucket ranges OR-combined
        let rendered = format!("{:?}", cond);
        assert!(rendered.contains("Any"));
    }

    #[test]
    fn test_retain_choices_preserves_enumeration_order() {
        let available: HashSet<String> = ["oval", "round"]
            .iter()
            .map(|value| value.to_string())
            .collect();
        let choices = retain_choices(&SHAPE_CHOICES, &available);
        let values: Vec<&str> = choices.iter().map(|choice| choice.value.as_str()).collect();
        // "round" precedes "oval" in the fixed shape enumeration
        assert_eq!(values, vec!["round", "oval"]);
    }

    #[test]
    fn test_retain_choices_drops_absent_values() {
        let available = HashSet::new();
        assert!(retain_choices(&SHAPE_CHOICES, &available).is_empty());
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(None, 5), 1);
        assert_eq!(clamp_page(Some(0), 5), 1);
        assert_eq!(clamp_page(Some(3), 5), 3);
        assert_eq!(clamp_page(Some(99), 5), 5);
        // Empty result set still resolves to page 1
        assert_eq!(clamp_page(Some(2), 0), 1);
    }
}
