use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Query;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::entities::{banners, categories, prelude::*, product_images, products};
use crate::models::catalog::{
    BannerOut, CategoryListingResponse, CategoryOut, FacetSelection, HomeResponse,
    ListingResponse, ProductDetailResponse, SearchQuery, SearchResponse, ShapeListingResponse,
};
use crate::services::catalog::{
    self, active_products, build_filtered_listing, clamp_page, product_cards, PAGE_SIZE,
};

use super::{db_error, not_found, ApiError};

const HOME_SECTION_SIZE: u64 = 12;

fn banner_out(banner: &banners::Model) -> BannerOut {
    BannerOut {
        title: banner.title.clone(),
        banner_type: banner.banner_type.clone(),
        image: banner.image.clone(),
        link: banner.link.clone(),
    }
}

fn category_out(category: &categories::Model) -> CategoryOut {
    CategoryOut {
        slug: category.slug.clone(),
        name: category.name.clone(),
        image: category.image.clone(),
    }
}

async fn flagged_products(
    state: &crate::AppState,
    flag: products::Column,
) -> Result<Vec<crate::models::catalog::ProductCard>, ApiError> {
    let rows = active_products()
        .filter(flag.eq(true))
        .order_by_desc(products::Column::CreatedAt)
        .limit(HOME_SECTION_SIZE)
        .all(&state.db)
        .await
        .map_err(db_error)?;
    product_cards(&state.db, &rows).await.map_err(db_error)
}

pub async fn home(
    State(state): State<crate::AppState>,
) -> Result<(StatusCode, Json<HomeResponse>), ApiError> {
    let banner_rows = Banners::find()
        .filter(banners::Column::Active.eq(true))
        .order_by_asc(banners::Column::SortOrder)
        .order_by_asc(banners::Column::Id)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    let slot = |banner_type: &str| {
        banner_rows
            .iter()
            .find(|banner| banner.banner_type == banner_type)
            .map(banner_out)
    };
    let hero_banners: Vec<BannerOut> = banner_rows
        .iter()
        .filter(|banner| banner.banner_type == "hero")
        .map(banner_out)
        .collect();

    let category_rows = Categories::find()
        .filter(categories::Column::Active.eq(true))
        .order_by_asc(categories::Column::Id)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    let trending_products = flagged_products(&state, products::Column::IsTrending).await?;
    let premium_products = flagged_products(&state, products::Column::IsPremium).await?;
    let exclusive_products = flagged_products(&state, products::Column::IsExclusive).await?;

    Ok((
        StatusCode::OK,
        Json(HomeResponse {
            banners: hero_banners,
            categories: category_rows.iter().map(category_out).collect(),
            trending_products,
            premium_products,
            exclusive_products,
            coupon_banner: slot("coupon"),
            replacement_banner: slot("replacement"),
            buy1get1_banner: slot("buy1get1"),
            exclusive_banner: slot("exclusive"),
            premium_banner: slot("premium"),
        }),
    ))
}

async fn listing_response(
    state: &crate::AppState,
    base: sea_orm::Select<products::Entity>,
    selection: FacetSelection,
) -> Result<ListingResponse, ApiError> {
    let listing = build_filtered_listing(&state.db, base, &selection)
        .await
        .map_err(db_error)?;
    let products = product_cards(&state.db, &listing.products)
        .await
        .map_err(db_error)?;
    Ok(ListingResponse {
        products,
        page: listing.page,
        num_pages: listing.num_pages,
        total_items: listing.total_items,
        filters: listing.choices,
        selected: selection,
    })
}

pub async fn category_listing(
    State(state): State<crate::AppState>,
    Path(slug): Path<String>,
    Query(selection): Query<FacetSelection>,
) -> Result<(StatusCode, Json<CategoryListingResponse>), ApiError> {
    let category = Categories::find()
        .filter(categories::Column::Slug.eq(&slug))
        .filter(categories::Column::Active.eq(true))
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Category not found."))?;

    let base = active_products().filter(products::Column::CategoryId.eq(category.id));
    let listing = listing_response(&state, base, selection).await?;

    Ok((
        StatusCode::OK,
        Json(CategoryListingResponse {
            category: category_out(&category),
            listing,
        }),
    ))
}

pub async fn shape_listing(
    State(state): State<crate::AppState>,
    Path((shape, gender)): Path<(String, String)>,
    Query(mut selection): Query<FacetSelection>,
) -> Result<(StatusCode, Json<ShapeListingResponse>), ApiError> {
    let shape_label = catalog::SHAPE_CHOICES
        .iter()
        .find(|(value, _)| *value == shape)
        .map(|(_, label)| *label)
        .ok_or_else(|| not_found("Shape not found."))?;
    let gender_label = catalog::GENDER_CHOICES
        .iter()
        .find(|(value, _)| *value == gender)
        .map(|(_, label)| *label)
        .ok_or_else(|| not_found("Shape not found."))?;

    // The path pins shape and gender; any query-string selections for the
    // same dimensions are replaced, not intersected
    selection.shape = vec![shape.clone()];
    selection.gender = vec![gender.clone()];

    let mut base = active_products()
        .filter(products::Column::Shape.eq(&shape))
        .filter(products::Column::Gender.eq(&gender));

    let mut category = None;
    if let Some(category_slug) = &selection.category {
        let row = Categories::find()
            .filter(categories::Column::Slug.eq(category_slug))
            .filter(categories::Column::Active.eq(true))
            .one(&state.db)
            .await
            .map_err(db_error)?
            .ok_or_else(|| not_found("Category not found."))?;
        base = base.filter(products::Column::CategoryId.eq(row.id));
        category = Some(category_out(&row));
    }

    let listing = listing_response(&state, base, selection).await?;

    Ok((
        StatusCode::OK,
        Json(ShapeListingResponse {
            page_title: format!("{} Frames for {}", shape_label, gender_label),
            shape,
            gender,
            category,
            listing,
        }),
    ))
}

pub async fn search(
    State(state): State<crate::AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<(StatusCode, Json<SearchResponse>), ApiError> {
    // An empty query browses the whole active catalog
    let mut narrowed = active_products();
    if let Some(cond) = catalog::search_condition(&state.db, &query.q)
        .await
        .map_err(db_error)?
    {
        narrowed = narrowed.filter(cond);
    }
    if let Some(brand_slug) = &query.brand {
        let brand_ids: Vec<i32> = Brands::find()
            .filter(crate::entities::brands::Column::Slug.eq(brand_slug))
            .all(&state.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(|brand| brand.id)
            .collect();
        narrowed = narrowed.filter(products::Column::BrandId.is_in(brand_ids));
    }
    if let Some(shape) = &query.shape {
        narrowed = narrowed.filter(products::Column::Shape.eq(shape));
    }
    if let Some(gender) = &query.gender {
        narrowed = narrowed.filter(products::Column::Gender.eq(gender));
    }

    let paginator = narrowed
        .order_by_asc(products::Column::Id)
        .paginate(&state.db, PAGE_SIZE);
    let total_items = paginator.num_items().await.map_err(db_error)?;
    let num_pages = paginator.num_pages().await.map_err(db_error)?;
    let page = clamp_page(query.page, num_pages);
    let rows = paginator.fetch_page(page - 1).await.map_err(db_error)?;
    let products = product_cards(&state.db, &rows).await.map_err(db_error)?;

    Ok((
        StatusCode::OK,
        Json(SearchResponse {
            query: query.q,
            products,
            page,
            num_pages,
            total_items,
        }),
    ))
}

pub async fn product_detail(
    State(state): State<crate::AppState>,
    Path(slug): Path<String>,
) -> Result<(StatusCode, Json<ProductDetailResponse>), ApiError> {
    let product = active_products()
        .filter(products::Column::Slug.eq(&slug))
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Product not found."))?;

    let images: Vec<String> = ProductImages::find()
        .filter(product_images::Column::ProductId.eq(product.id))
        .order_by_desc(product_images::Column::IsPrimary)
        .order_by_asc(product_images::Column::Id)
        .all(&state.db)
        .await
        .map_err(db_error)?
        .into_iter()
        .map(|image| image.image)
        .collect();

    let brand = match product.brand_id {
        Some(brand_id) => Brands::find_by_id(brand_id)
            .one(&state.db)
            .await
            .map_err(db_error)?
            .map(|brand| brand.name),
        None => None,
    };
    let category = Categories::find_by_id(product.category_id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .map(|row| category_out(&row));

    Ok((
        StatusCode::OK,
        Json(ProductDetailResponse {
            id: product.id,
            slug: product.slug,
            name: product.name,
            description: product.description,
            brand,
            category,
            gender: product.gender,
            shape: product.shape,
            frame_type: product.frame_type,
            frame_material: product.frame_material,
            color: product.color,
            size: product.size,
            weight_group: product.weight_group,
            price: product.base_price,
            is_prescription_supported: product.is_prescription_supported,
            images,
        }),
    ))
}
