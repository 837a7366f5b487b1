use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::AppendHeaders,
    Json,
};
use sea_orm::ColumnTrait;
use sea_orm::EntityTrait;
use sea_orm::QueryFilter;

use crate::entities::{prelude::*, products};
use crate::models::cart::{CartQuery, CartResponse};
use crate::services::cart::{cart_total, resolve_slugs};
use crate::services::catalog::product_cards;
use crate::services::sessions::{resolve_context, save_session};

use super::{db_error, ApiError};

/// Cart view and mutations. Mutations arrive as GET parameters, a shape the
/// storefront frontend has always used; the session is saved back and the
/// key echoed whenever the cart changed.
pub async fn cart(
    State(state): State<crate::AppState>,
    Query(query): Query<CartQuery>,
    headers: HeaderMap,
) -> Result<
    (
        StatusCode,
        AppendHeaders<[(&'static str, String); 1]>,
        Json<CartResponse>,
    ),
    ApiError,
> {
    let mut ctx = resolve_context(&state.db, &state.tokens, &headers)
        .await
        .map_err(db_error)?;

    let (action, slug) = match (&query.add, &query.product) {
        (Some(slug), _) => (query.action.as_deref().unwrap_or("add"), Some(slug.clone())),
        (None, Some(slug)) => (query.action.as_deref().unwrap_or("add"), Some(slug.clone())),
        (None, None) => ("", None),
    };

    let mut changed = false;
    if let Some(slug) = slug {
        // Unknown or inactive slugs skip the mutation entirely
        let exists = Products::find()
            .filter(products::Column::Slug.eq(&slug))
            .filter(products::Column::IsActive.eq(true))
            .one(&state.db)
            .await
            .map_err(db_error)?
            .is_some();
        if exists {
            match action {
                "add" => {
                    // Duplicates allowed: each add is one more unit
                    ctx.session.cart_items.push(slug);
                    changed = true;
                }
                "remove" => {
                    if let Some(pos) =
                        ctx.session.cart_items.iter().position(|item| item == &slug)
                    {
                        ctx.session.cart_items.remove(pos);
                        changed = true;
                    }
                }
                "move_to_wishlist" => {
                    if let Some(pos) =
                        ctx.session.cart_items.iter().position(|item| item == &slug)
                    {
                        ctx.session.cart_items.remove(pos);
                    }
                    // Wishlisting does not require the item to be in the cart
                    ctx.session.wishlist_items.push(slug);
                    changed = true;
                }
                _ => {}
            }
        }
    }

    if changed {
        save_session(&state.db, &ctx.session_key, &ctx.session)
            .await
            .map_err(db_error)?;
    }

    let cart_products = resolve_slugs(&state.db, &ctx.session.cart_items)
        .await
        .map_err(db_error)?;
    let wishlist_products = resolve_slugs(&state.db, &ctx.session.wishlist_items)
        .await
        .map_err(db_error)?;
    let total_price = cart_total(&cart_products);

    let cart_items = product_cards(&state.db, &cart_products)
        .await
        .map_err(db_error)?;
    let wishlist_items = product_cards(&state.db, &wishlist_products)
        .await
        .map_err(db_error)?;

    Ok((
        StatusCode::OK,
        ctx.session_header(),
        Json(CartResponse {
            cart_items,
            wishlist_items,
            total_price,
        }),
    ))
}
