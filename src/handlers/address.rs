use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::AppendHeaders,
    Json,
};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::{checkout_addresses, prelude::*};
use crate::models::address::{
    AddressForm, AddressListResponse, AddressOut, AddressSavedResponse, SelectAddressForm,
    LABEL_CHOICES,
};
use crate::services::cart::{cart_total, resolve_slugs};
use crate::services::pincode::is_valid_pincode;
use crate::services::sessions::{resolve_context, save_session, Owner, RequestContext};

use super::{address_scope, bad_request, db_error, not_found, ApiError};

type SessionHeaders = AppendHeaders<[(&'static str, String); 1]>;

fn validate_form(form: &AddressForm) -> Result<(), ApiError> {
    if !LABEL_CHOICES.iter().any(|(value, _)| *value == form.label) {
        return Err(bad_request("Invalid address label."));
    }
    if form.name.trim().is_empty()
        || form.phone.trim().is_empty()
        || form.address_line1.trim().is_empty()
        || form.city.trim().is_empty()
        || form.state.trim().is_empty()
    {
        return Err(bad_request("All required address fields must be filled."));
    }
    if !is_valid_pincode(&form.pincode) {
        return Err(bad_request("Enter a valid 6-digit pincode."));
    }
    Ok(())
}

/// Clear `is_default` everywhere else in the scope, then flag `address_id`,
/// inside one transaction.
async fn make_default(
    db: &sea_orm::DatabaseConnection,
    owner: &Owner,
    address_id: i32,
) -> Result<(), sea_orm::DbErr> {
    let txn = db.begin().await?;
    CheckoutAddresses::update_many()
        .col_expr(checkout_addresses::Column::IsDefault, Expr::value(false))
        .filter(address_scope(owner))
        .filter(checkout_addresses::Column::Id.ne(address_id))
        .exec(&txn)
        .await?;
    CheckoutAddresses::update_many()
        .col_expr(checkout_addresses::Column::IsDefault, Expr::value(true))
        .filter(checkout_addresses::Column::Id.eq(address_id))
        .exec(&txn)
        .await?;
    txn.commit().await
}

async fn select_for_checkout(
    state: &crate::AppState,
    ctx: &mut RequestContext,
    address_id: i32,
) -> Result<(), ApiError> {
    ctx.session.checkout_address_id = Some(address_id);
    save_session(&state.db, &ctx.session_key, &ctx.session)
        .await
        .map_err(db_error)
}

pub async fn list_addresses(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, SessionHeaders, Json<AddressListResponse>), ApiError> {
    let ctx = resolve_context(&state.db, &state.tokens, &headers)
        .await
        .map_err(db_error)?;

    let rows = CheckoutAddresses::find()
        .filter(address_scope(&ctx.owner))
        .order_by_desc(checkout_addresses::Column::IsDefault)
        .order_by_desc(checkout_addresses::Column::UpdatedAt)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    let cart_products = resolve_slugs(&state.db, &ctx.session.cart_items)
        .await
        .map_err(db_error)?;

    Ok((
        StatusCode::OK,
        ctx.session_header(),
        Json(AddressListResponse {
            addresses: rows.into_iter().map(AddressOut::from).collect(),
            selected_id: ctx.session.checkout_address_id,
            total_price: cart_total(&cart_products),
        }),
    ))
}

pub async fn create_address(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
    Json(form): Json<AddressForm>,
) -> Result<(StatusCode, SessionHeaders, Json<AddressSavedResponse>), ApiError> {
    let mut ctx = resolve_context(&state.db, &state.tokens, &headers)
        .await
        .map_err(db_error)?;
    validate_form(&form)?;

    let (user_id, session_key) = match &ctx.owner {
        Owner::User(id) => (Some(*id), String::new()),
        Owner::Session(key) => (None, key.clone()),
    };

    let now = Utc::now();
    let row = checkout_addresses::ActiveModel {
        user_id: Set(user_id),
        session_key: Set(session_key),
        label: Set(form.label.clone()),
        name: Set(form.name.clone()),
        phone: Set(form.phone.clone()),
        email: Set(form.email.clone()),
        address_line1: Set(form.address_line1.clone()),
        address_line2: Set(form.address_line2.clone()),
        city: Set(form.city.clone()),
        state: Set(form.state.clone()),
        pincode: Set(form.pincode.clone()),
        is_default: Set(form.is_default),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    let saved = row.insert(&state.db).await.map_err(db_error)?;

    if form.is_default {
        make_default(&state.db, &ctx.owner, saved.id)
            .await
            .map_err(db_error)?;
    }
    // Saving an address always selects it for checkout
    select_for_checkout(&state, &mut ctx, saved.id).await?;

    Ok((
        StatusCode::CREATED,
        ctx.session_header(),
        Json(AddressSavedResponse {
            selected_id: saved.id,
            address: saved.into(),
        }),
    ))
}

pub async fn update_address(
    State(state): State<crate::AppState>,
    Path(address_id): Path<i32>,
    headers: HeaderMap,
    Json(form): Json<AddressForm>,
) -> Result<(StatusCode, SessionHeaders, Json<AddressSavedResponse>), ApiError> {
    let mut ctx = resolve_context(&state.db, &state.tokens, &headers)
        .await
        .map_err(db_error)?;
    validate_form(&form)?;

    let existing = CheckoutAddresses::find_by_id(address_id)
        .filter(address_scope(&ctx.owner))
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Address not found."))?;

    let mut row: checkout_addresses::ActiveModel = existing.into();
    row.label = Set(form.label.clone());
    row.name = Set(form.name.clone());
    row.phone = Set(form.phone.clone());
    row.email = Set(form.email.clone());
    row.address_line1 = Set(form.address_line1.clone());
    row.address_line2 = Set(form.address_line2.clone());
    row.city = Set(form.city.clone());
    row.state = Set(form.state.clone());
    row.pincode = Set(form.pincode.clone());
    row.is_default = Set(form.is_default);
    row.updated_at = Set(Utc::now().into());
    let saved = row.update(&state.db).await.map_err(db_error)?;

    if form.is_default {
        make_default(&state.db, &ctx.owner, saved.id)
            .await
            .map_err(db_error)?;
    }
    select_for_checkout(&state, &mut ctx, saved.id).await?;

    Ok((
        StatusCode::OK,
        ctx.session_header(),
        Json(AddressSavedResponse {
            selected_id: saved.id,
            address: saved.into(),
        }),
    ))
}

pub async fn delete_address(
    State(state): State<crate::AppState>,
    Path(address_id): Path<i32>,
    headers: HeaderMap,
) -> Result<(StatusCode, SessionHeaders, Json<serde_json::Value>), ApiError> {
    let mut ctx = resolve_context(&state.db, &state.tokens, &headers)
        .await
        .map_err(db_error)?;

    let existing = CheckoutAddresses::find_by_id(address_id)
        .filter(address_scope(&ctx.owner))
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Address not found."))?;

    let model: checkout_addresses::ActiveModel = existing.into();
    model.delete(&state.db).await.map_err(db_error)?;

    if ctx.session.checkout_address_id == Some(address_id) {
        ctx.session.checkout_address_id = None;
        save_session(&state.db, &ctx.session_key, &ctx.session)
            .await
            .map_err(db_error)?;
    }

    Ok((
        StatusCode::OK,
        ctx.session_header(),
        Json(serde_json::json!({ "deleted": true })),
    ))
}

pub async fn select_address(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
    Json(form): Json<SelectAddressForm>,
) -> Result<(StatusCode, SessionHeaders, Json<serde_json::Value>), ApiError> {
    let mut ctx = resolve_context(&state.db, &state.tokens, &headers)
        .await
        .map_err(db_error)?;

    CheckoutAddresses::find_by_id(form.address_id)
        .filter(address_scope(&ctx.owner))
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Address not found."))?;

    select_for_checkout(&state, &mut ctx, form.address_id).await?;

    Ok((
        StatusCode::OK,
        ctx.session_header(),
        Json(serde_json::json!({ "selected_id": form.address_id })),
    ))
}
