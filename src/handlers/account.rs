use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::{orders, prelude::*, prescriptions, store_credits, user_profiles};
use crate::models::account::{
    AccountOrderOut, AccountOrdersResponse, PrescriptionOut, PrescriptionsResponse,
    ProfileResponse, StoreCreditOut, StoreCreditsResponse,
};
use crate::services::tokens::TokenService;

use super::{db_error, not_found, unauthorized, ApiError};

/// Resolve the Bearer token to a user id; account pages have no anonymous
/// fallback.
fn require_user(tokens: &TokenService, headers: &HeaderMap) -> Result<i32, ApiError> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|token| tokens.verify_access(token))
        .ok_or_else(|| unauthorized("Authentication required."))
}

pub async fn list_orders(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<AccountOrdersResponse>), ApiError> {
    let user_id = require_user(&state.tokens, &headers)?;
    let rows = Orders::find()
        .filter(orders::Column::UserId.eq(user_id))
        .order_by_desc(orders::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(db_error)?;
    Ok((
        StatusCode::OK,
        Json(AccountOrdersResponse {
            orders: rows
                .into_iter()
                .map(|order| AccountOrderOut {
                    order_id: order.order_id,
                    total_price: order.total_price,
                    status: order.status,
                    created_at: order.created_at.format("%Y-%m-%d").to_string(),
                })
                .collect(),
        }),
    ))
}

pub async fn list_prescriptions(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<PrescriptionsResponse>), ApiError> {
    let user_id = require_user(&state.tokens, &headers)?;
    let rows = Prescriptions::find()
        .filter(prescriptions::Column::UserId.eq(user_id))
        .order_by_desc(prescriptions::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(db_error)?;
    Ok((
        StatusCode::OK,
        Json(PrescriptionsResponse {
            prescriptions: rows
                .into_iter()
                .map(|rx| PrescriptionOut {
                    id: rx.id,
                    name: rx.name,
                    power_type: rx.power_type,
                    right_sph: rx.right_sph,
                    left_sph: rx.left_sph,
                    right_cyl: rx.right_cyl,
                    left_cyl: rx.left_cyl,
                    axis: rx.axis,
                    pd: rx.pd,
                    created_at: rx.created_at.format("%Y-%m-%d").to_string(),
                })
                .collect(),
        }),
    ))
}

pub async fn list_store_credit(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<StoreCreditsResponse>), ApiError> {
    let user_id = require_user(&state.tokens, &headers)?;
    let rows = StoreCredits::find()
        .filter(store_credits::Column::UserId.eq(user_id))
        .order_by_desc(store_credits::Column::UpdatedAt)
        .all(&state.db)
        .await
        .map_err(db_error)?;
    Ok((
        StatusCode::OK,
        Json(StoreCreditsResponse {
            credits: rows
                .into_iter()
                .map(|credit| StoreCreditOut {
                    code: credit.code,
                    balance: credit.balance,
                })
                .collect(),
        }),
    ))
}

pub async fn profile(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<ProfileResponse>), ApiError> {
    let user_id = require_user(&state.tokens, &headers)?;
    let user = Users::find_by_id(user_id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("User not found."))?;
    let profile = UserProfiles::find()
        .filter(user_profiles::Column::UserId.eq(user_id))
        .one(&state.db)
        .await
        .map_err(db_error)?;

    let (phone, whatsapp_opt_in) = profile
        .map(|profile| (profile.phone, profile.whatsapp_opt_in))
        .unwrap_or_default();

    Ok((
        StatusCode::OK,
        Json(ProfileResponse {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone,
            whatsapp_opt_in,
        }),
    ))
}
