pub mod account;
pub mod address;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod pincode;

use axum::http::StatusCode;
use axum::Json;
use sea_orm::{ColumnTrait, Condition, DbErr};

use crate::entities::{checkout_addresses, checkout_orders};
use crate::models::ErrorResponse;
use crate::services::sessions::Owner;

pub(crate) type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn db_error(e: DbErr) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("Database error: {}", e),
        }),
    )
}

pub(crate) fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

pub(crate) fn not_found(message: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

pub(crate) fn unauthorized(message: &str) -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// Scope condition for address rows belonging to the caller.
pub(crate) fn address_scope(owner: &Owner) -> Condition {
    match owner {
        Owner::User(id) => Condition::all().add(checkout_addresses::Column::UserId.eq(*id)),
        Owner::Session(key) => Condition::all()
            .add(checkout_addresses::Column::UserId.is_null())
            .add(checkout_addresses::Column::SessionKey.eq(key.clone())),
    }
}

/// Scope condition for checkout order rows belonging to the caller.
pub(crate) fn order_scope(owner: &Owner) -> Condition {
    match owner {
        Owner::User(id) => Condition::all().add(checkout_orders::Column::UserId.eq(*id)),
        Owner::Session(key) => Condition::all()
            .add(checkout_orders::Column::UserId.is_null())
            .add(checkout_orders::Column::SessionKey.eq(key.clone())),
    }
}
