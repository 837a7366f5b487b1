use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::entities::{delivery_pincodes, prelude::*};
use crate::models::pincode::{PincodeQuery, PincodeResponse};
use crate::models::ErrorResponse;
use crate::services::pincode::{is_valid_pincode, PincodeLookupError};

use super::{bad_request, db_error, not_found, ApiError};

const DEFAULT_DELIVERY_DAYS: i16 = 3;

fn delivery_estimate(delivery_days: i16) -> String {
    (Utc::now() + Duration::days(delivery_days as i64))
        .format("%d %b")
        .to_string()
}

/// Serviceability check: cache table first, external directory on a miss.
pub async fn check_pincode(
    State(state): State<crate::AppState>,
    Query(query): Query<PincodeQuery>,
) -> Result<(StatusCode, Json<PincodeResponse>), ApiError> {
    if !is_valid_pincode(&query.pincode) {
        return Err(bad_request("Enter a valid 6-digit pincode."));
    }

    let cached = DeliveryPincodes::find()
        .filter(delivery_pincodes::Column::Pincode.eq(&query.pincode))
        .one(&state.db)
        .await
        .map_err(db_error)?;

    if let Some(row) = &cached {
        if row.active {
            return Ok((
                StatusCode::OK,
                Json(PincodeResponse {
                    pincode: row.pincode.clone(),
                    city: row.city.clone(),
                    state: row.state.clone(),
                    delivery_days: row.delivery_days,
                    delivery_estimate: delivery_estimate(row.delivery_days),
                    source: delivery_pincodes::SOURCE_DB.to_string(),
                }),
            ));
        }
    }

    let record = state
        .pincode
        .lookup(&query.pincode)
        .await
        .map_err(|e| match e {
            PincodeLookupError::NotServiceable => not_found("Pincode is not serviceable."),
            PincodeLookupError::Upstream(message) => {
                tracing::error!("Pincode directory lookup failed: {}", message);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ErrorResponse {
                        error: "Unable to check pincode right now.".to_string(),
                    }),
                )
            }
        })?;

    let now = Utc::now();
    let delivery_days = match cached {
        // A stale inactive row is refreshed in place
        Some(existing) => {
            let days = existing.delivery_days;
            let mut row: delivery_pincodes::ActiveModel = existing.into();
            row.city = Set(record.city.clone());
            row.state = Set(record.state.clone());
            row.active = Set(true);
            row.source = Set(delivery_pincodes::SOURCE_EXTERNAL.to_string());
            row.last_checked = Set(Some(now.into()));
            row.updated_at = Set(now.into());
            row.update(&state.db).await.map_err(db_error)?;
            days
        }
        None => {
            let row = delivery_pincodes::ActiveModel {
                pincode: Set(query.pincode.clone()),
                city: Set(record.city.clone()),
                state: Set(record.state.clone()),
                delivery_days: Set(DEFAULT_DELIVERY_DAYS),
                active: Set(true),
                source: Set(delivery_pincodes::SOURCE_EXTERNAL.to_string()),
                last_checked: Set(Some(now.into())),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
                ..Default::default()
            };
            row.insert(&state.db).await.map_err(db_error)?;
            DEFAULT_DELIVERY_DAYS
        }
    };

    Ok((
        StatusCode::OK,
        Json(PincodeResponse {
            pincode: query.pincode,
            city: record.city,
            state: record.state,
            delivery_days,
            delivery_estimate: delivery_estimate(delivery_days),
            source: delivery_pincodes::SOURCE_EXTERNAL.to_string(),
        }),
    ))
}
