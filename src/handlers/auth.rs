use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::AppendHeaders,
    Json,
};
use chrono::{Duration, Utc};
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entities::{otp_codes, prelude::*, user_profiles, users};
use crate::models::auth::{
    RefreshTokenRequest, RefreshTokenResponse, RequestOtpRequest, RequestOtpResponse,
    TokenPairResponse, VerifyOtpRequest,
};
use crate::models::ErrorResponse;
use crate::services::notify::NotifyError;
use crate::services::otp::{
    channel_for, email_username, generate_code, normalize_phone, phone_username, username_suffix,
};
use crate::services::sessions::{resolve_context, save_session};

use super::{bad_request, db_error, unauthorized, ApiError};

type SessionHeaders = AppendHeaders<[(&'static str, String); 1]>;

fn normalize_identifier(raw: &str) -> (String, &'static str) {
    let trimmed = raw.trim();
    let channel = channel_for(trimmed);
    let identifier = if channel == otp_codes::CHANNEL_EMAIL {
        trimmed.to_lowercase()
    } else {
        normalize_phone(trimmed)
    };
    (identifier, channel)
}

fn notify_error(e: NotifyError) -> ApiError {
    let status = match e {
        NotifyError::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
        NotifyError::Send(_) => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

pub async fn request_otp(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
    Json(payload): Json<RequestOtpRequest>,
) -> Result<(StatusCode, SessionHeaders, Json<RequestOtpResponse>), ApiError> {
    let mut ctx = resolve_context(&state.db, &state.tokens, &headers)
        .await
        .map_err(db_error)?;

    if payload.identifier.trim().is_empty() {
        return Err(bad_request("Identifier is required."));
    }
    let (identifier, channel) = normalize_identifier(&payload.identifier);

    let code = generate_code(state.otp.length);
    let now = Utc::now();
    let row = otp_codes::ActiveModel {
        identifier: Set(identifier.clone()),
        channel: Set(channel.to_string()),
        code: Set(code.clone()),
        expires_at: Set((now + Duration::minutes(state.otp.expiry_minutes)).into()),
        verified: Set(false),
        created_at: Set(now.into()),
        ..Default::default()
    };
    row.insert(&state.db).await.map_err(db_error)?;

    // Signup details ride along in the session until the code is verified
    ctx.session.whatsapp_opt_in = payload.whatsapp_opt_in;
    ctx.session.pending_first_name = payload.first_name.trim().to_string();
    ctx.session.pending_last_name = payload.last_name.trim().to_string();
    save_session(&state.db, &ctx.session_key, &ctx.session)
        .await
        .map_err(db_error)?;

    // The stored code outlives a failed dispatch so the client can retry
    if channel == otp_codes::CHANNEL_PHONE {
        state
            .notifier
            .send_sms_otp(&identifier, &code)
            .await
            .map_err(notify_error)?;
    } else {
        state
            .notifier
            .send_email_otp(&identifier, &code)
            .await
            .map_err(notify_error)?;
    }

    Ok((
        StatusCode::OK,
        ctx.session_header(),
        Json(RequestOtpResponse {
            detail: "OTP sent.".to_string(),
            channel: channel.to_string(),
        }),
    ))
}

async fn unique_username(
    db: &sea_orm::DatabaseConnection,
    base: &str,
) -> Result<String, sea_orm::DbErr> {
    let taken = Users::find()
        .filter(users::Column::Username.eq(base))
        .one(db)
        .await?
        .is_some();
    if !taken {
        return Ok(base.to_string());
    }
    Ok(format!("{}_{}", base, username_suffix()))
}

/// Get-or-create the profile row for a user and apply the staged opt-in.
/// The flag only ever turns on here; an existing opt-in is never revoked.
async fn ensure_profile(
    db: &sea_orm::DatabaseConnection,
    user_id: i32,
    phone: &str,
    whatsapp_opt_in: bool,
) -> Result<(), sea_orm::DbErr> {
    let existing = UserProfiles::find()
        .filter(user_profiles::Column::UserId.eq(user_id))
        .one(db)
        .await?;
    match existing {
        Some(profile) => {
            if whatsapp_opt_in && !profile.whatsapp_opt_in {
                let mut row: user_profiles::ActiveModel = profile.into();
                row.whatsapp_opt_in = Set(true);
                row.update(db).await?;
            }
        }
        None => {
            let row = user_profiles::ActiveModel {
                user_id: Set(user_id),
                phone: Set(phone.to_string()),
                whatsapp_opt_in: Set(whatsapp_opt_in),
                ..Default::default()
            };
            row.insert(db).await?;
        }
    }
    Ok(())
}

async fn resolve_email_user(
    state: &crate::AppState,
    identifier: &str,
    first_name: &str,
    last_name: &str,
    whatsapp_opt_in: bool,
) -> Result<users::Model, sea_orm::DbErr> {
    // ilike without wildcards is a case-insensitive equality match
    let existing = Users::find()
        .filter(Expr::col(users::Column::Email).ilike(identifier))
        .one(&state.db)
        .await?;
    let user = match existing {
        Some(user) => user,
        None => {
            let username = unique_username(&state.db, &email_username(identifier)).await?;
            let user = users::ActiveModel {
                username: Set(username),
                email: Set(identifier.to_string()),
                first_name: Set(first_name.to_string()),
                last_name: Set(last_name.to_string()),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            };
            user.insert(&state.db).await?
        }
    };
    ensure_profile(&state.db, user.id, "", whatsapp_opt_in).await?;
    Ok(user)
}

async fn resolve_phone_user(
    state: &crate::AppState,
    identifier: &str,
    first_name: &str,
    last_name: &str,
    whatsapp_opt_in: bool,
) -> Result<users::Model, sea_orm::DbErr> {
    let profile = UserProfiles::find()
        .filter(user_profiles::Column::Phone.eq(identifier))
        .one(&state.db)
        .await?;
    if let Some(profile) = profile {
        let user = Users::find_by_id(profile.user_id).one(&state.db).await?;
        if let Some(user) = user {
            ensure_profile(&state.db, user.id, identifier, whatsapp_opt_in).await?;
            return Ok(user);
        }
    }

    let username = unique_username(&state.db, &phone_username(identifier)).await?;
    let user = users::ActiveModel {
        username: Set(username),
        email: Set(String::new()),
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    let user = user.insert(&state.db).await?;
    ensure_profile(&state.db, user.id, identifier, whatsapp_opt_in).await?;
    Ok(user)
}

/// Fill in staged names on an existing account that never provided them.
async fn apply_pending_names(
    db: &sea_orm::DatabaseConnection,
    user: &users::Model,
    first_name: &str,
    last_name: &str,
) -> Result<(), sea_orm::DbErr> {
    if (user.first_name.is_empty() && !first_name.is_empty())
        || (user.last_name.is_empty() && !last_name.is_empty())
    {
        let mut row: users::ActiveModel = user.clone().into();
        if user.first_name.is_empty() && !first_name.is_empty() {
            row.first_name = Set(first_name.to_string());
        }
        if user.last_name.is_empty() && !last_name.is_empty() {
            row.last_name = Set(last_name.to_string());
        }
        row.update(db).await?;
    }
    Ok(())
}

pub async fn verify_otp(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<(StatusCode, SessionHeaders, Json<TokenPairResponse>), ApiError> {
    let mut ctx = resolve_context(&state.db, &state.tokens, &headers)
        .await
        .map_err(db_error)?;

    // Absent rows, wrong codes and expired codes are indistinguishable to
    // the caller
    let invalid = || bad_request("Invalid OTP.");

    if payload.identifier.trim().is_empty() || payload.code.trim().is_empty() {
        return Err(invalid());
    }
    let (identifier, channel) = normalize_identifier(&payload.identifier);

    let row = OtpCodes::find()
        .filter(otp_codes::Column::Identifier.eq(&identifier))
        .filter(otp_codes::Column::Channel.eq(channel))
        .filter(otp_codes::Column::Verified.eq(false))
        .order_by_desc(otp_codes::Column::CreatedAt)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(invalid)?;

    if row.code != payload.code.trim() || row.expires_at < Utc::now() {
        return Err(invalid());
    }

    let mut verified: otp_codes::ActiveModel = row.into();
    verified.verified = Set(true);
    verified.update(&state.db).await.map_err(db_error)?;

    let first_name = ctx.session.pending_first_name.clone();
    let last_name = ctx.session.pending_last_name.clone();
    let whatsapp_opt_in = ctx.session.whatsapp_opt_in;

    let user = if channel == otp_codes::CHANNEL_EMAIL {
        resolve_email_user(&state, &identifier, &first_name, &last_name, whatsapp_opt_in)
            .await
            .map_err(db_error)?
    } else {
        resolve_phone_user(&state, &identifier, &first_name, &last_name, whatsapp_opt_in)
            .await
            .map_err(db_error)?
    };
    apply_pending_names(&state.db, &user, &first_name, &last_name)
        .await
        .map_err(db_error)?;

    // Staged signup details are consumed whether or not they applied
    ctx.session.pending_first_name.clear();
    ctx.session.pending_last_name.clear();
    ctx.session.whatsapp_opt_in = false;
    save_session(&state.db, &ctx.session_key, &ctx.session)
        .await
        .map_err(db_error)?;

    let (access, refresh) = state.tokens.issue_pair(user.id).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to issue tokens: {}", e),
            }),
        )
    })?;

    tracing::info!("User {} logged in via {}", user.username, channel);

    Ok((
        StatusCode::OK,
        ctx.session_header(),
        Json(TokenPairResponse {
            access,
            refresh,
            username: user.username,
        }),
    ))
}

pub async fn refresh_token(
    State(state): State<crate::AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<(StatusCode, Json<RefreshTokenResponse>), ApiError> {
    let user_id = state
        .tokens
        .verify_refresh(&payload.refresh)
        .ok_or_else(|| unauthorized("Invalid or expired refresh token."))?;
    let access = state.tokens.issue_access(user_id).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to issue tokens: {}", e),
            }),
        )
    })?;
    Ok((StatusCode::OK, Json(RefreshTokenResponse { access })))
}
