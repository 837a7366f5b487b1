//! Server-side session store and owner-scope resolution.
//!
//! Visitor state lives in the `sessions` table as a JSON blob keyed by an
//! opaque session key. Clients carry the key in the `x-session-key` header;
//! a missing or unknown key lazily creates a fresh session, and every
//! session-touching response echoes the key back in the same header.

use axum::http::HeaderMap;
use axum::response::AppendHeaders;
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{prelude::*, sessions};
use crate::services::tokens::TokenService;

pub const SESSION_HEADER: &str = "x-session-key";

const SESSION_TTL_DAYS: i64 = 30;

/// Per-visitor state persisted in the session row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub cart_items: Vec<String>,
    #[serde(default)]
    pub wishlist_items: Vec<String>,
    pub checkout_address_id: Option<i32>,
    pub checkout_order_id: Option<i32>,
    #[serde(default)]
    pub whatsapp_opt_in: bool,
    #[serde(default)]
    pub pending_first_name: String,
    #[serde(default)]
    pub pending_last_name: String,
}

/// Who a cart/address/order belongs to. Every owner-scoped query pattern
/// matches on this instead of branching on an authentication flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    User(i32),
    Session(String),
}

/// Resolved request identity: the owner scope plus the visitor session,
/// which exists even for authenticated users (the cart is session-held).
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub owner: Owner,
    pub session_key: String,
    pub session: SessionData,
}

impl RequestContext {
    /// Response header echoing the session key back to the client.
    pub fn session_header(&self) -> AppendHeaders<[(&'static str, String); 1]> {
        AppendHeaders([(SESSION_HEADER, self.session_key.clone())])
    }

    pub fn user_id(&self) -> Option<i32> {
        match self.owner {
            Owner::User(id) => Some(id),
            Owner::Session(_) => None,
        }
    }
}

/// Load the session named by the request headers, creating one when the key
/// is absent or no longer resolves, and take the owner from a valid bearer
/// token when present.
pub async fn resolve_context(
    db: &DatabaseConnection,
    tokens: &TokenService,
    headers: &HeaderMap,
) -> Result<RequestContext, DbErr> {
    let requested_key = headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let (session_key, session) = load_or_create(db, requested_key.as_deref()).await?;

    let user_id = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|token| tokens.verify_access(token));

    let owner = match user_id {
        Some(id) => Owner::User(id),
        None => Owner::Session(session_key.clone()),
    };

    Ok(RequestContext {
        owner,
        session_key,
        session,
    })
}

async fn load_or_create(
    db: &DatabaseConnection,
    requested_key: Option<&str>,
) -> Result<(String, SessionData), DbErr> {
    if let Some(key) = requested_key {
        if let Some(row) = Sessions::find_by_id(key).one(db).await? {
            if row.expiry_date > Utc::now() {
                let data = serde_json::from_value(row.data).unwrap_or_default();
                return Ok((key.to_string(), data));
            }
        }
    }

    let key = Uuid::new_v4().simple().to_string();
    let data = SessionData::default();
    let row = sessions::ActiveModel {
        id: Set(key.clone()),
        data: Set(serde_json::to_value(&data).unwrap_or_default()),
        expiry_date: Set((Utc::now() + Duration::days(SESSION_TTL_DAYS)).into()),
    };
    row.insert(db).await?;
    tracing::debug!("Created session {}", key);
    Ok((key, data))
}

/// Persist updated session data and refresh its expiry.
pub async fn save_session(
    db: &DatabaseConnection,
    session_key: &str,
    data: &SessionData,
) -> Result<(), DbErr> {
    let row = sessions::ActiveModel {
        id: Set(session_key.to_string()),
        data: Set(serde_json::to_value(data).unwrap_or_default()),
        expiry_date: Set((Utc::now() + Duration::days(SESSION_TTL_DAYS)).into()),
    };
    Sessions::update(row).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_data_defaults_for_missing_fields() {
        let data: SessionData = serde_json::from_value(serde_json::json!({
            "cart_items": ["aviator-black"]
        }))
        .unwrap();
        assert_eq!(data.cart_items, vec!["aviator-black".to_string()]);
        assert!(data.wishlist_items.is_empty());
        assert_eq!(data.checkout_address_id, None);
        assert!(!data.whatsapp_opt_in);
    }

    #[test]
    fn test_session_data_round_trip() {
        let data = SessionData {
            cart_items: vec!["a".into(), "a".into(), "b".into()],
            checkout_address_id: Some(7),
            ..Default::default()
        };
        let value = serde_json::to_value(&data).unwrap();
        let back: SessionData = serde_json::from_value(value).unwrap();
        assert_eq!(back, data);
    }
}
