mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use serde_json::{json, Value};
use sha2::Sha256;
use tower::ServiceExt;
use uuid::Uuid;

use framekart_backend::entities::{
    checkout_addresses, checkout_orders, delivery_pincodes, otp_codes, prelude::*, products,
    user_profiles, users,
};
use framekart_backend::services::sessions::{SessionData, SESSION_HEADER};
use framekart_backend::{build_router, AppState};

use crate::common::{
    seed_category, seed_product, seed_session, test_app_state, TEST_RAZORPAY_SECRET,
};

fn sign(order_id: &str, payment_id: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(TEST_RAZORPAY_SECRET.as_bytes()).unwrap();
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

async fn seed_order(
    db: &DatabaseConnection,
    session_key: &str,
    status: &str,
) -> checkout_orders::Model {
    let row = checkout_orders::ActiveModel {
        user_id: Set(None),
        session_key: Set(session_key.to_string()),
        address_id: Set(None),
        amount_paise: Set(159900),
        currency: Set("INR".to_string()),
        razorpay_order_id: Set(format!("order_{}", Uuid::new_v4().simple())),
        status: Set(status.to_string()),
        items: Set(json!([])),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    row.insert(db).await.expect("Failed to seed order")
}

async fn post_verify(
    state: &AppState,
    session_key: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> (StatusCode, Value) {
    let body = format!(
        "razorpay_order_id={}&razorpay_payment_id={}&razorpay_signature={}",
        order_id, payment_id, signature
    );
    let response = build_router(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/checkout/payment/verify")
                .header(SESSION_HEADER, session_key)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_json(state: &AppState, uri: &str, session_key: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri);
    if let Some(key) = session_key {
        builder = builder.header(SESSION_HEADER, key);
    }
    let response = build_router(state.clone())
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn payment_count(db: &DatabaseConnection, order_id: i32) -> u64 {
    CheckoutPayments::find()
        .filter(framekart_backend::entities::checkout_payments::Column::OrderId.eq(order_id))
        .count(db)
        .await
        .unwrap()
}

async fn order_status(db: &DatabaseConnection, order_id: i32) -> String {
    CheckoutOrders::find_by_id(order_id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .status
}

#[tokio::test]
async fn test_duplicate_callback_yields_one_payment_row() {
    let state = test_app_state().await;
    let key = seed_session(&state.db, &SessionData::default()).await;
    let order = seed_order(&state.db, &key, checkout_orders::STATUS_CREATED).await;

    let payment_id = format!("pay_{}", Uuid::new_v4().simple());
    let signature = sign(&order.razorpay_order_id, &payment_id);

    for _ in 0..2 {
        let (status, body) = post_verify(
            &state,
            &key,
            &order.razorpay_order_id,
            &payment_id,
            &signature,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["order_id"], json!(order.id));
    }

    assert_eq!(payment_count(&state.db, order.id).await, 1);
    assert_eq!(
        order_status(&state.db, order.id).await,
        checkout_orders::STATUS_PAID
    );
}

#[tokio::test]
async fn test_tampered_signature_fails_order_without_payment_row() {
    let state = test_app_state().await;
    let key = seed_session(&state.db, &SessionData::default()).await;
    let order = seed_order(&state.db, &key, checkout_orders::STATUS_CREATED).await;

    let (status, body) = post_verify(
        &state,
        &key,
        &order.razorpay_order_id,
        "pay_tampered",
        "0000000000000000000000000000000000000000000000000000000000000000",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));

    assert_eq!(payment_count(&state.db, order.id).await, 0);
    assert_eq!(
        order_status(&state.db, order.id).await,
        checkout_orders::STATUS_FAILED
    );
}

#[tokio::test]
async fn test_failed_order_stays_failed_on_valid_replay() {
    let state = test_app_state().await;
    let key = seed_session(&state.db, &SessionData::default()).await;
    let order = seed_order(&state.db, &key, checkout_orders::STATUS_FAILED).await;

    let payment_id = format!("pay_{}", Uuid::new_v4().simple());
    let signature = sign(&order.razorpay_order_id, &payment_id);
    let (status, body) = post_verify(
        &state,
        &key,
        &order.razorpay_order_id,
        &payment_id,
        &signature,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));

    assert_eq!(payment_count(&state.db, order.id).await, 0);
    assert_eq!(
        order_status(&state.db, order.id).await,
        checkout_orders::STATUS_FAILED
    );
}

#[tokio::test]
async fn test_paid_order_survives_tampered_replay() {
    let state = test_app_state().await;
    let key = seed_session(&state.db, &SessionData::default()).await;
    let order = seed_order(&state.db, &key, checkout_orders::STATUS_PAID).await;

    let (status, body) = post_verify(
        &state,
        &key,
        &order.razorpay_order_id,
        "pay_late",
        "not-a-signature",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        order_status(&state.db, order.id).await,
        checkout_orders::STATUS_PAID
    );
}

#[tokio::test]
async fn test_summary_is_owner_scoped() {
    let state = test_app_state().await;
    let owner_key = seed_session(&state.db, &SessionData::default()).await;
    let order = seed_order(&state.db, &owner_key, checkout_orders::STATUS_PAID).await;

    // The owner session sees the summary
    let owner_data = SessionData {
        checkout_order_id: Some(order.id),
        ..Default::default()
    };
    let owner_key = {
        // refresh the owner session with the remembered order id
        let row = framekart_backend::entities::sessions::ActiveModel {
            id: Set(owner_key.clone()),
            data: Set(serde_json::to_value(&owner_data).unwrap()),
            expiry_date: Set((Utc::now() + Duration::days(1)).into()),
        };
        Sessions::update(row).exec(&state.db).await.unwrap();
        owner_key
    };
    let (status, body) = get_json(&state, "/api/checkout/summary", Some(&owner_key)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(order.id));

    // A different session that somehow remembers the same order id gets 404
    let intruder_data = SessionData {
        checkout_order_id: Some(order.id),
        ..Default::default()
    };
    let intruder_key = seed_session(&state.db, &intruder_data).await;
    let (status, _) = get_json(&state, "/api/checkout/summary", Some(&intruder_key)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn address_payload(label: &str) -> Value {
    json!({
        "label": label,
        "name": "Asha Rao",
        "phone": "+919876543210",
        "email": "asha@example.com",
        "address_line1": "14 MG Road",
        "address_line2": "",
        "city": "Bengaluru",
        "state": "Karnataka",
        "pincode": "560001",
        "is_default": true
    })
}

#[tokio::test]
async fn test_default_address_is_unique_per_scope() {
    let state = test_app_state().await;
    let key = seed_session(&state.db, &SessionData::default()).await;

    for label in ["home", "work"] {
        let response = build_router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/addresses")
                    .header(SESSION_HEADER, &key)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(address_payload(label).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let defaults = CheckoutAddresses::find()
        .filter(checkout_addresses::Column::UserId.is_null())
        .filter(checkout_addresses::Column::SessionKey.eq(&key))
        .filter(checkout_addresses::Column::IsDefault.eq(true))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(defaults, 1, "only the last default should keep the flag");

    let total = CheckoutAddresses::find()
        .filter(checkout_addresses::Column::UserId.is_null())
        .filter(checkout_addresses::Column::SessionKey.eq(&key))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(total, 2);
}

#[tokio::test]
async fn test_facet_choices_come_from_base_set() {
    let state = test_app_state().await;
    let category = seed_category(&state.db).await;
    seed_product(&state.db, category.id, "round", "men", "1599.00").await;
    seed_product(&state.db, category.id, "oval", "men", "2599.00").await;

    let (status, body) = get_json(
        &state,
        &format!("/api/store/categories/{}?shape=round", category.slug),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Narrowed to one product, but the choices still come from the whole
    // category so the oval option stays visible
    assert_eq!(body["total_items"], json!(1));
    let shapes: Vec<&str> = body["filters"]["shapes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|choice| choice["value"].as_str().unwrap())
        .collect();
    assert!(shapes.contains(&"round"));
    assert!(shapes.contains(&"oval"));
}

#[tokio::test]
async fn test_empty_search_lists_active_products() {
    let state = test_app_state().await;
    let category = seed_category(&state.db).await;
    seed_product(&state.db, category.id, "round", "men", "1599.00").await;
    seed_product(&state.db, category.id, "square", "women", "2599.00").await;

    let active_count = Products::find()
        .filter(products::Column::IsActive.eq(true))
        .count(&state.db)
        .await
        .unwrap();

    let (status, body) = get_json(&state, "/api/store/search?q=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_items"], json!(active_count));
    assert!(!body["products"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_shape_listing_pins_path_values() {
    let state = test_app_state().await;
    let category = seed_category(&state.db).await;
    seed_product(&state.db, category.id, "geometric", "kids", "1599.00").await;
    seed_product(&state.db, category.id, "oval", "kids", "2599.00").await;

    let expected = Products::find()
        .filter(products::Column::IsActive.eq(true))
        .filter(products::Column::Shape.eq("geometric"))
        .filter(products::Column::Gender.eq("kids"))
        .count(&state.db)
        .await
        .unwrap();

    // A conflicting ?shape= selection is replaced by the path value
    let (status, body) = get_json(
        &state,
        "/api/store/collections/geometric/kids?shape=oval&gender=women",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected"]["shape"], json!(["geometric"]));
    assert_eq!(body["selected"]["gender"], json!(["kids"]));
    assert_eq!(body["total_items"], json!(expected));
}

#[tokio::test]
async fn test_email_verify_creates_profile_with_opt_in() {
    let state = test_app_state().await;
    let email = format!("otp-{}@example.com", Uuid::new_v4().simple());

    let otp = otp_codes::ActiveModel {
        identifier: Set(email.clone()),
        channel: Set(otp_codes::CHANNEL_EMAIL.to_string()),
        code: Set("123456".to_string()),
        expires_at: Set((Utc::now() + Duration::minutes(5)).into()),
        verified: Set(false),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    otp.insert(&state.db).await.unwrap();

    let staged = SessionData {
        whatsapp_opt_in: true,
        pending_first_name: "Asha".to_string(),
        ..Default::default()
    };
    let key = seed_session(&state.db, &staged).await;

    let response = build_router(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/verify-otp")
                .header(SESSION_HEADER, &key)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "identifier": email, "code": "123456" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let user = Users::find()
        .filter(users::Column::Email.eq(&email))
        .one(&state.db)
        .await
        .unwrap()
        .expect("email signup should create a user");
    assert_eq!(user.first_name, "Asha");

    let profile = UserProfiles::find()
        .filter(user_profiles::Column::UserId.eq(user.id))
        .one(&state.db)
        .await
        .unwrap()
        .expect("email signup should create a profile");
    assert!(profile.whatsapp_opt_in);
}

#[tokio::test]
async fn test_wishlist_move_does_not_require_cart_membership() {
    let state = test_app_state().await;
    let category = seed_category(&state.db).await;
    let product = seed_product(&state.db, category.id, "round", "unisex", "1999.00").await;
    let key = seed_session(&state.db, &SessionData::default()).await;

    let (status, body) = get_json(
        &state,
        &format!("/api/cart?action=move_to_wishlist&product={}", product.slug),
        Some(&key),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let wishlist = body["wishlist_items"].as_array().unwrap();
    assert_eq!(wishlist.len(), 1);
    assert_eq!(wishlist[0]["slug"], json!(product.slug));
    assert!(body["cart_items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_slug_mutations_are_ignored() {
    let state = test_app_state().await;
    let key = seed_session(&state.db, &SessionData::default()).await;

    for uri in [
        "/api/cart?add=no-such-frame",
        "/api/cart?action=move_to_wishlist&product=no-such-frame",
    ] {
        let (status, body) = get_json(&state, uri, Some(&key)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["cart_items"].as_array().unwrap().is_empty());
        assert!(body["wishlist_items"].as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_pincode_cache_hit_skips_directory() {
    let state = test_app_state().await;
    let pincode = format!("{}", rand::thread_rng().gen_range(100000..999999));

    let row = delivery_pincodes::ActiveModel {
        pincode: Set(pincode.clone()),
        city: Set("Mysuru".to_string()),
        state: Set("Karnataka".to_string()),
        delivery_days: Set(4),
        active: Set(true),
        source: Set(delivery_pincodes::SOURCE_DB.to_string()),
        last_checked: Set(None),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    };
    row.insert(&state.db).await.unwrap();

    // The directory base points at an unroutable port, so anything but a
    // cache hit would surface as 502
    let (status, body) = get_json(
        &state,
        &format!("/api/store/pincode?pincode={}", pincode),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], json!("db"));
    assert_eq!(body["city"], json!("Mysuru"));
    assert_eq!(body["delivery_days"], json!(4));
}

#[tokio::test]
async fn test_pincode_cache_miss_maps_transport_failure_to_502() {
    let state = test_app_state().await;
    let pincode = format!("{}", rand::thread_rng().gen_range(100000..999999));
    // No cache row seeded; the lookup hits the unroutable directory
    let (status, _) = get_json(
        &state,
        &format!("/api/store/pincode?pincode={}", pincode),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
