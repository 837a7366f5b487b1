use axum::{
    extract::{Form, Path, State},
    http::{HeaderMap, StatusCode},
    response::AppendHeaders,
    Json,
};
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entities::{checkout_orders, checkout_payments, prelude::*};
use crate::models::checkout::{
    CreatePaymentResponse, OrderItem, OrderListResponse, OrderSummary, PaymentPageResponse,
    PaymentPrefill, VerifyPaymentForm, VerifyPaymentResponse,
};
use crate::models::ErrorResponse;
use crate::services::cart::{cart_total, resolve_slugs};
use crate::services::catalog::product_cards;
use crate::services::razorpay::RazorpayError;
use crate::services::sessions::{resolve_context, save_session, Owner, RequestContext};

use super::{bad_request, db_error, not_found, order_scope, ApiError};

type SessionHeaders = AppendHeaders<[(&'static str, String); 1]>;

async fn selected_address(
    state: &crate::AppState,
    ctx: &RequestContext,
) -> Result<crate::entities::checkout_addresses::Model, ApiError> {
    let address_id = ctx
        .session
        .checkout_address_id
        .ok_or_else(|| bad_request("No address selected for checkout."))?;
    CheckoutAddresses::find_by_id(address_id)
        .filter(super::address_scope(&ctx.owner))
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| bad_request("No address selected for checkout."))
}

pub async fn payment_page(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, SessionHeaders, Json<PaymentPageResponse>), ApiError> {
    let ctx = resolve_context(&state.db, &state.tokens, &headers)
        .await
        .map_err(db_error)?;
    let address = selected_address(&state, &ctx).await?;

    let cart_products = resolve_slugs(&state.db, &ctx.session.cart_items)
        .await
        .map_err(db_error)?;
    let total_price = cart_total(&cart_products);
    let cart_items = product_cards(&state.db, &cart_products)
        .await
        .map_err(db_error)?;

    Ok((
        StatusCode::OK,
        ctx.session_header(),
        Json(PaymentPageResponse {
            address: address.into(),
            cart_items,
            total_price,
            razorpay_key_id: state.razorpay.key_id().to_string(),
        }),
    ))
}

pub async fn create_payment(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, SessionHeaders, Json<CreatePaymentResponse>), ApiError> {
    let ctx = resolve_context(&state.db, &state.tokens, &headers)
        .await
        .map_err(db_error)?;
    let address = selected_address(&state, &ctx).await?;

    let cart_products = resolve_slugs(&state.db, &ctx.session.cart_items)
        .await
        .map_err(db_error)?;
    let total_price = cart_total(&cart_products);
    if total_price <= Decimal::ZERO {
        return Err(bad_request("Your cart is empty."));
    }

    let amount_paise = (total_price * Decimal::from(100))
        .trunc()
        .to_i64()
        .ok_or_else(|| bad_request("Cart total is out of range."))?;

    // Receipt ties the gateway order back to the session without leaking
    // the full key
    let key_tail: String = ctx
        .session_key
        .chars()
        .rev()
        .take(8)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let receipt = format!("rcpt_{}", key_tail);

    let gateway_order = state
        .razorpay
        .create_order(amount_paise, "INR", &receipt)
        .await
        .map_err(|e| {
            let status = match e {
                RazorpayError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
                RazorpayError::Gateway(_) => StatusCode::BAD_GATEWAY,
            };
            (
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
        })?;

    let items: Vec<OrderItem> = cart_products
        .iter()
        .map(|product| OrderItem {
            slug: product.slug.clone(),
            name: product.name.clone(),
            price: product.base_price.to_string(),
        })
        .collect();

    let (user_id, session_key) = match &ctx.owner {
        Owner::User(id) => (Some(*id), ctx.session_key.clone()),
        Owner::Session(key) => (None, key.clone()),
    };
    let order = checkout_orders::ActiveModel {
        user_id: Set(user_id),
        session_key: Set(session_key),
        address_id: Set(Some(address.id)),
        amount_paise: Set(amount_paise),
        currency: Set(gateway_order.currency.clone()),
        razorpay_order_id: Set(gateway_order.id.clone()),
        status: Set(checkout_orders::STATUS_CREATED.to_string()),
        items: Set(serde_json::to_value(&items).unwrap_or_default()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    order.insert(&state.db).await.map_err(db_error)?;

    Ok((
        StatusCode::CREATED,
        ctx.session_header(),
        Json(CreatePaymentResponse {
            order_id: gateway_order.id,
            amount: gateway_order.amount,
            currency: gateway_order.currency,
            name: "Framekart".to_string(),
            prefill: PaymentPrefill {
                name: address.name,
                email: address.email,
                contact: address.phone,
            },
        }),
    ))
}

pub async fn verify_payment(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
    Form(form): Form<VerifyPaymentForm>,
) -> Result<(StatusCode, SessionHeaders, Json<VerifyPaymentResponse>), ApiError> {
    let mut ctx = resolve_context(&state.db, &state.tokens, &headers)
        .await
        .map_err(db_error)?;

    if form.razorpay_order_id.is_empty()
        || form.razorpay_payment_id.is_empty()
        || form.razorpay_signature.is_empty()
    {
        return Ok((
            StatusCode::OK,
            ctx.session_header(),
            Json(VerifyPaymentResponse {
                success: false,
                order_id: None,
            }),
        ));
    }

    let order = CheckoutOrders::find()
        .filter(checkout_orders::Column::RazorpayOrderId.eq(&form.razorpay_order_id))
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Order not found."))?;

    let valid = state.razorpay.verify_payment_signature(
        &form.razorpay_order_id,
        &form.razorpay_payment_id,
        &form.razorpay_signature,
    );

    if !valid {
        tracing::warn!(
            "Signature mismatch for gateway order {}",
            form.razorpay_order_id
        );
        // paid and failed are terminal; a bad replay cannot demote an order
        if order.status == checkout_orders::STATUS_CREATED {
            let mut failed: checkout_orders::ActiveModel = order.into();
            failed.status = Set(checkout_orders::STATUS_FAILED.to_string());
            failed.update(&state.db).await.map_err(db_error)?;
        }
        return Ok((
            StatusCode::OK,
            ctx.session_header(),
            Json(VerifyPaymentResponse {
                success: false,
                order_id: None,
            }),
        ));
    }

    if order.status == checkout_orders::STATUS_FAILED {
        // Terminal: a late valid callback cannot resurrect a failed order
        return Ok((
            StatusCode::OK,
            ctx.session_header(),
            Json(VerifyPaymentResponse {
                success: false,
                order_id: None,
            }),
        ));
    }

    // Duplicate callback delivery re-finds the payment row instead of
    // inserting a second one
    let existing = CheckoutPayments::find()
        .filter(checkout_payments::Column::RazorpayPaymentId.eq(&form.razorpay_payment_id))
        .one(&state.db)
        .await
        .map_err(db_error)?;
    if existing.is_none() {
        let payment = checkout_payments::ActiveModel {
            order_id: Set(order.id),
            razorpay_payment_id: Set(form.razorpay_payment_id.clone()),
            razorpay_signature: Set(form.razorpay_signature.clone()),
            status: Set(checkout_payments::STATUS_CAPTURED.to_string()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        payment.insert(&state.db).await.map_err(db_error)?;
    }

    let order_id = order.id;
    if order.status == checkout_orders::STATUS_CREATED {
        let mut paid: checkout_orders::ActiveModel = order.into();
        paid.status = Set(checkout_orders::STATUS_PAID.to_string());
        paid.update(&state.db).await.map_err(db_error)?;
    }

    ctx.session.cart_items.clear();
    ctx.session.checkout_order_id = Some(order_id);
    save_session(&state.db, &ctx.session_key, &ctx.session)
        .await
        .map_err(db_error)?;

    Ok((
        StatusCode::OK,
        ctx.session_header(),
        Json(VerifyPaymentResponse {
            success: true,
            order_id: Some(order_id),
        }),
    ))
}

async fn order_summary(
    state: &crate::AppState,
    order: checkout_orders::Model,
) -> Result<OrderSummary, ApiError> {
    let address = match order.address_id {
        Some(address_id) => CheckoutAddresses::find_by_id(address_id)
            .one(&state.db)
            .await
            .map_err(db_error)?
            .map(Into::into),
        None => None,
    };
    let items: Vec<OrderItem> = serde_json::from_value(order.items).unwrap_or_default();
    Ok(OrderSummary {
        id: order.id,
        razorpay_order_id: order.razorpay_order_id,
        status: order.status,
        amount_paise: order.amount_paise,
        total_price: Decimal::new(order.amount_paise, 2),
        currency: order.currency,
        items,
        address,
        created_at: order.created_at.format("%Y-%m-%d %H:%M").to_string(),
    })
}

pub async fn summary(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, SessionHeaders, Json<OrderSummary>), ApiError> {
    let ctx = resolve_context(&state.db, &state.tokens, &headers)
        .await
        .map_err(db_error)?;
    let order_id = ctx
        .session
        .checkout_order_id
        .ok_or_else(|| not_found("No recent order."))?;
    let order = CheckoutOrders::find_by_id(order_id)
        .filter(order_scope(&ctx.owner))
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("No recent order."))?;
    let summary = order_summary(&state, order).await?;
    Ok((StatusCode::OK, ctx.session_header(), Json(summary)))
}

pub async fn list_orders(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, SessionHeaders, Json<OrderListResponse>), ApiError> {
    let ctx = resolve_context(&state.db, &state.tokens, &headers)
        .await
        .map_err(db_error)?;
    let rows = CheckoutOrders::find()
        .filter(order_scope(&ctx.owner))
        .order_by_desc(checkout_orders::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(db_error)?;
    let mut orders = Vec::with_capacity(rows.len());
    for order in rows {
        orders.push(order_summary(&state, order).await?);
    }
    Ok((
        StatusCode::OK,
        ctx.session_header(),
        Json(OrderListResponse { orders }),
    ))
}

pub async fn order_detail(
    State(state): State<crate::AppState>,
    Path(order_id): Path<i32>,
    headers: HeaderMap,
) -> Result<(StatusCode, SessionHeaders, Json<OrderSummary>), ApiError> {
    let ctx = resolve_context(&state.db, &state.tokens, &headers)
        .await
        .map_err(db_error)?;
    let order = CheckoutOrders::find_by_id(order_id)
        .filter(order_scope(&ctx.owner))
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Order not found."))?;
    let summary = order_summary(&state, order).await?;
    Ok((StatusCode::OK, ctx.session_header(), Json(summary)))
}
