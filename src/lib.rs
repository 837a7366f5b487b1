// src/lib.rs

use axum::{
    routing::{get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use services::{
    notify::{NotificationService, OtpSettings},
    pincode::PincodeDirectoryService,
    razorpay::RazorpayService,
    tokens::TokenService,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub razorpay: RazorpayService,
    pub pincode: PincodeDirectoryService,
    pub notifier: NotificationService,
    pub tokens: TokenService,
    pub otp: OtpSettings,
}

pub mod entities {
    pub mod prelude;
    pub mod banners;
    pub mod brands;
    pub mod categories;
    pub mod checkout_addresses;
    pub mod checkout_orders;
    pub mod checkout_payments;
    pub mod delivery_pincodes;
    pub mod orders;
    pub mod otp_codes;
    pub mod prescriptions;
    pub mod product_images;
    pub mod products;
    pub mod sessions;
    pub mod store_credits;
    pub mod user_profiles;
    pub mod users;
}

pub mod services {
    pub mod cart;
    pub mod catalog;
    pub mod notify;
    pub mod otp;
    pub mod pincode;
    pub mod razorpay;
    pub mod sessions;
    pub mod tokens;
}

pub mod models;
pub mod handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/store/home", get(handlers::catalog::home))
        .route(
            "/api/store/categories/{slug}",
            get(handlers::catalog::category_listing),
        )
        .route(
            "/api/store/collections/{shape}/{gender}",
            get(handlers::catalog::shape_listing),
        )
        .route("/api/store/search", get(handlers::catalog::search))
        .route(
            "/api/store/products/{slug}",
            get(handlers::catalog::product_detail),
        )
        .route("/api/store/pincode", get(handlers::pincode::check_pincode))
        .route("/api/cart", get(handlers::cart::cart))
        .route(
            "/api/addresses",
            get(handlers::address::list_addresses).post(handlers::address::create_address),
        )
        .route(
            "/api/addresses/{id}",
            put(handlers::address::update_address).delete(handlers::address::delete_address),
        )
        .route(
            "/api/addresses/select",
            post(handlers::address::select_address),
        )
        .route(
            "/api/checkout/payment",
            get(handlers::checkout::payment_page),
        )
        .route(
            "/api/checkout/payment/create",
            post(handlers::checkout::create_payment),
        )
        .route(
            "/api/checkout/payment/verify",
            post(handlers::checkout::verify_payment),
        )
        .route("/api/checkout/summary", get(handlers::checkout::summary))
        .route("/api/checkout/orders", get(handlers::checkout::list_orders))
        .route(
            "/api/checkout/orders/{id}",
            get(handlers::checkout::order_detail),
        )
        .route("/api/auth/request-otp", post(handlers::auth::request_otp))
        .route("/api/auth/verify-otp", post(handlers::auth::verify_otp))
        .route(
            "/api/auth/token/refresh",
            post(handlers::auth::refresh_token),
        )
        .route("/api/account/orders", get(handlers::account::list_orders))
        .route(
            "/api/account/prescriptions",
            get(handlers::account::list_prescriptions),
        )
        .route(
            "/api/account/store-credit",
            get(handlers::account::list_store_credit),
        )
        .route("/api/account/profile", get(handlers::account::profile))
        .with_state(state)
}
