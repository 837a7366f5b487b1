use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::address::AddressOut;
use super::catalog::ProductCard;

/// One line of the frozen order snapshot. The price is kept as the display
/// string captured at order-creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub slug: String,
    pub name: String,
    pub price: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPageResponse {
    pub address: AddressOut,
    pub cart_items: Vec<ProductCard>,
    pub total_price: Decimal,
    pub razorpay_key_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentResponse {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub name: String,
    pub prefill: PaymentPrefill,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPrefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// Callback parameters posted back by the gateway checkout form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyPaymentForm {
    #[serde(default)]
    pub razorpay_order_id: String,
    #[serde(default)]
    pub razorpay_payment_id: String,
    #[serde(default)]
    pub razorpay_signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub order_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: i32,
    pub razorpay_order_id: String,
    pub status: String,
    pub amount_paise: i64,
    pub total_price: Decimal,
    pub currency: String,
    pub items: Vec<OrderItem>,
    pub address: Option<AddressOut>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderSummary>,
}
