//! Razorpay gateway client: order creation and checkout signature
//! verification.
//!
//! The checkout signature is `hex(HMAC-SHA256(order_id + "|" + payment_id))`
//! keyed with the API secret.

use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::env;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error)]
pub enum RazorpayError {
    /// Key id/secret missing from the environment
    #[error("Razorpay keys are not configured")]
    NotConfigured,
    #[error("Unable to create Razorpay order: {0}")]
    Gateway(String),
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest {
    amount: i64,
    currency: String,
    receipt: String,
    payment_capture: u8,
}

/// Subset of the Razorpay order entity we act on.
#[derive(Debug, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
}

#[derive(Clone)]
pub struct RazorpayService {
    client: Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

impl RazorpayService {
    pub fn new(key_id: String, key_secret: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            key_id,
            key_secret,
            base_url,
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            env::var("RAZORPAY_KEY_ID").unwrap_or_default(),
            env::var("RAZORPAY_KEY_SECRET").unwrap_or_default(),
            env::var("RAZORPAY_API_BASE")
                .unwrap_or_else(|_| "https://api.razorpay.com/v1".to_string()),
        )
    }

    pub fn is_configured(&self) -> bool {
        !self.key_id.is_empty() && !self.key_secret.is_empty()
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Create a remote order for `amount_paise` minor units with automatic
    /// capture. No local state is written here; the caller persists only
    /// after this succeeds.
    pub async fn create_order(
        &self,
        amount_paise: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, RazorpayError> {
        if !self.is_configured() {
            return Err(RazorpayError::NotConfigured);
        }

        let request = CreateOrderRequest {
            amount: amount_paise,
            currency: currency.to_string(),
            receipt: receipt.to_string(),
            payment_capture: 1,
        };

        let url = format!("{}/orders", self.base_url);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&request)
            .send()
            .await
            .map_err(|e| RazorpayError::Gateway(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RazorpayError::Gateway(e.to_string()))?;
        tracing::debug!("Razorpay create_order response {}: {}", status, body);

        if !status.is_success() {
            tracing::error!("Razorpay order creation failed with {}", status);
            return Err(RazorpayError::Gateway(format!("{}: {}", status, body)));
        }

        let order: GatewayOrder =
            serde_json::from_str(&body).map_err(|e| RazorpayError::Gateway(e.to_string()))?;
        tracing::info!(
            "Razorpay order {} created for {} {}",
            order.id,
            order.amount,
            order.currency
        );
        Ok(order)
    }

    /// Check a checkout callback signature against the shared secret.
    pub fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> bool {
        let payload = format!("{}|{}", order_id, payment_id);
        let expected = self.compute_signature(&payload);
        let is_valid = expected == signature;
        if !is_valid {
            tracing::warn!(
                "Payment signature verification failed for order {} payment {}",
                order_id,
                payment_id
            );
        }
        is_valid
    }

    fn compute_signature(&self, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.key_secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> RazorpayService {
        RazorpayService::new(
            "rzp_test_123".to_string(),
            "my_secret_key".to_string(),
            "https://api.razorpay.com/v1".to_string(),
        )
    }

    #[test]
    fn test_is_configured() {
        assert!(test_service().is_configured());
        let unconfigured =
            RazorpayService::new(String::new(), String::new(), "https://x".to_string());
        assert!(!unconfigured.is_configured());
    }

    #[test]
    fn test_valid_signature_passes() {
        let service = test_service();
        let expected = service.compute_signature("order_123|pay_456");
        assert!(service.verify_payment_signature("order_123", "pay_456", &expected));
    }

    #[test]
    fn test_tampered_signature_fails() {
        let service = test_service();
        let mut signature = service.compute_signature("order_123|pay_456");
        signature.replace_range(0..1, if signature.starts_with('0') { "1" } else { "0" });
        assert!(!service.verify_payment_signature("order_123", "pay_456", &signature));
    }

    #[test]
    fn test_signature_binds_order_and_payment() {
        let service = test_service();
        let signature = service.compute_signature("order_123|pay_456");
        assert!(!service.verify_payment_signature("order_999", "pay_456", &signature));
        assert!(!service.verify_payment_signature("order_123", "pay_999", &signature));
    }
}
