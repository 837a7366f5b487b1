//! External pincode directory client.
//!
//! Consulted only on a cache miss in the `delivery_pincodes` table. A
//! well-formed "no such pincode" answer is a domain rejection, distinct from
//! transport or parse failures.

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::time::Duration;

lazy_static! {
    static ref PINCODE_RE: Regex = Regex::new(r"^[1-9][0-9]{5}$").unwrap();
}

/// True for a syntactically valid Indian postal code: 6 digits, first 1-9.
pub fn is_valid_pincode(pincode: &str) -> bool {
    PINCODE_RE.is_match(pincode)
}

#[derive(Debug, thiserror::Error)]
pub enum PincodeLookupError {
    /// The directory answered and the code is not deliverable
    #[error("Pincode is not serviceable")]
    NotServiceable,
    #[error("Pincode directory lookup failed: {0}")]
    Upstream(String),
}

/// City/state resolved by the directory.
#[derive(Debug, Clone)]
pub struct PincodeRecord {
    pub city: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
struct DirectoryEnvelope {
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "PostOffice")]
    post_offices: Option<Vec<DirectoryPostOffice>>,
}

#[derive(Debug, Deserialize)]
struct DirectoryPostOffice {
    #[serde(rename = "District")]
    district: String,
    #[serde(rename = "State")]
    state: String,
}

#[derive(Clone)]
pub struct PincodeDirectoryService {
    client: Client,
    base_url: String,
}

impl PincodeDirectoryService {
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { client, base_url }
    }

    pub fn from_env() -> Self {
        Self::new(
            env::var("PINCODE_API_BASE")
                .unwrap_or_else(|_| "https://api.postalpincode.in".to_string()),
        )
    }

    /// One directory call per cache miss; no retries.
    pub async fn lookup(&self, pincode: &str) -> Result<PincodeRecord, PincodeLookupError> {
        let url = format!("{}/pincode/{}", self.base_url, pincode);
        tracing::info!("Looking up pincode {} in external directory", pincode);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PincodeLookupError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PincodeLookupError::Upstream(format!(
                "directory returned {}",
                status
            )));
        }

        let envelopes: Vec<DirectoryEnvelope> = response
            .json()
            .await
            .map_err(|e| PincodeLookupError::Upstream(e.to_string()))?;

        let envelope = envelopes
            .into_iter()
            .next()
            .ok_or_else(|| PincodeLookupError::Upstream("empty directory response".to_string()))?;

        if envelope.status != "Success" {
            return Err(PincodeLookupError::NotServiceable);
        }
        let post_office = envelope
            .post_offices
            .and_then(|offices| offices.into_iter().next())
            .ok_or(PincodeLookupError::NotServiceable)?;

        Ok(PincodeRecord {
            city: post_office.district,
            state: post_office.state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pincode_validation() {
        assert!(is_valid_pincode("560001"));
        assert!(is_valid_pincode("110011"));
        // Leading zero, wrong length, non-digits
        assert!(!is_valid_pincode("060001"));
        assert!(!is_valid_pincode("56001"));
        assert!(!is_valid_pincode("5600012"));
        assert!(!is_valid_pincode("56000a"));
        assert!(!is_valid_pincode(""));
    }
}
