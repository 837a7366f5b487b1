use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct PincodeQuery {
    #[serde(default)]
    pub pincode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PincodeResponse {
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub delivery_days: i16,
    /// Short-format estimate, e.g. "02 Sep"
    pub delivery_estimate: String,
    /// "db" when served from the cache, "external" after a directory lookup
    pub source: String,
}
