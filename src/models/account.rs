use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountOrderOut {
    pub order_id: String,
    pub total_price: Decimal,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountOrdersResponse {
    pub orders: Vec<AccountOrderOut>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionOut {
    pub id: i32,
    pub name: String,
    pub power_type: String,
    pub right_sph: Option<Decimal>,
    pub left_sph: Option<Decimal>,
    pub right_cyl: Option<Decimal>,
    pub left_cyl: Option<Decimal>,
    pub axis: Option<i32>,
    pub pd: Option<Decimal>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionsResponse {
    pub prescriptions: Vec<PrescriptionOut>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCreditOut {
    pub code: String,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCreditsResponse {
    pub credits: Vec<StoreCreditOut>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub whatsapp_opt_in: bool,
}
